use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::common::{Message, MessageDraft};

use super::{MessageStore, StoreError};

/// In-process message table with the same contract as the hosted one.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<Message>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            rows: Mutex::new(messages),
            ..Self::default()
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of list calls received, failed ones included.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of create calls received, failed ones included.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn list_messages(&self) -> Result<Vec<Message>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }

        let mut messages = self
            .rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }

    async fn create_message(&self, draft: &MessageDraft) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        if draft.message.trim().is_empty() {
            return Err(StoreError::Rejected("message must not be empty".to_string()));
        }

        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        // created_at must order inserts even when the clock does not advance.
        let now = Utc::now();
        let created_at = match rows.iter().map(|row| row.created_at).max() {
            Some(latest) if latest >= now => latest + Duration::microseconds(1),
            _ => now,
        };

        rows.push(Message {
            id: Uuid::new_v4().to_string(),
            lat: draft.lat,
            lng: draft.lng,
            message: draft.message.clone(),
            display_name: draft.display_name.clone(),
            created_at,
        });
        Ok(())
    }
}
