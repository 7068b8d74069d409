pub mod memory;
pub mod rest;

pub use memory::MemoryStore;
pub use rest::RestStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::common::{Message, MessageDraft};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store responded with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("store rejected the message: {0}")]
    Rejected(String),

    #[error("store unavailable")]
    Unavailable,
}

/// The two operations the board performs against the message table.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Every message, newest `created_at` first.
    async fn list_messages(&self) -> Result<Vec<Message>, StoreError>;

    /// Persists one row. `id` and `created_at` are assigned by the store.
    async fn create_message(&self, draft: &MessageDraft) -> Result<(), StoreError>;
}
