use crate::geo::BootstrapOutcome;

use super::types::{Message, MessageDraft};

/// Events delivered to the UI by background tasks.
#[derive(Debug, Clone)]
pub enum BoardEvent {
    Located(BootstrapOutcome),
    MessagesListed(Vec<Message>),
    ListFailed(String),
    MessageCreated,
    /// The draft is handed back so the composer can be refilled.
    CreateFailed { draft: MessageDraft, reason: String },
}
