use super::types::MessageDraft;

/// Requests the UI sends down to the store gateway.
#[derive(Debug, Clone)]
pub enum StoreCommand {
    /// Fetch every message, newest first.
    ListMessages,
    /// Insert one message.
    CreateMessage(MessageDraft),
}
