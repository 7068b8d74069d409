pub mod commands;
pub mod events;
pub mod types;

pub use commands::StoreCommand;
pub use events::BoardEvent;
pub use types::{ANONYMOUS_FAN, Coordinates, Message, MessageDraft};
