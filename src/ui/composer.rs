use crate::common::{ANONYMOUS_FAN, Coordinates, MessageDraft};

/// Fields of the message form. A fresh form is shown for every dropped pin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composer {
    pub message: String,
    pub display_name: String,
}

impl Composer {
    /// Validates the form and, when the message is not blank, empties it and
    /// returns the draft to send. A blank message leaves the fields untouched.
    pub fn take_draft(&mut self, at: Coordinates) -> Option<MessageDraft> {
        let message = self.message.trim();
        if message.is_empty() {
            return None;
        }

        let display_name = match self.display_name.trim() {
            "" => ANONYMOUS_FAN,
            name => name,
        };

        let draft = MessageDraft {
            lat: at.lat,
            lng: at.lng,
            message: message.to_string(),
            display_name: Some(display_name.to_string()),
        };
        self.clear();
        Some(draft)
    }

    /// Refills the form with a draft the store refused.
    pub fn restore(&mut self, draft: &MessageDraft) {
        self.message = draft.message.clone();
        self.display_name = match draft.display_name.as_deref() {
            Some(ANONYMOUS_FAN) | None => String::new(),
            Some(name) => name.to_string(),
        };
    }

    pub fn clear(&mut self) {
        self.message.clear();
        self.display_name.clear();
    }

    pub fn is_blank(&self) -> bool {
        self.message.trim().is_empty() && self.display_name.trim().is_empty()
    }
}
