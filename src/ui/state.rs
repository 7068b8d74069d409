use crate::common::{BoardEvent, Coordinates, Message, MessageDraft, StoreCommand};
use crate::geo::BootstrapOutcome;
use crate::map::MapView;

use super::composer::Composer;

/// Pin state of the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    Idle,
    /// A pin waits for its message; the composer is open.
    PinDropped(Coordinates),
}

/// Everything the board window shows. Only the UI thread mutates it, and it
/// never talks to the network itself: operations that need the store return
/// the [`StoreCommand`] to send.
pub struct BoardState {
    pub messages: Vec<Message>,
    pub interaction: Interaction,
    pub composer: Composer,
    pub view: MapView,
    pub locating: bool,
    pub notice: Option<&'static str>,
    selected: Option<String>,
}

impl BoardState {
    pub fn new(view: MapView) -> Self {
        Self {
            messages: Vec::new(),
            interaction: Interaction::Idle,
            composer: Composer::default(),
            view,
            locating: true,
            notice: None,
            selected: None,
        }
    }

    pub fn pending(&self) -> Option<Coordinates> {
        match self.interaction {
            Interaction::Idle => None,
            Interaction::PinDropped(coords) => Some(coords),
        }
    }

    pub fn selected_message(&self) -> Option<&Message> {
        let id = self.selected.as_deref()?;
        self.messages.iter().find(|message| message.id == id)
    }

    /// Drops a pin, replacing any pin that is already waiting.
    pub fn click(&mut self, at: Coordinates) {
        self.selected = None;
        self.interaction = Interaction::PinDropped(at);
    }

    pub fn select_marker(&mut self, id: &str) {
        self.selected = Some(id.to_string());
    }

    pub fn cancel(&mut self) {
        self.interaction = Interaction::Idle;
        self.composer.clear();
    }

    /// Returns the create command for a valid draft; `None` when there is no
    /// pin or the message is blank.
    pub fn submit(&mut self) -> Option<StoreCommand> {
        let at = self.pending()?;
        let draft = self.composer.take_draft(at)?;
        Some(StoreCommand::CreateMessage(draft))
    }

    /// The board is refreshed from the store instead of inserting locally.
    pub fn message_created(&mut self) -> StoreCommand {
        self.interaction = Interaction::Idle;
        self.composer.clear();
        StoreCommand::ListMessages
    }

    /// Leaves the pin in place and gives the text back for a manual retry.
    pub fn create_failed(&mut self, draft: &MessageDraft) {
        if matches!(self.interaction, Interaction::PinDropped(_)) && self.composer.is_blank() {
            self.composer.restore(draft);
        }
    }

    pub fn messages_listed(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        if self.selected_message().is_none() {
            self.selected = None;
        }
    }

    pub fn located(&mut self, outcome: BootstrapOutcome) {
        self.locating = false;
        self.view.center = outcome.center;
        self.notice = outcome.notice_text();
    }

    /// Applies a background event, returning the follow-up command if any.
    pub fn apply(&mut self, event: BoardEvent) -> Option<StoreCommand> {
        match event {
            BoardEvent::Located(outcome) => self.located(outcome),
            BoardEvent::MessagesListed(messages) => self.messages_listed(messages),
            // The last known list stays on screen.
            BoardEvent::ListFailed(reason) => log::warn!("Keeping previous messages: {reason}"),
            BoardEvent::MessageCreated => return Some(self.message_created()),
            BoardEvent::CreateFailed { draft, reason } => {
                log::warn!("Message not posted, composer left open: {reason}");
                self.create_failed(&draft);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::common::ANONYMOUS_FAN;
    use crate::geo::GeoError;

    const TAIPEI: Coordinates = Coordinates::new(25.03, 121.56);
    const SEOUL: Coordinates = Coordinates::new(37.56, 126.97);
    const FALLBACK: Coordinates = Coordinates::new(20.0, 0.0);

    fn board() -> BoardState {
        BoardState::new(MapView::new(FALLBACK, 2))
    }

    fn message(id: &str, text: &str) -> Message {
        Message {
            id: id.to_string(),
            lat: TAIPEI.lat,
            lng: TAIPEI.lng,
            message: text.to_string(),
            display_name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn starts_idle_and_locating() {
        let board = board();
        assert_eq!(board.interaction, Interaction::Idle);
        assert!(board.locating);
        assert!(board.pending().is_none());
    }

    #[test]
    fn last_click_wins() {
        let mut board = board();
        board.click(TAIPEI);
        board.click(SEOUL);
        assert_eq!(board.interaction, Interaction::PinDropped(SEOUL));
        assert_eq!(board.pending(), Some(SEOUL));
    }

    #[test]
    fn cancel_discards_pin_and_text() {
        let mut board = board();
        board.click(TAIPEI);
        board.composer.message = "half written".to_string();

        board.cancel();
        assert_eq!(board.interaction, Interaction::Idle);
        assert!(board.composer.is_blank());
    }

    #[test]
    fn blank_submit_issues_nothing() {
        let mut board = board();
        board.click(TAIPEI);
        board.composer.message = "   ".to_string();

        assert!(board.submit().is_none());
        assert_eq!(board.interaction, Interaction::PinDropped(TAIPEI));
    }

    #[test]
    fn submit_without_pin_issues_nothing() {
        let mut board = board();
        board.composer.message = "hello".to_string();
        assert!(board.submit().is_none());
    }

    #[test]
    fn submit_uses_latest_pin() {
        let mut board = board();
        board.click(TAIPEI);
        board.click(SEOUL);
        board.composer.message = "Fighting!".to_string();

        match board.submit() {
            Some(StoreCommand::CreateMessage(draft)) => {
                assert_eq!(draft.position(), SEOUL);
                assert_eq!(draft.display_name.as_deref(), Some(ANONYMOUS_FAN));
            }
            other => panic!("unexpected command {other:?}"),
        }
        // Still waiting on the store.
        assert_eq!(board.interaction, Interaction::PinDropped(SEOUL));
        assert!(board.composer.is_blank());
    }

    #[test]
    fn success_returns_to_idle_and_refreshes() {
        let mut board = board();
        board.click(TAIPEI);
        board.composer.message = "hi".to_string();
        board.submit().unwrap();

        let follow_up = board.apply(BoardEvent::MessageCreated);
        assert!(matches!(follow_up, Some(StoreCommand::ListMessages)));
        assert_eq!(board.interaction, Interaction::Idle);
    }

    #[test]
    fn failure_keeps_pin_and_restores_text() {
        let mut board = board();
        board.click(TAIPEI);
        board.composer.message = "please work".to_string();
        board.composer.display_name = "ryujin".to_string();
        let Some(StoreCommand::CreateMessage(draft)) = board.submit() else {
            panic!("expected a create command");
        };

        let follow_up = board.apply(BoardEvent::CreateFailed {
            draft,
            reason: "503".to_string(),
        });
        assert!(follow_up.is_none());
        assert_eq!(board.interaction, Interaction::PinDropped(TAIPEI));
        assert_eq!(board.composer.message, "please work");
        assert_eq!(board.composer.display_name, "ryujin");
    }

    #[test]
    fn list_failure_keeps_last_known_messages() {
        let mut board = board();
        board.apply(BoardEvent::MessagesListed(vec![message("1", "old")]));
        board.apply(BoardEvent::ListFailed("offline".to_string()));

        assert_eq!(board.messages.len(), 1);
        assert_eq!(board.messages[0].message, "old");
    }

    #[test]
    fn later_listing_replaces_earlier_one() {
        let mut board = board();
        board.apply(BoardEvent::MessagesListed(vec![message("1", "a")]));
        board.apply(BoardEvent::MessagesListed(vec![
            message("2", "b"),
            message("1", "a"),
        ]));
        assert_eq!(board.messages.len(), 2);
        assert_eq!(board.messages[0].id, "2");
    }

    #[test]
    fn location_outcome_centers_and_clears_loading() {
        let mut board = board();
        board.apply(BoardEvent::Located(BootstrapOutcome::from_result(
            Err(GeoError::Timeout),
            FALLBACK,
        )));

        assert!(!board.locating);
        assert_eq!(board.view.center, FALLBACK);
        assert_eq!(board.notice, Some(GeoError::Timeout.user_message()));

        board.apply(BoardEvent::Located(BootstrapOutcome::from_result(
            Ok(SEOUL),
            FALLBACK,
        )));
        assert_eq!(board.view.center, SEOUL);
        assert_eq!(board.notice, None);
    }

    #[test]
    fn click_closes_marker_popup() {
        let mut board = board();
        board.apply(BoardEvent::MessagesListed(vec![message("7", "hey")]));
        board.select_marker("7");
        assert_eq!(board.selected_message().map(|m| m.id.as_str()), Some("7"));

        board.click(SEOUL);
        assert!(board.selected_message().is_none());
    }
}
