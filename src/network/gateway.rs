use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::common::{BoardEvent, MessageDraft, StoreCommand};
use crate::storage::MessageStore;

/// Background side of the store gateway: turns UI commands into store calls
/// and reports the outcome as [`BoardEvent`]s.
///
/// Every command runs as its own task, so overlapping requests are neither
/// cancelled nor ordered; whichever finishes last is what the UI ends up
/// showing.
pub struct GatewayWorker {
    store: Arc<dyn MessageStore>,
    event_sender: mpsc::Sender<BoardEvent>,
    command_receiver: mpsc::Receiver<StoreCommand>,
}

impl GatewayWorker {
    pub fn new(
        store: Arc<dyn MessageStore>,
        event_sender: mpsc::Sender<BoardEvent>,
        command_receiver: mpsc::Receiver<StoreCommand>,
    ) -> Self {
        Self {
            store,
            event_sender,
            command_receiver,
        }
    }

    /// Runs until the command channel closes, then waits for requests that
    /// are still in flight.
    pub async fn run(mut self) {
        log::info!("Store gateway started");
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(command) => self.dispatch(command, &mut in_flight),
                        None => break,
                    }
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(err) = joined {
                        log::error!("Store request task failed: {err}");
                    }
                }
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(err) = joined {
                log::error!("Store request task failed: {err}");
            }
        }
        log::info!("Store gateway stopped");
    }

    fn dispatch(&self, command: StoreCommand, in_flight: &mut JoinSet<()>) {
        let store = Arc::clone(&self.store);
        let events = self.event_sender.clone();

        match command {
            StoreCommand::ListMessages => {
                in_flight.spawn(async move {
                    let event = match store.list_messages().await {
                        Ok(messages) => {
                            log::debug!("Loaded {} messages", messages.len());
                            BoardEvent::MessagesListed(messages)
                        }
                        Err(err) => {
                            log::error!("Failed to load messages: {err}");
                            BoardEvent::ListFailed(err.to_string())
                        }
                    };
                    notify(&events, event).await;
                });
            }
            StoreCommand::CreateMessage(draft) => {
                in_flight.spawn(async move {
                    let event = create(&*store, draft).await;
                    notify(&events, event).await;
                });
            }
        }
    }
}

async fn create(store: &dyn MessageStore, draft: MessageDraft) -> BoardEvent {
    match store.create_message(&draft).await {
        Ok(()) => {
            log::info!("Message posted at {:.4}, {:.4}", draft.lat, draft.lng);
            BoardEvent::MessageCreated
        }
        Err(err) => {
            log::error!("Failed to send message, try later: {err}");
            BoardEvent::CreateFailed {
                draft,
                reason: err.to_string(),
            }
        }
    }
}

async fn notify(events: &mpsc::Sender<BoardEvent>, event: BoardEvent) {
    if let Err(err) = events.send(event).await {
        log::warn!("Board UI is gone, dropping event: {:?}", err.0);
    }
}
