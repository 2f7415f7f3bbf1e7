use snake_engine::games::GameBroadcaster;
use snake_engine::games::snake::{GameOverNotification, GameSnapshot};
use tokio::sync::mpsc;

pub enum SessionEvent {
    State(GameSnapshot),
    GameOver(GameOverNotification),
}

/// Forwards session output to the console loop.
#[derive(Clone)]
pub struct ChannelBroadcaster {
    event_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl ChannelBroadcaster {
    pub fn new(event_tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { event_tx }
    }
}

impl GameBroadcaster for ChannelBroadcaster {
    async fn broadcast_state(&self, snapshot: GameSnapshot) {
        // The receiver only disappears on shutdown.
        let _ = self.event_tx.send(SessionEvent::State(snapshot));
    }

    async fn broadcast_game_over(&self, notification: GameOverNotification) {
        let _ = self.event_tx.send(SessionEvent::GameOver(notification));
    }
}
