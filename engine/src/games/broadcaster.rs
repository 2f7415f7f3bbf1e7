use std::future::Future;

use super::snake::{GameOverNotification, GameSnapshot};

/// Outbound seam to whatever presents the game. Implementations only receive
/// copies of the state; they never get access to the live `GameState`.
pub trait GameBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_state(&self, snapshot: GameSnapshot) -> impl Future<Output = ()> + Send;

    fn broadcast_game_over(
        &self,
        notification: GameOverNotification,
    ) -> impl Future<Output = ()> + Send;
}
