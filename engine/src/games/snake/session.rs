use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::games::{GameBroadcaster, SessionRng};
use crate::log;
use super::game_state::{GameState, TickOutcome};
use super::settings::GridConfig;
use super::snapshot::GameSnapshot;
use super::types::{Direction, Phase};

struct SessionCore {
    game_state: GameState,
    rng: SessionRng,
    /// Bumped by every start and stop. A tick loop only acts while the
    /// generation it was spawned with is still current.
    generation: u64,
    tick_loop: Option<JoinHandle<()>>,
}

impl SessionCore {
    fn cancel_tick_loop(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.tick_loop.take() {
            handle.abort();
        }
    }
}

struct SessionInner<B: GameBroadcaster> {
    session_id: String,
    grid: GridConfig,
    core: Mutex<SessionCore>,
    broadcaster: B,
}

impl<B: GameBroadcaster> Drop for SessionInner<B> {
    fn drop(&mut self) {
        if let Some(handle) = self.core.get_mut().tick_loop.take() {
            handle.abort();
        }
    }
}

/// Owns one `GameState` and the timer that drives it.
///
/// Every operation and every tick goes through the same lock, so a direction
/// change lands either entirely before or entirely after a tick. Snapshots
/// are broadcast while the lock is held, so observers see them in order.
/// Broadcasters must not call back into the session.
pub struct SnakeSession<B: GameBroadcaster> {
    inner: Arc<SessionInner<B>>,
}

impl<B: GameBroadcaster> Clone for SnakeSession<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: GameBroadcaster> SnakeSession<B> {
    pub fn new(session_id: impl Into<String>, grid: GridConfig, rng: SessionRng, broadcaster: B) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                session_id: session_id.into(),
                grid,
                core: Mutex::new(SessionCore {
                    game_state: GameState::new(grid),
                    rng,
                    generation: 0,
                    tick_loop: None,
                }),
                broadcaster,
            }),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.inner.session_id
    }

    pub fn grid(&self) -> GridConfig {
        self.inner.grid
    }

    /// Starts a fresh game, replacing whatever was running. Must be called
    /// from within a tokio runtime.
    pub async fn start(&self) {
        let mut core = self.inner.core.lock().await;
        core.cancel_tick_loop();

        let SessionCore { game_state, rng, .. } = &mut *core;
        game_state.start(rng);

        log!(
            "[session:{}] Started: grid {}x{}, tick {}ms, seed {}",
            self.inner.session_id,
            self.inner.grid.size,
            self.inner.grid.size,
            self.inner.grid.tick_interval.as_millis(),
            core.rng.seed()
        );

        self.inner
            .broadcaster
            .broadcast_state(core.game_state.snapshot())
            .await;

        let generation = core.generation;
        let period = self.inner.grid.tick_interval;
        let inner = Arc::downgrade(&self.inner);
        core.tick_loop = Some(tokio::spawn(async move {
            run_tick_loop(inner, generation, Instant::now() + period, period).await;
        }));
    }

    /// Halts the game without a game-over signal. No tick scheduled before
    /// this call will touch the state afterwards.
    pub async fn stop(&self) {
        let mut core = self.inner.core.lock().await;
        core.cancel_tick_loop();

        if core.game_state.phase() != Phase::Running {
            return;
        }

        core.game_state.stop();
        log!(
            "[session:{}] Stopped at tick {} with score {}",
            self.inner.session_id,
            core.game_state.snapshot().tick,
            core.game_state.score()
        );

        self.inner
            .broadcaster
            .broadcast_state(core.game_state.snapshot())
            .await;
    }

    /// Returns whether the request was applied.
    pub async fn request_direction(&self, direction: Direction) -> bool {
        let mut core = self.inner.core.lock().await;

        if core.game_state.phase() != Phase::Running {
            log!("[session:{}] Ignored turn {}: game is not running", self.inner.session_id, direction);
            return false;
        }

        let previous = core.game_state.direction();
        if !core.game_state.request_direction(direction) {
            log!(
                "[session:{}] Ignored turn {}: reverses {}",
                self.inner.session_id,
                direction,
                previous
            );
            return false;
        }

        if previous != direction {
            self.inner
                .broadcaster
                .broadcast_state(core.game_state.snapshot())
                .await;
        }
        true
    }

    pub async fn snapshot(&self) -> GameSnapshot {
        self.inner.core.lock().await.game_state.snapshot()
    }

    pub async fn is_running(&self) -> bool {
        self.inner.core.lock().await.game_state.phase() == Phase::Running
    }

    #[cfg(test)]
    async fn load_position(
        &self,
        snake: super::snake::Snake,
        direction: Direction,
        food: Option<super::types::Cell>,
    ) {
        let mut core = self.inner.core.lock().await;
        core.game_state
            .load_position(snake, direction, food)
            .expect("test position should be valid");
    }
}

/// Holds only a weak reference, so the loop ends once every session handle is gone.
async fn run_tick_loop<B: GameBroadcaster>(
    session: Weak<SessionInner<B>>,
    generation: u64,
    first_tick: Instant,
    period: Duration,
) {
    let mut timer = interval_at(first_tick, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        timer.tick().await;

        let Some(inner) = session.upgrade() else {
            return;
        };
        let mut core = inner.core.lock().await;
        if core.generation != generation {
            return;
        }

        let outcome = core.game_state.tick();
        match outcome {
            TickOutcome::Ignored => return,
            TickOutcome::Ate => {
                let SessionCore { game_state, rng, .. } = &mut *core;
                game_state.replenish_food(rng);
            }
            TickOutcome::Moved | TickOutcome::Collided(_) => {}
        }

        inner
            .broadcaster
            .broadcast_state(core.game_state.snapshot())
            .await;

        if let TickOutcome::Collided(reason) = outcome {
            log!(
                "[session:{}] Game over ({}), score {}",
                inner.session_id,
                reason,
                core.game_state.score()
            );
            if let Some(notification) = core.game_state.game_over_notification() {
                inner.broadcaster.broadcast_game_over(notification).await;
            }
            core.tick_loop = None;
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use tokio::time::sleep;

    use crate::games::snake::{Cell, CollisionKind, GameOverNotification, Snake};

    #[derive(Clone, Default)]
    struct RecordingBroadcaster {
        states: Arc<StdMutex<Vec<GameSnapshot>>>,
        game_overs: Arc<StdMutex<Vec<GameOverNotification>>>,
    }

    impl RecordingBroadcaster {
        fn states(&self) -> Vec<GameSnapshot> {
            self.states.lock().unwrap().clone()
        }

        fn game_overs(&self) -> Vec<GameOverNotification> {
            self.game_overs.lock().unwrap().clone()
        }
    }

    impl GameBroadcaster for RecordingBroadcaster {
        async fn broadcast_state(&self, snapshot: GameSnapshot) {
            self.states.lock().unwrap().push(snapshot);
        }

        async fn broadcast_game_over(&self, notification: GameOverNotification) {
            self.game_overs.lock().unwrap().push(notification);
        }
    }

    fn create_session(size: usize, tick_ms: u64) -> (SnakeSession<RecordingBroadcaster>, RecordingBroadcaster) {
        let broadcaster = RecordingBroadcaster::default();
        let grid = GridConfig::new(size, tick_ms).unwrap();
        let session = SnakeSession::new("test", grid, SessionRng::new(42), broadcaster.clone());
        (session, broadcaster)
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_broadcasts_initial_state() {
        let (session, broadcaster) = create_session(20, 100);
        session.start().await;

        let states = broadcaster.states();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].phase, Phase::Running);
        assert_eq!(states[0].snake, vec![Cell::ORIGIN]);
        assert_eq!(states[0].score, 0);
        assert!(states[0].food.is_some());
        assert_ne!(states[0].food, Some(Cell::ORIGIN));
        assert!(session.is_running().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_advance_at_interval() {
        let (session, broadcaster) = create_session(20, 100);
        session.start().await;
        session.load_position(Snake::new(Cell::ORIGIN), Direction::Right, Some(Cell::new(10, 10))).await;

        sleep(Duration::from_millis(50)).await;
        assert_eq!(session.snapshot().await.tick, 0);

        sleep(Duration::from_millis(300)).await;
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.tick, 3);
        assert_eq!(snapshot.head(), Some(Cell::new(3, 0)));
        assert_eq!(broadcaster.states().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_eating_refreshes_food_before_broadcast() {
        let (session, broadcaster) = create_session(20, 100);
        session.start().await;
        session.load_position(Snake::new(Cell::ORIGIN), Direction::Right, Some(Cell::new(1, 0))).await;

        sleep(Duration::from_millis(150)).await;

        let last = broadcaster.states().last().cloned().unwrap();
        assert_eq!(last.score, 1);
        assert_eq!(last.snake, vec![Cell::new(1, 0), Cell::new(0, 0)]);
        let food = last.food.unwrap();
        assert!(!last.snake.contains(&food));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wall_collision_ends_loop_and_notifies_once() {
        let (session, broadcaster) = create_session(5, 100);
        session.start().await;
        session.load_position(Snake::new(Cell::ORIGIN), Direction::Right, None).await;

        sleep(Duration::from_millis(1000)).await;

        let game_overs = broadcaster.game_overs();
        assert_eq!(game_overs.len(), 1);
        assert_eq!(game_overs[0].reason, CollisionKind::Wall);
        assert_eq!(game_overs[0].ticks, 5);

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.phase, Phase::GameOver);
        assert_eq!(snapshot.head(), Some(Cell::new(4, 0)));
        assert!(!session.is_running().await);

        let broadcasts = broadcaster.states().len();
        sleep(Duration::from_millis(1000)).await;
        assert_eq!(broadcaster.states().len(), broadcasts);
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_applies_on_next_tick() {
        let (session, _) = create_session(20, 100);
        session.start().await;
        session.load_position(Snake::new(Cell::new(5, 5)), Direction::Right, None).await;

        assert!(session.request_direction(Direction::Down).await);
        sleep(Duration::from_millis(150)).await;
        assert_eq!(session.snapshot().await.head(), Some(Cell::new(5, 6)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reverse_turn_rejected() {
        let (session, broadcaster) = create_session(20, 100);
        session.start().await;
        let snake = Snake::from_segments([Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)]).unwrap();
        session.load_position(snake, Direction::Right, None).await;

        assert!(!session.request_direction(Direction::Left).await);
        assert_eq!(broadcaster.states().len(), 1);

        sleep(Duration::from_millis(150)).await;
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.head(), Some(Cell::new(6, 5)));
        assert_eq!(snapshot.phase, Phase::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_ignored_before_start() {
        let (session, broadcaster) = create_session(20, 100);
        assert!(!session.request_direction(Direction::Down).await);
        assert!(broadcaster.states().is_empty());
        assert_eq!(session.snapshot().await.phase, Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_further_ticks() {
        let (session, broadcaster) = create_session(20, 100);
        session.start().await;
        session.load_position(Snake::new(Cell::new(0, 5)), Direction::Right, None).await;

        sleep(Duration::from_millis(250)).await;
        session.stop().await;
        let stopped = session.snapshot().await;
        assert_eq!(stopped.phase, Phase::Idle);
        assert_eq!(stopped.tick, 2);
        assert_eq!(broadcaster.states().last().map(|s| s.phase), Some(Phase::Idle));

        sleep(Duration::from_millis(1000)).await;
        assert_eq!(session.snapshot().await, stopped);
        assert!(broadcaster.game_overs().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_then_start_resets_game() {
        let (session, _) = create_session(20, 100);
        session.start().await;
        session.load_position(Snake::new(Cell::ORIGIN), Direction::Right, Some(Cell::new(1, 0))).await;
        sleep(Duration::from_millis(150)).await;
        assert_eq!(session.snapshot().await.score, 1);

        session.stop().await;
        session.start().await;

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.phase, Phase::Running);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.snake, vec![Cell::ORIGIN]);
        assert_eq!(snapshot.direction, Direction::Right);
        assert!(snapshot.food.is_some());
        assert_ne!(snapshot.food, Some(Cell::ORIGIN));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_previous_tick_loop() {
        let (session, _) = create_session(20, 100);
        session.start().await;
        session.load_position(Snake::new(Cell::new(0, 5)), Direction::Right, None).await;

        sleep(Duration::from_millis(150)).await;
        assert_eq!(session.snapshot().await.tick, 1);

        session.start().await;
        session.load_position(Snake::new(Cell::new(0, 5)), Direction::Right, None).await;

        // The first loop would have ticked at 200ms; the new one first ticks at 250ms.
        sleep(Duration::from_millis(70)).await;
        assert_eq!(session.snapshot().await.tick, 0);

        sleep(Duration::from_millis(50)).await;
        assert_eq!(session.snapshot().await.tick, 1);

        sleep(Duration::from_millis(100)).await;
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.tick, 2);
        assert_eq!(snapshot.head(), Some(Cell::new(2, 5)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_all_handles_ends_tick_loop() {
        let (session, broadcaster) = create_session(20, 100);
        let other_handle = session.clone();
        session.start().await;
        session.load_position(Snake::new(Cell::new(0, 5)), Direction::Right, None).await;

        sleep(Duration::from_millis(150)).await;
        assert_eq!(broadcaster.states().len(), 2);

        drop(session);
        sleep(Duration::from_millis(100)).await;
        assert_eq!(broadcaster.states().len(), 3);

        drop(other_handle);
        sleep(Duration::from_millis(1000)).await;
        assert_eq!(broadcaster.states().len(), 3);
        assert!(broadcaster.game_overs().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_game_over() {
        let (session, broadcaster) = create_session(5, 100);
        session.start().await;
        session.load_position(Snake::new(Cell::new(4, 0)), Direction::Right, None).await;
        sleep(Duration::from_millis(150)).await;
        assert_eq!(broadcaster.game_overs().len(), 1);

        assert!(!session.request_direction(Direction::Down).await);

        session.start().await;
        assert!(session.is_running().await);
        assert!(session.request_direction(Direction::Down).await);
    }
}
