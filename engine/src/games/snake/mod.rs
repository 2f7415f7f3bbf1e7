mod food;
mod game_state;
mod session;
mod settings;
mod snake;
mod snapshot;
mod types;

pub use food::{place_food, RANDOM_PLACEMENT_ATTEMPTS};
pub use game_state::{GameState, TickOutcome};
pub use session::SnakeSession;
pub use settings::GridConfig;
pub use snake::Snake;
pub use snapshot::{GameOverNotification, GameSnapshot};
pub use types::{Cell, CollisionKind, Direction, Phase};
