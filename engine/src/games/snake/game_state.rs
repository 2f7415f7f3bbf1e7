use crate::games::SessionRng;
use crate::log;
use super::food::place_food;
use super::settings::GridConfig;
use super::snake::Snake;
use super::snapshot::{GameOverNotification, GameSnapshot};
use super::types::{Cell, CollisionKind, Direction, Phase};

/// Result of a single call to [`GameState::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing changed.
    Ignored,
    Moved,
    /// Food eaten. Food is now absent until [`GameState::replenish_food`] runs.
    Ate,
    Collided(CollisionKind),
}

#[derive(Clone, Debug)]
pub struct GameState {
    snake: Snake,
    food: Option<Cell>,
    direction: Direction,
    score: u32,
    phase: Phase,
    grid: GridConfig,
    ticks: u64,
    end_reason: Option<CollisionKind>,
}

impl GameState {
    pub fn new(grid: GridConfig) -> Self {
        Self {
            snake: Snake::new(Cell::ORIGIN),
            food: None,
            direction: Direction::Right,
            score: 0,
            phase: Phase::Idle,
            grid,
            ticks: 0,
            end_reason: None,
        }
    }

    /// Resets everything and enters `Running`. Valid from any phase, so it
    /// doubles as restart.
    pub fn start(&mut self, rng: &mut SessionRng) {
        self.snake = Snake::new(Cell::ORIGIN);
        self.food = None;
        self.direction = Direction::Right;
        self.score = 0;
        self.ticks = 0;
        self.end_reason = None;
        self.phase = Phase::Running;
        self.replenish_food(rng);
    }

    pub fn stop(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Idle;
        }
    }

    /// Applies `direction` immediately. Returns `false` when not running or
    /// when it reverses the current direction.
    ///
    /// Requests are not queued per tick: two quick turns between ticks (for
    /// example Up then Left while moving Right) both apply, and the snake
    /// can end up heading into its own neck.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        if direction.is_opposite(&self.direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Ignored;
        }

        self.ticks += 1;

        let Some(new_head) = self.snake.head().step(self.direction, self.grid.size) else {
            return self.end_game(CollisionKind::Wall);
        };

        // Checked against the whole pre-move body, tail included, even though
        // the tail would vacate on a plain move.
        if self.snake.contains(&new_head) {
            return self.end_game(CollisionKind::SelfCollision);
        }

        if self.food == Some(new_head) {
            self.snake.advance(new_head, true);
            self.score += 1;
            self.food = None;
            log!("Food eaten at {}. Score: {}", new_head, self.score);
            TickOutcome::Ate
        } else {
            self.snake.advance(new_head, false);
            TickOutcome::Moved
        }
    }

    /// Places new food when none is present and the game is running.
    pub fn replenish_food(&mut self, rng: &mut SessionRng) {
        if self.phase != Phase::Running || self.food.is_some() {
            return;
        }

        self.food = place_food(self.snake.occupied(), &self.grid, rng);
        match self.food {
            Some(cell) => log!("Food placed at {}", cell),
            None => log!("No free cell left for food"),
        }
    }

    fn end_game(&mut self, reason: CollisionKind) -> TickOutcome {
        self.phase = Phase::GameOver;
        self.end_reason = Some(reason);
        log!(
            "Game over: {} at tick {}. Score: {}, length: {}",
            reason,
            self.ticks,
            self.score,
            self.snake.len()
        );
        TickOutcome::Collided(reason)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            snake: self.snake.segments().copied().collect(),
            food: self.food,
            score: self.score,
            phase: self.phase,
            direction: self.direction,
            tick: self.ticks,
            grid_size: self.grid.size,
        }
    }

    pub fn game_over_notification(&self) -> Option<GameOverNotification> {
        self.end_reason.map(|reason| GameOverNotification {
            score: self.score,
            length: self.snake.len(),
            reason,
            ticks: self.ticks,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn food(&self) -> Option<Cell> {
        self.food
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn end_reason(&self) -> Option<CollisionKind> {
        self.end_reason
    }

    /// Puts the game into `Running` with the given body, direction and food.
    /// Used to set up positions that normal play would take many ticks to reach.
    pub fn load_position(
        &mut self,
        snake: Snake,
        direction: Direction,
        food: Option<Cell>,
    ) -> Result<(), String> {
        if let Some(cell) = snake.segments().find(|c| c.x >= self.grid.size || c.y >= self.grid.size) {
            return Err(format!("Segment {} is outside the grid", cell));
        }
        if let Some(cell) = food {
            if cell.x >= self.grid.size || cell.y >= self.grid.size {
                return Err(format!("Food {} is outside the grid", cell));
            }
            if snake.contains(&cell) {
                return Err(format!("Food {} overlaps the snake", cell));
            }
        }

        self.snake = snake;
        self.direction = direction;
        self.food = food;
        self.score = 0;
        self.ticks = 0;
        self.end_reason = None;
        self.phase = Phase::Running;
        Ok(())
    }
}
