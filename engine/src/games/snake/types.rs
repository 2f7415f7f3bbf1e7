use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { x: 0, y: 0 };

    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell in `direction`, or `None` when it would leave a
    /// `size` x `size` grid.
    pub fn step(self, direction: Direction, size: usize) -> Option<Cell> {
        let (x, y) = match direction {
            Direction::Up => (Some(self.x), self.y.checked_sub(1)),
            Direction::Down => (Some(self.x), self.y.checked_add(1)),
            Direction::Left => (self.x.checked_sub(1), Some(self.y)),
            Direction::Right => (self.x.checked_add(1), Some(self.y)),
        };

        match (x, y) {
            (Some(x), Some(y)) if x < size && y < size => Some(Cell::new(x, y)),
            _ => None,
        }
    }

    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(&self, other: &Direction) -> bool {
        self.opposite() == *other
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// Accepts plain names, browser arrow-key names and WASD.
impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "arrowup" | "w" => Ok(Direction::Up),
            "down" | "arrowdown" | "s" => Ok(Direction::Down),
            "left" | "arrowleft" | "a" => Ok(Direction::Left),
            "right" | "arrowright" | "d" => Ok(Direction::Right),
            other => Err(format!("Unknown direction: {}", other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionKind {
    Wall,
    SelfCollision,
}

impl fmt::Display for CollisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionKind::Wall => f.write_str("wall collision"),
            CollisionKind::SelfCollision => f.write_str("self collision"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_moves_one_unit() {
        let cell = Cell::new(5, 5);
        assert_eq!(cell.step(Direction::Right, 20), Some(Cell::new(6, 5)));
        assert_eq!(cell.step(Direction::Left, 20), Some(Cell::new(4, 5)));
        assert_eq!(cell.step(Direction::Down, 20), Some(Cell::new(5, 6)));
        assert_eq!(cell.step(Direction::Up, 20), Some(Cell::new(5, 4)));
    }

    #[test]
    fn test_step_off_grid_is_none_from_every_edge() {
        let size = 10;
        for i in 0..size {
            assert_eq!(Cell::new(0, i).step(Direction::Left, size), None);
            assert_eq!(Cell::new(size - 1, i).step(Direction::Right, size), None);
            assert_eq!(Cell::new(i, 0).step(Direction::Up, size), None);
            assert_eq!(Cell::new(i, size - 1).step(Direction::Down, size), None);
        }
    }

    #[test]
    fn test_opposites() {
        for direction in Direction::ALL {
            assert!(direction.is_opposite(&direction.opposite()));
            assert!(!direction.is_opposite(&direction));
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn test_parse_direction_tokens() {
        assert_eq!("ArrowUp".parse::<Direction>(), Ok(Direction::Up));
        assert_eq!(" down ".parse::<Direction>(), Ok(Direction::Down));
        assert_eq!("a".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!("RIGHT".parse::<Direction>(), Ok(Direction::Right));
        assert!("north".parse::<Direction>().is_err());
    }

    #[test]
    fn test_adjacency() {
        let cell = Cell::new(3, 3);
        assert!(cell.is_adjacent(&Cell::new(3, 4)));
        assert!(!cell.is_adjacent(&Cell::new(4, 4)));
        assert!(!cell.is_adjacent(&cell));
    }
}
