use std::collections::HashSet;

use crate::games::SessionRng;
use super::settings::GridConfig;
use super::types::Cell;

/// Independent uniform draws tried before falling back to enumerating free cells.
pub const RANDOM_PLACEMENT_ATTEMPTS: usize = 100;

/// Picks a cell uniformly at random among those not in `occupied`.
///
/// Rejection sampling over the whole grid is tried first. When the snake
/// covers most of the board and every draw lands on it, the free cells are
/// enumerated and one is chosen uniformly instead, so the call always
/// terminates. Returns `None` only when no free cell exists.
pub fn place_food(occupied: &HashSet<Cell>, grid: &GridConfig, rng: &mut SessionRng) -> Option<Cell> {
    if occupied.len() >= grid.cell_count() {
        return None;
    }

    for _ in 0..RANDOM_PLACEMENT_ATTEMPTS {
        let cell = Cell::new(rng.random_range(0..grid.size), rng.random_range(0..grid.size));
        if !occupied.contains(&cell) {
            return Some(cell);
        }
    }

    let free_cells: Vec<Cell> = (0..grid.size)
        .flat_map(|y| (0..grid.size).map(move |x| Cell::new(x, y)))
        .filter(|cell| !occupied.contains(cell))
        .collect();

    rng.random_index(free_cells.len()).map(|index| free_cells[index])
}
