use std::collections::{HashSet, VecDeque};

use super::types::Cell;

/// Head-first body plus a membership set for O(1) occupancy checks.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Cell>,
    body_set: HashSet<Cell>,
}

impl Snake {
    pub fn new(start: Cell) -> Self {
        Self {
            body: VecDeque::from([start]),
            body_set: HashSet::from([start]),
        }
    }

    /// Builds a snake from head-first segments. Rejects empty,
    /// self-overlapping and disconnected bodies.
    pub fn from_segments(segments: impl IntoIterator<Item = Cell>) -> Result<Self, String> {
        let body: VecDeque<Cell> = segments.into_iter().collect();
        if body.is_empty() {
            return Err("Snake must have at least one segment".to_string());
        }

        let body_set: HashSet<Cell> = body.iter().copied().collect();
        if body_set.len() != body.len() {
            return Err("Snake segments must not overlap".to_string());
        }

        if let Some(index) = body
            .iter()
            .zip(body.iter().skip(1))
            .position(|(a, b)| !a.is_adjacent(b))
        {
            return Err(format!(
                "Snake segments {} and {} are not adjacent",
                body[index],
                body[index + 1]
            ));
        }

        Ok(Self { body, body_set })
    }

    pub fn head(&self) -> Cell {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Cell {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.body_set.contains(cell)
    }

    pub fn occupied(&self) -> &HashSet<Cell> {
        &self.body_set
    }

    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    /// Prepends `new_head`; the tail is kept when `grow` is set and dropped
    /// otherwise. The caller has already ruled out collisions.
    pub fn advance(&mut self, new_head: Cell, grow: bool) {
        if !grow {
            let tail = self
                .body
                .pop_back()
                .expect("Snake body should never be empty");
            self.body_set.remove(&tail);
        }

        self.body.push_front(new_head);
        self.body_set.insert(new_head);
    }
}
