//! Point struct for grid positions

use serde::{Deserialize, Serialize};
use std::hash::Hash;

use super::direction::Direction;
use crate::config::{GRID_HEIGHT, GRID_WIDTH};

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one step away in the given direction.
    /// The grid is toroidal: stepping off an edge wraps to the opposite edge.
    pub fn step(&self, direction: Direction) -> Point {
        let (dx, dy) = direction.delta();
        Point::new(
            (self.x + dx).rem_euclid(GRID_WIDTH),
            (self.y + dy).rem_euclid(GRID_HEIGHT),
        )
    }

    /// Generate a random in-bounds cell
    pub fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();

        Point::new(rng.gen_range(0..GRID_WIDTH), rng.gen_range(0..GRID_HEIGHT))
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}
