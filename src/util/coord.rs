//! Integer board coordinates and the L1 proximity metric
//!
//! The engine runs on integer coordinates: the L1 metric (sum of absolute
//! element-wise differences) is deliberately chosen over Euclidean distance
//! for cheap integer arithmetic, not geometric accuracy.

use std::ops::{Add, AddAssign, Sub};

/// A position on the game board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// L1 distance to another coordinate: `|dx| + |dy|`
    pub fn l1_distance(self, other: Coord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Clamp both components into the inclusive ranges given
    pub fn clamped(self, x_range: (i32, i32), y_range: (i32, i32)) -> Self {
        Self {
            x: self.x.clamp(x_range.0, x_range.1),
            y: self.y.clamp(y_range.0, y_range.1),
        }
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Coord {
    fn add_assign(&mut self, rhs: Coord) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord::new(self.x - rhs.x, self.y - rhs.y)
    }
}
