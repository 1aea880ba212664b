use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::quantity::Quantity;

/// A point on the integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub x: i64,
    pub y: i64,
}

impl Location {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another location. Widened so extreme
    /// coordinates cannot overflow.
    pub fn manhattan_distance(&self, other: &Location) -> u128 {
        let dx = (i128::from(self.x) - i128::from(other.x)).unsigned_abs();
        let dy = (i128::from(self.y) - i128::from(other.y)).unsigned_abs();
        dx + dy
    }

    /// Manhattan distance as an exact quantity, for cost arithmetic.
    pub fn distance(&self, other: &Location) -> Quantity {
        Quantity::from_integer(BigInt::from(self.manhattan_distance(other)))
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
