//! Grid cell coordinates.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate on a text grid.
///
/// Cells are plain values: two cells are equal when their coordinates are.
/// Ordering is row-major (by `y`, then `x`) so sets of cells iterate in
/// reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    /// Create a new cell.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn north(self) -> Self {
        Self::new(self.x, self.y - 1)
    }

    pub fn south(self) -> Self {
        Self::new(self.x, self.y + 1)
    }

    pub fn east(self) -> Self {
        Self::new(self.x + 1, self.y)
    }

    pub fn west(self) -> Self {
        Self::new(self.x - 1, self.y)
    }

    /// The cell offset by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The four axis neighbours, in N, E, S, W order.
    pub fn axis_neighbours(self) -> [Cell; 4] {
        [self.north(), self.east(), self.south(), self.west()]
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbours() {
        let c = Cell::new(3, 4);
        assert_eq!(c.north(), Cell::new(3, 3));
        assert_eq!(c.south(), Cell::new(3, 5));
        assert_eq!(c.east(), Cell::new(4, 4));
        assert_eq!(c.west(), Cell::new(2, 4));
    }

    #[test]
    fn test_row_major_order() {
        let mut cells = vec![Cell::new(5, 1), Cell::new(0, 2), Cell::new(1, 1)];
        cells.sort();
        assert_eq!(cells, vec![Cell::new(1, 1), Cell::new(5, 1), Cell::new(0, 2)]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Cell::new(-1, 7).to_string(), "(-1, 7)");
    }
}
