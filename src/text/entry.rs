//! Entry points: where a glyph's strokes touch the edge of its cell.
//!
//! ```text
//! 1   2   3
//!  *--*--*
//!  |     |
//! 8*     *4
//!  |     |
//!  *--*--*
//! 7   6   5
//! ```
//!
//! Two neighbouring cells continue the same line when each touches the
//! entry point facing the other. `-` touches 8 and 4, `|` touches 2 and 6,
//! `+` touches all four axis points. `/` and `\` touch their diagonal points
//! when drawn as slopes and any axis point when used as rounded corners.

use std::fmt;

/// One of the eight touch positions on a cell's perimeter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryPoint {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

impl EntryPoint {
    /// All entry points, numbered 1 to 8 in this order.
    pub const ALL: [EntryPoint; 8] = [
        EntryPoint::NorthWest,
        EntryPoint::North,
        EntryPoint::NorthEast,
        EntryPoint::East,
        EntryPoint::SouthEast,
        EntryPoint::South,
        EntryPoint::SouthWest,
        EntryPoint::West,
    ];

    /// The conventional 1-8 number of this entry point.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// Offset to the neighbouring cell reached through this point.
    pub fn offset(self) -> (i32, i32) {
        match self {
            EntryPoint::NorthWest => (-1, -1),
            EntryPoint::North => (0, -1),
            EntryPoint::NorthEast => (1, -1),
            EntryPoint::East => (1, 0),
            EntryPoint::SouthEast => (1, 1),
            EntryPoint::South => (0, 1),
            EntryPoint::SouthWest => (-1, 1),
            EntryPoint::West => (-1, 0),
        }
    }

    /// The entry point a neighbour must touch to connect back.
    pub fn opposite(self) -> Self {
        match self {
            EntryPoint::NorthWest => EntryPoint::SouthEast,
            EntryPoint::North => EntryPoint::South,
            EntryPoint::NorthEast => EntryPoint::SouthWest,
            EntryPoint::East => EntryPoint::West,
            EntryPoint::SouthEast => EntryPoint::NorthWest,
            EntryPoint::South => EntryPoint::North,
            EntryPoint::SouthWest => EntryPoint::NorthEast,
            EntryPoint::West => EntryPoint::East,
        }
    }

    /// Whether this is one of the four axis-aligned points.
    pub fn is_axis(self) -> bool {
        matches!(
            self,
            EntryPoint::North | EntryPoint::East | EntryPoint::South | EntryPoint::West
        )
    }

    /// Position of this point inside a 3x3 block, as `(column, row)`.
    pub fn block_position(self) -> (usize, usize) {
        let (dx, dy) = self.offset();
        ((1 + dx) as usize, (1 + dy) as usize)
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// A small set of entry points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EntryPoints(u8);

impl EntryPoints {
    pub const EMPTY: Self = Self(0);

    /// Build a set from a slice of points.
    pub fn of(points: &[EntryPoint]) -> Self {
        let mut set = Self::EMPTY;
        for &p in points {
            set.insert(p);
        }
        set
    }

    pub fn insert(&mut self, point: EntryPoint) {
        self.0 |= point.bit();
    }

    pub fn contains(self, point: EntryPoint) -> bool {
        self.0 & point.bit() != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate the contained points in 1-8 order.
    pub fn iter(self) -> impl Iterator<Item = EntryPoint> {
        EntryPoint::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

const AXIS: [EntryPoint; 4] = [
    EntryPoint::North,
    EntryPoint::East,
    EntryPoint::South,
    EntryPoint::West,
];

/// Entry points a glyph may touch, before looking at its neighbours.
pub fn candidates(c: char) -> EntryPoints {
    match c {
        '-' | '=' => EntryPoints::of(&[EntryPoint::East, EntryPoint::West]),
        '|' | ':' => EntryPoints::of(&[EntryPoint::North, EntryPoint::South]),
        '+' => EntryPoints::of(&AXIS),
        '/' => {
            let mut set = EntryPoints::of(&AXIS);
            set.insert(EntryPoint::NorthEast);
            set.insert(EntryPoint::SouthWest);
            set
        }
        '\\' => {
            let mut set = EntryPoints::of(&AXIS);
            set.insert(EntryPoint::NorthWest);
            set.insert(EntryPoint::SouthEast);
            set
        }
        _ => EntryPoints::EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_follow_diagram() {
        let numbers: Vec<u8> = EntryPoint::ALL.iter().map(|p| p.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_opposites_are_symmetric() {
        for p in EntryPoint::ALL {
            assert_eq!(p.opposite().opposite(), p);
            let (dx, dy) = p.offset();
            let (ox, oy) = p.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_line_candidates() {
        let h = candidates('-');
        assert!(h.contains(EntryPoint::East));
        assert!(h.contains(EntryPoint::West));
        assert_eq!(h.len(), 2);

        let v = candidates(':');
        assert!(v.contains(EntryPoint::North));
        assert!(v.contains(EntryPoint::South));
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_slash_candidates() {
        let s = candidates('/');
        assert!(s.contains(EntryPoint::NorthEast));
        assert!(s.contains(EntryPoint::SouthWest));
        assert!(!s.contains(EntryPoint::NorthWest));
        assert_eq!(s.len(), 6);
    }

    #[test]
    fn test_non_boundary_has_no_candidates() {
        assert!(candidates('a').is_empty());
        assert!(candidates(' ').is_empty());
        assert!(candidates('*').is_empty());
    }

    #[test]
    fn test_block_positions() {
        assert_eq!(EntryPoint::NorthWest.block_position(), (0, 0));
        assert_eq!(EntryPoint::East.block_position(), (2, 1));
        assert_eq!(EntryPoint::South.block_position(), (1, 2));
    }
}
