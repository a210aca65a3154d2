//! The text grid: a rectangular array of characters with line queries.
//!
//! Besides storage, the grid answers the questions the boundary compiler
//! asks about a cell: does it draw part of a line, does the line end or
//! branch here, which neighbours continue it. Continuation is decided with
//! the entry point model from [`super::entry`].

use std::fmt;

use super::cell::Cell;
use super::cell_set::CellSet;
use super::entry::{candidates, EntryPoint, EntryPoints};

/// The blank character.
pub const BLANK: char = ' ';

/// Characters that draw horizontal lines.
pub const HORIZONTAL_LINES: &[char] = &['-', '='];

/// Characters that draw vertical lines.
pub const VERTICAL_LINES: &[char] = &['|', ':'];

/// Characters that make a line dashed.
pub const DASHED_LINES: &[char] = &[':', '='];

/// Characters drawn as rounded corners.
pub const ROUND_CORNERS: &[char] = &['/', '\\'];

/// The point marker character.
pub const POINT_MARKER: char = '*';

/// Direction an arrowhead points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowDirection {
    North,
    South,
    East,
    West,
}

/// A run of text found on one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellString {
    /// Cell of the first character.
    pub cell: Cell,
    /// The text, without leading or trailing blanks.
    pub text: String,
}

impl CellString {
    /// Cell of the last character.
    pub fn last_cell(&self) -> Cell {
        Cell::new(self.cell.x + self.text.chars().count() as i32 - 1, self.cell.y)
    }
}

/// A rectangular grid of characters (row-major: rows[y][x]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextGrid {
    width: usize,
    height: usize,
    rows: Vec<Vec<char>>,
}

impl TextGrid {
    /// Create a blank grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![BLANK; width]; height],
        }
    }

    /// Create a grid from rows, padding short rows with blanks.
    pub fn from_rows(rows: Vec<Vec<char>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let height = rows.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, BLANK);
                row
            })
            .collect();
        Self {
            width,
            height,
            rows,
        }
    }

    /// Create a grid from literal text, one row per line.
    pub fn from_text(text: &str) -> Self {
        Self::from_rows(text.lines().map(|l| l.chars().collect()).collect())
    }

    /// Create a blank grid with the same dimensions as `other`.
    pub fn same_size_as(other: &TextGrid) -> Self {
        Self::new(other.width, other.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the dimensions as (width, height).
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.width && (cell.y as usize) < self.height
    }

    /// Character at `cell`; cells outside the grid read as blank.
    pub fn get(&self, cell: Cell) -> char {
        if self.is_in_bounds(cell) {
            self.rows[cell.y as usize][cell.x as usize]
        } else {
            BLANK
        }
    }

    /// Set the character at `cell`. Writes outside the grid are ignored.
    pub fn set(&mut self, cell: Cell, c: char) {
        if self.is_in_bounds(cell) {
            self.rows[cell.y as usize][cell.x as usize] = c;
        }
    }

    pub fn is_blank(&self, cell: Cell) -> bool {
        self.get(cell) == BLANK
    }

    /// Iterate over all cells with their characters, row by row.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Cell, char)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &c)| (Cell::new(x as i32, y as i32), c))
        })
    }

    // -- Line classification --

    /// Entry points of `cell` that meet a matching point on the neighbour.
    pub fn touched_points(&self, cell: Cell) -> EntryPoints {
        let own = candidates(self.get(cell));
        let mut touched = EntryPoints::EMPTY;
        for point in own.iter() {
            let (dx, dy) = point.offset();
            let neighbour = cell.offset(dx, dy);
            if candidates(self.get(neighbour)).contains(point.opposite()) {
                touched.insert(point);
            }
        }
        touched
    }

    /// Does this cell draw part of a line or corner?
    pub fn is_boundary(&self, cell: Cell) -> bool {
        let c = self.get(cell);
        if HORIZONTAL_LINES.contains(&c) || VERTICAL_LINES.contains(&c) {
            return true;
        }
        !candidates(c).is_empty() && !self.touched_points(cell).is_empty()
    }

    /// A boundary cell with exactly one continuing neighbour.
    pub fn is_lines_end(&self, cell: Cell) -> bool {
        self.is_boundary(cell) && self.touched_points(cell).len() == 1
    }

    /// A boundary cell where three or more lines meet.
    pub fn is_intersection(&self, cell: Cell) -> bool {
        self.is_boundary(cell) && self.touched_points(cell).len() >= 3
    }

    /// A boundary cell whose two continuations are not opposite each other.
    pub fn is_corner(&self, cell: Cell) -> bool {
        let touched = self.touched_points(cell);
        if touched.len() != 2 {
            return false;
        }
        let mut points = touched.iter();
        match (points.next(), points.next()) {
            (Some(a), Some(b)) => a.opposite() != b,
            _ => false,
        }
    }

    /// A cell that becomes a vertex of a shape.
    pub(crate) fn is_point_cell(&self, cell: Cell) -> bool {
        self.is_boundary(cell)
            && (self.is_lines_end(cell) || self.is_intersection(cell) || self.is_corner(cell))
    }

    pub fn is_dashed(&self, cell: Cell) -> bool {
        DASHED_LINES.contains(&self.get(cell))
    }

    pub fn is_round_corner(&self, cell: Cell) -> bool {
        ROUND_CORNERS.contains(&self.get(cell))
    }

    pub fn is_horizontal_line(&self, cell: Cell) -> bool {
        HORIZONTAL_LINES.contains(&self.get(cell))
    }

    pub fn is_vertical_line(&self, cell: Cell) -> bool {
        VERTICAL_LINES.contains(&self.get(cell))
    }

    /// The direction of the arrowhead at `cell`, if the glyph there is an
    /// arrowhead attached to a line.
    pub fn arrowhead_at(&self, cell: Cell) -> Option<ArrowDirection> {
        let reaches = |neighbour: Cell, point: EntryPoint| candidates(self.get(neighbour)).contains(point);
        match self.get(cell) {
            '<' if reaches(cell.east(), EntryPoint::West) => Some(ArrowDirection::West),
            '>' if reaches(cell.west(), EntryPoint::East) => Some(ArrowDirection::East),
            '^' if reaches(cell.south(), EntryPoint::North) => Some(ArrowDirection::North),
            'v' | 'V' if reaches(cell.north(), EntryPoint::South) => Some(ArrowDirection::South),
            _ => None,
        }
    }

    pub fn is_arrowhead(&self, cell: Cell) -> bool {
        self.arrowhead_at(cell).is_some()
    }

    /// A `*` sitting on a horizontal or vertical line.
    pub fn is_point_marker_on_line(&self, cell: Cell) -> bool {
        self.get(cell) == POINT_MARKER
            && (self.marker_on_horizontal(cell) || self.marker_on_vertical(cell))
    }

    fn marker_on_horizontal(&self, cell: Cell) -> bool {
        candidates(self.get(cell.west())).contains(EntryPoint::East)
            || candidates(self.get(cell.east())).contains(EntryPoint::West)
    }

    fn marker_on_vertical(&self, cell: Cell) -> bool {
        candidates(self.get(cell.north())).contains(EntryPoint::South)
            || candidates(self.get(cell.south())).contains(EntryPoint::North)
    }

    /// Neighbours that continue the line through `cell`, excluding
    /// `came_from`. Zero cells is a dead end, more than one a branch.
    pub fn follow(&self, cell: Cell, came_from: Option<Cell>) -> Vec<Cell> {
        if !self.is_boundary(cell) {
            return Vec::new();
        }
        self.touched_points(cell)
            .iter()
            .map(|p| {
                let (dx, dy) = p.offset();
                cell.offset(dx, dy)
            })
            .filter(|n| Some(*n) != came_from)
            .collect()
    }

    // -- Region operations --

    /// Copy a rectangular region into a new grid. Cells outside this grid
    /// come out blank.
    pub(crate) fn sub_grid(&self, x: i32, y: i32, width: usize, height: usize) -> TextGrid {
        let mut sub = TextGrid::new(width, height);
        for sy in 0..height {
            for sx in 0..width {
                let source = Cell::new(x + sx as i32, y + sy as i32);
                sub.rows[sy][sx] = self.get(source);
            }
        }
        sub
    }

    /// A same-size grid holding only the characters of `cells`.
    pub fn restricted_to(&self, cells: &CellSet) -> TextGrid {
        let mut grid = TextGrid::same_size_as(self);
        self.copy_cells_to(cells, &mut grid);
        grid
    }

    /// Copy the characters of `cells` into `target`.
    pub fn copy_cells_to(&self, cells: &CellSet, target: &mut TextGrid) {
        for cell in cells.iter() {
            target.set(cell, self.get(cell));
        }
    }

    /// Write `c` into every cell of `cells`.
    pub fn fill_cells_with(&mut self, cells: &CellSet, c: char) {
        for cell in cells.iter() {
            self.set(cell, c);
        }
    }

    /// Flood the 4-connected area of cells equal to the seed's character
    /// with `c`, returning the cells that were filled.
    pub fn fill_continuous_area(&mut self, seed: Cell, c: char) -> CellSet {
        let mut filled = CellSet::new();
        if !self.is_in_bounds(seed) {
            return filled;
        }
        let original = self.get(seed);
        if original == c {
            return filled;
        }

        let mut stack = vec![seed];
        while let Some(cell) = stack.pop() {
            if !self.is_in_bounds(cell) || self.get(cell) != original {
                continue;
            }
            self.set(cell, c);
            filled.insert(cell);
            stack.extend(cell.axis_neighbours());
        }
        filled
    }

    /// All non-blank cells.
    pub fn all_non_blank(&self) -> CellSet {
        self.iter_cells()
            .filter(|(_, c)| *c != BLANK)
            .map(|(cell, _)| cell)
            .collect()
    }

    /// All cells that draw part of a line.
    pub fn all_boundaries(&self) -> CellSet {
        self.iter_cells()
            .map(|(cell, _)| cell)
            .filter(|cell| self.is_boundary(*cell))
            .collect()
    }

    pub(crate) fn has_blank_cells(&self) -> bool {
        self.rows.iter().any(|row| row.contains(&BLANK))
    }

    /// Single blank cells with characters on both the west and the east.
    pub fn blanks_between_characters(&self) -> CellSet {
        self.iter_cells()
            .map(|(cell, _)| cell)
            .filter(|cell| {
                self.is_blank(*cell)
                    && self.is_in_bounds(cell.west())
                    && self.is_in_bounds(cell.east())
                    && !self.is_blank(cell.west())
                    && !self.is_blank(cell.east())
            })
            .collect()
    }

    /// Runs of text on each row. A run continues over a single blank and
    /// stops at two consecutive blanks or the end of the row.
    pub fn find_strings(&self) -> Vec<CellString> {
        let mut strings = Vec::new();
        for (y, row) in self.rows.iter().enumerate() {
            let mut x = 0;
            while x < row.len() {
                if row[x] == BLANK {
                    x += 1;
                    continue;
                }
                let start = x;
                let mut end = x;
                let mut i = x + 1;
                while i < row.len() {
                    if row[i] != BLANK {
                        end = i;
                        i += 1;
                    } else if i + 1 < row.len() && row[i + 1] != BLANK {
                        i += 1;
                    } else {
                        break;
                    }
                }
                strings.push(CellString {
                    cell: Cell::new(start as i32, y as i32),
                    text: row[start..=end].iter().collect(),
                });
                x = end + 1;
            }
        }
        strings
    }

    // -- Preprocessing --

    /// Replace letters and digits written over lines with the line's
    /// character, so labels on a line do not cut it in two.
    pub fn replace_type_on_line(&mut self) {
        for y in 0..self.height {
            let mut x = 0;
            while x < self.width {
                if !self.rows[y][x].is_alphanumeric() {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < self.width && self.rows[y][x].is_alphanumeric() {
                    x += 1;
                }
                let west = Cell::new(start as i32 - 1, y as i32);
                let east = Cell::new(x as i32, y as i32);
                if self.is_horizontal_line(west) && self.is_horizontal_line(east) {
                    let line = self.get(west);
                    for cx in start..x {
                        self.rows[y][cx] = line;
                    }
                }
            }
        }

        let cells: Vec<Cell> = self
            .iter_cells()
            .filter(|(_, c)| c.is_alphanumeric())
            .map(|(cell, _)| cell)
            .collect();
        for cell in cells {
            if self.is_vertical_line(cell.north()) && self.is_vertical_line(cell.south()) {
                let line = self.get(cell.north());
                self.set(cell, line);
            }
        }
    }

    /// Replace point markers on lines with the line character they sit on.
    pub fn replace_point_markers(&mut self, markers: &[Cell]) {
        for &cell in markers {
            if self.get(cell) != POINT_MARKER {
                continue;
            }
            let horizontal = self.marker_on_horizontal(cell);
            let vertical = self.marker_on_vertical(cell);
            let replacement = match (horizontal, vertical) {
                (true, true) => '+',
                (true, false) => '-',
                (false, true) => '|',
                (false, false) => continue,
            };
            self.set(cell, replacement);
        }
    }
}

impl fmt::Display for TextGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: String = row.iter().collect();
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(text: &str) -> TextGrid {
        TextGrid::from_text(text)
    }

    #[test]
    fn test_from_text_pads_rows() {
        let g = grid("+-+\n|\n+-+");
        assert_eq!(g.size(), (3, 3));
        assert_eq!(g.get(Cell::new(2, 1)), BLANK);
    }

    #[test]
    fn test_out_of_bounds_is_blank() {
        let g = grid("ab");
        assert_eq!(g.get(Cell::new(-1, 0)), BLANK);
        assert_eq!(g.get(Cell::new(0, 5)), BLANK);
        assert!(g.is_blank(Cell::new(9, 9)));
    }

    #[test]
    fn test_box_corners_and_sides() {
        let g = grid("+--+\n|  |\n+--+");
        assert!(g.is_corner(Cell::new(0, 0)));
        assert!(g.is_point_cell(Cell::new(3, 2)));
        assert!(!g.is_point_cell(Cell::new(1, 0)));
        assert!(g.is_boundary(Cell::new(0, 1)));
        assert!(!g.is_lines_end(Cell::new(0, 1)));
    }

    #[test]
    fn test_lines_end() {
        let g = grid("----");
        assert!(g.is_lines_end(Cell::new(0, 0)));
        assert!(g.is_lines_end(Cell::new(3, 0)));
        assert!(!g.is_lines_end(Cell::new(1, 0)));
        assert!(g.is_point_cell(Cell::new(0, 0)));
    }

    #[test]
    fn test_lone_plus_is_not_boundary() {
        let g = grid("a + b");
        assert!(!g.is_boundary(Cell::new(2, 0)));
        let g = grid(" / ");
        assert!(!g.is_boundary(Cell::new(1, 0)));
    }

    #[test]
    fn test_follow_excludes_came_from() {
        let g = grid("---");
        let middle = Cell::new(1, 0);
        assert_eq!(g.follow(middle, None).len(), 2);
        assert_eq!(g.follow(middle, Some(Cell::new(0, 0))), vec![Cell::new(2, 0)]);
        assert!(g.follow(Cell::new(2, 0), Some(middle)).is_empty());
    }

    #[test]
    fn test_follow_through_intersection() {
        let g = grid(" | \n-+-\n | ");
        let centre = Cell::new(1, 1);
        assert!(g.is_intersection(centre));
        let next = g.follow(centre, Some(Cell::new(0, 1)));
        assert_eq!(next.len(), 3);
    }

    #[test]
    fn test_parallel_lines_do_not_connect() {
        let g = grid("||\n||");
        assert_eq!(g.follow(Cell::new(0, 0), None), vec![Cell::new(0, 1)]);
    }

    #[test]
    fn test_rounded_corner() {
        let g = grid("/--\\\n|  |\n\\--/");
        assert!(g.is_corner(Cell::new(0, 0)));
        assert!(g.is_round_corner(Cell::new(0, 0)));
        assert!(g.is_corner(Cell::new(3, 2)));
    }

    #[test]
    fn test_diagonal_line_follows() {
        let g = grid("  /\n / \n/  ");
        let next = g.follow(Cell::new(1, 1), Some(Cell::new(2, 0)));
        assert_eq!(next, vec![Cell::new(0, 2)]);
        assert!(!g.is_point_cell(Cell::new(1, 1)));
    }

    #[test]
    fn test_dashed() {
        let g = grid("-=-\n:");
        assert!(g.is_dashed(Cell::new(1, 0)));
        assert!(g.is_dashed(Cell::new(0, 1)));
        assert!(!g.is_dashed(Cell::new(0, 0)));
    }

    #[test]
    fn test_arrowheads() {
        let g = grid("--->\n<---\n |  \n v  ");
        assert_eq!(g.arrowhead_at(Cell::new(3, 0)), Some(ArrowDirection::East));
        assert_eq!(g.arrowhead_at(Cell::new(0, 1)), Some(ArrowDirection::West));
        assert_eq!(g.arrowhead_at(Cell::new(1, 3)), Some(ArrowDirection::South));
        let text = grid("a > b");
        assert!(!text.is_arrowhead(Cell::new(2, 0)));
    }

    #[test]
    fn test_sub_grid_pads_outside() {
        let g = grid("ab\ncd");
        let sub = g.sub_grid(-1, -1, 4, 4);
        assert_eq!(sub.get(Cell::new(1, 1)), 'a');
        assert_eq!(sub.get(Cell::new(2, 2)), 'd');
        assert!(sub.is_blank(Cell::new(0, 0)));
        assert!(sub.is_blank(Cell::new(3, 3)));
    }

    #[test]
    fn test_fill_continuous_area() {
        let mut g = grid("+--+\n|  |\n+--+");
        let filled = g.fill_continuous_area(Cell::new(1, 1), '*');
        assert_eq!(filled.len(), 2);
        assert!(!g.has_blank_cells());
    }

    #[test]
    fn test_find_strings_single_gap() {
        let g = grid("Hello World  again");
        let strings = g.find_strings();
        assert_eq!(strings.len(), 2);
        assert_eq!(strings[0].text, "Hello World");
        assert_eq!(strings[0].last_cell(), Cell::new(10, 0));
        assert_eq!(strings[1].text, "again");
        assert_eq!(strings[1].cell, Cell::new(13, 0));
    }

    #[test]
    fn test_blanks_between_characters() {
        let g = grid("a b  c");
        let gaps = g.blanks_between_characters();
        assert_eq!(gaps.len(), 1);
        assert!(gaps.contains(Cell::new(1, 0)));
    }

    #[test]
    fn test_replace_type_on_line() {
        let mut g = grid("--ab--\n|\nx\n|");
        g.replace_type_on_line();
        assert_eq!(g.to_string().lines().next(), Some("------"));
        assert_eq!(g.get(Cell::new(0, 2)), '|');
    }

    #[test]
    fn test_replace_point_markers() {
        let mut g = grid("-*-\n\n *\n |\n-*-\n |");
        let markers = [Cell::new(1, 0), Cell::new(1, 2), Cell::new(1, 4)];
        g.replace_point_markers(&markers);
        assert_eq!(g.get(Cell::new(1, 0)), '-');
        assert_eq!(g.get(Cell::new(1, 2)), '|');
        assert_eq!(g.get(Cell::new(1, 4)), '+');
    }

    #[test]
    fn test_point_marker_on_line() {
        let g = grid("-*-\n * ");
        assert!(g.is_point_marker_on_line(Cell::new(1, 0)));
        assert!(!g.is_point_marker_on_line(Cell::new(1, 1)));
    }
}
