//! The abstraction grid: a 3x rendering of a cell set's strokes.
//!
//! Every cell becomes a 3x3 block. The block's centre and the sub-cell of
//! each touched entry point are marked as stroke; everything else stays
//! blank. Two lines that merely meet at a cell corner end up in separate
//! stroke components, while a continuous line stays one component.

use super::cell::Cell;
use super::cell_set::CellSet;
use super::grid::{TextGrid, BLANK};

/// Character used for stroke sub-cells.
pub const STROKE: char = '#';

/// Character used by flood fills over the buffer.
pub const FILL: char = '.';

/// A transient 3x buffer built from a grid and the cells of interest.
#[derive(Debug, Clone)]
pub struct AbstractionGrid {
    buffer: TextGrid,
}

impl AbstractionGrid {
    /// Build the buffer for `cells`. Cells outside the set are treated as
    /// blank when deciding which entry points are touched.
    pub fn new(grid: &TextGrid, cells: &CellSet) -> Self {
        let source = grid.restricted_to(cells);
        let mut buffer = TextGrid::new(grid.width() * 3, grid.height() * 3);

        for cell in cells.iter() {
            if !source.is_boundary(cell) {
                continue;
            }
            let (bx, by) = (cell.x * 3, cell.y * 3);
            buffer.set(Cell::new(bx + 1, by + 1), STROKE);
            for point in source.touched_points(cell).iter() {
                let (px, py) = point.block_position();
                buffer.set(Cell::new(bx + px as i32, by + py as i32), STROKE);
            }
        }

        Self { buffer }
    }

    pub fn buffer(&self) -> &TextGrid {
        &self.buffer
    }

    pub fn into_buffer(self) -> TextGrid {
        self.buffer
    }

    /// All stroke sub-cells.
    pub fn strokes(&self) -> CellSet {
        self.buffer
            .iter_cells()
            .filter(|(_, c)| *c == STROKE)
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Connected stroke components, mapped back to source cells.
    ///
    /// Strokes connect through all eight neighbours. Diagonal entry points
    /// sit on block corners, so a slope only stays in one piece this way;
    /// axis strokes never reach a block corner, which keeps corner-touching
    /// lines apart.
    pub fn distinct_shapes(&self) -> Vec<CellSet> {
        let mut visited = CellSet::new();
        let mut shapes = Vec::new();

        for (seed, c) in self.buffer.iter_cells() {
            if c != STROKE || visited.contains(seed) {
                continue;
            }
            let mut component = CellSet::new();
            let mut stack = vec![seed];
            while let Some(cell) = stack.pop() {
                if visited.contains(cell) || self.buffer.get(cell) != STROKE {
                    continue;
                }
                visited.insert(cell);
                component.insert(cell);
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if dx != 0 || dy != 0 {
                            stack.push(cell.offset(dx, dy));
                        }
                    }
                }
            }
            shapes.push(component.make_scaled_one_third_equivalent());
        }

        shapes
    }

    /// First blank sub-cell in row-major order.
    pub fn first_blank(&self) -> Option<Cell> {
        self.buffer
            .iter_cells()
            .find(|(_, c)| *c == BLANK)
            .map(|(cell, _)| cell)
    }
}
