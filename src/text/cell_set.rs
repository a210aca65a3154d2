//! Cell sets and their open/closed classification.
//!
//! A [`CellSet`] is the unit the boundary compiler works with: one traced
//! line, one closed outline, or a tangle of both. Classification is cached
//! on the set and dropped by every mutating method.

use std::collections::BTreeSet;

use log::{debug, warn};

use super::abstraction::{AbstractionGrid, FILL};
use super::cell::Cell;
use super::grid::TextGrid;

/// The topology of a cell set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Classification could not be decided.
    Undetermined,
    /// Lines with dead ends and no enclosed area.
    Open,
    /// A single loop.
    Closed,
    /// Encloses an area but also has loose lines or branches.
    Mixed,
}

/// Result of the flood-fill classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    Open,
    HasClosedArea,
    Undetermined,
}

/// Inclusive bounding box of a cell set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    /// Number of columns covered.
    pub fn width(&self) -> usize {
        (self.max_x - self.min_x + 1) as usize
    }

    /// Number of rows covered.
    pub fn height(&self) -> usize {
        (self.max_y - self.min_y + 1) as usize
    }
}

/// A de-duplicated, row-major ordered set of cells.
#[derive(Debug, Clone, Default)]
pub struct CellSet {
    cells: BTreeSet<Cell>,
    classification: Option<Classification>,
}

impl PartialEq for CellSet {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for CellSet {}

impl FromIterator<Cell> for CellSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
            classification: None,
        }
    }
}

impl Extend<Cell> for CellSet {
    fn extend<I: IntoIterator<Item = Cell>>(&mut self, iter: I) {
        self.cells.extend(iter);
        self.classification = None;
    }
}

impl CellSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Iterate in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    /// The first cell in row-major order.
    pub fn first(&self) -> Option<Cell> {
        self.cells.iter().next().copied()
    }

    pub fn insert(&mut self, cell: Cell) -> bool {
        self.classification = None;
        self.cells.insert(cell)
    }

    pub fn remove(&mut self, cell: Cell) -> bool {
        self.classification = None;
        self.cells.remove(&cell)
    }

    /// Add every cell of `other`.
    pub fn add_all(&mut self, other: &CellSet) {
        self.extend(other.iter());
    }

    /// A new set holding the cells of both sets.
    pub fn union(&self, other: &CellSet) -> CellSet {
        self.cells.union(&other.cells).copied().collect()
    }

    /// Remove every cell of `other`.
    pub fn subtract_set(&mut self, other: &CellSet) {
        self.classification = None;
        self.cells.retain(|c| !other.cells.contains(c));
    }

    /// Move every cell by `(dx, dy)`.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.classification = None;
        self.cells = self.cells.iter().map(|c| c.offset(dx, dy)).collect();
    }

    pub fn has_common_cells(&self, other: &CellSet) -> bool {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.cells.iter().any(|c| large.cells.contains(c))
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.first()?;
        let mut bounds = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for cell in self.iter() {
            bounds.min_x = bounds.min_x.min(cell.x);
            bounds.min_y = bounds.min_y.min(cell.y);
            bounds.max_x = bounds.max_x.max(cell.x);
            bounds.max_y = bounds.max_y.max(cell.y);
        }
        Some(bounds)
    }

    /// Map cells of a 3x buffer back to source cells.
    pub fn make_scaled_one_third_equivalent(&self) -> CellSet {
        self.iter()
            .map(|c| Cell::new(c.x.div_euclid(3), c.y.div_euclid(3)))
            .collect()
    }

    /// Classify the set against `grid`, caching the result.
    pub fn classification(&mut self, grid: &TextGrid) -> Classification {
        if let Some(cached) = self.classification {
            return cached;
        }
        let result = if self.len() <= 1 {
            Classification::Open
        } else {
            match self.classify_by_trace(grid) {
                Classification::Undetermined => match self.classify_by_fill(grid) {
                    FillOutcome::Open => Classification::Open,
                    FillOutcome::HasClosedArea => Classification::Mixed,
                    FillOutcome::Undetermined => Classification::Undetermined,
                },
                decided => decided,
            }
        };
        debug!("classified {} cells as {:?}", self.len(), result);
        self.classification = Some(result);
        result
    }

    /// Last cell (row-major) that ends a line on `work`.
    fn last_line_end(&self, work: &TextGrid) -> Option<Cell> {
        self.cells.iter().rev().copied().find(|c| work.is_lines_end(*c))
    }

    /// Walk the line from its last line end (or the first cell) and see where it
    /// leads. Branches and walks longer than the set are inconclusive.
    pub fn classify_by_trace(&self, grid: &TextGrid) -> Classification {
        if self.len() <= 1 {
            return Classification::Open;
        }
        let work = grid.restricted_to(self);
        let Some(start) = self.last_line_end(&work).or_else(|| self.first()) else {
            return Classification::Open;
        };

        let first_step = work.follow(start, None);
        let mut current = match first_step.as_slice() {
            [] => return Classification::Open,
            [next, ..] if first_step.len() <= 2 => *next,
            _ => return Classification::Undetermined,
        };
        let mut previous = start;

        for _ in 0..self.len() {
            let next = work.follow(current, Some(previous));
            match next.as_slice() {
                [] => return Classification::Open,
                [only] if *only == start => return Classification::Closed,
                [only] => {
                    previous = current;
                    current = *only;
                }
                _ => return Classification::Undetermined,
            }
        }
        Classification::Undetermined
    }

    /// Flood the 3x rendering of the set from outside and see whether any
    /// area is left unreached.
    pub fn classify_by_fill(&self, grid: &TextGrid) -> FillOutcome {
        let Some(bounds) = self.bounds() else {
            return FillOutcome::Open;
        };
        let sub = grid.restricted_to(self).sub_grid(
            bounds.min_x - 1,
            bounds.min_y - 1,
            bounds.width() + 2,
            bounds.height() + 2,
        );
        let mut local = self.clone();
        local.translate(1 - bounds.min_x, 1 - bounds.min_y);

        let abstraction = AbstractionGrid::new(&sub, &local);
        let Some(seed) = abstraction.first_blank() else {
            warn!(
                "no blank cell to seed fill for set of {} cells at ({}, {})",
                self.len(),
                bounds.min_x,
                bounds.min_y
            );
            return FillOutcome::Undetermined;
        };

        let mut buffer = abstraction.into_buffer();
        buffer.fill_continuous_area(seed, FILL);
        if buffer.has_blank_cells() {
            FillOutcome::HasClosedArea
        } else {
            FillOutcome::Open
        }
    }

    /// Split into boundaries that are not joined by a continuous stroke.
    pub fn break_into_distinct_boundaries(&self, grid: &TextGrid) -> Vec<CellSet> {
        AbstractionGrid::new(grid, self).distinct_shapes()
    }

    /// Split into 4-connected groups of cells, ignoring characters.
    pub fn break_into_distinct_boundaries_plain(&self) -> Vec<CellSet> {
        let mut visited = BTreeSet::new();
        let mut groups = Vec::new();
        for seed in self.iter() {
            if visited.contains(&seed) {
                continue;
            }
            let mut group = CellSet::new();
            let mut stack = vec![seed];
            while let Some(cell) = stack.pop() {
                if !self.contains(cell) || !visited.insert(cell) {
                    continue;
                }
                group.insert(cell);
                stack.extend(cell.axis_neighbours());
            }
            groups.push(group);
        }
        groups
    }

    /// Split a mixed set when no closed set is available to subtract.
    ///
    /// Each unbranching path from a line end becomes its own set. Paths
    /// stop at the next line end (included) or before a branch cell. The
    /// cells no path claimed form the last set.
    pub fn break_truly_mixed_boundaries(&self, grid: &TextGrid) -> Vec<CellSet> {
        let work = grid.restricted_to(self);
        let mut visited = CellSet::new();
        let mut result = Vec::new();

        for start in self.iter() {
            if visited.contains(start) || !work.is_lines_end(start) {
                continue;
            }
            let mut path = CellSet::new();
            path.insert(start);
            visited.insert(start);

            let mut previous = None;
            let mut current = start;
            for _ in 0..self.len() {
                let next = work.follow(current, previous);
                let [only] = next.as_slice() else {
                    break;
                };
                let only = *only;
                if visited.contains(only) || work.is_intersection(only) {
                    break;
                }
                path.insert(only);
                visited.insert(only);
                if work.is_lines_end(only) {
                    break;
                }
                previous = Some(current);
                current = only;
            }
            result.push(path);
        }

        let mut residue = self.clone();
        residue.subtract_set(&visited);
        if !residue.is_empty() {
            result.push(residue);
        }
        result
    }

    /// The set together with the area it encloses.
    ///
    /// Returns `None` when no seed for the interior fill can be found.
    pub fn filled_equivalent(&mut self, grid: &TextGrid) -> Option<CellSet> {
        if self.classification(grid) == Classification::Open {
            return Some(self.clone());
        }
        let mut work = TextGrid::same_size_as(grid);
        work.fill_cells_with(self, '*');

        let wall = self
            .iter()
            .find(|c| work.is_blank(c.west()) && work.is_blank(c.east()))?;
        let seed = wall.east();
        if !work.is_in_bounds(seed) {
            return None;
        }
        work.fill_continuous_area(seed, '*');
        Some(work.all_non_blank())
    }

    /// Drop sets equal to an earlier one, keeping the first.
    pub fn remove_duplicate_sets(sets: Vec<CellSet>) -> Vec<CellSet> {
        let mut unique: Vec<CellSet> = Vec::with_capacity(sets.len());
        for set in sets {
            if !unique.contains(&set) {
                unique.push(set);
            }
        }
        unique
    }
}
