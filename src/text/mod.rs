//! Grid-level model: cells, the text grid, cell sets and the abstraction grid.

pub mod abstraction;
pub mod cell;
pub mod cell_set;
pub mod entry;
pub mod grid;

pub use abstraction::AbstractionGrid;
pub use cell::Cell;
pub use cell_set::{Bounds, CellSet, Classification, FillOutcome};
pub use entry::{candidates, EntryPoint, EntryPoints};
pub use grid::{ArrowDirection, CellString, TextGrid, BLANK};
