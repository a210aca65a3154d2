//! Shapes, labels and the assembly of a diagram from a grid.

pub mod boundaries;
pub mod composite;
pub mod diagram;
pub mod edge;
pub mod geometry;
pub mod labels;
pub mod point;
pub mod shape;
pub mod text;

pub use boundaries::{find_boundary_sets, BoundarySets};
pub use composite::CompositeDiagramShape;
pub use diagram::{convert, convert_with, Conversion, Diagram};
pub use edge::{separate_common_edges, ShapeEdge};
pub use geometry::{CellGeometry, Rect};
pub use point::{PointStyle, ShapePoint};
pub use shape::{DiagramShape, ShapeKind};
pub use text::{DiagramText, FontMeasurer, MonospaceMeasurer};
