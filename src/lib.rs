//! asciidiag - ASCII-art diagram compiler
//!
//! A library for turning plain-text diagrams drawn with `+`, `-`, `|` and
//! friends into shapes and positioned text labels, ready for a renderer.
//!
//! ```no_run
//! use asciidiag::{convert, parse_text, scan_tokens, ConversionOptions};
//!
//! let options = ConversionOptions::default();
//! let grid = parse_text("+--+\n|hi|\n+--+", &options);
//! let tokens = scan_tokens(&grid, &options);
//! let conversion = convert(&grid, &tokens, &options);
//! assert_eq!(conversion.diagram.shapes.len(), 1);
//! ```

pub mod cli;
pub mod colour;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod graphics;
pub mod output;
pub mod parser;
pub mod text;

pub use colour::Colour;
pub use config::{ColourCodeMode, ConversionOptions, CustomShapeDefinition, TagMode};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{DiagramError, Result};
pub use graphics::{
    convert, convert_with, CompositeDiagramShape, Conversion, Diagram, DiagramShape, DiagramText,
    FontMeasurer, MonospaceMeasurer, PointStyle, ShapeKind, ShapePoint,
};
pub use parser::{parse_text, read_grid, scan_tokens, Tokens};
pub use text::{Cell, CellSet, Classification, TextGrid};
