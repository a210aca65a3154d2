//! Reading diagram source and finding the tokens the converter needs.
//!
//! # Usage
//!
//! ```ignore
//! use asciidiag::parser::{parse_text, scan_tokens};
//!
//! let grid = parse_text(&source, &options);
//! let tokens = scan_tokens(&grid, &options);
//! ```

mod source;
mod tokens;

pub use source::{parse_text, read_grid};
pub use tokens::{scan_tokens, Tokens};
