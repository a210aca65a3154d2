//! Reading diagram source text into a grid.

use std::path::Path;

use crate::config::ConversionOptions;
use crate::error::{DiagramError, Result};
use crate::text::{TextGrid, BLANK};

/// Build a grid from source text.
///
/// Tabs expand to the next multiple of `tab_size`, carriage returns are
/// dropped and rows are padded to the widest line.
pub fn parse_text(source: &str, options: &ConversionOptions) -> TextGrid {
    let tab_size = options.tab_size.max(1);
    let rows = source
        .lines()
        .map(|line| expand_tabs(line, tab_size))
        .collect();
    TextGrid::from_rows(rows)
}

/// Read and parse a diagram file.
pub fn read_grid(path: &Path, options: &ConversionOptions) -> Result<TextGrid> {
    let source = std::fs::read_to_string(path).map_err(|e| DiagramError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read diagram: {}", e),
    })?;
    Ok(parse_text(&source, options))
}

fn expand_tabs(line: &str, tab_size: usize) -> Vec<char> {
    let mut row = Vec::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\t' => {
                let stop = (row.len() / tab_size + 1) * tab_size;
                row.resize(stop, BLANK);
            }
            '\r' => {}
            c => row.push(c),
        }
    }
    row
}
