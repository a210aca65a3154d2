//! Markup, colour, arrowhead and point-marker tokens found on a grid.

use crate::colour::Colour;
use crate::config::{ColourCodeMode, ConversionOptions, TagMode, BUILTIN_TAGS};
use crate::text::{Cell, TextGrid};

/// Tokens the converter consumes alongside the grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tokens {
    /// `{name}` tags, keyed by the cell of the opening brace.
    pub tags: Vec<(Cell, String)>,
    /// Colour codes, keyed by the cell of the `c` marker.
    pub colours: Vec<(Cell, Colour)>,
    /// Arrowhead glyphs attached to a line.
    pub arrowheads: Vec<Cell>,
    /// `*` glyphs sitting on a line.
    pub point_markers: Vec<Cell>,
}

impl Tokens {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
            && self.colours.is_empty()
            && self.arrowheads.is_empty()
            && self.point_markers.is_empty()
    }
}

/// Scan the grid for tokens.
///
/// Only tags naming a built-in kind or a configured custom shape are
/// recognised; other braces stay ordinary text.
pub fn scan_tokens(grid: &TextGrid, options: &ConversionOptions) -> Tokens {
    let mut tokens = Tokens::default();

    for y in 0..grid.height() as i32 {
        let row: Vec<char> = (0..grid.width() as i32)
            .map(|x| grid.get(Cell::new(x, y)))
            .collect();

        if options.tags == TagMode::Use {
            for (x, name) in find_tags(&row) {
                if BUILTIN_TAGS.contains(&name.as_str()) || options.custom_shapes.contains_key(&name) {
                    tokens.tags.push((Cell::new(x as i32, y), name));
                }
            }
        }

        if options.colour_codes == ColourCodeMode::Use {
            for x in 0..row.len() {
                if row[x] != 'c' || x + 4 > row.len() {
                    continue;
                }
                let code: String = row[x + 1..x + 4].iter().collect();
                if let Some(colour) = Colour::from_code(&code) {
                    tokens.colours.push((Cell::new(x as i32, y), colour));
                }
            }
        }
    }

    for (cell, _) in grid.iter_cells() {
        if grid.is_arrowhead(cell) {
            tokens.arrowheads.push(cell);
        } else if grid.is_point_marker_on_line(cell) {
            tokens.point_markers.push(cell);
        }
    }

    tokens
}

/// `{name}` runs on one row as (column of `{`, name).
fn find_tags(row: &[char]) -> Vec<(usize, String)> {
    let mut tags = Vec::new();
    let mut x = 0;
    while x < row.len() {
        if row[x] != '{' {
            x += 1;
            continue;
        }
        let close = row[x + 1..]
            .iter()
            .position(|&c| c == '}' || c == '{' || c.is_whitespace())
            .map(|offset| x + 1 + offset);
        match close {
            Some(end) if row[end] == '}' && end > x + 1 => {
                tags.push((x, row[x + 1..end].iter().collect()));
                x = end + 1;
            }
            _ => x += 1,
        }
    }
    tags
}
