//! The text layer: finding labels on the grid and placing them.

use log::debug;

use super::geometry::CellGeometry;
use super::shape::{smallest_shape_where, DiagramShape};
use super::text::{font_size_for_height, font_size_for_width, DiagramText, FontMeasurer};
use crate::colour::Colour;
use crate::config::ConversionOptions;
use crate::parser::Tokens;
use crate::text::{CellString, TextGrid, BLANK};

/// Length of a colour code such as `cRED`.
const COLOUR_CODE_LENGTH: i32 = 4;

/// A copy of `grid` with everything that is not text blanked out:
/// arrowheads, colour codes, tags, point markers and line cells.
pub fn strip_non_text(grid: &TextGrid, tokens: &Tokens) -> TextGrid {
    let boundaries = grid.all_boundaries();
    let mut work = grid.clone();

    for &cell in tokens.arrowheads.iter().chain(&tokens.point_markers) {
        work.set(cell, BLANK);
    }
    for (cell, _) in &tokens.colours {
        for dx in 0..COLOUR_CODE_LENGTH {
            work.set(cell.offset(dx, 0), BLANK);
        }
    }
    for (cell, name) in &tokens.tags {
        let length = name.chars().count() as i32 + 2;
        for dx in 0..length {
            work.set(cell.offset(dx, 0), BLANK);
        }
    }
    work.fill_cells_with(&boundaries, BLANK);
    work
}

/// Places text labels for one conversion.
pub struct TextLayout<'a> {
    pub geometry: CellGeometry,
    pub options: &'a ConversionOptions,
    pub measurer: &'a dyn FontMeasurer,
}

impl<'a> TextLayout<'a> {
    /// Font size used for labels that fit their cells.
    pub fn base_font_size(&self) -> f32 {
        let size = self.options.effective_font_size();
        if self.options.fixed_font_size {
            size
        } else {
            font_size_for_height(self.measurer, size, self.geometry.cell_height)
        }
    }

    /// Find and place every label of `grid`.
    ///
    /// Characters separated by a single blank belong together. Each group
    /// of touching characters is laid out on its own, so alignment only
    /// looks at lines of the same block of text.
    pub fn layout(&self, grid: &TextGrid, tokens: &Tokens) -> Vec<DiagramText> {
        let work = strip_non_text(grid, tokens);

        let mut grouping = work.clone();
        let gaps = grouping.blanks_between_characters();
        grouping.fill_cells_with(&gaps, '|');
        let groups = grouping.all_non_blank().break_into_distinct_boundaries_plain();
        debug!("{} text groups", groups.len());

        let base = self.base_font_size();
        let mut texts = Vec::new();
        for group in &groups {
            let mut isolated = TextGrid::same_size_as(&work);
            work.copy_cells_to(group, &mut isolated);

            let strings = isolated.find_strings();
            for (index, string) in strings.iter().enumerate() {
                texts.push(self.place(string, index, &strings, base));
            }
        }
        texts
    }

    fn place(&self, string: &CellString, index: usize, group: &[CellString], base: f32) -> DiagramText {
        let m = self.measurer;
        let last = string.last_cell();
        let min_x = self.geometry.min_x(string.cell);
        let max_x = self.geometry.max_x(last);
        let span = max_x - min_x;

        let mut size = base;
        if !self.options.fixed_font_size && m.width_for(&string.text, base) > span {
            size = font_size_for_width(m, self.options.effective_font_size(), span, &string.text);
        }

        let mut text = DiagramText::new(string.text.clone(), min_x, self.geometry.max_y(string.cell), size);
        text.center_vertically_between(
            self.geometry.min_y(string.cell),
            self.geometry.max_y(string.cell),
            m,
        );

        let others = group.iter().enumerate().filter(|(i, _)| *i != index);
        let other_start = others
            .clone()
            .filter(|(_, other)| other.cell.x == string.cell.x)
            .count();
        let other_end = others
            .filter(|(_, other)| other.last_cell().x == last.x)
            .count();

        match alignment(other_start, other_end) {
            Alignment::Centre => text.center_horizontally_between(min_x, max_x, m),
            Alignment::Right => text.align_right_edge_to(max_x, m),
            Alignment::Left => {}
        }
        text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alignment {
    Left,
    Centre,
    Right,
}

/// Alignment from the number of other lines of the block that start and
/// end in the same columns as this one.
fn alignment(other_start: usize, other_end: usize) -> Alignment {
    match (other_start, other_end) {
        (0, 0) => Alignment::Centre,
        (0, _) => Alignment::Right,
        (start, end) if end > start => Alignment::Right,
        (start, end) if end == start => Alignment::Centre,
        _ => Alignment::Left,
    }
}

/// Adjust label colours to the shape underneath.
///
/// Only the smallest closed shape overlapping a label counts. Labels over
/// a dark fill turn white; labels in a custom shape get an outline.
pub fn recolour_texts(texts: &mut [DiagramText], shapes: &[DiagramShape], measurer: &dyn FontMeasurer) {
    for text in texts {
        let bounds = text.bounds(measurer);
        let Some(index) = smallest_shape_where(shapes, |shape| shape.intersects(&bounds)) else {
            continue;
        };
        let shape = &shapes[index];
        if shape.kind.is_custom() {
            text.has_outline = true;
            text.colour = DiagramText::DEFAULT_COLOUR;
        } else if shape.fill_colour.is_some_and(Colour::is_dark) {
            text.colour = Colour::WHITE;
        }
    }
}
