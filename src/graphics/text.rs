//! Positioned text labels and font measurement.

use serde::Serialize;

use super::geometry::Rect;
use crate::colour::Colour;

/// Upper bound on size steps when searching for a font size.
const MAX_FONT_STEPS: usize = 1000;

/// Measures text for a given font size.
///
/// Glyph rendering is the renderer's business; the converter only needs
/// metrics to fit and place labels.
pub trait FontMeasurer {
    /// Advance width of `text`.
    fn width_for(&self, text: &str, size: f32) -> f32;
    /// Distance from the baseline to the top of the tallest glyph.
    fn ascent(&self, size: f32) -> f32;
    /// Distance from the baseline to the bottom of the lowest glyph.
    fn descent(&self, size: f32) -> f32;
    /// Height of a capital Z, used to centre text vertically.
    fn z_height(&self, size: f32) -> f32;

    /// Bounds of `text` relative to its baseline origin.
    fn bounds_for(&self, text: &str, size: f32) -> Rect {
        let ascent = self.ascent(size);
        Rect::new(0.0, -ascent, self.width_for(text, size), ascent + self.descent(size))
    }
}

/// Fixed-advance metrics, proportional to the font size.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceMeasurer;

impl FontMeasurer for MonospaceMeasurer {
    fn width_for(&self, text: &str, size: f32) -> f32 {
        0.6 * size * text.chars().count() as f32
    }

    fn ascent(&self, size: f32) -> f32 {
        0.8 * size
    }

    fn descent(&self, size: f32) -> f32 {
        0.2 * size
    }

    fn z_height(&self, size: f32) -> f32 {
        0.7 * size
    }
}

/// Search for a font size around `base`.
///
/// If `too_big` already holds at `base` the size shrinks by one and keeps
/// shrinking by `step` until it no longer holds. Otherwise it grows by one
/// and then by `step` until `too_big` holds, and settles one step back.
pub fn derive_font_size(base: f32, step: f32, too_big: impl Fn(f32) -> bool) -> f32 {
    if too_big(base) {
        let mut size = base - 1.0;
        for _ in 0..MAX_FONT_STEPS {
            if size <= 0.0 {
                break;
            }
            if !too_big(size) {
                return size;
            }
            size -= step;
        }
        base
    } else {
        let mut size = base + 1.0;
        for _ in 0..MAX_FONT_STEPS {
            if too_big(size) {
                return size - step;
            }
            size += step;
        }
        base
    }
}

/// Largest size whose ascent fits in `height`.
pub fn font_size_for_height(measurer: &dyn FontMeasurer, base: f32, height: f32) -> f32 {
    derive_font_size(base, 0.5, |size| measurer.ascent(size) > height)
}

/// Size at which `text` is no wider than `width`.
pub fn font_size_for_width(measurer: &dyn FontMeasurer, base: f32, width: f32, text: &str) -> f32 {
    derive_font_size(base, 1.0, |size| measurer.width_for(text, size) > width)
}

/// A label placed at its baseline origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramText {
    pub text: String,
    /// Left edge of the text.
    pub x: f32,
    /// Baseline.
    pub y: f32,
    pub font_size: f32,
    pub colour: Colour,
    pub has_outline: bool,
    pub outline_colour: Colour,
}

impl DiagramText {
    pub const DEFAULT_COLOUR: Colour = Colour::BLACK;

    pub fn new(text: impl Into<String>, x: f32, y: f32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size,
            colour: Self::DEFAULT_COLOUR,
            has_outline: false,
            outline_colour: Colour::WHITE,
        }
    }

    pub fn width(&self, measurer: &dyn FontMeasurer) -> f32 {
        measurer.width_for(&self.text, self.font_size)
    }

    /// Centre the text between `min_x` and `max_x`.
    pub fn center_horizontally_between(&mut self, min_x: f32, max_x: f32, measurer: &dyn FontMeasurer) {
        self.x = min_x + ((max_x - min_x) - self.width(measurer)) / 2.0;
    }

    /// Raise the baseline so the text sits centred in the row that ends at
    /// the current baseline.
    pub fn center_vertically_between(&mut self, min_y: f32, max_y: f32, measurer: &dyn FontMeasurer) {
        let centre = (max_y - min_y) / 2.0;
        let z = measurer.z_height(self.font_size);
        self.y -= (centre - z / 2.0).abs();
    }

    pub fn align_right_edge_to(&mut self, x: f32, measurer: &dyn FontMeasurer) {
        self.x = x - self.width(measurer);
    }

    /// Bounds in output coordinates.
    pub fn bounds(&self, measurer: &dyn FontMeasurer) -> Rect {
        let local = measurer.bounds_for(&self.text, self.font_size);
        Rect::new(local.x + self.x, local.y + self.y, local.width, local.height)
    }
}
