//! Shape vertices.

use serde::Serialize;

/// How the outline turns at a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointStyle {
    #[default]
    Normal,
    Round,
}

/// A vertex of a shape outline.
///
/// A locked point keeps its position: `move_to` is ignored once two
/// independently traced edges have agreed on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapePoint {
    pub x: f32,
    pub y: f32,
    pub style: PointStyle,
    pub locked: bool,
}

impl ShapePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            style: PointStyle::Normal,
            locked: false,
        }
    }

    pub fn with_style(x: f32, y: f32, style: PointStyle) -> Self {
        Self {
            style,
            ..Self::new(x, y)
        }
    }

    /// Move the point unless it is locked.
    pub fn move_to(&mut self, x: f32, y: f32) {
        if !self.locked {
            self.x = x;
            self.y = y;
        }
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}
