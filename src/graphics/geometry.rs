//! Plane geometry helpers: cell rectangles, polygon area and hit tests.

use serde::Serialize;

use crate::text::Cell;

/// Tolerance for float comparisons of coordinates.
pub const EPSILON: f32 = 0.001;

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.max_x() && y >= self.y && y <= self.max_y()
    }

    /// The four corners, clockwise from the top left.
    pub fn corners(&self) -> [(f32, f32); 4] {
        [
            (self.x, self.y),
            (self.max_x(), self.y),
            (self.max_x(), self.max_y()),
            (self.x, self.max_y()),
        ]
    }
}

/// Maps grid cells to output coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    pub cell_width: f32,
    pub cell_height: f32,
}

impl CellGeometry {
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    pub fn min_x(&self, cell: Cell) -> f32 {
        cell.x as f32 * self.cell_width
    }

    pub fn mid_x(&self, cell: Cell) -> f32 {
        self.min_x(cell) + self.cell_width / 2.0
    }

    pub fn max_x(&self, cell: Cell) -> f32 {
        self.min_x(cell) + self.cell_width
    }

    pub fn min_y(&self, cell: Cell) -> f32 {
        cell.y as f32 * self.cell_height
    }

    pub fn mid_y(&self, cell: Cell) -> f32 {
        self.min_y(cell) + self.cell_height / 2.0
    }

    pub fn max_y(&self, cell: Cell) -> f32 {
        self.min_y(cell) + self.cell_height
    }

    /// The cell under an output coordinate.
    pub fn cell_for(&self, x: f32, y: f32) -> Cell {
        Cell::new(
            (x / self.cell_width).floor() as i32,
            (y / self.cell_height).floor() as i32,
        )
    }

    /// The smaller of the two cell dimensions.
    pub fn min_dimension(&self) -> f32 {
        self.cell_width.min(self.cell_height)
    }
}

/// Absolute polygon area by the shoelace formula.
pub fn polygon_area(points: &[(f32, f32)]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..points.len() {
        let (x1, y1) = points[i];
        let (x2, y2) = points[(i + 1) % points.len()];
        twice += x1 * y2 - x2 * y1;
    }
    (twice / 2.0).abs()
}

/// Even-odd point-in-polygon test.
pub fn polygon_contains(points: &[(f32, f32)], x: f32, y: f32) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > y) != (yj > y) {
            let crossing = (xj - xi) * (y - yi) / (yj - yi) + xi;
            if x < crossing {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Whether segments `a1-a2` and `b1-b2` cross or touch.
pub fn segments_intersect(a1: (f32, f32), a2: (f32, f32), b1: (f32, f32), b2: (f32, f32)) -> bool {
    fn orientation(p: (f32, f32), q: (f32, f32), r: (f32, f32)) -> f32 {
        (q.0 - p.0) * (r.1 - p.1) - (q.1 - p.1) * (r.0 - p.0)
    }
    fn on_segment(p: (f32, f32), q: (f32, f32), r: (f32, f32)) -> bool {
        r.0 >= p.0.min(q.0) - EPSILON
            && r.0 <= p.0.max(q.0) + EPSILON
            && r.1 >= p.1.min(q.1) - EPSILON
            && r.1 <= p.1.max(q.1) + EPSILON
    }

    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    (d1.abs() < EPSILON && on_segment(b1, b2, a1))
        || (d2.abs() < EPSILON && on_segment(b1, b2, a2))
        || (d3.abs() < EPSILON && on_segment(a1, a2, b1))
        || (d4.abs() < EPSILON && on_segment(a1, a2, b2))
}

/// Whether a rectangle and a polygon overlap.
pub fn rect_intersects_polygon(rect: &Rect, points: &[(f32, f32)]) -> bool {
    if points.len() < 3 {
        return false;
    }
    if points.iter().any(|&(x, y)| rect.contains(x, y)) {
        return true;
    }
    let corners = rect.corners();
    if corners.iter().any(|&(x, y)| polygon_contains(points, x, y)) {
        return true;
    }
    for i in 0..points.len() {
        let a1 = points[i];
        let a2 = points[(i + 1) % points.len()];
        for k in 0..4 {
            if segments_intersect(a1, a2, corners[k], corners[(k + 1) % 4]) {
                return true;
            }
        }
    }
    false
}
