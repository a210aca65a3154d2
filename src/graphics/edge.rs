//! Shape edges and the separation of edges shared by two shapes.

use log::debug;

use super::geometry::EPSILON;
use super::shape::DiagramShape;

/// An edge of a closed shape, addressed by index so it can be moved in
/// place: points `start` and `start + 1` (wrapping) of `shapes[shape]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeEdge {
    pub shape: usize,
    pub start: usize,
}

impl ShapeEdge {
    fn end(&self, shapes: &[DiagramShape]) -> usize {
        (self.start + 1) % shapes[self.shape].points.len()
    }

    fn endpoints(&self, shapes: &[DiagramShape]) -> ((f32, f32), (f32, f32)) {
        let points = &shapes[self.shape].points;
        (points[self.start].position(), points[self.end(shapes)].position())
    }

    pub fn is_horizontal(&self, shapes: &[DiagramShape]) -> bool {
        let ((_, y1), (_, y2)) = self.endpoints(shapes);
        (y1 - y2).abs() < EPSILON
    }

    pub fn is_vertical(&self, shapes: &[DiagramShape]) -> bool {
        let ((x1, _), (x2, _)) = self.endpoints(shapes);
        (x1 - x2).abs() < EPSILON
    }

    /// Two edges of different shapes touch when they lie on the same line
    /// and overlap over a positive length. Meeting at a single point does
    /// not count.
    pub fn touches(&self, other: &ShapeEdge, shapes: &[DiagramShape]) -> bool {
        if self.shape == other.shape {
            return false;
        }
        let (a1, a2) = self.endpoints(shapes);
        let (b1, b2) = other.endpoints(shapes);

        if self.is_horizontal(shapes) && other.is_horizontal(shapes) {
            (a1.1 - b1.1).abs() < EPSILON && overlap(a1.0, a2.0, b1.0, b2.0) > EPSILON
        } else if self.is_vertical(shapes) && other.is_vertical(shapes) {
            (a1.0 - b1.0).abs() < EPSILON && overlap(a1.1, a2.1, b1.1, b2.1) > EPSILON
        } else {
            false
        }
    }

    /// Move the edge towards the inside of its shape.
    pub fn move_inwards_by(&self, offset: f32, shapes: &mut [DiagramShape]) {
        let ((x1, y1), (x2, y2)) = self.endpoints(shapes);
        let (mid_x, mid_y) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
        let horizontal = self.is_horizontal(shapes);
        let vertical = self.is_vertical(shapes);
        let shape = &shapes[self.shape];

        let (dx, dy) = if horizontal {
            if shape.contains(mid_x, mid_y + 0.5) {
                (0.0, offset)
            } else {
                (0.0, -offset)
            }
        } else if vertical {
            if shape.contains(mid_x + 0.5, mid_y) {
                (offset, 0.0)
            } else {
                (-offset, 0.0)
            }
        } else {
            return;
        };

        let end = self.end(shapes);
        let points = &mut shapes[self.shape].points;
        for index in [self.start, end] {
            let point = &mut points[index];
            let (x, y) = (point.x + dx, point.y + dy);
            point.move_to(x, y);
        }
    }
}

fn overlap(a1: f32, a2: f32, b1: f32, b2: f32) -> f32 {
    let low = a1.min(a2).max(b1.min(b2));
    let high = a1.max(a2).min(b1.max(b2));
    high - low
}

/// All edges of the closed shapes.
pub fn edges_of(shapes: &[DiagramShape]) -> Vec<ShapeEdge> {
    shapes
        .iter()
        .enumerate()
        .filter(|(_, shape)| shape.closed && shape.points.len() >= 2)
        .flat_map(|(index, shape)| {
            (0..shape.points.len()).map(move |start| ShapeEdge { shape: index, start })
        })
        .collect()
}

/// Move every pair of touching edges apart, each edge at most once.
///
/// Returns the number of edges moved.
pub fn separate_common_edges(shapes: &mut [DiagramShape], offset: f32) -> usize {
    let edges = edges_of(shapes);
    let mut pairs = Vec::new();
    for (i, first) in edges.iter().enumerate() {
        for second in &edges[i + 1..] {
            if first.touches(second, shapes) {
                pairs.push((*first, *second));
            }
        }
    }

    let mut moved: Vec<ShapeEdge> = Vec::new();
    for (first, second) in pairs {
        for edge in [first, second] {
            if !moved.contains(&edge) {
                edge.move_inwards_by(offset, shapes);
                moved.push(edge);
            }
        }
    }
    debug!("separated {} common edges", moved.len());
    moved.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::point::ShapePoint;

    fn rect(x1: f32, y1: f32, x2: f32, y2: f32) -> DiagramShape {
        DiagramShape::closed(
            [(x1, y1), (x2, y1), (x2, y2), (x1, y2)]
                .iter()
                .map(|&(x, y)| ShapePoint::new(x, y))
                .collect(),
        )
    }

    #[test]
    fn test_shared_wall_touches() {
        let shapes = vec![rect(5.0, 7.0, 35.0, 35.0), rect(35.0, 7.0, 65.0, 35.0)];
        let left_wall = ShapeEdge { shape: 0, start: 1 };
        let right_wall = ShapeEdge { shape: 1, start: 3 };
        assert!(left_wall.is_vertical(&shapes));
        assert!(left_wall.touches(&right_wall, &shapes));

        let left_top = ShapeEdge { shape: 0, start: 0 };
        let right_top = ShapeEdge { shape: 1, start: 0 };
        assert!(!left_top.touches(&right_top, &shapes));
    }

    #[test]
    fn test_separate_shared_wall() {
        let mut shapes = vec![rect(5.0, 7.0, 35.0, 35.0), rect(35.0, 7.0, 65.0, 35.0)];
        let moved = separate_common_edges(&mut shapes, 2.0);
        assert_eq!(moved, 2);
        assert_eq!(shapes[0].points[1].x, 33.0);
        assert_eq!(shapes[0].points[2].x, 33.0);
        assert_eq!(shapes[1].points[0].x, 37.0);
        assert_eq!(shapes[1].points[3].x, 37.0);
        assert_eq!(shapes[0].points[0].x, 5.0);
    }

    #[test]
    fn test_edge_moves_once_with_two_partners() {
        let mut shapes = vec![
            rect(0.0, 0.0, 10.0, 20.0),
            rect(10.0, 0.0, 20.0, 10.0),
            rect(10.0, 10.0, 20.0, 20.0),
        ];
        separate_common_edges(&mut shapes, 1.0);
        assert_eq!(shapes[0].points[1].x, 9.0);
        assert_eq!(shapes[0].points[2].x, 9.0);
        assert_eq!(shapes[1].points[0].x, 11.0);
        assert_eq!(shapes[2].points[0].x, 11.0);
    }

    #[test]
    fn test_locked_points_stay() {
        let mut shapes = vec![rect(5.0, 7.0, 35.0, 35.0), rect(35.0, 7.0, 65.0, 35.0)];
        shapes[0].points[1].lock();
        separate_common_edges(&mut shapes, 2.0);
        assert_eq!(shapes[0].points[1].x, 35.0);
        assert_eq!(shapes[0].points[2].x, 33.0);
    }
}
