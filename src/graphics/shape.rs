//! Diagram shapes built from classified cell sets.

use log::debug;
use serde::Serialize;

use super::geometry::{polygon_area, polygon_contains, rect_intersects_polygon, CellGeometry, Rect, EPSILON};
use super::point::{PointStyle, ShapePoint};
use crate::colour::Colour;
use crate::config::ConversionOptions;
use crate::error::{DiagramError, Result};
use crate::text::{ArrowDirection, Cell, CellSet, Classification, TextGrid};

/// What a shape represents. Built-in kinds come from `{tag}` markup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    #[default]
    Simple,
    Arrowhead,
    PointMarker,
    Document,
    Storage,
    Io,
    Decision,
    ManualOperation,
    Trapezoid,
    Ellipse,
    /// A user-defined kind, named after its entry in the options.
    Custom(String),
}

impl ShapeKind {
    /// Resolve a tag name. A custom definition under the same name wins
    /// over the built-in kind.
    pub fn from_tag(tag: &str, options: &ConversionOptions) -> Option<ShapeKind> {
        if options.custom_shapes.contains_key(tag) {
            return Some(ShapeKind::Custom(tag.to_string()));
        }
        let kind = match tag {
            "d" => ShapeKind::Document,
            "s" => ShapeKind::Storage,
            "io" => ShapeKind::Io,
            "c" => ShapeKind::Decision,
            "mo" => ShapeKind::ManualOperation,
            "tr" => ShapeKind::Trapezoid,
            "o" => ShapeKind::Ellipse,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ShapeKind::Custom(_))
    }
}

/// A polyline or polygon with its drawing attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramShape {
    pub points: Vec<ShapePoint>,
    pub closed: bool,
    pub kind: ShapeKind,
    pub stroke_dashed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_colour: Option<Colour>,
    pub stroke_colour: Colour,
}

impl DiagramShape {
    fn empty(closed: bool) -> Self {
        Self {
            points: Vec::new(),
            closed,
            kind: ShapeKind::Simple,
            stroke_dashed: false,
            fill_colour: None,
            stroke_colour: Colour::BLACK,
        }
    }

    /// An open polyline through `points`.
    pub fn open(points: Vec<ShapePoint>) -> Self {
        Self {
            points,
            ..Self::empty(false)
        }
    }

    /// A closed polygon through `points`.
    pub fn closed(points: Vec<ShapePoint>) -> Self {
        Self {
            points,
            ..Self::empty(true)
        }
    }

    /// Build a polygon from a closed boundary, with a vertex at every
    /// point cell.
    ///
    /// Returns `Ok(None)` for loops that cannot be drawn as one polygon,
    /// such as a loop with a three-way intersection.
    pub fn create_closed_from_boundary_cells(
        grid: &TextGrid,
        cells: &mut CellSet,
        geometry: &CellGeometry,
        all_corners_round: bool,
    ) -> Result<Option<DiagramShape>> {
        let classification = cells.classification(grid);
        if classification != Classification::Closed {
            return Err(DiagramError::InvalidShape {
                message: format!(
                    "cannot build a closed shape from a {:?} set of {} cells",
                    classification,
                    cells.len()
                ),
            });
        }

        let work = grid.restricted_to(cells);
        if cells.iter().any(|c| work.is_intersection(c)) {
            debug!("skipping closed set with an intersection at {:?}", cells.first());
            return Ok(None);
        }
        let Some(start) = cells.iter().find(|c| work.is_point_cell(*c)) else {
            return Ok(None);
        };

        let mut shape = DiagramShape::closed(Vec::new());
        let mut previous: Option<Cell> = None;
        let mut current = start;
        for _ in 0..cells.len() {
            if work.is_dashed(current) {
                shape.stroke_dashed = true;
            }
            if work.is_point_cell(current) {
                shape
                    .points
                    .push(point_at(&work, current, geometry, all_corners_round));
            }
            let Some(&next) = work.follow(current, previous).first() else {
                break;
            };
            if next == start {
                break;
            }
            previous = Some(current);
            current = next;
        }

        if shape.points.len() < 3 {
            return Ok(None);
        }
        Ok(Some(shape))
    }

    /// A one-cell line across a `-` or `|` cell.
    pub fn create_small_line(grid: &TextGrid, cell: Cell, geometry: &CellGeometry) -> Option<DiagramShape> {
        let (start, end) = if grid.is_horizontal_line(cell) {
            (
                ShapePoint::new(geometry.min_x(cell), geometry.mid_y(cell)),
                ShapePoint::new(geometry.max_x(cell), geometry.mid_y(cell)),
            )
        } else if grid.is_vertical_line(cell) {
            (
                ShapePoint::new(geometry.mid_x(cell), geometry.min_y(cell)),
                ShapePoint::new(geometry.mid_x(cell), geometry.max_y(cell)),
            )
        } else {
            return None;
        };
        Some(DiagramShape::open(vec![start, end]))
    }

    /// A triangle filling the arrowhead's cell, pointing its way.
    pub fn create_arrowhead(grid: &TextGrid, cell: Cell, geometry: &CellGeometry) -> Option<DiagramShape> {
        let direction = grid.arrowhead_at(cell)?;
        let (min_x, mid_x, max_x) = (geometry.min_x(cell), geometry.mid_x(cell), geometry.max_x(cell));
        let (min_y, mid_y, max_y) = (geometry.min_y(cell), geometry.mid_y(cell), geometry.max_y(cell));
        let quarter = geometry.cell_height / 4.0;

        let corners = match direction {
            ArrowDirection::East => [(max_x, mid_y), (min_x, max_y - quarter), (min_x, min_y + quarter)],
            ArrowDirection::West => [(min_x, mid_y), (max_x, min_y + quarter), (max_x, max_y - quarter)],
            ArrowDirection::North => [(mid_x, min_y), (max_x, max_y), (min_x, max_y)],
            ArrowDirection::South => [(mid_x, max_y), (min_x, min_y), (max_x, min_y)],
        };
        let mut shape = DiagramShape::closed(corners.iter().map(|&(x, y)| ShapePoint::new(x, y)).collect());
        shape.kind = ShapeKind::Arrowhead;
        Some(shape)
    }

    /// A single white point at the centre of a point marker's cell.
    pub fn create_point_marker(cell: Cell, geometry: &CellGeometry) -> DiagramShape {
        let mut shape = DiagramShape::open(vec![ShapePoint::new(geometry.mid_x(cell), geometry.mid_y(cell))]);
        shape.kind = ShapeKind::PointMarker;
        shape.fill_colour = Some(Colour::WHITE);
        shape
    }

    fn coordinates(&self) -> Vec<(f32, f32)> {
        self.points.iter().map(ShapePoint::position).collect()
    }

    /// Enclosed area; zero for open shapes.
    pub fn area(&self) -> f32 {
        if !self.closed {
            return 0.0;
        }
        polygon_area(&self.coordinates())
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.closed && polygon_contains(&self.coordinates(), x, y)
    }

    pub fn intersects(&self, rect: &Rect) -> bool {
        self.closed && rect_intersects_polygon(rect, &self.coordinates())
    }

    pub fn is_smaller_than(&self, other: &DiagramShape) -> bool {
        self.area() < other.area()
    }

    /// Bounding box of the points.
    pub fn bounds(&self) -> Option<Rect> {
        let first = self.points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Pull the free ends of an open shape onto what they point at.
    ///
    /// An end whose onward cell holds an arrowhead moves to the arrowhead's
    /// near edge; one whose onward cell is another line moves to that
    /// cell's centre. Onward cells belonging to `own_cells` are part of
    /// the same drawing and are left alone.
    pub fn connect_ends_to_anchors(&mut self, grid: &TextGrid, own_cells: &CellSet, geometry: &CellGeometry) {
        if self.closed || self.points.len() < 2 {
            return;
        }
        let last = self.points.len() - 1;
        for (end, neighbour) in [(0, 1), (last, last - 1)] {
            let adjacent = self.points[neighbour];
            let point = &mut self.points[end];
            let Some(direction) = direction_between(adjacent, *point) else {
                continue;
            };
            let end_cell = geometry.cell_for(point.x, point.y);
            anchor_end(point, end_cell, direction, grid, own_cells, geometry);
        }
    }

    /// Anchor both ends of a one-cell line.
    pub fn connect_small_line_to_anchors(&mut self, grid: &TextGrid, cell: Cell, geometry: &CellGeometry) {
        if self.points.len() != 2 {
            return;
        }
        let own: CellSet = [cell].into_iter().collect();
        let (backward, forward) = if grid.is_horizontal_line(cell) {
            (ArrowDirection::West, ArrowDirection::East)
        } else {
            (ArrowDirection::North, ArrowDirection::South)
        };
        anchor_end(&mut self.points[0], cell, backward, grid, &own, geometry);
        anchor_end(&mut self.points[1], cell, forward, grid, &own, geometry);
    }
}

/// Index of the smallest shape matching `predicate`. Among shapes of
/// equal area the first one wins.
pub fn smallest_shape_where(shapes: &[DiagramShape], predicate: impl Fn(&DiagramShape) -> bool) -> Option<usize> {
    let mut smallest: Option<usize> = None;
    for (index, shape) in shapes.iter().enumerate() {
        if !predicate(shape) {
            continue;
        }
        match smallest {
            Some(current) if !shape.is_smaller_than(&shapes[current]) => {}
            _ => smallest = Some(index),
        }
    }
    smallest
}

/// The vertex for a point cell.
pub(crate) fn point_at(grid: &TextGrid, cell: Cell, geometry: &CellGeometry, all_corners_round: bool) -> ShapePoint {
    let style = if all_corners_round || grid.is_round_corner(cell) {
        PointStyle::Round
    } else {
        PointStyle::Normal
    };
    ShapePoint::with_style(geometry.mid_x(cell), geometry.mid_y(cell), style)
}

/// Direction from `from` towards `to` along an axis.
fn direction_between(from: ShapePoint, to: ShapePoint) -> Option<ArrowDirection> {
    if (from.y - to.y).abs() < EPSILON {
        if to.x > from.x {
            Some(ArrowDirection::East)
        } else if to.x < from.x {
            Some(ArrowDirection::West)
        } else {
            None
        }
    } else if (from.x - to.x).abs() < EPSILON {
        if to.y > from.y {
            Some(ArrowDirection::South)
        } else {
            Some(ArrowDirection::North)
        }
    } else {
        None
    }
}

fn anchor_end(
    point: &mut ShapePoint,
    end_cell: Cell,
    direction: ArrowDirection,
    grid: &TextGrid,
    own_cells: &CellSet,
    geometry: &CellGeometry,
) {
    let onward = match direction {
        ArrowDirection::North => end_cell.north(),
        ArrowDirection::South => end_cell.south(),
        ArrowDirection::East => end_cell.east(),
        ArrowDirection::West => end_cell.west(),
    };
    if own_cells.contains(onward) {
        return;
    }

    if grid.is_arrowhead(onward) {
        match direction {
            ArrowDirection::East => point.move_to(geometry.min_x(onward), point.y),
            ArrowDirection::West => point.move_to(geometry.max_x(onward), point.y),
            ArrowDirection::South => point.move_to(point.x, geometry.min_y(onward)),
            ArrowDirection::North => point.move_to(point.x, geometry.max_y(onward)),
        }
    } else if grid.is_boundary(onward) {
        match direction {
            ArrowDirection::East | ArrowDirection::West => point.move_to(geometry.mid_x(onward), point.y),
            ArrowDirection::North | ArrowDirection::South => point.move_to(point.x, geometry.mid_y(onward)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> CellGeometry {
        CellGeometry::new(10.0, 14.0)
    }

    fn positions(shape: &DiagramShape) -> Vec<(f32, f32)> {
        shape.points.iter().map(ShapePoint::position).collect()
    }

    #[test]
    fn test_kind_from_tag() {
        let options = ConversionOptions::default();
        assert_eq!(ShapeKind::from_tag("s", &options), Some(ShapeKind::Storage));
        assert_eq!(ShapeKind::from_tag("mo", &options), Some(ShapeKind::ManualOperation));
        assert_eq!(ShapeKind::from_tag("robot", &options), None);
    }

    #[test]
    fn test_custom_definition_overrides_builtin() {
        let mut options = ConversionOptions::default();
        options.custom_shapes.insert("d".to_string(), Default::default());
        assert_eq!(
            ShapeKind::from_tag("d", &options),
            Some(ShapeKind::Custom("d".to_string()))
        );
    }

    #[test]
    fn test_closed_box() {
        let grid = TextGrid::from_text("+-+\n| |\n+-+");
        let mut cells = grid.all_boundaries();
        let shape = DiagramShape::create_closed_from_boundary_cells(&grid, &mut cells, &geometry(), false)
            .unwrap()
            .unwrap();
        assert!(shape.closed);
        assert_eq!(
            positions(&shape),
            vec![(5.0, 7.0), (25.0, 7.0), (25.0, 35.0), (5.0, 35.0)]
        );
        assert!(shape.points.iter().all(|p| p.style == PointStyle::Normal));
        assert_eq!(shape.area(), 560.0);
    }

    #[test]
    fn test_closed_box_round_glyphs_and_dashes() {
        let grid = TextGrid::from_text("/-=-\\\n|   |\n\\---/");
        let mut cells = grid.all_boundaries();
        let shape = DiagramShape::create_closed_from_boundary_cells(&grid, &mut cells, &geometry(), false)
            .unwrap()
            .unwrap();
        assert_eq!(shape.points.len(), 4);
        assert!(shape.points.iter().all(|p| p.style == PointStyle::Round));
        assert!(shape.stroke_dashed);
    }

    #[test]
    fn test_closed_from_open_set_is_an_error() {
        let grid = TextGrid::from_text("---");
        let mut cells = grid.all_boundaries();
        let result = DiagramShape::create_closed_from_boundary_cells(&grid, &mut cells, &geometry(), false);
        assert!(matches!(result, Err(DiagramError::InvalidShape { .. })));
    }

    #[test]
    fn test_small_line() {
        let grid = TextGrid::from_text("-\n|\n+");
        let h = DiagramShape::create_small_line(&grid, Cell::new(0, 0), &geometry()).unwrap();
        assert_eq!(positions(&h), vec![(0.0, 7.0), (10.0, 7.0)]);
        let v = DiagramShape::create_small_line(&grid, Cell::new(0, 1), &geometry()).unwrap();
        assert_eq!(positions(&v), vec![(5.0, 14.0), (5.0, 28.0)]);
        assert!(DiagramShape::create_small_line(&grid, Cell::new(0, 2), &geometry()).is_none());
    }

    #[test]
    fn test_arrowhead_east() {
        let grid = TextGrid::from_text("->");
        let shape = DiagramShape::create_arrowhead(&grid, Cell::new(1, 0), &geometry()).unwrap();
        assert_eq!(shape.kind, ShapeKind::Arrowhead);
        assert_eq!(positions(&shape), vec![(20.0, 7.0), (10.0, 10.5), (10.0, 3.5)]);
    }

    #[test]
    fn test_arrowhead_north() {
        let grid = TextGrid::from_text("^\n|");
        let shape = DiagramShape::create_arrowhead(&grid, Cell::new(0, 0), &geometry()).unwrap();
        assert_eq!(positions(&shape), vec![(5.0, 0.0), (10.0, 14.0), (0.0, 14.0)]);
        assert!(shape.contains(5.0, 10.0));
    }

    #[test]
    fn test_point_marker() {
        let shape = DiagramShape::create_point_marker(Cell::new(1, 1), &geometry());
        assert_eq!(positions(&shape), vec![(15.0, 21.0)]);
        assert_eq!(shape.kind, ShapeKind::PointMarker);
        assert_eq!(shape.fill_colour, Some(Colour::WHITE));
    }

    #[test]
    fn test_connect_end_to_arrowhead_and_line() {
        let grid = TextGrid::from_text("|--->");
        let own: CellSet = (1..4).map(|x| Cell::new(x, 0)).collect();
        let mut shape = DiagramShape::open(vec![ShapePoint::new(15.0, 7.0), ShapePoint::new(35.0, 7.0)]);
        shape.connect_ends_to_anchors(&grid, &own, &geometry());
        assert_eq!(positions(&shape), vec![(5.0, 7.0), (40.0, 7.0)]);
    }

    #[test]
    fn test_small_line_anchors() {
        let grid = TextGrid::from_text("|->");
        let mut shape = DiagramShape::create_small_line(&grid, Cell::new(1, 0), &geometry()).unwrap();
        shape.connect_small_line_to_anchors(&grid, Cell::new(1, 0), &geometry());
        assert_eq!(positions(&shape), vec![(5.0, 7.0), (20.0, 7.0)]);
    }

    #[test]
    fn test_smaller_than() {
        let small = DiagramShape::closed(
            [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)].iter().map(|&(x, y)| ShapePoint::new(x, y)).collect(),
        );
        let large = DiagramShape::closed(
            [(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)].iter().map(|&(x, y)| ShapePoint::new(x, y)).collect(),
        );
        assert!(small.is_smaller_than(&large));
        assert!(!large.is_smaller_than(&small));
    }

    #[test]
    fn test_smallest_shape_first_wins_ties() {
        let square = |x: f32, size: f32| {
            DiagramShape::closed(
                [(x, 0.0), (x + size, 0.0), (x + size, size), (x, size)]
                    .iter()
                    .map(|&(x, y)| ShapePoint::new(x, y))
                    .collect(),
            )
        };
        let shapes = vec![square(0.0, 10.0), square(20.0, 4.0), square(40.0, 4.0)];
        assert_eq!(smallest_shape_where(&shapes, |_| true), Some(1));
        assert_eq!(smallest_shape_where(&shapes, |s| s.contains(5.0, 5.0)), Some(0));
        assert_eq!(smallest_shape_where(&shapes, |s| s.contains(100.0, 5.0)), None);
    }
}
