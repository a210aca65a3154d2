//! Assembling a diagram from a text grid.

use log::{debug, info, warn};
use serde::Serialize;

use super::boundaries::find_boundary_sets;
use super::composite::CompositeDiagramShape;
use super::edge::separate_common_edges;
use super::geometry::CellGeometry;
use super::labels::{recolour_texts, TextLayout};
use super::shape::{smallest_shape_where, DiagramShape, ShapeKind};
use super::text::{DiagramText, FontMeasurer, MonospaceMeasurer};
use crate::config::{ColourCodeMode, ConversionOptions, TagMode};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::parser::Tokens;
use crate::text::{CellSet, TextGrid};

/// The shapes and labels of one converted diagram.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Diagram {
    pub shapes: Vec<DiagramShape>,
    pub composite_shapes: Vec<CompositeDiagramShape>,
    pub texts: Vec<DiagramText>,
    pub width: f32,
    pub height: f32,
    pub cell_width: f32,
    pub cell_height: f32,
}

impl Diagram {
    /// Every shape, including the segments of composite shapes.
    pub fn all_shapes(&self) -> impl Iterator<Item = &DiagramShape> {
        self.shapes
            .iter()
            .chain(self.composite_shapes.iter().flat_map(|c| c.shapes.iter()))
    }

    pub fn closed_shapes(&self) -> impl Iterator<Item = &DiagramShape> {
        self.shapes.iter().filter(|s| s.closed)
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// A diagram together with what went wrong while building it.
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub diagram: Diagram,
    pub diagnostics: Diagnostics,
}

/// Convert `grid` with monospace font metrics.
pub fn convert(grid: &TextGrid, tokens: &Tokens, options: &ConversionOptions) -> Conversion {
    convert_with(grid, tokens, options, &MonospaceMeasurer)
}

/// Convert `grid`, measuring labels with `measurer`.
///
/// Never fails: sets that cannot be classified or drawn are skipped and
/// reported in the returned diagnostics.
pub fn convert_with(
    grid: &TextGrid,
    tokens: &Tokens,
    options: &ConversionOptions,
    measurer: &dyn FontMeasurer,
) -> Conversion {
    let geometry = CellGeometry::new(options.effective_cell_width(), options.effective_cell_height());
    let mut diagnostics = Diagnostics::new();
    let mut diagram = Diagram {
        width: grid.width() as f32 * geometry.cell_width,
        height: grid.height() as f32 * geometry.cell_height,
        cell_width: geometry.cell_width,
        cell_height: geometry.cell_height,
        ..Diagram::default()
    };

    let mut work = grid.clone();
    work.replace_type_on_line();
    work.replace_point_markers(&tokens.point_markers);

    let sets = find_boundary_sets(&work, &mut diagnostics);

    for mut set in sets.closed {
        match DiagramShape::create_closed_from_boundary_cells(&work, &mut set, &geometry, options.all_corners_round) {
            Ok(Some(shape)) => diagram.shapes.push(shape),
            Ok(None) => report_unrenderable(&set, &mut diagnostics),
            Err(e) => record_error(e, &mut diagnostics),
        }
    }

    if options.separate_common_edges {
        separate_common_edges(&mut diagram.shapes, geometry.min_dimension() / 5.0);
    }

    for mut set in sets.open {
        if set.len() == 1 {
            let Some(cell) = set.first() else {
                continue;
            };
            if grid.is_dashed(cell) {
                continue;
            }
            if let Some(mut line) = DiagramShape::create_small_line(&work, cell, &geometry) {
                line.connect_small_line_to_anchors(&work, cell, &geometry);
                diagram.shapes.push(line);
            }
            continue;
        }

        match CompositeDiagramShape::create_open_from_boundary_cells(
            &work,
            &mut set,
            &geometry,
            options.all_corners_round,
        ) {
            Ok(Some(mut composite)) => {
                composite.connect_ends_to_anchors(&work, &set, &geometry);
                diagram.composite_shapes.push(composite);
            }
            Ok(None) => report_unrenderable(&set, &mut diagnostics),
            Err(e) => record_error(e, &mut diagnostics),
        }
    }

    if options.tags == TagMode::Use {
        assign_kinds(&mut diagram.shapes, tokens, options, &geometry, &mut diagnostics);
    }
    if options.colour_codes == ColourCodeMode::Use {
        assign_colours(&mut diagram.shapes, tokens, &geometry);
    }

    for &cell in &tokens.arrowheads {
        match DiagramShape::create_arrowhead(&work, cell, &geometry) {
            Some(arrowhead) => diagram.shapes.push(arrowhead),
            None => {
                warn!("no arrowhead could be made at {}", cell);
                diagnostics.warning(
                    "asciidiag::arrowhead",
                    format!("the arrowhead at {} is not attached to a line", cell),
                );
            }
        }
    }
    for &cell in &tokens.point_markers {
        diagram.shapes.push(DiagramShape::create_point_marker(cell, &geometry));
    }

    diagram.shapes = remove_duplicate_shapes(diagram.shapes);

    let layout = TextLayout {
        geometry,
        options,
        measurer,
    };
    diagram.texts = layout.layout(grid, tokens);
    recolour_texts(&mut diagram.texts, &diagram.shapes, measurer);

    info!(
        "converted {}x{} grid: {} shapes, {} composite shapes, {} texts",
        grid.width(),
        grid.height(),
        diagram.shapes.len(),
        diagram.composite_shapes.len(),
        diagram.texts.len()
    );

    Conversion { diagram, diagnostics }
}

/// Give the smallest shape around each tag the tag's kind.
fn assign_kinds(
    shapes: &mut [DiagramShape],
    tokens: &Tokens,
    options: &ConversionOptions,
    geometry: &CellGeometry,
    diagnostics: &mut Diagnostics,
) {
    for (cell, tag) in &tokens.tags {
        let Some(kind) = ShapeKind::from_tag(tag, options) else {
            diagnostics.push(
                Diagnostic::warning("asciidiag::tag::unknown", format!("unknown tag '{{{}}}' at {}", tag, cell))
                    .with_help("define it under custom_shapes in the config file"),
            );
            continue;
        };
        let (x, y) = (geometry.mid_x(*cell), geometry.mid_y(*cell));
        match smallest_shape_where(shapes, |s| s.contains(x, y)) {
            Some(index) => shapes[index].kind = kind,
            None => debug!("tag '{}' at {} is not inside a shape", tag, cell),
        }
    }
}

/// Fill the smallest shape around each colour code.
fn assign_colours(shapes: &mut [DiagramShape], tokens: &Tokens, geometry: &CellGeometry) {
    for (cell, colour) in &tokens.colours {
        let (x, y) = (geometry.mid_x(*cell), geometry.mid_y(*cell));
        match smallest_shape_where(shapes, |s| s.contains(x, y)) {
            Some(index) => shapes[index].fill_colour = Some(*colour),
            None => debug!("colour code at {} is not inside a shape", cell),
        }
    }
}

/// Drop shapes equal to an earlier one.
pub fn remove_duplicate_shapes(shapes: Vec<DiagramShape>) -> Vec<DiagramShape> {
    let mut unique: Vec<DiagramShape> = Vec::with_capacity(shapes.len());
    for shape in shapes {
        if !unique.contains(&shape) {
            unique.push(shape);
        }
    }
    unique
}

fn report_unrenderable(set: &CellSet, diagnostics: &mut Diagnostics) {
    let at = set.first().map(|c| c.to_string()).unwrap_or_default();
    debug!("could not draw boundary set of {} cells at {}", set.len(), at);
    diagnostics.warning(
        "asciidiag::shape::unrenderable",
        format!("the {} boundary cells at {} could not be drawn", set.len(), at),
    );
}

fn record_error(error: crate::error::DiagramError, diagnostics: &mut Diagnostics) {
    warn!("{}", error);
    diagnostics.error("asciidiag::shape", error.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::Colour;
    use crate::graphics::point::{PointStyle, ShapePoint};
    use crate::parser::scan_tokens;

    fn run(text: &str, options: &ConversionOptions) -> Conversion {
        let grid = TextGrid::from_text(text);
        let tokens = scan_tokens(&grid, options);
        convert(&grid, &tokens, options)
    }

    fn positions(shape: &DiagramShape) -> Vec<(f32, f32)> {
        shape.points.iter().map(ShapePoint::position).collect()
    }

    #[test]
    fn test_box() {
        let conversion = run("+-+\n| |\n+-+", &ConversionOptions::default());
        let diagram = conversion.diagram;
        assert_eq!(diagram.shapes.len(), 1);
        assert!(diagram.shapes[0].closed);
        assert_eq!(
            positions(&diagram.shapes[0]),
            vec![(5.0, 7.0), (25.0, 7.0), (25.0, 35.0), (5.0, 35.0)]
        );
        assert!(diagram.shapes[0].points.iter().all(|p| p.style == PointStyle::Normal));
        assert_eq!(diagram.width, 30.0);
        assert_eq!(diagram.height, 42.0);
        assert!(conversion.diagnostics.is_empty());
    }

    #[test]
    fn test_scale_applies_to_geometry() {
        let options = ConversionOptions {
            scale: 2.0,
            ..ConversionOptions::default()
        };
        let diagram = run("+-+\n| |\n+-+", &options).diagram;
        assert_eq!(diagram.cell_width, 20.0);
        assert_eq!(diagram.shapes[0].points[0].position(), (10.0, 14.0));
    }

    #[test]
    fn test_colour_fills_inner_box_only() {
        let text = "+--------+\n| +----+ |\n| |cRED| |\n| +----+ |\n+--------+";
        let diagram = run(text, &ConversionOptions::default()).diagram;
        let filled: Vec<_> = diagram.shapes.iter().filter(|s| s.fill_colour.is_some()).collect();
        assert_eq!(filled.len(), 1);
        assert_eq!(filled[0].fill_colour, Colour::from_code("RED"));
        let largest = diagram.closed_shapes().map(DiagramShape::area).fold(0.0, f32::max);
        assert!(filled[0].area() < largest);
    }

    #[test]
    fn test_ignored_colour_codes_stay_text() {
        let options = ConversionOptions {
            colour_codes: ColourCodeMode::Ignore,
            ..ConversionOptions::default()
        };
        let conversion = run("+----+\n|cRED|\n+----+", &options);
        assert!(conversion.diagram.shapes.iter().all(|s| s.fill_colour.is_none()));
        assert_eq!(conversion.diagram.texts.len(), 1);
        assert_eq!(conversion.diagram.texts[0].text, "cRED");
    }

    #[test]
    fn test_unknown_tag_is_reported() {
        let grid = TextGrid::from_text("+---+\n|   |\n+---+");
        let tokens = Tokens {
            tags: vec![(crate::text::Cell::new(1, 1), "robot".to_string())],
            ..Tokens::default()
        };
        let conversion = convert(&grid, &tokens, &ConversionOptions::default());
        assert!(conversion.diagnostics.contains_code("asciidiag::tag::unknown"));
        assert_eq!(conversion.diagram.shapes[0].kind, ShapeKind::Simple);
    }

    #[test]
    fn test_point_marker_on_line() {
        let diagram = run("--*--", &ConversionOptions::default()).diagram;
        let markers: Vec<_> = diagram
            .shapes
            .iter()
            .filter(|s| s.kind == ShapeKind::PointMarker)
            .collect();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].points[0].position(), (25.0, 7.0));
        assert_eq!(diagram.composite_shapes.len(), 1);
        assert!(diagram.texts.is_empty());
    }

    #[test]
    fn test_dashed_single_cell_is_not_drawn() {
        let diagram = run("Note: x", &ConversionOptions::default()).diagram;
        assert!(diagram.shapes.is_empty());
        assert!(diagram.composite_shapes.is_empty());
    }

    #[test]
    fn test_remove_duplicate_shapes() {
        let shape = DiagramShape::open(vec![ShapePoint::new(0.0, 0.0), ShapePoint::new(1.0, 0.0)]);
        let unique = remove_duplicate_shapes(vec![shape.clone(), shape.clone()]);
        assert_eq!(unique, vec![shape]);
    }

    #[test]
    fn test_json_export() {
        let diagram = run("+-+\n| |\n+-+", &ConversionOptions::default()).diagram;
        let json = diagram.to_json(false).unwrap();
        assert!(json.contains("\"composite_shapes\":[]"));
        assert!(json.contains("\"kind\":\"simple\""));
    }
}
