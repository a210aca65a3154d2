//! Open, possibly branching paths made of several shapes.

use serde::Serialize;

use super::geometry::{CellGeometry, EPSILON};
use super::shape::{point_at, DiagramShape};
use crate::error::{DiagramError, Result};
use crate::text::{Cell, CellSet, Classification, TextGrid};

/// One open drawing: every segment between line ends and branches.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CompositeDiagramShape {
    pub shapes: Vec<DiagramShape>,
}

impl CompositeDiagramShape {
    /// Grow segments from the first line end of an open set.
    ///
    /// Each segment runs until a dead end or a branch; a branch queues one
    /// new segment per continuation, starting at the branch cell. Cells
    /// already walked are never entered again. Returns `Ok(None)` when the
    /// set has no line end to start from.
    pub fn create_open_from_boundary_cells(
        grid: &TextGrid,
        cells: &mut CellSet,
        geometry: &CellGeometry,
        all_corners_round: bool,
    ) -> Result<Option<CompositeDiagramShape>> {
        let classification = cells.classification(grid);
        if classification != Classification::Open {
            return Err(DiagramError::InvalidShape {
                message: format!(
                    "cannot build an open shape from a {:?} set of {} cells",
                    classification,
                    cells.len()
                ),
            });
        }

        let work = grid.restricted_to(cells);
        let Some(start) = cells.iter().find(|c| work.is_lines_end(*c)) else {
            return Ok(None);
        };

        let mut composite = CompositeDiagramShape::default();
        let mut visited = CellSet::new();
        let mut stack: Vec<(Cell, Option<Cell>)> = vec![(start, None)];

        while let Some((begin, came_from)) = stack.pop() {
            if visited.contains(begin) {
                continue;
            }
            let mut segment = DiagramShape::open(Vec::new());
            if let Some(branch) = came_from {
                segment
                    .points
                    .push(point_at(&work, branch, geometry, all_corners_round));
            }

            let mut previous = came_from;
            let mut current = begin;
            loop {
                visited.insert(current);
                if work.is_dashed(current) {
                    segment.stroke_dashed = true;
                }
                let next = work.follow(current, previous);
                if next.len() != 1 || work.is_point_cell(current) {
                    segment
                        .points
                        .push(point_at(&work, current, geometry, all_corners_round));
                }
                match next.as_slice() {
                    [] => break,
                    [only] if visited.contains(*only) => {
                        segment
                            .points
                            .push(point_at(&work, *only, geometry, all_corners_round));
                        break;
                    }
                    [only] => {
                        previous = Some(current);
                        current = *only;
                    }
                    branches => {
                        for &branch in branches.iter().rev() {
                            if !visited.contains(branch) {
                                stack.push((branch, Some(current)));
                            }
                        }
                        break;
                    }
                }
            }

            if segment.points.len() >= 2 {
                composite.shapes.push(segment);
            }
        }

        if composite.shapes.is_empty() {
            return Ok(None);
        }
        composite.lock_junctions();
        composite.spread_dashes();
        Ok(Some(composite))
    }

    /// Lock every vertex where the end of one segment meets another
    /// segment, so later end anchoring cannot pull the branches apart.
    fn lock_junctions(&mut self) {
        let ends: Vec<(usize, (f32, f32))> = self
            .shapes
            .iter()
            .enumerate()
            .flat_map(|(index, shape)| {
                [shape.points.first(), shape.points.last()]
                    .into_iter()
                    .flatten()
                    .map(move |point| (index, point.position()))
            })
            .collect();

        let junctions: Vec<(f32, f32)> = ends
            .into_iter()
            .filter(|&(index, end)| {
                self.shapes.iter().enumerate().any(|(other, shape)| {
                    other != index && shape.points.iter().any(|p| same_position(p.position(), end))
                })
            })
            .map(|(_, end)| end)
            .collect();

        for shape in &mut self.shapes {
            for point in &mut shape.points {
                if junctions.iter().any(|&junction| same_position(point.position(), junction)) {
                    point.lock();
                }
            }
        }
    }

    /// A dashed segment makes the whole drawing dashed.
    fn spread_dashes(&mut self) {
        if self.is_dashed() {
            for shape in &mut self.shapes {
                shape.stroke_dashed = true;
            }
        }
    }

    pub fn is_dashed(&self) -> bool {
        self.shapes.iter().any(|s| s.stroke_dashed)
    }

    /// Anchor the free ends of every segment; see
    /// [`DiagramShape::connect_ends_to_anchors`].
    pub fn connect_ends_to_anchors(&mut self, grid: &TextGrid, own_cells: &CellSet, geometry: &CellGeometry) {
        for shape in &mut self.shapes {
            shape.connect_ends_to_anchors(grid, own_cells, geometry);
        }
    }
}

fn same_position(a: (f32, f32), b: (f32, f32)) -> bool {
    (a.0 - b.0).abs() < EPSILON && (a.1 - b.1).abs() < EPSILON
}
