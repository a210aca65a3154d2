//! Finding the boundary sets of a diagram.
//!
//! The boundary cells of a grid are split into sets, each of which becomes
//! one shape: first into groups of connected strokes, then into the
//! outlines of every area those strokes enclose. Sets that mix a closed
//! outline with loose lines are broken up, and closed outlines made
//! redundant by smaller ones are dropped.

use log::{debug, warn};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::text::abstraction::{FILL, STROKE};
use crate::text::{AbstractionGrid, CellSet, Classification, TextGrid, BLANK};

/// Boundary sets sorted by classification.
#[derive(Debug, Clone, Default)]
pub struct BoundarySets {
    pub open: Vec<CellSet>,
    pub closed: Vec<CellSet>,
    pub mixed: Vec<CellSet>,
}

impl BoundarySets {
    pub fn len(&self) -> usize {
        self.open.len() + self.closed.len() + self.mixed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split the boundaries of `grid` into classified sets.
///
/// Sets that cannot be classified are reported in `diagnostics` and left
/// out.
pub fn find_boundary_sets(grid: &TextGrid, diagnostics: &mut Diagnostics) -> BoundarySets {
    let boundaries = grid.all_boundaries();
    let coarse = AbstractionGrid::new(grid, &boundaries).distinct_shapes();
    debug!(
        "{} boundary cells in {} connected groups",
        boundaries.len(),
        coarse.len()
    );

    let mut sets = Vec::new();
    for group in &coarse {
        sets.extend(region_outlines(grid, group));
    }
    let sets = CellSet::remove_duplicate_sets(sets);

    let mut sorted = sort_by_classification(grid, sets, diagnostics);
    if !sorted.mixed.is_empty() {
        sorted = eliminate_mixed(grid, sorted, diagnostics);
    }
    remove_obsolete_shapes(grid, &mut sorted.closed);

    debug!(
        "{} closed, {} open and {} mixed boundary sets",
        sorted.closed.len(),
        sorted.open.len(),
        sorted.mixed.len()
    );
    sorted
}

/// The outline of every area the strokes of `group` border.
///
/// Each blank area of the group's abstraction is flooded in turn; the
/// stroke sub-cells next to the flooded area make up one set.
pub fn region_outlines(grid: &TextGrid, group: &CellSet) -> Vec<CellSet> {
    let Some(bounds) = group.bounds() else {
        return Vec::new();
    };
    let (origin_x, origin_y) = (bounds.min_x - 1, bounds.min_y - 1);
    let sub = grid.restricted_to(group).sub_grid(
        origin_x,
        origin_y,
        bounds.width() + 2,
        bounds.height() + 2,
    );
    let mut local = group.clone();
    local.translate(-origin_x, -origin_y);

    let mut buffer = AbstractionGrid::new(&sub, &local).into_buffer();
    let seeds: Vec<_> = buffer
        .iter_cells()
        .filter(|(_, c)| *c == BLANK)
        .map(|(cell, _)| cell)
        .collect();

    let mut outlines = Vec::new();
    for seed in seeds {
        if buffer.get(seed) != BLANK {
            continue;
        }
        let area = buffer.fill_continuous_area(seed, FILL);
        let strokes: CellSet = area
            .iter()
            .flat_map(|cell| cell.axis_neighbours())
            .filter(|cell| buffer.get(*cell) == STROKE)
            .collect();
        let mut outline = strokes.make_scaled_one_third_equivalent();
        if outline.is_empty() {
            continue;
        }
        outline.translate(origin_x, origin_y);
        outlines.push(outline);
    }
    outlines
}

/// Classify every set and sort it into its list.
pub fn sort_by_classification(
    grid: &TextGrid,
    sets: Vec<CellSet>,
    diagnostics: &mut Diagnostics,
) -> BoundarySets {
    let mut sorted = BoundarySets::default();
    for mut set in sets {
        if set.is_empty() {
            continue;
        }
        match set.classification(grid) {
            Classification::Open => sorted.open.push(set),
            Classification::Closed => sorted.closed.push(set),
            Classification::Mixed => sorted.mixed.push(set),
            Classification::Undetermined => {
                let at = set
                    .first()
                    .map(|cell| cell.to_string())
                    .unwrap_or_default();
                warn!("could not classify boundary set of {} cells at {}", set.len(), at);
                diagnostics.push(
                    Diagnostic::warning(
                        "asciidiag::classify::undetermined",
                        format!("could not classify the {} boundary cells at {}", set.len(), at),
                    )
                    .with_help("the lines at this position are left out of the diagram"),
                );
            }
        }
    }
    sorted
}

/// Break mixed sets into open and closed parts, then classify again.
///
/// When closed sets exist, their cells are taken out of every mixed set
/// and whatever becomes open is split into its separate lines. Without
/// closed sets each mixed set is cut into its unbranching paths.
pub fn eliminate_mixed(grid: &TextGrid, sets: BoundarySets, diagnostics: &mut Diagnostics) -> BoundarySets {
    let BoundarySets { open, closed, mixed } = sets;
    debug!("eliminating {} mixed boundary sets", mixed.len());

    let mut all: Vec<CellSet> = Vec::with_capacity(open.len() + closed.len() + mixed.len());
    if closed.is_empty() {
        for set in &mixed {
            all.extend(set.break_truly_mixed_boundaries(grid));
        }
    } else {
        for mut set in mixed {
            for closed_set in &closed {
                set.subtract_set(closed_set);
            }
            if set.classification(grid) == Classification::Open {
                all.extend(set.break_into_distinct_boundaries(grid));
            } else {
                all.push(set);
            }
        }
    }
    all.extend(closed);
    all.extend(open);

    let all = CellSet::remove_duplicate_sets(all);
    sort_by_classification(grid, all, diagnostics)
}

/// Drop closed sets whose area is exactly covered by the sets they share
/// cells with.
///
/// A set is only considered together with at least two others that
/// touch it. The set of such a group with the largest filled area is
/// dropped when that area equals the filled areas of the others combined.
/// A set without a fill seed stands in for its own filled area. Runs until
/// no more sets can be dropped, so a second call changes nothing.
pub fn remove_obsolete_shapes(grid: &TextGrid, sets: &mut Vec<CellSet>) {
    loop {
        let filled: Vec<CellSet> = sets
            .iter_mut()
            .map(|set| {
                set.filled_equivalent(grid).unwrap_or_else(|| {
                    debug!("no fill seed for closed set at {:?}, using its outline", set.first());
                    set.clone()
                })
            })
            .collect();

        let Some(obsolete) = find_obsolete(sets, &filled) else {
            return;
        };
        debug!("removing obsolete closed set of {} cells", sets[obsolete].len());
        sets.remove(obsolete);
    }
}

fn find_obsolete(sets: &[CellSet], filled: &[CellSet]) -> Option<usize> {
    for (index, set) in sets.iter().enumerate() {
        let group: Vec<usize> = (0..sets.len())
            .filter(|&other| other == index || set.has_common_cells(&sets[other]))
            .collect();
        if group.len() < 3 {
            continue;
        }

        let mut largest = group[0];
        for &member in &group[1..] {
            if filled[member].len() > filled[largest].len() {
                largest = member;
            }
        }

        let mut others = CellSet::new();
        for &member in group.iter().filter(|&&m| m != largest) {
            others.add_all(&filled[member]);
        }
        if others == filled[largest] {
            return Some(largest);
        }
    }
    None
}
