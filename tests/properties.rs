//! Property tests for cell set classification and boundary handling.

use asciidiag::diagnostics::Diagnostics;
use asciidiag::graphics::boundaries::{find_boundary_sets, remove_obsolete_shapes};
use asciidiag::text::FillOutcome;
use asciidiag::{Cell, CellSet, Classification, TextGrid};
use proptest::prelude::*;

const WIDTH: usize = 24;
const HEIGHT: usize = 16;

fn blank_rows() -> Vec<Vec<char>> {
    vec![vec![' '; WIDTH]; HEIGHT]
}

fn draw_rect(rows: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    for dx in 0..w {
        rows[y][x + dx] = '-';
        rows[y + h - 1][x + dx] = '-';
    }
    for dy in 0..h {
        rows[y + dy][x] = '|';
        rows[y + dy][x + w - 1] = '|';
    }
    for (cx, cy) in [(x, y), (x + w - 1, y), (x, y + h - 1), (x + w - 1, y + h - 1)] {
        rows[cy][cx] = '+';
    }
}

fn rect_grid(x: usize, y: usize, w: usize, h: usize) -> TextGrid {
    let mut rows = blank_rows();
    draw_rect(&mut rows, x, y, w, h);
    TextGrid::from_rows(rows)
}

/// A horizontal run, optionally turning down at its east end.
fn line_grid(x: usize, y: usize, length: usize, drop: usize) -> TextGrid {
    let mut rows = blank_rows();
    for dx in 0..length {
        rows[y][x + dx] = '-';
    }
    if drop > 0 {
        let corner = x + length;
        rows[y][corner] = '+';
        for dy in 1..=drop {
            rows[y + dy][corner] = '|';
        }
    }
    TextGrid::from_rows(rows)
}

fn rect_params() -> impl Strategy<Value = (usize, usize, usize, usize)> {
    (0usize..8, 0usize..6, 2usize..12, 2usize..8)
}

fn line_params() -> impl Strategy<Value = (usize, usize, usize, usize)> {
    (0usize..6, 0usize..6, 2usize..12, 0usize..6)
}

proptest! {
    #[test]
    fn test_rectangles_trace_and_fill_agree((x, y, w, h) in rect_params()) {
        let grid = rect_grid(x, y, w, h);
        let mut set = grid.all_boundaries();
        prop_assert_eq!(set.classify_by_trace(&grid), Classification::Closed);
        prop_assert_eq!(set.classify_by_fill(&grid), FillOutcome::HasClosedArea);
        prop_assert_eq!(set.classification(&grid), Classification::Closed);
    }

    #[test]
    fn test_lines_trace_and_fill_agree((x, y, length, drop) in line_params()) {
        let grid = line_grid(x, y, length, drop);
        let mut set = grid.all_boundaries();
        prop_assert_eq!(set.classify_by_trace(&grid), Classification::Open);
        prop_assert_eq!(set.classify_by_fill(&grid), FillOutcome::Open);
        prop_assert_eq!(set.classification(&grid), Classification::Open);
    }

    #[test]
    fn test_classification_is_stable((x, y, w, h) in rect_params()) {
        let grid = rect_grid(x, y, w, h);
        let mut set = grid.all_boundaries();
        let first = set.classification(&grid);
        prop_assert_eq!(set.classification(&grid), first);
        prop_assert_eq!(grid.all_boundaries().classification(&grid), first);
    }

    #[test]
    fn test_translate_round_trip(
        cells in prop::collection::vec((-20i32..20, -20i32..20), 0..40),
        dx in -15i32..15,
        dy in -15i32..15,
    ) {
        let original: CellSet = cells.iter().map(|&(x, y)| Cell::new(x, y)).collect();
        let mut moved = original.clone();
        moved.translate(dx, dy);
        moved.translate(-dx, -dy);
        prop_assert_eq!(moved, original);
    }

    #[test]
    fn test_single_cell_is_open(
        x in 0i32..WIDTH as i32,
        y in 0i32..HEIGHT as i32,
        c in prop::sample::select(vec!['-', '|', '+', '/', '\\', ':', '=', 'a', ' ']),
    ) {
        let mut rows = blank_rows();
        rows[y as usize][x as usize] = c;
        let grid = TextGrid::from_rows(rows);
        let mut set: CellSet = [Cell::new(x, y)].into_iter().collect();
        prop_assert_eq!(set.classification(&grid), Classification::Open);
    }

    #[test]
    fn test_distinct_boundaries_reunite(
        (x, y, w, h) in (0usize..4, 0usize..4, 2usize..8, 2usize..6),
        (x2, w2) in (13usize..16, 2usize..8),
    ) {
        let mut rows = blank_rows();
        draw_rect(&mut rows, x, y, w, h);
        draw_rect(&mut rows, x2, y, w2, h);
        let grid = TextGrid::from_rows(rows);
        let set = grid.all_boundaries();

        let parts = set.break_into_distinct_boundaries(&grid);
        prop_assert_eq!(parts.len(), 2);
        let mut union = CellSet::new();
        for part in &parts {
            union.add_all(part);
        }
        prop_assert_eq!(union, set);
    }

    #[test]
    fn test_obsolete_removal_is_idempotent(
        (left, right, h) in (3usize..8, 3usize..8, 3usize..7),
    ) {
        let mut rows = blank_rows();
        draw_rect(&mut rows, 0, 0, left + right - 1, h);
        for dy in 0..h {
            rows[dy][left - 1] = '|';
        }
        rows[0][left - 1] = '+';
        rows[h - 1][left - 1] = '+';
        let grid = TextGrid::from_rows(rows);

        let mut diagnostics = Diagnostics::new();
        let mut sets = find_boundary_sets(&grid, &mut diagnostics);
        prop_assert_eq!(sets.closed.len(), 2);

        let once = sets.closed.clone();
        remove_obsolete_shapes(&grid, &mut sets.closed);
        prop_assert_eq!(&sets.closed, &once);
        prop_assert!(diagnostics.is_empty());
    }
}
