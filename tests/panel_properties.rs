//! Property tests for board panel synthesis.
//!
//! Invariants covered:
//! - Hole mask and panels together cover every grid cell exactly once.
//! - Panels never overlap each other.
//! - Reordering holes never changes the emitted panel sequence.
//! - The number of panels never exceeds the number of open cells.
//! - Grid → world → grid is the identity for every in-bounds cell.
//! - Holes with edges on or a hair off cell boundaries either build cleanly
//!   (each covering at least one cell) or are rejected, never panic.

use glam::{Vec2, Vec3};
use marble_maze::sim::{
    BoardAxis, BoardDefinition, BoardError, BoardGeometry, BuiltBoard, Course, FinishZone, GridCell, Hole,
    OccupancyGrid, StartLine, mask_holes,
};
use proptest::prelude::*;

fn definition(width: f32, height: f32, holes: Vec<Hole>) -> BoardDefinition {
    BoardDefinition {
        id: "prop".into(),
        name: "Property".into(),
        width,
        height,
        resolution: 10.0,
        holes,
        bars: Vec::new(),
        edges: Vec::new(),
        course: Course {
            start: Vec3::new(0.0, 0.1, 0.0),
            start_line: StartLine::new(BoardAxis::Z, 0.1),
            finish: FinishZone::new(Vec2::new(-width / 2.0, -height / 2.0), Vec2::ZERO),
            fall_depth: -1.0,
        },
        gravity_scale: 9.8,
    }
}

/// Board size in tenths of a unit, so grid dimensions are exact
fn dimension() -> impl Strategy<Value = f32> {
    (10u32..60).prop_map(|n| n as f32 / 10.0)
}

fn board_strategy() -> impl Strategy<Value = BoardDefinition> {
    (dimension(), dimension())
        .prop_flat_map(|(w, h)| {
            let hole = (0.05f32..0.5, 0.0f32..1.0, 0.0f32..1.0).prop_map(move |(r, fx, fz)| {
                let r = r.min(w / 2.0).min(h / 2.0);
                Hole::new(r + fx * (w - 2.0 * r), r + fz * (h - 2.0 * r), r)
            });
            (Just(w), Just(h), prop::collection::vec(hole, 0..12))
        })
        .prop_map(|(w, h, holes)| definition(w, h, holes))
}

/// Holes whose square edges sit on cell boundaries, nudged by less than the
/// snap band or just past it. Some of them leave the board.
fn boundary_board_strategy() -> impl Strategy<Value = BoardDefinition> {
    let jitter = || prop::sample::select(vec![-5e-4f32, -5e-5, 0.0, 5e-5, 5e-4]);
    (dimension(), dimension())
        .prop_flat_map(move |(w, h)| {
            let (cols, rows) = ((w * 10.0).round() as u32, (h * 10.0).round() as u32);
            let hole = (0..=cols, 0..=rows, 0u32..6, jitter(), jitter(), jitter()).prop_map(
                |(kx, kz, side, jx, jz, jr)| {
                    let half = side as f32 / 20.0;
                    Hole::new(
                        kx as f32 / 10.0 + half + jx,
                        kz as f32 / 10.0 + half + jz,
                        (half + jr).max(1e-6),
                    )
                },
            );
            (Just(w), Just(h), prop::collection::vec(hole, 1..6))
        })
        .prop_map(|(w, h, holes)| definition(w, h, holes))
}

/// Per-cell coverage: (masked by a hole, number of panels covering it)
fn coverage(def: &BoardDefinition, board: &BuiltBoard) -> Vec<(bool, u32)> {
    let geometry = board.geometry;
    let cols = geometry.cols();
    let mut cells = vec![(false, 0u32); geometry.rows() * cols];
    for hole in &def.holes {
        for cell in hole.cell_rect(&geometry).cells() {
            cells[cell.row * cols + cell.col].0 = true;
        }
    }
    for rect in board.panel_rects() {
        for cell in rect.cells() {
            cells[cell.row * cols + cell.col].1 += 1;
        }
    }
    cells
}

#[test]
fn single_center_hole_on_four_unit_board() {
    let def = definition(4.0, 4.0, vec![Hole::new(2.0, 2.0, 0.4)]);
    let board = def.build().unwrap();

    assert_eq!((board.geometry.rows(), board.geometry.cols()), (40, 40));
    assert_eq!(board.panels.len(), 4);
    for (i, a) in board.panels.iter().enumerate() {
        for b in &board.panels[i + 1..] {
            assert!(!a.cells.overlaps(&b.cells));
        }
    }
    let total = board.panel_area() + board.hole_area();
    assert!((total - 16.0).abs() < 1e-3, "total area {total}");
}

#[test]
fn empty_board_is_one_full_panel() {
    let board = definition(4.0, 4.0, Vec::new()).build().unwrap();
    assert_eq!(board.panels.len(), 1);
    assert_eq!(board.panels[0].cells.area(), 1600);
    assert!((board.panels[0].min - Vec2::new(-2.0, -2.0)).length() < 1e-5);
    assert!((board.panels[0].max - Vec2::new(2.0, 2.0)).length() < 1e-5);
}

#[test]
fn fully_masked_board_has_no_panels() {
    let board = definition(1.0, 1.0, vec![Hole::new(0.5, 0.5, 0.5)]).build().unwrap();
    assert!(board.panels.is_empty());
    assert_eq!(board.hole_cells, 100);
}

proptest! {
    #[test]
    fn panels_and_holes_tile_the_grid_exactly(def in board_strategy()) {
        let board = def.build().unwrap();
        for (i, (masked, panels)) in coverage(&def, &board).into_iter().enumerate() {
            if masked {
                prop_assert_eq!(panels, 0, "cell {} is a hole but covered by a panel", i);
            } else {
                prop_assert_eq!(panels, 1, "cell {} covered {} times", i, panels);
            }
        }
    }

    #[test]
    fn boundary_holes_build_or_are_rejected(def in boundary_board_strategy()) {
        match def.build() {
            Ok(board) => {
                let geometry = board.geometry;
                for hole in &def.holes {
                    prop_assert!(!hole.cell_rect(&geometry).is_empty(), "{:?} masks nothing", hole);
                }
                for (i, (masked, panels)) in coverage(&def, &board).into_iter().enumerate() {
                    prop_assert_eq!(panels, u32::from(!masked), "cell {} covered {} times", i, panels);
                }
            }
            Err(e) => prop_assert!(
                matches!(e, BoardError::HoleOutOfBounds { .. }),
                "unexpected error {}", e
            ),
        }
    }

    #[test]
    fn panels_are_pairwise_disjoint(def in board_strategy()) {
        let board = def.build().unwrap();
        let rects: Vec<_> = board.panel_rects().collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                prop_assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn hole_order_does_not_change_output(
        (def, shuffled) in board_strategy().prop_flat_map(|def| {
            let holes = def.holes.clone();
            (Just(def), Just(holes).prop_shuffle())
        })
    ) {
        let mut reordered = def.clone();
        reordered.holes = shuffled;
        let a = def.build().unwrap();
        let b = reordered.build().unwrap();
        prop_assert_eq!(a.panels, b.panels);
    }

    #[test]
    fn panel_count_bounded_by_open_cells(def in board_strategy()) {
        let geometry = def.geometry();
        let mut grid = OccupancyGrid::new(geometry.rows(), geometry.cols());
        mask_holes(&mut grid, &geometry, &def.holes);
        let open = grid.open_count();

        let board = def.build().unwrap();
        prop_assert!(board.panels.len() <= open);
        let panel_cells: usize = board.panel_rects().map(|r| r.area()).sum();
        prop_assert_eq!(panel_cells, open);
    }

    #[test]
    fn grid_world_round_trip(w in dimension(), h in dimension(), fr in 0.0f32..1.0, fc in 0.0f32..1.0) {
        let geometry = BoardGeometry::new(w, h, 10.0);
        let row = ((geometry.rows() as f32 * fr) as usize).min(geometry.rows() - 1);
        let col = ((geometry.cols() as f32 * fc) as usize).min(geometry.cols() - 1);
        let cell = GridCell::new(row, col);
        prop_assert_eq!(geometry.world_to_grid(geometry.grid_to_world(cell)), Some(cell));
    }
}
