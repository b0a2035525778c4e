//! Built-in board variants
//!
//! Every board is literal data run through the same build pass. Hole
//! centers are given from the board's upper-left corner; bars, edges and the
//! course use world coordinates (board center at the origin).

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::sim::{
    Bar, BoardAxis, BoardDefinition, BoardError, Course, FinishZone, Hole, StartLine,
};

/// Ids of the built-in boards, in menu order
pub const BOARD_IDS: [&str; 3] = ["classic", "bars", "gauntlet"];

/// Default board id
pub const DEFAULT_BOARD: &str = "classic";

/// Spawn near the far edge, finish strip along the near edge
fn course(height: f32) -> Course {
    Course {
        start: Vec3::new(0.0, MARBLE_RADIUS, -height / 2.0 + 0.4),
        start_line: StartLine::new(BoardAxis::Z, 0.3),
        finish: FinishZone::new(
            Vec2::new(-0.6, height / 2.0 - 0.5),
            Vec2::new(0.6, height / 2.0),
        ),
        fall_depth: FALL_DEPTH,
    }
}

fn holes(table: &[(f32, f32, f32)]) -> Vec<Hole> {
    table.iter().map(|&(x, z, r)| Hole::new(x, z, r)).collect()
}

fn bars(table: &[((f32, f32), (f32, f32))], radius: f32) -> Vec<Bar> {
    table
        .iter()
        .map(|&((x0, z0), (x1, z1))| Bar::new(Vec2::new(x0, z0), Vec2::new(x1, z1), radius))
        .collect()
}

/// Open board, holes only
pub fn classic() -> BoardDefinition {
    let (width, height) = (4.0, 6.0);
    BoardDefinition {
        id: "classic".into(),
        name: "Classic".into(),
        width,
        height,
        resolution: BOARD_RESOLUTION,
        holes: holes(&[
            (1.0, 1.5, 0.25),
            (3.0, 1.5, 0.25),
            (2.0, 2.6, 0.3),
            (0.7, 3.6, 0.25),
            (3.3, 3.6, 0.25),
            (2.0, 4.5, 0.3),
            (1.2, 5.2, 0.2),
        ]),
        bars: Vec::new(),
        edges: BoardDefinition::perimeter_edges(width, height),
        course: course(height),
        gravity_scale: DEFAULT_GRAVITY_SCALE,
    }
}

/// Holes plus movable bars that force a zig-zag line
pub fn bars_board() -> BoardDefinition {
    let (width, height) = (5.0, 7.0);
    BoardDefinition {
        id: "bars".into(),
        name: "Bars".into(),
        width,
        height,
        resolution: BOARD_RESOLUTION,
        holes: holes(&[
            (1.0, 1.5, 0.3),
            (4.0, 2.0, 0.3),
            (2.5, 3.5, 0.35),
            (1.0, 5.0, 0.3),
            (4.0, 5.5, 0.3),
        ]),
        bars: bars(
            &[
                ((-2.4, -1.5), (0.5, -1.5)),
                ((-0.5, 0.8), (2.4, 0.8)),
                ((-2.4, 2.2), (0.8, 2.2)),
            ],
            0.05,
        ),
        edges: BoardDefinition::perimeter_edges(width, height),
        course: course(height),
        gravity_scale: 12.0,
    }
}

/// Large, dense board with strong gravity
pub fn gauntlet() -> BoardDefinition {
    let (width, height) = (6.0, 8.0);
    BoardDefinition {
        id: "gauntlet".into(),
        name: "Gauntlet".into(),
        width,
        height,
        resolution: BOARD_RESOLUTION,
        holes: holes(&[
            (1.0, 1.4, 0.3),
            (3.0, 1.6, 0.25),
            (5.0, 1.4, 0.3),
            (2.0, 2.8, 0.3),
            (4.2, 3.0, 0.35),
            (0.8, 4.0, 0.25),
            (3.0, 4.3, 0.3),
            (5.2, 4.6, 0.3),
            (1.8, 5.6, 0.35),
            (4.0, 6.0, 0.3),
            (0.7, 6.8, 0.25),
            (5.3, 6.9, 0.25),
        ]),
        bars: bars(
            &[
                ((-3.0, -2.0), (-0.8, -2.0)),
                ((0.8, -0.6), (3.0, -0.6)),
                ((-3.0, 1.0), (-0.5, 1.0)),
                ((0.5, 2.6), (3.0, 2.6)),
            ],
            0.06,
        ),
        edges: BoardDefinition::perimeter_edges(width, height),
        course: course(height),
        gravity_scale: MAX_GRAVITY_SCALE,
    }
}

/// All built-in boards, in menu order
pub fn all() -> Vec<BoardDefinition> {
    vec![classic(), bars_board(), gauntlet()]
}

/// Look up a built-in board by id
pub fn by_id(id: &str) -> Result<BoardDefinition, BoardError> {
    match id {
        "classic" => Ok(classic()),
        "bars" => Ok(bars_board()),
        "gauntlet" => Ok(gauntlet()),
        other => Err(BoardError::UnknownBoard(other.to_string())),
    }
}

/// Seeded random board for practice runs
///
/// Holes stay clear of the start and finish strips (1 unit at each end).
pub fn practice(seed: u64, hole_count: usize) -> BoardDefinition {
    let (width, height) = (4.0_f32, 6.0_f32);
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut placed = Vec::with_capacity(hole_count);

    for _ in 0..hole_count {
        let radius = rng.random_range(0.15..0.35);
        let x = rng.random_range(radius..width - radius);
        let z = rng.random_range(1.0 + radius..height - 1.0 - radius);
        placed.push(Hole::new(x, z, radius));
    }
    log::debug!("Practice board seed {seed}: {} holes", placed.len());

    BoardDefinition {
        id: format!("practice-{seed}"),
        name: "Practice".into(),
        width,
        height,
        resolution: BOARD_RESOLUTION,
        holes: placed,
        bars: Vec::new(),
        edges: BoardDefinition::perimeter_edges(width, height),
        course: course(height),
        gravity_scale: DEFAULT_GRAVITY_SCALE,
    }
}
