//! Declarative board definitions and the panel build pass
//!
//! A [`BoardDefinition`] is plain data: dimensions, holes, bars, edges and
//! the race course. [`BoardDefinition::build`] validates it, rasterizes the
//! holes, packs the remaining surface into panels and returns a
//! [`BuiltBoard`] ready to hand to physics.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::{BoardGeometry, Panel};
use super::grid::{GridRect, OccupancyGrid};
use super::mask::{Hole, mask_holes};
use super::packer::pack;
use super::timer::Course;
use crate::consts::*;
use crate::physics::{BodyKind, BodyRole, BodySpec, ColliderMaterial, ColliderShape, PhysicsWorld};

/// Cylindrical obstacle lying on the board between two world (x, z) points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub start: Vec2,
    pub end: Vec2,
    pub radius: f32,
}

impl Bar {
    pub fn new(start: Vec2, end: Vec2, radius: f32) -> Self {
        Self { start, end, radius }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    pub fn body(&self, index: usize) -> BodySpec {
        let mid = (self.start + self.end) * 0.5;
        let dir = self.end - self.start;
        let axis = Vec3::new(dir.x, 0.0, dir.y).normalize_or(Vec3::X);
        BodySpec {
            role: BodyRole::Bar(index),
            kind: BodyKind::Kinematic,
            shape: ColliderShape::Cylinder {
                half_height: self.length() / 2.0,
                radius: self.radius,
            },
            position: Vec3::new(mid.x, self.radius, mid.y),
            rotation: Quat::from_rotation_arc(Vec3::Y, axis),
            material: ColliderMaterial::default(),
        }
    }
}

/// Box wall between two world (x, z) points, standing on the board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub start: Vec2,
    pub end: Vec2,
    pub height: f32,
    pub thickness: f32,
}

impl Edge {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            height: EDGE_HEIGHT,
            thickness: EDGE_THICKNESS,
        }
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    pub fn body(&self, index: usize) -> BodySpec {
        let mid = (self.start + self.end) * 0.5;
        let dir = self.end - self.start;
        BodySpec {
            role: BodyRole::Edge(index),
            kind: BodyKind::Fixed,
            shape: ColliderShape::Cuboid {
                half_extents: Vec3::new(self.length() / 2.0, self.height / 2.0, self.thickness / 2.0),
            },
            position: Vec3::new(mid.x, self.height / 2.0, mid.y),
            rotation: Quat::from_rotation_y((-dir.y).atan2(dir.x)),
            material: ColliderMaterial::default(),
        }
    }
}

/// Construction-time configuration errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BoardError {
    #[error("board {id}: dimensions {width}x{height} at resolution {resolution} are not positive")]
    InvalidDimensions {
        id: String,
        width: f32,
        height: f32,
        resolution: f32,
    },

    #[error("board {id}: hole {index} at ({x}, {z}) r={radius} does not fit on the board")]
    HoleOutOfBounds {
        id: String,
        index: usize,
        x: f32,
        z: f32,
        radius: f32,
    },

    #[error("board {id}: bar {index} leaves the board or has no radius")]
    BarOutOfBounds { id: String, index: usize },

    #[error("board {id}: edge {index} leaves the board")]
    EdgeOutOfBounds { id: String, index: usize },

    #[error("board {id}: {what} is not on the board")]
    CourseOutOfBounds { id: String, what: &'static str },

    #[error("unknown board: {0}")]
    UnknownBoard(String),

    #[error("invalid board JSON: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        BoardError::Parse(err.to_string())
    }
}

/// Everything needed to build one board variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardDefinition {
    pub id: String,
    pub name: String,
    pub width: f32,
    pub height: f32,
    #[serde(default = "default_resolution")]
    pub resolution: f32,
    #[serde(default)]
    pub holes: Vec<Hole>,
    #[serde(default)]
    pub bars: Vec<Bar>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    pub course: Course,
    /// Gravity magnitude for a fully tilted device
    #[serde(default = "default_gravity_scale")]
    pub gravity_scale: f32,
}

fn default_resolution() -> f32 {
    BOARD_RESOLUTION
}

fn default_gravity_scale() -> f32 {
    DEFAULT_GRAVITY_SCALE
}

impl BoardDefinition {
    pub fn geometry(&self) -> BoardGeometry {
        BoardGeometry::new(self.width, self.height, self.resolution)
    }

    /// Walls along all four sides of the board
    pub fn perimeter_edges(width: f32, height: f32) -> Vec<Edge> {
        let (hw, hh) = (width / 2.0, height / 2.0);
        let corners = [
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ];
        (0..4)
            .map(|i| Edge::new(corners[i], corners[(i + 1) % 4]))
            .collect()
    }

    pub fn from_json(json: &str) -> Result<Self, BoardError> {
        let board: BoardDefinition = serde_json::from_str(json)?;
        board.validate()?;
        Ok(board)
    }

    /// Reject authoring mistakes before any geometry is built
    pub fn validate(&self) -> Result<(), BoardError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.width) || !positive(self.height) || !positive(self.resolution) {
            return Err(BoardError::InvalidDimensions {
                id: self.id.clone(),
                width: self.width,
                height: self.height,
                resolution: self.resolution,
            });
        }

        let geometry = self.geometry();
        let (rows, cols) = (geometry.rows() as i64, geometry.cols() as i64);

        // Checked on the grid the hole is stamped onto, snapping included
        for (index, hole) in self.holes.iter().enumerate() {
            let fits = positive(hole.radius) && hole.center.is_finite() && {
                let (row_start, row_end, col_start, col_end) = hole.cell_span(&geometry);
                row_start >= 0 && col_start >= 0 && row_end <= rows && col_end <= cols
            };
            if !fits {
                return Err(BoardError::HoleOutOfBounds {
                    id: self.id.clone(),
                    index,
                    x: hole.center.x,
                    z: hole.center.y,
                    radius: hole.radius,
                });
            }
        }

        for (index, bar) in self.bars.iter().enumerate() {
            if !positive(bar.radius)
                || !geometry.contains_world(bar.start)
                || !geometry.contains_world(bar.end)
            {
                return Err(BoardError::BarOutOfBounds {
                    id: self.id.clone(),
                    index,
                });
            }
        }

        for (index, edge) in self.edges.iter().enumerate() {
            let grown = BoardGeometry::new(
                self.width + edge.thickness * 2.0,
                self.height + edge.thickness * 2.0,
                self.resolution,
            );
            if !grown.contains_world(edge.start) || !grown.contains_world(edge.end) {
                return Err(BoardError::EdgeOutOfBounds {
                    id: self.id.clone(),
                    index,
                });
            }
        }

        let course = &self.course;
        let on_board = |what: &'static str, p: Vec2| {
            if geometry.contains_world(p) {
                Ok(())
            } else {
                Err(BoardError::CourseOutOfBounds {
                    id: self.id.clone(),
                    what,
                })
            }
        };
        on_board("start position", Vec2::new(course.start.x, course.start.z))?;
        on_board("finish zone", course.finish.min)?;
        on_board("finish zone", course.finish.max)?;

        Ok(())
    }

    /// Validate, mask holes, pack panels
    pub fn build(&self) -> Result<BuiltBoard, BoardError> {
        self.validate()?;

        let geometry = self.geometry();
        let mut grid = OccupancyGrid::new(geometry.rows(), geometry.cols());
        let hole_cells = mask_holes(&mut grid, &geometry, &self.holes);
        let (rects, grid) = pack(grid);
        debug_assert!(grid.is_full());

        let panels: Vec<Panel> = rects.into_iter().map(|r| geometry.rect_to_panel(r)).collect();

        log::info!(
            "Built board '{}': {}x{} grid, {} holes ({} cells), {} panels, {} bars, {} edges",
            self.id,
            geometry.rows(),
            geometry.cols(),
            self.holes.len(),
            hole_cells,
            panels.len(),
            self.bars.len(),
            self.edges.len()
        );

        Ok(BuiltBoard {
            id: self.id.clone(),
            geometry,
            panels,
            bars: self.bars.clone(),
            edges: self.edges.clone(),
            hole_cells,
            course: self.course,
            gravity_scale: self.gravity_scale,
        })
    }
}

/// Output of one build pass; never mutated afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltBoard {
    pub id: String,
    pub geometry: BoardGeometry,
    pub panels: Vec<Panel>,
    pub bars: Vec<Bar>,
    pub edges: Vec<Edge>,
    /// Grid cells covered by hole masks
    pub hole_cells: usize,
    pub course: Course,
    pub gravity_scale: f32,
}

impl BuiltBoard {
    /// Panel rectangles in grid space
    pub fn panel_rects(&self) -> impl Iterator<Item = GridRect> + '_ {
        self.panels.iter().map(|p| p.cells)
    }

    /// Summed panel area in world units²
    pub fn panel_area(&self) -> f32 {
        self.panels.iter().map(Panel::area).sum()
    }

    /// Hole mask area in world units²
    pub fn hole_area(&self) -> f32 {
        self.hole_cells as f32 * self.geometry.cell_area()
    }

    /// Collision bodies for panels, bars and edges, in that order
    pub fn bodies(&self, panel_thickness: f32) -> Vec<BodySpec> {
        let panels = self.panels.iter().enumerate().map(|(i, panel)| BodySpec {
            role: BodyRole::Panel(i),
            kind: BodyKind::Fixed,
            shape: ColliderShape::Cuboid {
                half_extents: panel.slab_half_extents(panel_thickness),
            },
            position: panel.slab_center(panel_thickness),
            rotation: Quat::IDENTITY,
            material: ColliderMaterial::default(),
        });
        let bars = self.bars.iter().enumerate().map(|(i, bar)| bar.body(i));
        let edges = self.edges.iter().enumerate().map(|(i, edge)| edge.body(i));
        panels.chain(bars).chain(edges).collect()
    }

    /// Create every body in the physics world
    pub fn install<W: PhysicsWorld>(&self, world: &mut W, panel_thickness: f32) -> Vec<W::Handle> {
        let bodies = self.bodies(panel_thickness);
        log::debug!("Installing {} bodies for board '{}'", bodies.len(), self.id);
        bodies.iter().map(|body| world.add_body(body)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::RecordingWorld;
    use crate::sim::timer::{BoardAxis, FinishZone, StartLine};

    fn definition(width: f32, height: f32, holes: Vec<Hole>) -> BoardDefinition {
        BoardDefinition {
            id: "test".into(),
            name: "Test".into(),
            width,
            height,
            resolution: 10.0,
            holes,
            bars: Vec::new(),
            edges: BoardDefinition::perimeter_edges(width, height),
            course: Course {
                start: Vec3::new(-width / 2.0 + 0.2, 0.1, -height / 2.0 + 0.2),
                start_line: StartLine::new(BoardAxis::Z, 0.3),
                finish: FinishZone::new(
                    Vec2::new(width / 2.0 - 0.4, height / 2.0 - 0.4),
                    Vec2::new(width / 2.0, height / 2.0),
                ),
                fall_depth: -1.0,
            },
            gravity_scale: 9.8,
        }
    }

    #[test]
    fn test_single_center_hole_four_panels() {
        let board = definition(4.0, 4.0, vec![Hole::new(2.0, 2.0, 0.4)]).build().unwrap();
        assert_eq!(board.panels.len(), 4);
        assert_eq!(board.hole_cells, 64);
        let total = board.panel_area() + board.hole_area();
        assert!((total - 16.0).abs() < 1e-3, "total area {total}");
    }

    #[test]
    fn test_empty_board_single_panel() {
        let board = definition(3.0, 2.0, Vec::new()).build().unwrap();
        assert_eq!(board.panels.len(), 1);
        let panel = board.panels[0];
        assert_eq!(panel.cells, GridRect::new(0, 20, 0, 30));
        assert!((panel.min - Vec2::new(-1.5, -1.0)).length() < 1e-5);
        assert!((panel.max - Vec2::new(1.5, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_hole_order_does_not_change_panels() {
        let holes = vec![
            Hole::new(0.5, 0.5, 0.2),
            Hole::new(2.5, 1.0, 0.3),
            Hole::new(1.5, 3.0, 0.25),
        ];
        let mut reversed = holes.clone();
        reversed.reverse();
        let a = definition(4.0, 4.0, holes).build().unwrap();
        let b = definition(4.0, 4.0, reversed).build().unwrap();
        assert_eq!(a.panels, b.panels);
    }

    #[test]
    fn test_hole_off_board_rejected() {
        let err = definition(4.0, 4.0, vec![Hole::new(3.9, 2.0, 0.3)]).build().unwrap_err();
        assert!(matches!(err, BoardError::HoleOutOfBounds { index: 0, .. }));
    }

    #[test]
    fn test_hole_just_past_edge_rejected() {
        let def = definition(4.0, 4.0, vec![Hole::new(3.7, 2.0, 0.30005)]);
        assert!(matches!(def.validate(), Err(BoardError::HoleOutOfBounds { index: 0, .. })));
        assert!(matches!(def.build(), Err(BoardError::HoleOutOfBounds { .. })));
    }

    #[test]
    fn test_hole_flush_with_edge_accepted() {
        let board = definition(4.0, 4.0, vec![Hole::new(3.7, 2.0, 0.3)]).build().unwrap();
        assert_eq!(board.hole_cells, 36);
    }

    #[test]
    fn test_tiny_hole_masks_one_cell() {
        let board = definition(4.0, 4.0, vec![Hole::new(2.0, 2.0, 1e-6)]).build().unwrap();
        assert_eq!(board.hole_cells, 1);
        assert!(board.panels.len() > 1);
    }

    #[test]
    fn test_zero_radius_hole_rejected() {
        let err = definition(4.0, 4.0, vec![Hole::new(2.0, 2.0, 0.0)]).validate().unwrap_err();
        assert!(matches!(err, BoardError::HoleOutOfBounds { .. }));
    }

    #[test]
    fn test_bad_dimensions_rejected() {
        let err = definition(0.0, 4.0, Vec::new()).validate().unwrap_err();
        assert!(matches!(err, BoardError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_bar_off_board_rejected() {
        let mut def = definition(4.0, 4.0, Vec::new());
        def.bars.push(Bar::new(Vec2::new(0.0, 0.0), Vec2::new(2.5, 0.0), 0.05));
        assert_eq!(
            def.validate(),
            Err(BoardError::BarOutOfBounds {
                id: "test".into(),
                index: 0
            })
        );
    }

    #[test]
    fn test_finish_off_board_rejected() {
        let mut def = definition(4.0, 4.0, Vec::new());
        def.course.finish = FinishZone::new(Vec2::new(1.5, 1.5), Vec2::new(2.5, 2.5));
        assert!(matches!(def.validate(), Err(BoardError::CourseOutOfBounds { .. })));
    }

    #[test]
    fn test_install_pushes_every_body() {
        let mut def = definition(4.0, 4.0, vec![Hole::new(2.0, 2.0, 0.4)]);
        def.bars.push(Bar::new(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0), 0.05));
        let board = def.build().unwrap();

        let mut world = RecordingWorld::default();
        let handles = board.install(&mut world, 0.1);
        assert_eq!(handles.len(), 4 + 1 + 4);
        assert_eq!(world.bodies[4].role, BodyRole::Bar(0));
        assert_eq!(world.bodies[4].kind, BodyKind::Kinematic);
        assert!(matches!(world.bodies[8].role, BodyRole::Edge(3)));

        // Panel tops sit on the board surface
        for body in world.bodies.iter().take(4) {
            if let ColliderShape::Cuboid { half_extents } = body.shape {
                assert!((body.position.y + half_extents.y).abs() < 1e-6);
            } else {
                panic!("panel should be a cuboid");
            }
        }
    }

    #[test]
    fn test_bar_cylinder_lies_along_its_endpoints() {
        let bar = Bar::new(Vec2::new(-1.0, 0.5), Vec2::new(1.0, 0.5), 0.05);
        let body = bar.body(0);
        let axis = body.rotation * Vec3::Y;
        assert!((axis - Vec3::X).length() < 1e-5);
        assert!((body.position - Vec3::new(0.0, 0.05, 0.5)).length() < 1e-6);
    }

    #[test]
    fn test_edge_box_is_rotated_along_direction() {
        let edge = Edge::new(Vec2::new(1.0, -1.0), Vec2::new(1.0, 1.0));
        let body = edge.body(0);
        let along = body.rotation * Vec3::X;
        assert!((along - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_from_json_applies_defaults() {
        let json = r#"{
            "id": "mini",
            "name": "Mini",
            "width": 2.0,
            "height": 2.0,
            "holes": [{ "center": [1.0, 1.0], "radius": 0.2 }],
            "course": {
                "start": [-0.8, 0.1, -0.8],
                "start_line": { "axis": "Z", "offset": 0.2 },
                "finish": { "min": [0.6, 0.6], "max": [1.0, 1.0] },
                "fall_depth": -1.0
            }
        }"#;
        let def = BoardDefinition::from_json(json).unwrap();
        assert_eq!(def.resolution, BOARD_RESOLUTION);
        assert_eq!(def.gravity_scale, DEFAULT_GRAVITY_SCALE);
        assert_eq!(def.build().unwrap().panels.len(), 4);
    }

    #[test]
    fn test_from_json_reports_parse_errors() {
        assert!(matches!(
            BoardDefinition::from_json("{ not json"),
            Err(BoardError::Parse(_))
        ));
    }
}
