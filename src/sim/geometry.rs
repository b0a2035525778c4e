//! Grid ↔ world coordinate mapping
//!
//! Grid space has its origin at the board's upper-left corner and counts
//! cells at a fixed resolution. World space is centered on the board, with
//! `x` across columns and `z` across rows; `y` is up and the board surface
//! sits at `y = 0`.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::grid::{GridCell, GridRect};

/// Scaled coordinates this close to an integer are treated as that integer
pub const SNAP_EPSILON: f32 = 1e-4;

/// `floor` that absorbs float noise just below an integer
#[inline]
pub fn snap_floor(value: f32) -> i64 {
    let nearest = value.round();
    if (value - nearest).abs() < SNAP_EPSILON {
        nearest as i64
    } else {
        value.floor() as i64
    }
}

/// `ceil` that absorbs float noise just above an integer
#[inline]
pub fn snap_ceil(value: f32) -> i64 {
    let nearest = value.round();
    if (value - nearest).abs() < SNAP_EPSILON {
        nearest as i64
    } else {
        value.ceil() as i64
    }
}

/// Board dimensions and resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardGeometry {
    /// Board extent along x (world units)
    pub width: f32,
    /// Board extent along z (world units)
    pub height: f32,
    /// Grid cells per world unit
    pub resolution: f32,
}

impl BoardGeometry {
    pub fn new(width: f32, height: f32, resolution: f32) -> Self {
        Self {
            width,
            height,
            resolution,
        }
    }

    /// Grid columns: `ceil(width · resolution)`
    pub fn cols(&self) -> usize {
        snap_ceil(self.width * self.resolution).max(0) as usize
    }

    /// Grid rows: `ceil(height · resolution)`
    pub fn rows(&self) -> usize {
        snap_ceil(self.height * self.resolution).max(0) as usize
    }

    /// Side length of one cell in world units
    #[inline]
    pub fn cell_size(&self) -> f32 {
        1.0 / self.resolution
    }

    /// Area of one cell in world units²
    #[inline]
    pub fn cell_area(&self) -> f32 {
        self.cell_size() * self.cell_size()
    }

    /// World position (x, z) of a cell's upper-left corner
    pub fn grid_to_world(&self, cell: GridCell) -> Vec2 {
        Vec2::new(
            cell.col as f32 / self.resolution - self.width / 2.0,
            cell.row as f32 / self.resolution - self.height / 2.0,
        )
    }

    /// Cell containing the world point (x, z), or `None` when off the board
    pub fn world_to_grid(&self, world: Vec2) -> Option<GridCell> {
        let col = snap_floor((world.x + self.width / 2.0) * self.resolution);
        let row = snap_floor((world.y + self.height / 2.0) * self.resolution);
        self.checked_cell(row, col)
    }

    /// Cell containing a point given relative to the board's upper-left corner
    pub fn local_to_grid(&self, local: Vec2) -> Option<GridCell> {
        let col = snap_floor(local.x * self.resolution);
        let row = snap_floor(local.y * self.resolution);
        self.checked_cell(row, col)
    }

    /// Convert a world point to the board's corner-relative frame
    pub fn world_to_local(&self, world: Vec2) -> Vec2 {
        world + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Convert a corner-relative point to world space
    pub fn local_to_world(&self, local: Vec2) -> Vec2 {
        local - Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Is the world point (x, z) on the board (edges inclusive)?
    pub fn contains_world(&self, world: Vec2) -> bool {
        let half = Vec2::new(self.width / 2.0, self.height / 2.0);
        world.x >= -half.x && world.x <= half.x && world.y >= -half.y && world.y <= half.y
    }

    fn checked_cell(&self, row: i64, col: i64) -> Option<GridCell> {
        if row < 0 || col < 0 || row as usize >= self.rows() || col as usize >= self.cols() {
            return None;
        }
        Some(GridCell::new(row as usize, col as usize))
    }

    /// Translate a grid rectangle into a world-space panel
    pub fn rect_to_panel(&self, rect: GridRect) -> Panel {
        Panel {
            cells: rect,
            min: self.grid_to_world(GridCell::new(rect.row_start, rect.col_start)),
            max: self.grid_to_world(GridCell::new(rect.row_end, rect.col_end)),
        }
    }
}

/// A rectangular floor section synthesized to cover board area outside holes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Grid rectangle this panel was packed from
    pub cells: GridRect,
    /// World (x, z) corner with the smallest coordinates
    pub min: Vec2,
    /// World (x, z) corner with the largest coordinates
    pub max: Vec2,
}

impl Panel {
    /// Center on the board plane (x, z)
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Full extent (x, z)
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// World area in units²
    pub fn area(&self) -> f32 {
        let size = self.size();
        size.x * size.y
    }

    /// Center of the slab whose top face lies on the board surface
    pub fn slab_center(&self, thickness: f32) -> Vec3 {
        let c = self.center();
        Vec3::new(c.x, -thickness / 2.0, c.y)
    }

    /// Half extents of the slab with the given thickness
    pub fn slab_half_extents(&self, thickness: f32) -> Vec3 {
        let s = self.size();
        Vec3::new(s.x / 2.0, thickness / 2.0, s.y / 2.0)
    }
}
