//! Hole stamping
//!
//! Each hole is approximated by its bounding square. The square over-covers
//! the circle at the corners; panels are invisible so the gap never shows.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{BoardGeometry, snap_ceil, snap_floor};
use super::grid::{GridRect, OccupancyGrid};

/// A circular hole in the board
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    /// Center relative to the board's upper-left corner (x across, z down)
    pub center: Vec2,
    pub radius: f32,
}

impl Hole {
    pub fn new(x: f32, z: f32, radius: f32) -> Self {
        Self {
            center: Vec2::new(x, z),
            radius,
        }
    }

    /// Lower corner of the bounding square (corner-relative)
    pub fn min(&self) -> Vec2 {
        self.center - Vec2::splat(self.radius)
    }

    /// Upper corner of the bounding square (corner-relative)
    pub fn max(&self) -> Vec2 {
        self.center + Vec2::splat(self.radius)
    }

    /// Unclamped `(row_start, row_end, col_start, col_end)` of the cells the
    /// bounding square touches. A hole with positive radius always spans at
    /// least one cell per axis, even when it is narrower than the snap band.
    pub fn cell_span(&self, geometry: &BoardGeometry) -> (i64, i64, i64, i64) {
        let r = geometry.resolution;
        let (min, max) = (self.min() * r, self.max() * r);
        let widen = self.radius > 0.0;
        let axis = |lo: f32, hi: f32| {
            let start = snap_floor(lo);
            let end = snap_ceil(hi);
            if widen && end <= start {
                (start, start + 1)
            } else {
                (start, end)
            }
        };
        let (row_start, row_end) = axis(min.y, max.y);
        let (col_start, col_end) = axis(min.x, max.x);
        (row_start, row_end, col_start, col_end)
    }

    /// Cells whose footprint intersects `[min, max)`
    pub fn cell_rect(&self, geometry: &BoardGeometry) -> GridRect {
        let (row_start, row_end, col_start, col_end) = self.cell_span(geometry);
        let clamp = |v: i64| v.max(0) as usize;
        GridRect::new(
            clamp(row_start),
            clamp(row_end),
            clamp(col_start),
            clamp(col_end),
        )
    }
}

/// Stamp one hole onto the grid. Returns the number of newly covered cells.
///
/// The hole must lie on the board; the grid panics otherwise.
pub fn mask_hole(grid: &mut OccupancyGrid, geometry: &BoardGeometry, hole: &Hole) -> usize {
    grid.fill(hole.cell_rect(geometry))
}

/// Stamp every hole. Returns the total number of covered cells.
pub fn mask_holes<'a>(
    grid: &mut OccupancyGrid,
    geometry: &BoardGeometry,
    holes: impl IntoIterator<Item = &'a Hole>,
) -> usize {
    holes
        .into_iter()
        .map(|hole| mask_hole(grid, geometry, hole))
        .sum()
}
