//! Greedy scanline rectangle packing
//!
//! Covers every open cell of an [`OccupancyGrid`] with non-overlapping
//! rectangles. Each rectangle starts at the first open cell in row-major
//! order, takes the widest run available on that row, then extends down for
//! as long as the whole column range stays open.
//!
//! Widest-first is not a minimum rectangle cover, but it is deterministic and
//! linear in the number of cells touched per panel.

use super::grid::{GridCell, GridRect, OccupancyGrid};

/// Iterator producing panel rectangles until the grid is covered
///
/// Owns the grid for the duration of the build; recover it with
/// [`PanelPacker::into_grid`] once exhausted.
#[derive(Debug, Clone)]
pub struct PanelPacker {
    grid: OccupancyGrid,
    /// Every cell before this one in scan order is already taken
    cursor: GridCell,
}

impl PanelPacker {
    pub fn new(grid: OccupancyGrid) -> Self {
        Self {
            grid,
            cursor: GridCell::new(0, 0),
        }
    }

    /// Current grid state
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// Give back the (by now fully covered, if exhausted) grid
    pub fn into_grid(self) -> OccupancyGrid {
        self.grid
    }

    /// First open cell in row-major order
    pub fn find_opening(&self) -> Option<GridCell> {
        self.grid.next_open_from(self.cursor)
    }

    /// Largest widest-first rectangle anchored at `opening`
    ///
    /// `opening` must be open.
    pub fn grow_from(&self, opening: GridCell) -> GridRect {
        let grid = &self.grid;

        let mut col_end = opening.col;
        while col_end < grid.cols() && !grid.is_taken(opening.row, col_end) {
            col_end += 1;
        }

        let mut row_end = opening.row + 1;
        while row_end < grid.rows() && !grid.any_taken_in_row(row_end, opening.col, col_end) {
            row_end += 1;
        }

        GridRect::new(opening.row, row_end, opening.col, col_end)
    }

    /// Find, grow and commit the next panel
    pub fn next_panel(&mut self) -> Option<GridRect> {
        let opening = self.find_opening()?;
        let rect = self.grow_from(opening);
        let newly = self.grid.fill(rect);
        debug_assert_eq!(newly, rect.area(), "packed rect overlapped covered cells");
        self.cursor = opening;
        Some(rect)
    }
}

impl Iterator for PanelPacker {
    type Item = GridRect;

    fn next(&mut self) -> Option<GridRect> {
        self.next_panel()
    }
}

/// Pack every open cell of `grid`, returning the panels and the covered grid
pub fn pack(grid: OccupancyGrid) -> (Vec<GridRect>, OccupancyGrid) {
    let mut packer = PanelPacker::new(grid);
    let panels: Vec<GridRect> = packer.by_ref().collect();
    (panels, packer.into_grid())
}
