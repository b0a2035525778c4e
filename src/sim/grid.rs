//! Occupancy raster over the board surface
//!
//! Row 0 is the board's far edge; rows grow toward the player and columns
//! grow to the right. A cell is "taken" once a hole or a panel covers it and
//! never becomes free again during a build.

use serde::{Deserialize, Serialize};

/// A single grid cell address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

impl GridCell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Half-open cell rectangle `[row_start, row_end) × [col_start, col_end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridRect {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl GridRect {
    pub fn new(row_start: usize, row_end: usize, col_start: usize, col_end: usize) -> Self {
        Self {
            row_start,
            row_end,
            col_start,
            col_end,
        }
    }

    /// Upper-left corner cell
    pub fn origin(&self) -> GridCell {
        GridCell::new(self.row_start, self.col_start)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.row_end.saturating_sub(self.row_start)
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.col_end.saturating_sub(self.col_start)
    }

    /// Number of cells covered
    #[inline]
    pub fn area(&self) -> usize {
        self.rows() * self.cols()
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.row >= self.row_start
            && cell.row < self.row_end
            && cell.col >= self.col_start
            && cell.col < self.col_end
    }

    /// True if the two rectangles share at least one cell
    pub fn overlaps(&self, other: &GridRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.row_start < other.row_end
            && other.row_start < self.row_end
            && self.col_start < other.col_end
            && other.col_start < self.col_end
    }

    /// Iterate all cells in row-major order
    pub fn cells(self) -> impl Iterator<Item = GridCell> {
        let cols = self.col_start..self.col_end;
        (self.row_start..self.row_end)
            .flat_map(move |row| cols.clone().map(move |col| GridCell::new(row, col)))
    }
}

/// Boolean raster marking covered cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
    taken: usize,
}

impl OccupancyGrid {
    /// Create a fully open grid
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
            taken: 0,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells marked taken
    #[inline]
    pub fn taken_count(&self) -> usize {
        self.taken
    }

    /// Number of cells still open
    #[inline]
    pub fn open_count(&self) -> usize {
        self.cells.len() - self.taken
    }

    pub fn is_full(&self) -> bool {
        self.open_count() == 0
    }

    /// Rectangle spanning the whole grid
    pub fn bounds(&self) -> GridRect {
        GridRect::new(0, self.rows, 0, self.cols)
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) outside {}x{} grid",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }

    /// Is the cell covered? Panics when outside the grid.
    #[inline]
    pub fn is_taken(&self, row: usize, col: usize) -> bool {
        self.cells[self.index(row, col)]
    }

    /// Mark one cell as covered. Returns true if it was open.
    pub fn take(&mut self, row: usize, col: usize) -> bool {
        let idx = self.index(row, col);
        let was_open = !self.cells[idx];
        if was_open {
            self.cells[idx] = true;
            self.taken += 1;
        }
        was_open
    }

    /// Mark every cell of `rect` as covered. Returns the number of newly taken cells.
    ///
    /// Panics if the rectangle reaches outside the grid.
    pub fn fill(&mut self, rect: GridRect) -> usize {
        if rect.is_empty() {
            return 0;
        }
        assert!(
            rect.row_end <= self.rows && rect.col_end <= self.cols,
            "rect {rect:?} outside {}x{} grid",
            self.rows,
            self.cols
        );
        let mut newly = 0;
        for row in rect.row_start..rect.row_end {
            let base = row * self.cols;
            for cell in &mut self.cells[base + rect.col_start..base + rect.col_end] {
                if !*cell {
                    *cell = true;
                    newly += 1;
                }
            }
        }
        self.taken += newly;
        newly
    }

    /// True if any cell of the column range on `row` is taken
    pub fn any_taken_in_row(&self, row: usize, col_start: usize, col_end: usize) -> bool {
        let base = self.index(row, col_start);
        self.cells[base..base + (col_end - col_start)].iter().any(|&c| c)
    }

    /// First open cell at or after `from` in row-major order
    pub fn next_open_from(&self, from: GridCell) -> Option<GridCell> {
        let start = from.row * self.cols + from.col;
        self.cells
            .get(start..)?
            .iter()
            .position(|&c| !c)
            .map(|offset| {
                let idx = start + offset;
                GridCell::new(idx / self.cols, idx % self.cols)
            })
    }
}
