//! Fixed-size square cell grid.
//!
//! Cells are addressed by a row-major index `i` in `[0, N*N)`, which maps to
//! `(x, y) = (i % N, i / N)`. `N` is chosen once per editor and never changes.

use crate::color::Color;

/// Content of one cell: a color or empty.
pub type Cell = Option<Color>;

/// Side length of the square grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize(usize);

impl GridSize {
    /// Create a grid size with `side` cells per row and column.
    pub const fn new(side: usize) -> Self {
        Self(side)
    }

    /// Cells per row (and per column).
    pub const fn side(&self) -> usize {
        self.0
    }

    /// Total number of cells, `N*N`.
    pub const fn cell_count(&self) -> usize {
        self.0 * self.0
    }

    /// Whether `index` addresses a cell of this grid.
    pub const fn contains(&self, index: usize) -> bool {
        index < self.cell_count()
    }

    /// Convert an index to `(x, y)`.
    pub const fn to_xy(&self, index: usize) -> (usize, usize) {
        (index % self.0, index / self.0)
    }

    /// Convert `(x, y)` to an index. The caller guarantees the coordinates are in range.
    pub const fn to_index(&self, x: usize, y: usize) -> usize {
        y * self.0 + x
    }

    /// Convert signed coordinates to an index, or `None` if they fall off the grid.
    pub fn checked_index(&self, x: i64, y: i64) -> Option<usize> {
        let side = self.0 as i64;
        if x >= 0 && x < side && y >= 0 && y < side {
            Some(self.to_index(x as usize, y as usize))
        } else {
            None
        }
    }

    /// Index of the cell `(dx, dy)` away from `index`, or `None` if that
    /// falls off the grid. Offsets of any magnitude are accepted.
    pub fn offset(&self, index: usize, dx: i64, dy: i64) -> Option<usize> {
        let (x, y) = self.to_xy(index);
        let x = (x as i64).checked_add(dx)?;
        let y = (y as i64).checked_add(dy)?;
        self.checked_index(x, y)
    }

    /// In-bounds 4-connected neighbors of `index` (left, right, up, down).
    pub fn neighbors4(&self, index: usize) -> impl Iterator<Item = usize> {
        let (x, y) = self.to_xy(index);
        let size = *self;
        [(-1i64, 0i64), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .filter_map(move |(dx, dy)| size.checked_index(x as i64 + dx, y as i64 + dy))
    }

    /// Indices on the outer ring: row 0, row N-1, column 0 and column N-1.
    ///
    /// Corner cells are listed once.
    pub fn border_indices(&self) -> Vec<usize> {
        let n = self.0;
        if n == 0 {
            return Vec::new();
        }
        let mut border = Vec::with_capacity(4 * n);
        for i in 0..self.cell_count() {
            let (x, y) = self.to_xy(i);
            if x == 0 || y == 0 || x == n - 1 || y == n - 1 {
                border.push(i);
            }
        }
        border
    }
}

/// An `N*N` array of cells. Its length never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridBuffer {
    size: GridSize,
    cells: Vec<Cell>,
}

impl GridBuffer {
    /// A blank buffer where every cell is empty.
    pub fn new(size: GridSize) -> Self {
        Self { size, cells: vec![None; size.cell_count()] }
    }

    /// Wrap an existing cell vector. Returns `None` if its length is not `N*N`.
    pub fn from_cells(size: GridSize, cells: Vec<Cell>) -> Option<Self> {
        if cells.len() == size.cell_count() {
            Some(Self { size, cells })
        } else {
            None
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Color at `index`. Panics if `index` is not a grid index.
    pub fn get(&self, index: usize) -> Cell {
        self.cells[index]
    }

    /// Overwrite the cell at `index`. Panics if `index` is not a grid index.
    pub fn set(&mut self, index: usize, cell: Cell) {
        self.cells[index] = cell;
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// True when no cell holds a color.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    /// Indices of cells holding a color.
    pub fn filled_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, c)| c.map(|_| i))
    }
}
