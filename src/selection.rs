//! Selected cells and the inside/outside masking rule for paint operations.

use crate::grid::GridSize;
use std::collections::BTreeSet;

/// Which side of the selection a stroke is allowed to touch.
///
/// Chosen from the stroke's first cell and fixed until the stroke ends, so a
/// drag never leaks across the selection edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskConstraint {
    /// Only cells that are members of the selection
    Inside,
    /// Only cells that are not members of the selection
    Outside,
}

/// Axis-aligned bounds of a set of cells, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl BoundingBox {
    pub fn width(&self) -> usize {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> usize {
        self.max_y - self.min_y + 1
    }
}

/// The set of "active" cells. Membership is independent of cell color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    cells: BTreeSet<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: impl IntoIterator<Item = usize>) -> Self {
        Self { cells: cells.into_iter().collect() }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.cells.contains(&index)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells.iter().copied()
    }

    pub fn cells(&self) -> &BTreeSet<usize> {
        &self.cells
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Replace the selection wholesale.
    pub fn replace(&mut self, cells: BTreeSet<usize>) {
        self.cells = cells;
    }

    /// Select every cell of the grid.
    pub fn select_all(&mut self, size: GridSize) {
        self.cells = (0..size.cell_count()).collect();
    }

    /// Determine the mask constraint for a stroke starting at `start`.
    ///
    /// Returns `None` when nothing is selected (editing is unconstrained).
    pub fn constraint_for(&self, start: usize) -> Option<MaskConstraint> {
        if self.cells.is_empty() {
            None
        } else if self.contains(start) {
            Some(MaskConstraint::Inside)
        } else {
            Some(MaskConstraint::Outside)
        }
    }

    /// Whether `index` may be touched under `constraint`.
    pub fn permits(&self, constraint: Option<MaskConstraint>, index: usize) -> bool {
        match constraint {
            None => true,
            Some(MaskConstraint::Inside) => self.contains(index),
            Some(MaskConstraint::Outside) => !self.contains(index),
        }
    }

    /// Members shifted by `(dx, dy)`, or `None` if any would leave the grid.
    pub fn translated(&self, size: GridSize, dx: i64, dy: i64) -> Option<BTreeSet<usize>> {
        self.cells.iter().map(|&i| size.offset(i, dx, dy)).collect()
    }

    /// Bounding box of the current members, recomputed on each call.
    pub fn bounding_box(&self, size: GridSize) -> Option<BoundingBox> {
        let mut iter = self.cells.iter().map(|&i| size.to_xy(i));
        let (x0, y0) = iter.next()?;
        let init = BoundingBox { min_x: x0, min_y: y0, max_x: x0, max_y: y0 };
        Some(iter.fold(init, |b, (x, y)| BoundingBox {
            min_x: b.min_x.min(x),
            min_y: b.min_y.min(y),
            max_x: b.max_x.max(x),
            max_y: b.max_y.max(y),
        }))
    }
}
