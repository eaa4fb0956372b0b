//! Freehand lasso selection.
//!
//! The traced path is treated as a wall and everything reachable from the
//! grid border without crossing it is outside. The grid edge is the canonical
//! outside, so open or self-intersecting paths still produce a sensible
//! selection without any polygon scanline logic.

use crate::grid::{GridBuffer, GridSize};
use std::collections::{BTreeSet, VecDeque};

/// Compute the cells enclosed by a lasso boundary, boundary included.
///
/// # Examples
///
/// ```
/// use pxedit::grid::GridSize;
/// use pxedit::lasso::lasso_fill;
///
/// let size = GridSize::new(4);
/// let ring = size.border_indices();
/// assert_eq!(lasso_fill(size, &ring).len(), 16);
/// ```
pub fn lasso_fill(size: GridSize, boundary: &[usize]) -> BTreeSet<usize> {
    let cell_count = size.cell_count();
    let mut wall = vec![false; cell_count];
    for &index in boundary {
        if size.contains(index) {
            wall[index] = true;
        }
    }

    let mut explored = vec![false; cell_count];
    let mut queue = VecDeque::new();
    for index in size.border_indices() {
        if !wall[index] && !explored[index] {
            explored[index] = true;
            queue.push_back(index);
        }
    }

    while let Some(index) = queue.pop_front() {
        for neighbor in size.neighbors4(index) {
            if !wall[neighbor] && !explored[neighbor] {
                explored[neighbor] = true;
                queue.push_back(neighbor);
            }
        }
    }

    (0..cell_count).filter(|&i| !explored[i]).collect()
}

/// Narrow a lasso selection to the cells that actually hold color.
///
/// Falls back to the full geometric selection when none of its cells are
/// painted, so lassoing empty space still selects something.
pub fn auto_trim(selection: &BTreeSet<usize>, base: &GridBuffer) -> BTreeSet<usize> {
    let trimmed: BTreeSet<usize> =
        selection.iter().copied().filter(|&i| base.get(i).is_some()).collect();
    if trimmed.is_empty() {
        selection.clone()
    } else {
        trimmed
    }
}
