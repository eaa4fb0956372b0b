//! 4-connected flood fill.
//!
//! The region search is separated from the write so the same solver serves
//! the fill bucket on a plain buffer and the masked fill over the composite
//! of a floating layer and its base.

use crate::grid::{Cell, GridBuffer, GridSize};
use std::collections::VecDeque;

/// Find the 4-connected region of cells sharing the start cell's color.
///
/// `color_at` reports the color seen at an index and `allowed` is an extra
/// containment test; cells failing it act as walls even when colors match.
/// Returns the region in breadth-first order, or an empty vector if the start
/// cell itself is not allowed.
pub fn flood_region<C, A>(size: GridSize, start: usize, color_at: C, allowed: A) -> Vec<usize>
where
    C: Fn(usize) -> Cell,
    A: Fn(usize) -> bool,
{
    if !size.contains(start) || !allowed(start) {
        return Vec::new();
    }

    let start_color = color_at(start);
    let mut visited = vec![false; size.cell_count()];
    let mut queue = VecDeque::new();
    let mut region = Vec::new();

    visited[start] = true;
    queue.push_back(start);

    while let Some(index) = queue.pop_front() {
        region.push(index);
        for neighbor in size.neighbors4(index) {
            if visited[neighbor] {
                continue;
            }
            visited[neighbor] = true;
            if color_at(neighbor) == start_color && allowed(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    region
}

/// Flood fill a buffer from `start` with `replacement`.
///
/// Filling with the color already at `start` is a no-op. Returns the indices
/// that were written.
///
/// # Examples
///
/// ```
/// use pxedit::color::Color;
/// use pxedit::fill::flood_fill;
/// use pxedit::grid::{GridBuffer, GridSize};
///
/// let mut buf = GridBuffer::new(GridSize::new(4));
/// let written = flood_fill(&mut buf, 0, Some(Color::WHITE), |_| true);
/// assert_eq!(written.len(), 16);
/// ```
pub fn flood_fill<A>(buffer: &mut GridBuffer, start: usize, replacement: Cell, allowed: A) -> Vec<usize>
where
    A: Fn(usize) -> bool,
{
    let size = buffer.size();
    if !size.contains(start) || buffer.get(start) == replacement {
        return Vec::new();
    }

    let region = flood_region(size, start, |i| buffer.get(i), allowed);
    for &index in &region {
        buffer.set(index, replacement);
    }
    region
}
