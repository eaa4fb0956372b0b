//! Floating layer: selected cells lifted off the base buffer.
//!
//! While a cell is floating its displayed color is the floating color, not
//! the base color underneath. Geometric transforms move the floating colors
//! and the selection together, using the selection's bounding box as the
//! local frame.

use crate::color::Color;
use crate::grid::{Cell, GridBuffer, GridSize};
use crate::selection::{BoundingBox, Selection};
use std::collections::{BTreeMap, BTreeSet};

/// Sparse index -> color map of lifted cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloatingLayer {
    cells: BTreeMap<usize, Color>,
    active: bool,
}

impl FloatingLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True between a lift and the matching commit or discard.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.cells.get(&index).copied()
    }

    /// Write a color into the floating map, or remove the entry for `None`.
    pub fn set(&mut self, index: usize, cell: Cell) {
        match cell {
            Some(color) => {
                self.cells.insert(index, color);
            }
            None => {
                self.cells.remove(&index);
            }
        }
    }

    pub fn cells(&self) -> &BTreeMap<usize, Color> {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Displayed color at `index`: floating overrides base.
    pub fn composite(&self, base: &GridBuffer, index: usize) -> Cell {
        self.get(index).or_else(|| base.get(index))
    }

    /// Move the selected, non-empty base cells into the floating map.
    ///
    /// No-op (returns `false`) when the selection is empty or a layer is
    /// already floating.
    pub fn lift(&mut self, selection: &Selection, base: &mut GridBuffer) -> bool {
        if selection.is_empty() || self.active {
            return false;
        }

        for index in selection.iter() {
            if let Some(color) = base.get(index) {
                self.cells.insert(index, color);
                base.set(index, None);
            }
        }
        self.active = true;
        true
    }

    /// Merge floating colors into the base buffer, keeping the floating state.
    ///
    /// Returns `true` if any base cell changed.
    pub fn stamp(&self, base: &mut GridBuffer) -> bool {
        let mut changed = false;
        for (&index, &color) in &self.cells {
            if base.get(index) != Some(color) {
                base.set(index, Some(color));
                changed = true;
            }
        }
        changed
    }

    /// Merge into the base buffer, then drop the floating state and the selection.
    pub fn commit(&mut self, selection: &mut Selection, base: &mut GridBuffer) -> bool {
        let changed = self.stamp(base);
        self.discard();
        selection.clear();
        changed
    }

    /// Drop floating content without merging it.
    pub fn discard(&mut self) {
        self.cells.clear();
        self.active = false;
    }

    /// Mirror across the vertical axis of the selection bounds.
    pub fn flip_horizontal(&mut self, selection: &mut Selection, size: GridSize) -> bool {
        self.remap(selection, size, |b, x, y| Some((b.min_x + b.max_x.checked_sub(x)?, y)))
    }

    /// Mirror across the horizontal axis of the selection bounds.
    pub fn flip_vertical(&mut self, selection: &mut Selection, size: GridSize) -> bool {
        self.remap(selection, size, |b, x, y| Some((x, b.min_y + b.max_y.checked_sub(y)?)))
    }

    /// Rotate 90 degrees counter-clockwise within the selection bounds.
    ///
    /// Cells whose rotated position falls outside the bounds are dropped;
    /// that happens for non-square bounds and is not an error.
    pub fn rotate_left(&mut self, selection: &mut Selection, size: GridSize) -> bool {
        self.remap(selection, size, |b, x, y| {
            let (rel_x, rel_y) = relative(b, x, y)?;
            let new_x = rel_y;
            let new_y = (b.width() - 1).checked_sub(rel_x)?;
            place_in_box(b, new_x, new_y)
        })
    }

    /// Rotate 90 degrees clockwise within the selection bounds.
    pub fn rotate_right(&mut self, selection: &mut Selection, size: GridSize) -> bool {
        self.remap(selection, size, |b, x, y| {
            let (rel_x, rel_y) = relative(b, x, y)?;
            let new_x = (b.height() - 1).checked_sub(rel_y)?;
            let new_y = rel_x;
            place_in_box(b, new_x, new_y)
        })
    }

    /// Translate selection and floating cells by `(dx, dy)`.
    ///
    /// All-or-nothing: if any cell would leave the grid, nothing changes and
    /// `false` is returned.
    pub fn nudge(&mut self, selection: &mut Selection, size: GridSize, dx: i64, dy: i64) -> bool {
        if selection.is_empty() {
            return false;
        }

        let Some(moved_selection) = selection.translated(size, dx, dy) else {
            return false;
        };

        let mut moved_cells = BTreeMap::new();
        for (&index, &color) in &self.cells {
            match size.offset(index, dx, dy) {
                Some(target) => {
                    moved_cells.insert(target, color);
                }
                None => return false,
            }
        }

        selection.replace(moved_selection);
        self.cells = moved_cells;
        true
    }

    /// Apply a coordinate mapping to every selected and floating cell.
    ///
    /// The mapping receives the bounds computed before the transform. Both
    /// structures are rebuilt and swapped in at the end.
    fn remap<F>(&mut self, selection: &mut Selection, size: GridSize, map: F) -> bool
    where
        F: Fn(&BoundingBox, usize, usize) -> Option<(usize, usize)>,
    {
        let Some(bounds) = selection.bounding_box(size) else {
            return false;
        };

        let target = |index: usize| {
            let (x, y) = size.to_xy(index);
            map(&bounds, x, y).map(|(nx, ny)| size.to_index(nx, ny))
        };

        let new_selection: BTreeSet<usize> = selection.iter().filter_map(&target).collect();
        let new_cells: BTreeMap<usize, Color> = self
            .cells
            .iter()
            .filter_map(|(&index, &color)| target(index).map(|t| (t, color)))
            .collect();

        selection.replace(new_selection);
        self.cells = new_cells;
        true
    }
}

/// Coordinates relative to the box origin, or `None` for a cell left of or above it.
fn relative(b: &BoundingBox, x: usize, y: usize) -> Option<(usize, usize)> {
    Some((x.checked_sub(b.min_x)?, y.checked_sub(b.min_y)?))
}

/// Map box-relative coordinates back to the grid, rejecting anything outside the box.
fn place_in_box(b: &BoundingBox, rel_x: usize, rel_y: usize) -> Option<(usize, usize)> {
    if rel_x < b.width() && rel_y < b.height() {
        Some((b.min_x + rel_x, b.min_y + rel_y))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn lifted(size: GridSize, painted: &[(usize, Color)], selected: &[usize]) -> (FloatingLayer, Selection, GridBuffer) {
        let mut base = GridBuffer::new(size);
        for &(i, c) in painted {
            base.set(i, Some(c));
        }
        let selection = Selection::from_cells(selected.iter().copied());
        let mut floating = FloatingLayer::new();
        floating.lift(&selection, &mut base);
        (floating, selection, base)
    }

    #[test]
    fn test_lift_moves_colors_off_base() {
        let size = GridSize::new(4);
        let (floating, _, base) = lifted(size, &[(0, RED), (1, BLUE), (2, RED)], &[0, 1, 5]);
        assert!(floating.is_active());
        assert_eq!(floating.len(), 2);
        assert_eq!(floating.get(0), Some(RED));
        assert_eq!(floating.get(5), None);
        assert_eq!(base.get(0), None);
        assert_eq!(base.get(1), None);
        assert_eq!(base.get(2), Some(RED));
    }

    #[test]
    fn test_lift_guards() {
        let size = GridSize::new(4);
        let mut base = GridBuffer::new(size);
        base.set(0, Some(RED));
        let mut floating = FloatingLayer::new();
        assert!(!floating.lift(&Selection::new(), &mut base));
        assert_eq!(base.get(0), Some(RED));

        let sel = Selection::from_cells([0]);
        assert!(floating.lift(&sel, &mut base));
        base.set(0, Some(BLUE));
        // Second lift is refused and leaves the base alone
        assert!(!floating.lift(&sel, &mut base));
        assert_eq!(base.get(0), Some(BLUE));
    }

    #[test]
    fn test_composite_prefers_floating() {
        let size = GridSize::new(2);
        let mut base = GridBuffer::new(size);
        base.set(0, Some(RED));
        let mut floating = FloatingLayer::new();
        floating.set(0, Some(BLUE));
        assert_eq!(floating.composite(&base, 0), Some(BLUE));
        assert_eq!(floating.composite(&base, 1), None);
    }

    #[test]
    fn test_stamp_keeps_floating() {
        let size = GridSize::new(4);
        let (floating, selection, mut base) = lifted(size, &[(0, RED)], &[0]);
        assert!(floating.stamp(&mut base));
        assert_eq!(base.get(0), Some(RED));
        assert!(floating.is_active());
        assert_eq!(floating.get(0), Some(RED));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_commit_clears_floating_and_selection() {
        let size = GridSize::new(4);
        let (mut floating, mut selection, mut base) = lifted(size, &[(0, RED)], &[0]);
        floating.nudge(&mut selection, size, 1, 0);
        floating.commit(&mut selection, &mut base);
        assert!(!floating.is_active());
        assert!(floating.is_empty());
        assert!(selection.is_empty());
        assert_eq!(base.get(0), None);
        assert_eq!(base.get(1), Some(RED));
    }

    #[test]
    fn test_flip_horizontal() {
        let size = GridSize::new(4);
        // Row 0: R B . . selected 0..=2
        let (mut floating, mut selection, _) = lifted(size, &[(0, RED), (1, BLUE)], &[0, 1, 2]);
        floating.flip_horizontal(&mut selection, size);
        assert_eq!(floating.get(2), Some(RED));
        assert_eq!(floating.get(1), Some(BLUE));
        assert_eq!(floating.get(0), None);
        assert_eq!(selection, Selection::from_cells([0, 1, 2]));
    }

    #[test]
    fn test_flip_vertical() {
        let size = GridSize::new(4);
        let (mut floating, mut selection, _) = lifted(size, &[(1, RED)], &[1, 5, 9]);
        floating.flip_vertical(&mut selection, size);
        assert_eq!(floating.get(9), Some(RED));
        assert_eq!(floating.len(), 1);
    }

    #[test]
    fn test_flip_twice_is_identity() {
        let size = GridSize::new(8);
        let painted = [(9, RED), (10, BLUE), (19, RED), (27, BLUE)];
        let (mut floating, mut selection, _) = lifted(size, &painted, &[9, 10, 11, 19, 27, 28]);
        let (orig_f, orig_s) = (floating.clone(), selection.clone());

        floating.flip_horizontal(&mut selection, size);
        floating.flip_horizontal(&mut selection, size);
        assert_eq!(floating, orig_f);
        assert_eq!(selection, orig_s);

        floating.flip_vertical(&mut selection, size);
        floating.flip_vertical(&mut selection, size);
        assert_eq!(floating, orig_f);
        assert_eq!(selection, orig_s);
    }

    #[test]
    fn test_nudge_huge_offset_is_rejected() {
        let size = GridSize::new(4);
        let (mut floating, mut selection, _) = lifted(size, &[(5, RED)], &[5]);
        let (orig_f, orig_s) = (floating.clone(), selection.clone());

        assert!(!floating.nudge(&mut selection, size, i64::MAX, 0));
        assert!(!floating.nudge(&mut selection, size, 0, i64::MIN));
        assert_eq!(floating, orig_f);
        assert_eq!(selection, orig_s);
    }

    #[test]
    fn test_rotate_right_single_step() {
        let size = GridSize::new(4);
        // 2x2 box at origin, red at top-left
        let (mut floating, mut selection, _) = lifted(size, &[(0, RED)], &[0, 1, 4, 5]);
        floating.rotate_right(&mut selection, size);
        // Top-left goes to top-right under clockwise rotation
        assert_eq!(floating.get(1), Some(RED));
        assert_eq!(floating.len(), 1);
        assert_eq!(selection.len(), 4);
    }

    #[test]
    fn test_rotate_left_single_step() {
        let size = GridSize::new(4);
        let (mut floating, mut selection, _) = lifted(size, &[(0, RED)], &[0, 1, 4, 5]);
        floating.rotate_left(&mut selection, size);
        // Top-left goes to bottom-left under counter-clockwise rotation
        assert_eq!(floating.get(4), Some(RED));
    }

    #[test]
    fn test_rotate_right_four_times_is_identity() {
        let size = GridSize::new(8);
        // L-shape inside a 3x3 box
        let painted = [(0, RED), (8, BLUE), (16, RED), (17, BLUE), (18, RED)];
        let (mut floating, mut selection, _) = lifted(size, &painted, &[0, 8, 16, 17, 18]);
        let (orig_f, orig_s) = (floating.clone(), selection.clone());

        for _ in 0..4 {
            floating.rotate_right(&mut selection, size);
        }
        assert_eq!(floating, orig_f);
        assert_eq!(selection, orig_s);
    }

    #[test]
    fn test_rotate_left_undoes_rotate_right() {
        let size = GridSize::new(8);
        let painted = [(9, RED), (10, BLUE), (18, RED)];
        let (mut floating, mut selection, _) = lifted(size, &painted, &[9, 10, 17, 18]);
        let (orig_f, orig_s) = (floating.clone(), selection.clone());
        floating.rotate_right(&mut selection, size);
        floating.rotate_left(&mut selection, size);
        assert_eq!(floating, orig_f);
        assert_eq!(selection, orig_s);
    }

    #[test]
    fn test_rotate_non_square_drops_cells() {
        let size = GridSize::new(8);
        // 3x1 horizontal bar: rotated cells land outside a 3-wide, 1-tall box
        let (mut floating, mut selection, _) = lifted(size, &[(0, RED), (1, RED), (2, RED)], &[0, 1, 2]);
        assert!(floating.rotate_right(&mut selection, size));
        assert!(selection.len() < 3);
        assert!(floating.len() < 3);
        for index in selection.iter() {
            assert!(index <= 2);
        }
    }

    #[test]
    fn test_nudge_moves_everything() {
        let size = GridSize::new(4);
        let (mut floating, mut selection, _) = lifted(size, &[(5, RED)], &[5, 6]);
        assert!(floating.nudge(&mut selection, size, 1, 1));
        assert_eq!(selection, Selection::from_cells([10, 11]));
        assert_eq!(floating.get(10), Some(RED));
    }

    #[test]
    fn test_nudge_out_of_bounds_is_atomic() {
        let size = GridSize::new(4);
        let (mut floating, mut selection, _) = lifted(size, &[(2, RED), (3, BLUE)], &[2, 3, 6]);
        let (orig_f, orig_s) = (floating.clone(), selection.clone());

        assert!(!floating.nudge(&mut selection, size, 1, 0));
        assert!(!floating.nudge(&mut selection, size, 0, -1));
        assert_eq!(floating, orig_f);
        assert_eq!(selection, orig_s);
    }

    #[test]
    fn test_transforms_on_empty_selection_are_noops() {
        let size = GridSize::new(4);
        let mut floating = FloatingLayer::new();
        let mut selection = Selection::new();
        assert!(!floating.flip_horizontal(&mut selection, size));
        assert!(!floating.rotate_left(&mut selection, size));
        assert!(!floating.nudge(&mut selection, size, 1, 0));
    }
}
