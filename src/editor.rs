//! Editor state and the operations a front end drives.
//!
//! [`EditorState`] owns the animation, the selection, the floating layer and
//! the current tool settings. Every operation takes `&mut self`, so only one
//! gesture can mutate the document at a time.
//!
//! History is kept in terms of the *settled* picture: what the active layer
//! would hold if the floating layer were committed right now. Lifting cells
//! or moving them around therefore records nothing until the floating layer
//! is committed, and undo always settles first.

use crate::animation::AnimationSet;
use crate::color::Color;
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::fill::flood_region;
use crate::floating::FloatingLayer;
use crate::frame::{FrameId, Layer};
use crate::gesture::Gesture;
use crate::grid::{Cell, GridBuffer, GridSize};
use crate::lasso::{auto_trim, lasso_fill};
use crate::palette::RecentColors;
use crate::payload::{self, BatchImportReport};
use crate::render;
use crate::selection::{MaskConstraint, Selection};
use crate::shapes::{rasterize_line, rasterize_rect};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Drawing tool bound to pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
    Fill,
    Lasso,
}

/// The complete editing context.
#[derive(Debug, Clone)]
pub struct EditorState {
    animation: AnimationSet,
    selection: Selection,
    floating: FloatingLayer,
    gesture: Gesture,
    tool: Tool,
    color: Color,
    layer: Layer,
    recent: RecentColors,
    fps: u32,
}

impl EditorState {
    /// Build an editor from configuration. The config is expected to have
    /// passed [`EditorConfig::validate`].
    pub fn new(config: &EditorConfig) -> Self {
        let size = GridSize::new(config.grid.size.max(1));
        Self {
            animation: AnimationSet::new(size, config.animation.max_frames, config.history.depth),
            selection: Selection::new(),
            floating: FloatingLayer::new(),
            gesture: Gesture::Idle,
            tool: Tool::default(),
            color: config.palette.default_color,
            layer: Layer::Base,
            recent: RecentColors::new(config.palette.recent_colors),
            fps: config.animation.fps,
        }
    }

    /// Default configuration with an `side x side` grid.
    pub fn with_grid_size(side: usize) -> Self {
        let mut config = EditorConfig::default();
        config.grid.size = side;
        Self::new(&config)
    }

    pub fn size(&self) -> GridSize {
        self.animation.size()
    }

    pub fn animation(&self) -> &AnimationSet {
        &self.animation
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn floating(&self) -> &FloatingLayer {
        &self.floating
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn recent_colors(&self) -> &RecentColors {
        &self.recent
    }

    /// Playback rate hint for the front end's timer.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    // ========================================================================
    // Tool settings
    // ========================================================================

    /// Switch tools. Changing tool commits any floating selection.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool != self.tool {
            self.commit_selection();
            log::debug!("tool {:?} -> {:?}", self.tool, tool);
            self.tool = tool;
        }
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Switch the layer edits apply to. Commits any floating selection first.
    pub fn set_layer(&mut self, layer: Layer) {
        if layer != self.layer {
            self.commit_selection();
            self.layer = layer;
        }
    }

    // ========================================================================
    // Pointer input
    // ========================================================================

    /// Start a gesture with the current tool. The fill tool acts immediately.
    pub fn pointer_down(&mut self, index: usize) -> bool {
        match self.tool {
            Tool::Pencil | Tool::Eraser => self.begin_stroke(index),
            Tool::Fill => self.fill_at(index),
            Tool::Lasso => self.begin_lasso(index),
        }
    }

    pub fn pointer_move(&mut self, index: usize) -> bool {
        match self.gesture {
            Gesture::Drawing { .. } => self.continue_stroke(index),
            Gesture::Lassoing { .. } => self.extend_lasso(index),
            Gesture::Idle => false,
        }
    }

    pub fn pointer_up(&mut self) -> bool {
        match self.gesture {
            Gesture::Drawing { .. } => self.end_stroke(),
            Gesture::Lassoing { .. } => self.finish_lasso(),
            Gesture::Idle => false,
        }
    }

    // ========================================================================
    // Painting
    // ========================================================================

    /// Paint (or erase, with the eraser tool) a single cell as one action.
    pub fn paint_cell(&mut self, index: usize) -> bool {
        if !self.begin_stroke(index) {
            return false;
        }
        self.end_stroke()
    }

    /// Start a stroke at `index` and paint it.
    ///
    /// The mask constraint is taken from the start cell and holds for the
    /// whole stroke.
    pub fn begin_stroke(&mut self, index: usize) -> bool {
        if !self.gesture.is_idle() {
            log::debug!("begin_stroke ignored while {}", self.gesture.name());
            return false;
        }
        if !self.size().contains(index) {
            log::debug!("begin_stroke ignored: index {} out of range", index);
            return false;
        }

        let erase = self.tool == Tool::Eraser;
        let constraint = self.selection.constraint_for(index);
        let painted = self.write_cell(index, erase, constraint);
        self.gesture = Gesture::Drawing { erase, constraint, last: index, painted };
        log::debug!("gesture idle -> {}", self.gesture.name());
        true
    }

    /// Paint the line from the last sampled cell to `index`.
    pub fn continue_stroke(&mut self, index: usize) -> bool {
        let Gesture::Drawing { erase, constraint, last, painted } = self.gesture else {
            log::debug!("continue_stroke ignored while {}", self.gesture.name());
            return false;
        };
        if !self.size().contains(index) {
            log::debug!("continue_stroke ignored: index {} out of range", index);
            return false;
        }

        let mut painted = painted;
        for cell in rasterize_line(self.size(), last, index).into_iter().skip(1) {
            painted |= self.write_cell(cell, erase, constraint);
        }
        self.gesture = Gesture::Drawing { erase, constraint, last: index, painted };
        true
    }

    /// Finish the stroke. Records one history entry if anything changed.
    pub fn end_stroke(&mut self) -> bool {
        let Gesture::Drawing { erase, painted, .. } = self.gesture else {
            log::debug!("end_stroke ignored while {}", self.gesture.name());
            return false;
        };
        log::debug!("gesture {} -> idle", self.gesture.name());
        self.gesture = Gesture::Idle;

        if !painted {
            return false;
        }
        if !erase {
            self.recent.push(self.color);
        }
        self.record()
    }

    /// Flood fill from `index` with the current color as one action.
    ///
    /// The region is found on the displayed picture (floating over layer)
    /// and stops at the selection boundary when a selection exists.
    pub fn fill_at(&mut self, index: usize) -> bool {
        if !self.gesture.is_idle() {
            log::debug!("fill ignored while {}", self.gesture.name());
            return false;
        }
        let size = self.size();
        if !size.contains(index) {
            log::debug!("fill ignored: index {} out of range", index);
            return false;
        }

        let replacement = Some(self.color);
        let constraint = self.selection.constraint_for(index);
        let region = {
            let buffer = self.animation.active().buffer(self.layer);
            let floating = &self.floating;
            let selection = &self.selection;
            let view = |i: usize| {
                if floating.is_active() {
                    floating.composite(buffer, i)
                } else {
                    buffer.get(i)
                }
            };
            if view(index) == replacement {
                log::debug!("fill ignored: cell {} already {}", index, self.color);
                return false;
            }
            flood_region(size, index, view, |i| selection.permits(constraint, i))
        };

        for cell in region {
            self.write_cell(cell, false, constraint);
        }
        self.recent.push(self.color);
        self.record()
    }

    /// Write one cell under the mask and floating rules. Returns `true` if
    /// the displayed picture changed.
    fn write_cell(&mut self, index: usize, erase: bool, constraint: Option<MaskConstraint>) -> bool {
        if !self.size().contains(index) || !self.selection.permits(constraint, index) {
            return false;
        }

        let value = if erase { None } else { Some(self.color) };
        let to_floating = self.floating.is_active() && self.selection.contains(index);
        let buffer = self.animation.active_mut().buffer_mut(self.layer);

        if to_floating {
            if erase {
                // Clear both the floating entry and whatever lies beneath it.
                let changed = self.floating.get(index).is_some() || buffer.get(index).is_some();
                self.floating.set(index, None);
                buffer.set(index, None);
                return changed;
            }
            let changed = self.floating.get(index) != value;
            self.floating.set(index, value);
            return changed;
        }

        if buffer.get(index) == value {
            return false;
        }
        buffer.set(index, value);
        true
    }

    // ========================================================================
    // Lasso
    // ========================================================================

    /// Start tracing a lasso. Commits any existing floating selection.
    pub fn begin_lasso(&mut self, index: usize) -> bool {
        if !self.gesture.is_idle() {
            log::debug!("begin_lasso ignored while {}", self.gesture.name());
            return false;
        }
        if !self.size().contains(index) {
            log::debug!("begin_lasso ignored: index {} out of range", index);
            return false;
        }

        self.commit_selection();
        self.gesture = Gesture::Lassoing { path: vec![index] };
        log::debug!("gesture idle -> lassoing");
        true
    }

    /// Extend the lasso path with the line to `index`.
    pub fn extend_lasso(&mut self, index: usize) -> bool {
        let size = self.size();
        if !size.contains(index) {
            log::debug!("extend_lasso ignored: index {} out of range", index);
            return false;
        }
        let Gesture::Lassoing { path } = &mut self.gesture else {
            log::debug!("extend_lasso ignored while {}", self.gesture.name());
            return false;
        };

        let last = path.last().copied().unwrap_or(index);
        path.extend(rasterize_line(size, last, index).into_iter().skip(1));
        true
    }

    /// Close the lasso path, select what it encloses and lift it.
    ///
    /// The selection is trimmed to painted cells of the active layer unless
    /// that would leave nothing selected.
    pub fn finish_lasso(&mut self) -> bool {
        let mut path = match std::mem::take(&mut self.gesture) {
            Gesture::Lassoing { path } => path,
            other => {
                log::debug!("finish_lasso ignored while {}", other.name());
                self.gesture = other;
                return false;
            }
        };
        log::debug!("gesture lassoing -> idle");

        let size = self.size();
        if let (Some(&first), Some(&last)) = (path.first(), path.last()) {
            path.extend(rasterize_line(size, last, first).into_iter().skip(1));
        }

        let region = lasso_fill(size, &path);
        let trimmed = auto_trim(&region, self.animation.active().buffer(self.layer));
        self.selection.replace(trimmed);
        self.lift()
    }

    // ========================================================================
    // Selection and floating layer
    // ========================================================================

    /// Select the filled rectangle between two corner cells.
    pub fn select_rect(&mut self, corner_a: usize, corner_b: usize) -> bool {
        let size = self.size();
        if !size.contains(corner_a) || !size.contains(corner_b) {
            log::debug!("select_rect ignored: corner out of range");
            return false;
        }
        self.commit_selection();
        self.selection.replace(rasterize_rect(size, corner_a, corner_b).into_iter().collect());
        true
    }

    pub fn select_all(&mut self) {
        self.commit_selection();
        self.selection.select_all(self.size());
    }

    /// Lift the selected cells of the active layer into the floating layer.
    pub fn lift(&mut self) -> bool {
        let lifted = self
            .floating
            .lift(&self.selection, self.animation.active_mut().buffer_mut(self.layer));
        if lifted {
            log::debug!("lifted {} cells", self.floating.len());
        } else {
            log::debug!("lift ignored: empty selection or already floating");
        }
        lifted
    }

    /// Copy the floating cells onto the layer, keeping them floating.
    pub fn stamp(&mut self) -> bool {
        if !self.floating.is_active() {
            log::debug!("stamp ignored: nothing floating");
            return false;
        }
        let changed = self.floating.stamp(self.animation.active_mut().buffer_mut(self.layer));
        self.record();
        changed
    }

    /// Merge the floating layer down and drop the selection.
    ///
    /// Also ends any gesture in progress. Returns `false` if there was
    /// nothing to commit or deselect.
    pub fn commit_selection(&mut self) -> bool {
        self.interrupt_gesture();

        if self.floating.is_active() {
            let buffer = self.animation.active_mut().buffer_mut(self.layer);
            self.floating.commit(&mut self.selection, buffer);
            self.record();
            log::debug!("floating layer committed");
            true
        } else if !self.selection.is_empty() {
            self.selection.clear();
            true
        } else {
            false
        }
    }

    /// Remove the selected content without merging it back.
    pub fn delete_selection(&mut self) -> bool {
        self.interrupt_gesture();

        if self.floating.is_active() {
            self.floating.discard();
        } else if !self.selection.is_empty() {
            let buffer = self.animation.active_mut().buffer_mut(self.layer);
            for index in self.selection.iter() {
                buffer.set(index, None);
            }
        } else {
            log::debug!("delete_selection ignored: nothing selected");
            return false;
        }

        self.selection.clear();
        self.record();
        true
    }

    pub fn flip_horizontal(&mut self) -> bool {
        self.transform(|floating, selection, size| floating.flip_horizontal(selection, size))
    }

    pub fn flip_vertical(&mut self) -> bool {
        self.transform(|floating, selection, size| floating.flip_vertical(selection, size))
    }

    pub fn rotate_left(&mut self) -> bool {
        self.transform(|floating, selection, size| floating.rotate_left(selection, size))
    }

    pub fn rotate_right(&mut self) -> bool {
        self.transform(|floating, selection, size| floating.rotate_right(selection, size))
    }

    /// Move the selection by `(dx, dy)`. Nothing moves if any cell would
    /// leave the grid.
    pub fn nudge(&mut self, dx: i64, dy: i64) -> bool {
        // Bounds are checked before lifting so a refused nudge changes nothing.
        if self.selection.translated(self.size(), dx, dy).is_none() {
            log::debug!("nudge ({}, {}) refused", dx, dy);
            return false;
        }
        self.transform(|floating, selection, size| floating.nudge(selection, size, dx, dy))
    }

    /// Run a transform on the floating layer, lifting the selection first
    /// if needed.
    fn transform<F>(&mut self, op: F) -> bool
    where
        F: FnOnce(&mut FloatingLayer, &mut Selection, GridSize) -> bool,
    {
        if !self.gesture.is_idle() {
            log::debug!("transform ignored while {}", self.gesture.name());
            return false;
        }
        if !self.floating.is_active() && !self.lift() {
            return false;
        }
        let size = self.size();
        op(&mut self.floating, &mut self.selection, size)
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Undo the last action on the active frame's active layer.
    pub fn undo(&mut self) -> bool {
        self.commit_selection();
        let undone = self.animation.active_mut().undo(self.layer);
        if !undone {
            log::debug!("nothing to undo");
        }
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.commit_selection();
        let redone = self.animation.active_mut().redo(self.layer);
        if !redone {
            log::debug!("nothing to redo");
        }
        redone
    }

    /// Record the settled picture of the active layer if it changed.
    fn record(&mut self) -> bool {
        let layer = self.layer;
        let frame = self.animation.active_mut();
        if self.floating.is_active() {
            let mut settled = frame.buffer(layer).clone();
            self.floating.stamp(&mut settled);
            frame.commit_state(layer, &settled)
        } else {
            frame.commit_if_changed(layer)
        }
    }

    /// End whatever gesture is in progress. A stroke is committed; a lasso
    /// path is dropped.
    fn interrupt_gesture(&mut self) {
        if matches!(self.gesture, Gesture::Drawing { .. }) {
            self.end_stroke();
        } else if matches!(self.gesture, Gesture::Lassoing { .. }) {
            log::debug!("lasso abandoned");
            self.gesture = Gesture::Idle;
        }
    }

    // ========================================================================
    // Frames
    // ========================================================================

    pub fn add_frame(&mut self) -> Result<FrameId, EditorError> {
        self.commit_selection();
        self.animation.add_frame()
    }

    pub fn duplicate_frame(&mut self, id: FrameId) -> Result<FrameId, EditorError> {
        self.commit_selection();
        self.animation.duplicate_frame(id)
    }

    pub fn delete_frame(&mut self, id: FrameId) -> Result<(), EditorError> {
        self.commit_selection();
        self.animation.delete_frame(id)
    }

    pub fn move_frame(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        self.animation.move_frame(from, to)
    }

    pub fn rename_frame(&mut self, id: FrameId, name: impl Into<String>) -> Result<(), EditorError> {
        self.animation.rename_frame(id, name)
    }

    /// Make `id` the active frame.
    pub fn select_frame(&mut self, id: FrameId) -> Result<(), EditorError> {
        if self.animation.frame(id).is_none() {
            return Err(EditorError::UnknownFrame(id));
        }
        if id != self.animation.active_id() {
            self.commit_selection();
        }
        self.animation.set_active(id)
    }

    /// Playback tick: step to the next frame, wrapping.
    pub fn advance_playback(&mut self) -> FrameId {
        self.commit_selection();
        self.animation.advance_playback()
    }

    /// Empty the active layer of the active frame as one action.
    pub fn clear_frame(&mut self) -> bool {
        self.commit_selection();
        self.animation.active_mut().buffer_mut(self.layer).clear();
        self.record()
    }

    // ========================================================================
    // Import / export
    // ========================================================================

    /// Replace the active frame's base layer with a JSON payload.
    ///
    /// The payload is validated completely before anything changes.
    pub fn import_frame(&mut self, json: &str) -> Result<(), EditorError> {
        let buffer = payload::parse_payload(json, self.size())?;
        self.commit_selection();
        let frame = self.animation.active_mut();
        frame.replace(Layer::Base, buffer);
        log::info!("imported payload into {}", frame.id());
        Ok(())
    }

    /// Import several payloads, see [`payload::import_batch`].
    pub fn import_batch<S: AsRef<str>>(&mut self, payloads: &[S]) -> BatchImportReport {
        self.commit_selection();
        let report = payload::import_batch(&mut self.animation, payloads);
        log::info!(
            "batch import: {} imported, {} rejected, {} skipped",
            report.imported(),
            report.rejected.len(),
            report.skipped
        );
        report
    }

    /// Export the active frame's base layer, floating cells included.
    pub fn export_active(&self) -> String {
        payload::export_frame(&self.settled(Layer::Base))
    }

    /// Export every frame's base layer in playback order.
    pub fn export_animation(&self) -> Vec<String> {
        let active = self.animation.active_id();
        self.animation
            .frames()
            .iter()
            .map(|frame| {
                if frame.id() == active {
                    self.export_active()
                } else {
                    payload::export_frame(frame.buffer(Layer::Base))
                }
            })
            .collect()
    }

    /// A layer of the active frame as it would look with the floating
    /// layer committed.
    fn settled(&self, layer: Layer) -> GridBuffer {
        let mut buffer = self.animation.active().buffer(layer).clone();
        if self.floating.is_active() && layer == self.layer {
            self.floating.stamp(&mut buffer);
        }
        buffer
    }

    // ========================================================================
    // Display
    // ========================================================================

    /// Color shown at `index`: overlay over base, floating over its layer.
    pub fn displayed_color(&self, index: usize) -> Cell {
        if !self.size().contains(index) {
            return None;
        }
        let frame = self.animation.active();
        let layer_color = |layer: Layer| {
            let buffer = frame.buffer(layer);
            if self.floating.is_active() && layer == self.layer {
                self.floating.composite(buffer, index)
            } else {
                buffer.get(index)
            }
        };
        layer_color(Layer::Overlay).or_else(|| layer_color(Layer::Base))
    }

    /// The displayed picture as a buffer.
    pub fn composite(&self) -> GridBuffer {
        let size = self.size();
        let mut out = GridBuffer::new(size);
        for index in 0..size.cell_count() {
            out.set(index, self.displayed_color(index));
        }
        out
    }

    /// The displayed picture as an image, one pixel per cell.
    pub fn render(&self) -> RgbaImage {
        let floating = self.floating.is_active().then_some((&self.floating, self.layer));
        render::composite_image(self.animation.active(), floating)
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn editor() -> EditorState {
        EditorState::with_grid_size(4)
    }

    fn base(editor: &EditorState) -> &GridBuffer {
        editor.animation().active().buffer(Layer::Base)
    }

    #[test]
    fn test_new_uses_config() {
        let mut config = EditorConfig::default();
        config.grid.size = 8;
        config.palette.default_color = RED;
        config.animation.fps = 12;

        let editor = EditorState::new(&config);
        assert_eq!(editor.size(), GridSize::new(8));
        assert_eq!(editor.color(), RED);
        assert_eq!(editor.fps(), 12);
        assert_eq!(editor.tool(), Tool::Pencil);
        assert_eq!(editor.animation().len(), 1);
    }

    #[test]
    fn test_stroke_is_one_history_entry() {
        let mut ed = editor();
        ed.set_color(RED);
        assert!(ed.pointer_down(0));
        assert!(ed.pointer_move(3));
        assert!(ed.pointer_up());

        for i in 0..4 {
            assert_eq!(base(&ed).get(i), Some(RED));
        }
        assert_eq!(ed.animation().active().history(Layer::Base).undo_len(), 2);
        assert_eq!(ed.recent_colors().most_recent(), Some(RED));

        assert!(ed.undo());
        assert!(base(&ed).is_empty());
    }

    #[test]
    fn test_stroke_events_out_of_order_are_ignored() {
        let mut ed = editor();
        assert!(!ed.continue_stroke(1));
        assert!(!ed.end_stroke());
        assert!(ed.begin_stroke(0));
        assert!(!ed.begin_stroke(1));
        assert!(!ed.continue_stroke(99));
        assert!(ed.end_stroke());
        assert!(ed.gesture().is_idle());
    }

    #[test]
    fn test_eraser_stroke() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.paint_cell(5);
        ed.set_tool(Tool::Eraser);
        assert!(ed.paint_cell(5));
        assert_eq!(base(&ed).get(5), None);
        assert!(!ed.paint_cell(5));
    }

    #[test]
    fn test_stroke_keeps_start_constraint() {
        let mut ed = editor();
        ed.set_color(RED);
        // Left column selected
        assert!(ed.select_rect(0, 12));

        ed.begin_stroke(0);
        ed.continue_stroke(3);
        ed.end_stroke();

        assert_eq!(base(&ed).get(0), Some(RED));
        assert_eq!(base(&ed).get(1), None);
        assert_eq!(base(&ed).get(3), None);

        // Starting outside never touches the selection
        ed.begin_stroke(7);
        ed.continue_stroke(4);
        ed.end_stroke();
        assert_eq!(base(&ed).get(4), None);
        assert_eq!(base(&ed).get(5), Some(RED));
    }

    #[test]
    fn test_paint_inside_floating_goes_to_floating() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.paint_cell(0);
        ed.select_rect(0, 1);
        assert!(ed.lift());

        ed.set_color(BLUE);
        ed.begin_stroke(1);
        ed.end_stroke();

        assert_eq!(ed.floating().get(1), Some(BLUE));
        assert_eq!(base(&ed).get(1), None);
        assert_eq!(ed.displayed_color(1), Some(BLUE));
    }

    #[test]
    fn test_erase_inside_floating_clears_both() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.paint_cell(0);
        ed.set_color(BLUE);
        ed.paint_cell(1);
        ed.set_tool(Tool::Eraser);

        // Float the red cell over the blue one
        ed.select_rect(0, 0);
        assert!(ed.nudge(1, 0));
        assert_eq!(ed.floating().get(1), Some(RED));
        assert_eq!(base(&ed).get(1), Some(BLUE));

        ed.begin_stroke(1);
        ed.end_stroke();

        assert_eq!(ed.floating().get(1), None);
        assert_eq!(base(&ed).get(1), None);
        assert_eq!(ed.displayed_color(1), None);
    }

    #[test]
    fn test_fill_l_shape() {
        let mut ed = editor();
        ed.set_color(BLUE);
        for i in [0, 4, 8, 9, 10] {
            ed.paint_cell(i);
        }
        ed.set_color(RED);
        ed.set_tool(Tool::Fill);
        assert!(ed.pointer_down(0));

        for i in [0, 4, 8, 9, 10] {
            assert_eq!(base(&ed).get(i), Some(RED));
        }
        assert_eq!(base(&ed).get(1), None);
    }

    #[test]
    fn test_fill_same_color_records_nothing() {
        let mut ed = editor();
        ed.set_color(RED);
        assert!(ed.fill_at(0));
        let depth = ed.animation().active().history(Layer::Base).undo_len();
        assert!(!ed.fill_at(5));
        assert_eq!(ed.animation().active().history(Layer::Base).undo_len(), depth);
    }

    #[test]
    fn test_fill_stops_at_selection() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.select_rect(0, 5);
        assert!(ed.fill_at(0));

        let filled: Vec<usize> = base(&ed).filled_indices().collect();
        assert_eq!(filled, vec![0, 1, 4, 5]);
    }

    #[test]
    fn test_masked_fill_writes_floating() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.paint_cell(0);
        ed.select_rect(0, 1);
        ed.lift();

        ed.set_color(BLUE);
        assert!(ed.fill_at(1));
        assert_eq!(ed.floating().get(1), Some(BLUE));
        assert_eq!(ed.floating().get(0), Some(RED));
        assert_eq!(base(&ed).get(1), None);
        assert_eq!(base(&ed).get(2), None);
    }

    #[test]
    fn test_lasso_ring_selects_and_lifts() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.paint_cell(5);
        ed.set_tool(Tool::Lasso);

        ed.pointer_down(0);
        ed.pointer_move(3);
        ed.pointer_move(15);
        ed.pointer_move(12);
        assert!(ed.pointer_up());

        // Trimmed to the only painted cell inside the ring
        assert_eq!(ed.selection().iter().collect::<Vec<_>>(), vec![5]);
        assert!(ed.floating().is_active());
        assert_eq!(ed.floating().get(5), Some(RED));
        assert_eq!(base(&ed).get(5), None);
        assert_eq!(ed.displayed_color(5), Some(RED));
    }

    #[test]
    fn test_lasso_over_empty_space_keeps_geometry() {
        let mut ed = editor();
        ed.begin_lasso(0);
        ed.extend_lasso(2);
        ed.extend_lasso(10);
        ed.extend_lasso(8);
        assert!(ed.finish_lasso());
        assert_eq!(ed.selection().len(), 9);
    }

    #[test]
    fn test_transform_lifts_and_commit_records_once() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.paint_cell(0);
        let depth = ed.animation().active().history(Layer::Base).undo_len();

        ed.select_rect(0, 1);
        assert!(ed.flip_horizontal());
        assert!(ed.floating().is_active());
        assert_eq!(ed.displayed_color(1), Some(RED));
        assert_eq!(ed.displayed_color(0), None);
        assert_eq!(ed.animation().active().history(Layer::Base).undo_len(), depth);

        assert!(ed.commit_selection());
        assert_eq!(base(&ed).get(1), Some(RED));
        assert_eq!(ed.animation().active().history(Layer::Base).undo_len(), depth + 1);
        assert!(ed.selection().is_empty());

        assert!(ed.undo());
        assert_eq!(base(&ed).get(0), Some(RED));
        assert_eq!(base(&ed).get(1), None);
    }

    #[test]
    fn test_undo_settles_floating_first() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.paint_cell(0);
        ed.select_rect(0, 0);
        assert!(ed.nudge(0, 1));

        assert!(ed.undo());
        assert!(!ed.floating().is_active());
        assert_eq!(base(&ed).get(0), Some(RED));
        assert_eq!(base(&ed).get(4), None);
    }

    #[test]
    fn test_nudge_out_of_grid_is_refused() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.paint_cell(3);
        ed.select_rect(2, 3);
        let before = base(&ed).clone();

        assert!(!ed.nudge(1, 0));
        assert!(!ed.nudge(i64::MAX, 0));
        assert_eq!(ed.selection().iter().collect::<Vec<_>>(), vec![2, 3]);
        assert!(!ed.floating().is_active());
        assert!(ed.floating().is_empty());
        assert_eq!(base(&ed), &before);
        assert_eq!(ed.displayed_color(3), Some(RED));
    }

    #[test]
    fn test_transform_without_selection_is_noop() {
        let mut ed = editor();
        assert!(!ed.rotate_right());
        assert!(!ed.nudge(1, 0));
    }

    #[test]
    fn test_delete_selection_discards_floating() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.paint_cell(0);
        ed.paint_cell(15);
        ed.select_rect(0, 0);
        ed.lift();

        assert!(ed.delete_selection());
        assert!(!ed.floating().is_active());
        assert!(ed.selection().is_empty());
        assert_eq!(base(&ed).get(0), None);
        assert_eq!(base(&ed).get(15), Some(RED));

        assert!(ed.undo());
        assert_eq!(base(&ed).get(0), Some(RED));
    }

    #[test]
    fn test_delete_selection_without_floating() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.fill_at(0);
        ed.select_rect(0, 5);
        assert!(ed.delete_selection());
        assert_eq!(base(&ed).filled_indices().count(), 12);
        assert!(!ed.delete_selection());
    }

    #[test]
    fn test_stamp_leaves_copy_behind() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.paint_cell(0);
        ed.select_rect(0, 0);
        ed.lift();
        assert!(ed.stamp());
        assert!(ed.nudge(1, 0));
        ed.commit_selection();

        assert_eq!(base(&ed).get(0), Some(RED));
        assert_eq!(base(&ed).get(1), Some(RED));
    }

    #[test]
    fn test_set_tool_commits_floating() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.paint_cell(0);
        ed.select_rect(0, 0);
        ed.nudge(1, 1);

        ed.set_tool(Tool::Fill);
        assert!(!ed.floating().is_active());
        assert_eq!(base(&ed).get(5), Some(RED));
    }

    #[test]
    fn test_layers_are_edited_separately() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.paint_cell(0);
        ed.set_layer(Layer::Overlay);
        ed.set_color(BLUE);
        ed.paint_cell(0);

        assert_eq!(base(&ed).get(0), Some(RED));
        assert_eq!(ed.displayed_color(0), Some(BLUE));

        assert!(ed.undo());
        assert_eq!(ed.displayed_color(0), Some(RED));
    }

    #[test]
    fn test_frame_switch_commits_floating() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.paint_cell(0);
        let first = ed.animation().active_id();
        ed.select_rect(0, 0);
        ed.nudge(0, 1);

        let second = ed.add_frame().expect("should add frame");
        assert_eq!(ed.animation().active_id(), second);
        assert!(!ed.floating().is_active());

        ed.select_frame(first).expect("should select frame");
        assert_eq!(base(&ed).get(4), Some(RED));
        assert!(matches!(ed.select_frame(FrameId(99)), Err(EditorError::UnknownFrame(_))));
    }

    #[test]
    fn test_clear_frame() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.fill_at(0);
        assert!(ed.clear_frame());
        assert!(base(&ed).is_empty());
        assert!(!ed.clear_frame());
        assert!(ed.undo());
        assert_eq!(base(&ed).filled_indices().count(), 16);
    }

    #[test]
    fn test_import_export_round_trip() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.paint_cell(6);
        let json = ed.export_active();

        let mut other = editor();
        other.import_frame(&json).expect("should import exported frame");
        assert_eq!(base(&other), base(&ed));
        assert!(other.animation().active().history(Layer::Base).can_undo());
    }

    #[test]
    fn test_import_rejects_without_mutation() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.paint_cell(0);
        let before = base(&ed).clone();

        let err = ed.import_frame(r#"{"pixels": [null]}"#).expect_err("should reject short payload");
        assert!(matches!(err, EditorError::Payload(_)));
        assert_eq!(base(&ed), &before);
    }

    #[test]
    fn test_export_includes_floating_cells() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.paint_cell(0);
        ed.select_rect(0, 0);
        ed.nudge(1, 0);

        let exported = payload::parse_payload(&ed.export_active(), ed.size()).expect("should parse export");
        assert_eq!(exported.get(1), Some(RED));
        assert_eq!(exported.get(0), None);
        assert_eq!(ed.export_animation().len(), 1);
    }

    #[test]
    fn test_render_matches_display() {
        let mut ed = editor();
        ed.set_color(RED);
        ed.paint_cell(5);
        let img = ed.render();
        assert_eq!(img.dimensions(), (4, 4));
        assert_eq!(img.get_pixel(1, 1).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_playback_cycles_frames() {
        let mut ed = editor();
        let first = ed.animation().active_id();
        let second = ed.add_frame().expect("should add frame");
        assert_eq!(ed.advance_playback(), first);
        assert_eq!(ed.advance_playback(), second);
    }
}
