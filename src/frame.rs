//! A single animation frame: a base buffer and an overlay buffer, each with
//! its own undo history.

use crate::grid::{GridBuffer, GridSize};
use crate::history::HistoryStack;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of a frame's two drawing surfaces an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    #[default]
    Base,
    Overlay,
}

/// Stable frame identity, unchanged by reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameId(pub u64);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// One animation step.
#[derive(Debug, Clone)]
pub struct Frame {
    id: FrameId,
    pub name: String,
    base: GridBuffer,
    overlay: GridBuffer,
    base_history: HistoryStack,
    overlay_history: HistoryStack,
}

impl Frame {
    /// A blank frame whose histories start at the blank state.
    pub fn new(id: FrameId, name: impl Into<String>, size: GridSize, history_depth: usize) -> Self {
        let blank = GridBuffer::new(size);
        Self {
            id,
            name: name.into(),
            base_history: HistoryStack::new(blank.clone(), history_depth),
            overlay_history: HistoryStack::new(blank.clone(), history_depth),
            overlay: blank.clone(),
            base: blank,
        }
    }

    /// Copy the buffers of `source` under a new identity. History is not
    /// copied; it starts at the duplicated state.
    pub fn duplicate(source: &Frame, id: FrameId, name: impl Into<String>) -> Self {
        let depth = source.base_history.cap();
        Self {
            id,
            name: name.into(),
            base_history: HistoryStack::new(source.base.clone(), depth),
            overlay_history: HistoryStack::new(source.overlay.clone(), depth),
            base: source.base.clone(),
            overlay: source.overlay.clone(),
        }
    }

    pub fn id(&self) -> FrameId {
        self.id
    }

    pub fn size(&self) -> GridSize {
        self.base.size()
    }

    pub fn buffer(&self, layer: Layer) -> &GridBuffer {
        match layer {
            Layer::Base => &self.base,
            Layer::Overlay => &self.overlay,
        }
    }

    pub fn buffer_mut(&mut self, layer: Layer) -> &mut GridBuffer {
        match layer {
            Layer::Base => &mut self.base,
            Layer::Overlay => &mut self.overlay,
        }
    }

    pub fn history(&self, layer: Layer) -> &HistoryStack {
        match layer {
            Layer::Base => &self.base_history,
            Layer::Overlay => &self.overlay_history,
        }
    }

    /// Snapshot the current contents of `layer` onto its undo stack.
    pub fn commit(&mut self, layer: Layer) {
        let (buffer, history) = self.parts_mut(layer);
        history.commit(buffer);
    }

    /// Commit `layer` only if it differs from the latest snapshot.
    pub fn commit_if_changed(&mut self, layer: Layer) -> bool {
        let (buffer, history) = self.parts_mut(layer);
        if *buffer == *history.current() {
            return false;
        }
        history.commit(buffer);
        true
    }

    /// Record `snapshot` as the latest state of `layer` without touching the
    /// live buffer. Skipped when identical to the latest snapshot.
    pub fn commit_state(&mut self, layer: Layer, snapshot: &GridBuffer) -> bool {
        let (_, history) = self.parts_mut(layer);
        if *snapshot == *history.current() {
            return false;
        }
        history.commit(snapshot);
        true
    }

    /// Restore the previous snapshot of `layer`. Returns `false` at the bottom of the stack.
    pub fn undo(&mut self, layer: Layer) -> bool {
        let (buffer, history) = self.parts_mut(layer);
        match history.undo() {
            Some(snapshot) => {
                *buffer = snapshot.clone();
                true
            }
            None => false,
        }
    }

    /// Re-apply the most recently undone snapshot of `layer`.
    pub fn redo(&mut self, layer: Layer) -> bool {
        let (buffer, history) = self.parts_mut(layer);
        match history.redo() {
            Some(snapshot) => {
                *buffer = snapshot.clone();
                true
            }
            None => false,
        }
    }

    /// Replace the contents of `layer` and record one history entry.
    pub fn replace(&mut self, layer: Layer, contents: GridBuffer) {
        *self.buffer_mut(layer) = contents;
        self.commit(layer);
    }

    /// True when neither layer holds any color.
    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.overlay.is_empty()
    }

    fn parts_mut(&mut self, layer: Layer) -> (&mut GridBuffer, &mut HistoryStack) {
        match layer {
            Layer::Base => (&mut self.base, &mut self.base_history),
            Layer::Overlay => (&mut self.overlay, &mut self.overlay_history),
        }
    }
}
