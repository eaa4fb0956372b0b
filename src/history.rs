//! Bounded undo/redo of full buffer snapshots.
//!
//! The top of the undo stack is always the current state, so the stack is
//! never empty. Snapshots are taken at the end of a discrete user action,
//! never mid-stroke.

use crate::grid::GridBuffer;
use std::collections::VecDeque;

/// Default number of snapshots kept per buffer.
pub const DEFAULT_HISTORY_DEPTH: usize = 20;

/// Undo and redo stacks for one buffer.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    undo: VecDeque<GridBuffer>,
    redo: Vec<GridBuffer>,
    cap: usize,
}

impl HistoryStack {
    /// Start a history whose only entry is `initial`.
    ///
    /// A `cap` of zero is treated as one.
    pub fn new(initial: GridBuffer, cap: usize) -> Self {
        let mut undo = VecDeque::with_capacity(cap.max(1));
        undo.push_back(initial);
        Self { undo, redo: Vec::new(), cap: cap.max(1) }
    }

    /// The snapshot representing the current state.
    pub fn current(&self) -> &GridBuffer {
        // The undo stack is seeded in `new` and never popped below one entry.
        &self.undo[self.undo.len() - 1]
    }

    /// Maximum number of undo entries.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Entries on the undo stack, including the current state.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Record a new state. Evicts the oldest entry past the cap and clears redo.
    pub fn commit(&mut self, snapshot: &GridBuffer) {
        self.undo.push_back(snapshot.clone());
        while self.undo.len() > self.cap {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Step back one state. Returns the state to restore, or `None` at the bottom.
    pub fn undo(&mut self) -> Option<&GridBuffer> {
        if !self.can_undo() {
            return None;
        }
        let top = self.undo.pop_back()?;
        self.redo.push(top);
        self.undo.back()
    }

    /// Step forward one state. Returns the state to restore, or `None` if nothing was undone.
    pub fn redo(&mut self) -> Option<&GridBuffer> {
        let next = self.redo.pop()?;
        self.undo.push_back(next);
        while self.undo.len() > self.cap {
            self.undo.pop_front();
        }
        self.undo.back()
    }

    /// Forget all history and start over from `snapshot`.
    pub fn reset(&mut self, snapshot: &GridBuffer) {
        self.undo.clear();
        self.undo.push_back(snapshot.clone());
        self.redo.clear();
    }
}
