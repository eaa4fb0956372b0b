//! Pointer gesture state.
//!
//! A gesture is a pointer-down / move / up sequence. Each kind has its own
//! state so the editor never needs ad-hoc flags to know what a move means:
//!
//! ```text
//! Idle --down(pencil/eraser)--> Drawing --move--> Drawing --up--> Idle (commit)
//! Idle --down(lasso)--------->  Lassoing --move--> Lassoing --up--> Idle (lift)
//! ```

use crate::selection::MaskConstraint;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// A paint or erase stroke in progress
    Drawing {
        /// `true` for the eraser
        erase: bool,
        /// Fixed at stroke start for the whole stroke
        constraint: Option<MaskConstraint>,
        /// Last sampled cell, the start of the next interpolated segment
        last: usize,
        /// Whether any cell was written
        painted: bool,
    },
    /// A freehand selection path being traced
    Lassoing { path: Vec<usize> },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Short name for log messages.
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Drawing { erase: false, .. } => "drawing",
            Gesture::Drawing { erase: true, .. } => "erasing",
            Gesture::Lassoing { .. } => "lassoing",
        }
    }
}
