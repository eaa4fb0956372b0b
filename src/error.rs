//! Error types for editor operations.

use crate::frame::FrameId;
use crate::payload::PayloadError;
use thiserror::Error;

/// Errors from frame management and import.
///
/// Invariant guards (undo at the bottom of the stack, an out-of-bounds nudge,
/// a fill with the color already present) are not errors; those operations
/// return `false` and leave state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// Import payload failed validation
    #[error(transparent)]
    Payload(#[from] PayloadError),
    /// The animation already holds the maximum number of frames
    #[error("frame limit of {max} reached")]
    FrameLimit { max: usize },
    /// The last remaining frame cannot be deleted
    #[error("cannot delete the last remaining frame")]
    LastFrame,
    /// No frame with this id exists
    #[error("unknown frame {0}")]
    UnknownFrame(FrameId),
    /// A frame position was outside the frame list
    #[error("frame position {index} out of range for {len} frames")]
    FrameIndexOutOfRange { index: usize, len: usize },
}
