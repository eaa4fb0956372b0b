//! Ordered collection of frames with an active-frame pointer.
//!
//! At least one frame always exists. Playback only moves the active pointer;
//! it never touches frame contents.

use crate::error::EditorError;
use crate::frame::{Frame, FrameId};
use crate::grid::GridSize;

/// Default upper bound on the number of frames.
pub const DEFAULT_MAX_FRAMES: usize = 64;

#[derive(Debug, Clone)]
pub struct AnimationSet {
    frames: Vec<Frame>,
    active: FrameId,
    next_id: u64,
    size: GridSize,
    max_frames: usize,
    history_depth: usize,
}

impl AnimationSet {
    /// A set holding a single blank frame, which is active.
    pub fn new(size: GridSize, max_frames: usize, history_depth: usize) -> Self {
        let first = Frame::new(FrameId(1), "Frame 1", size, history_depth);
        Self {
            active: first.id(),
            frames: vec![first],
            next_id: 2,
            size,
            max_frames: max_frames.max(1),
            history_depth,
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn max_frames(&self) -> usize {
        self.max_frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() >= self.max_frames
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, id: FrameId) -> Option<&Frame> {
        self.frames.iter().find(|f| f.id() == id)
    }

    pub fn frame_mut(&mut self, id: FrameId) -> Option<&mut Frame> {
        self.frames.iter_mut().find(|f| f.id() == id)
    }

    /// Position of a frame in playback order.
    pub fn position_of(&self, id: FrameId) -> Option<usize> {
        self.frames.iter().position(|f| f.id() == id)
    }

    pub fn active_id(&self) -> FrameId {
        self.active
    }

    pub fn active_index(&self) -> usize {
        self.position_of(self.active).unwrap_or(0)
    }

    pub fn active(&self) -> &Frame {
        let index = self.active_index();
        &self.frames[index]
    }

    pub fn active_mut(&mut self) -> &mut Frame {
        let index = self.active_index();
        &mut self.frames[index]
    }

    pub fn set_active(&mut self, id: FrameId) -> Result<(), EditorError> {
        if self.position_of(id).is_none() {
            return Err(EditorError::UnknownFrame(id));
        }
        self.active = id;
        Ok(())
    }

    fn allocate_id(&mut self) -> FrameId {
        let id = FrameId(self.next_id);
        self.next_id += 1;
        id
    }

    fn ensure_capacity(&self) -> Result<(), EditorError> {
        if self.is_full() {
            log::warn!("frame limit of {} reached", self.max_frames);
            return Err(EditorError::FrameLimit { max: self.max_frames });
        }
        Ok(())
    }

    /// Append a blank frame after the last one and make it active.
    pub fn add_frame(&mut self) -> Result<FrameId, EditorError> {
        self.ensure_capacity()?;
        let id = self.allocate_id();
        let name = format!("Frame {}", self.frames.len() + 1);
        self.frames.push(Frame::new(id, name, self.size, self.history_depth));
        self.active = id;
        log::info!("added {}", id);
        Ok(id)
    }

    /// Insert a copy of `source` right after it and make the copy active.
    pub fn duplicate_frame(&mut self, source: FrameId) -> Result<FrameId, EditorError> {
        let position = self.position_of(source).ok_or(EditorError::UnknownFrame(source))?;
        self.ensure_capacity()?;
        let id = self.allocate_id();
        let original = &self.frames[position];
        let copy = Frame::duplicate(original, id, format!("{} copy", original.name));
        self.frames.insert(position + 1, copy);
        self.active = id;
        log::info!("duplicated {} as {}", source, id);
        Ok(id)
    }

    /// Remove a frame. Refuses to remove the last remaining frame.
    ///
    /// If the active frame is removed, the frame that took its position (or
    /// the new last frame) becomes active.
    pub fn delete_frame(&mut self, id: FrameId) -> Result<(), EditorError> {
        let position = self.position_of(id).ok_or(EditorError::UnknownFrame(id))?;
        if self.frames.len() == 1 {
            return Err(EditorError::LastFrame);
        }
        self.frames.remove(position);
        if self.active == id {
            let next = position.min(self.frames.len() - 1);
            self.active = self.frames[next].id();
        }
        log::info!("deleted {}", id);
        Ok(())
    }

    /// Move the frame at position `from` to position `to`.
    pub fn move_frame(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        let len = self.frames.len();
        if from >= len || to >= len {
            return Err(EditorError::FrameIndexOutOfRange { index: from.max(to), len });
        }
        let frame = self.frames.remove(from);
        self.frames.insert(to, frame);
        Ok(())
    }

    pub fn rename_frame(&mut self, id: FrameId, name: impl Into<String>) -> Result<(), EditorError> {
        let frame = self.frame_mut(id).ok_or(EditorError::UnknownFrame(id))?;
        frame.name = name.into();
        Ok(())
    }

    /// Advance the active pointer to the next frame, wrapping at the end.
    pub fn advance_playback(&mut self) -> FrameId {
        let next = (self.active_index() + 1) % self.frames.len();
        self.active = self.frames[next].id();
        self.active
    }
}
