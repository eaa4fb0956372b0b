//! pxedit - Pixel-grid image and animation editing engine
//!
//! This library provides:
//! - Square grids of colored cells with base and overlay layers
//! - Stroke interpolation, flood fill and lasso selection
//! - A floating layer that can be moved, flipped and rotated before committing
//! - Bounded per-layer undo/redo and multi-frame animations
//! - JSON frame import/export and `pxedit.toml` configuration
//!
//! [`editor::EditorState`] ties everything together; the other modules hold
//! the individual algorithms and data types.

pub mod animation;
pub mod color;
pub mod config;
pub mod editor;
pub mod error;
pub mod fill;
pub mod floating;
pub mod frame;
pub mod gesture;
pub mod grid;
pub mod history;
pub mod lasso;
pub mod palette;
pub mod payload;
pub mod render;
pub mod selection;
pub mod shapes;
