//! Configuration schema types for `pxedit.toml`
//!
//! Defines the structure and validation rules for editor configuration.

use crate::animation::DEFAULT_MAX_FRAMES;
use crate::color::Color;
use crate::history::DEFAULT_HISTORY_DEPTH;
use crate::palette::DEFAULT_RECENT_COLORS;
use serde::{Deserialize, Serialize};

/// Largest supported grid side.
pub const MAX_GRID_SIZE: usize = 256;

/// Grid section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Cells per side (N for an N x N grid)
    #[serde(default = "default_grid_size")]
    pub size: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { size: default_grid_size() }
    }
}

fn default_grid_size() -> usize {
    16
}

/// Undo history section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Snapshots kept per frame layer
    #[serde(default = "default_history_depth")]
    pub depth: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { depth: default_history_depth() }
    }
}

fn default_history_depth() -> usize {
    DEFAULT_HISTORY_DEPTH
}

/// Animation section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Maximum number of frames
    #[serde(default = "default_max_frames")]
    pub max_frames: usize,
    /// Playback rate hint for the front end's timer
    #[serde(default = "default_fps")]
    pub fps: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self { max_frames: default_max_frames(), fps: default_fps() }
    }
}

fn default_max_frames() -> usize {
    DEFAULT_MAX_FRAMES
}

fn default_fps() -> u32 {
    8
}

/// Palette section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Capacity of the recent-colors list
    #[serde(default = "default_recent_colors")]
    pub recent_colors: usize,
    /// Color selected when the editor starts
    #[serde(default)]
    pub default_color: Color,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self { recent_colors: default_recent_colors(), default_color: Color::default() }
    }
}

fn default_recent_colors() -> usize {
    DEFAULT_RECENT_COLORS
}

/// Complete pxedit.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "grid.size")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pxedit.toml: '{}' {}", self.field, self.message)
    }
}

impl EditorConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut positive = |field: &str, value: usize| {
            if value == 0 {
                errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "must be a positive integer".to_string(),
                });
            }
        };

        positive("grid.size", self.grid.size);
        positive("history.depth", self.history.depth);
        positive("animation.max_frames", self.animation.max_frames);
        positive("animation.fps", self.animation.fps as usize);
        positive("palette.recent_colors", self.palette.recent_colors);

        if self.grid.size > MAX_GRID_SIZE {
            errors.push(ConfigValidationError {
                field: "grid.size".to_string(),
                message: format!("must be at most {}", MAX_GRID_SIZE),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
