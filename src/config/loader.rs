//! Configuration loading and discovery for `pxedit.toml`
//!
//! Provides functions to find and load configuration.

use super::schema::EditorConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for when discovering configuration.
pub const CONFIG_FILE_NAME: &str = "pxedit.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse pxedit.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Find pxedit.toml by walking up from a specific directory.
///
/// # Returns
/// - `Some(path)` if a pxedit.toml file is found in `start` or an ancestor
/// - `None` if the filesystem root is reached without finding one
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        // Move to parent directory
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// If a path is provided, loads from that file. Otherwise searches upward
/// from the current directory; if nothing is found the defaults are used.
///
/// # Example
/// ```ignore
/// let config = load_config(Some(Path::new("project/pxedit.toml")))?;
/// let editor = EditorState::new(&config);
/// ```
pub fn load_config(path: Option<&Path>) -> Result<EditorConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => std::env::current_dir().ok().and_then(find_config_from),
    };

    match config_path {
        Some(p) => {
            log::info!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => {
            log::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
            Ok(EditorConfig::default())
        }
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<EditorConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse and validate configuration text.
pub fn parse_config(contents: &str) -> Result<EditorConfig, ConfigError> {
    let config: EditorConfig = toml::from_str(contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}
