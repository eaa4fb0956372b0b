//! Configuration module for the editor
//!
//! Provides types and loading for `pxedit.toml` editor configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
