// src/config/mod.rs

//! Task file loading and validation.
//!
//! - [`model`] defines the TOML-backed data model.
//! - [`loader`] reads a file from disk.
//! - [`validate`] checks names, commands and dependency references.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, ConfigSection, RawConfigFile, TaskConfig};
