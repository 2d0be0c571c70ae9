// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a task file and return the raw, unvalidated model.
///
/// This only performs TOML deserialization. Use [`load_and_validate`] for
/// the semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load a task file from `path` and validate it.
///
/// Checks for:
/// - at least one task,
/// - non-empty, unique task names,
/// - non-empty commands,
/// - dependencies naming a task in the file.
///
/// Whether dependencies are declared in a usable order is left to the
/// registry, which rejects forward references when the tasks are registered.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// `Taskline.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Taskline.toml")
}
