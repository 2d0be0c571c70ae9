// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Only configuration and usage mistakes surface as errors. A hook that
//! fails is recorded on its task and never becomes a `TasklineError`.

use thiserror::Error;

use crate::report::format::unmet_suffix;
use crate::types::TaskLabel;

#[derive(Error, Debug)]
pub enum TasklineError {
    /// A task declared a dependency that was not registered before it.
    #[error("\"{task}\" cannot depend on \"{dependency}\" because \"{task}\" runs before \"{dependency}\"")]
    DependencyOrder {
        task: TaskLabel,
        dependency: TaskLabel,
    },

    /// A task was run directly while one of its dependencies never ran.
    #[error("cannot run \"{task}\" before its dependency \"{dependency}\"{suffix}", suffix = unmet_suffix(.unmet))]
    DependencyNotRun {
        task: TaskLabel,
        dependency: TaskLabel,
        /// Dependencies of `dependency` that have not run either.
        unmet: Vec<TaskLabel>,
    },

    #[error("unknown task label \"{0}\"")]
    UnknownLabel(TaskLabel),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TasklineError>;
