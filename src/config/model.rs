// src/config/model.rs

use serde::Deserialize;

use crate::exec::shell_hook;
use crate::registry::TaskDefinition;
use crate::types::{ProgressMode, TaskLabel};

/// Task file as read from TOML, before validation.
///
/// ```toml
/// [config]
/// progress = "auto"
///
/// [[task]]
/// name = "lint"
/// cmd = "cargo clippy"
///
/// [[task]]
/// name = "test"
/// before = "echo preparing"
/// cmd = "cargo test"
/// after = "echo done"
/// deps = ["lint"]
/// ```
///
/// Tasks are an array of tables so that file order is registration order.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub task: Vec<TaskConfig>,
}

/// A validated task file. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub task: Vec<TaskConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(config: ConfigSection, task: Vec<TaskConfig>) -> Self {
        Self { config, task }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.task.iter().map(|t| t.name.as_str())
    }

    /// Turn every task into a definition whose hooks run shell commands,
    /// in file order.
    pub fn definitions(&self) -> Vec<(TaskLabel, TaskDefinition)> {
        self.task
            .iter()
            .map(|t| (t.name.clone(), t.to_definition()))
            .collect()
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSection {
    /// `"auto"`, `"always"` or `"never"`; whether to animate spinners.
    #[serde(default)]
    pub progress: ProgressMode,
}

/// One `[[task]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskConfig {
    /// Unique task label.
    pub name: String,

    /// Shell command for the task's callback.
    pub cmd: String,

    /// Shell command run right before `cmd`.
    #[serde(default)]
    pub before: Option<String>,

    /// Shell command run right after `cmd` succeeds.
    #[serde(default)]
    pub after: Option<String>,

    /// Labels of earlier tasks that must have succeeded first.
    #[serde(default, alias = "dependencies")]
    pub deps: Vec<String>,
}

impl TaskConfig {
    pub fn to_definition(&self) -> TaskDefinition {
        let mut def = TaskDefinition::from_hook(shell_hook(self.cmd.clone()))
            .dependencies(self.deps.iter().cloned());

        if let Some(before) = &self.before {
            def = def.before_hook(shell_hook(before.clone()));
        }
        if let Some(after) = &self.after {
            def = def.after_hook(shell_hook(after.clone()));
        }

        def
    }
}
