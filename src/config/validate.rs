// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, RawConfigFile, TaskConfig};
use crate::errors::{Result, TasklineError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = TasklineError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.task))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_task_names(cfg)?;
    for task in &cfg.task {
        validate_commands(task)?;
    }
    validate_dependency_references(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &RawConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(TasklineError::ConfigError(
            "config must contain at least one [[task]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_task_names(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for task in &cfg.task {
        if task.name.trim().is_empty() {
            return Err(TasklineError::ConfigError(
                "task name must not be empty".to_string(),
            ));
        }
        if !seen.insert(task.name.as_str()) {
            return Err(TasklineError::ConfigError(format!(
                "task '{}' is defined more than once",
                task.name
            )));
        }
    }
    Ok(())
}

fn validate_commands(task: &TaskConfig) -> Result<()> {
    let fields = [
        ("cmd", Some(&task.cmd)),
        ("before", task.before.as_ref()),
        ("after", task.after.as_ref()),
    ];

    for (field, value) in fields {
        if let Some(value) = value {
            if value.trim().is_empty() {
                return Err(TasklineError::ConfigError(format!(
                    "task '{}' has an empty `{}` command",
                    task.name, field
                )));
            }
        }
    }
    Ok(())
}

fn validate_dependency_references(cfg: &RawConfigFile) -> Result<()> {
    let names: HashSet<&str> = cfg.task.iter().map(|t| t.name.as_str()).collect();

    for task in &cfg.task {
        for dep in &task.deps {
            if dep == &task.name {
                return Err(TasklineError::ConfigError(format!(
                    "task '{}' cannot depend on itself in `deps`",
                    task.name
                )));
            }
            if !names.contains(dep.as_str()) {
                return Err(TasklineError::ConfigError(format!(
                    "task '{}' has unknown dependency '{}' in `deps`",
                    task.name, dep
                )));
            }
        }
    }
    Ok(())
}
