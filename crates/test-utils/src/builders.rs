#![allow(dead_code)]

use taskline::config::{ConfigFile, ConfigSection, RawConfigFile, TaskConfig};
use taskline::types::ProgressMode;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                task: Vec::new(),
            },
        }
    }

    pub fn with_task(mut self, task: TaskConfig) -> Self {
        self.config.task.push(task);
        self
    }

    pub fn with_progress(mut self, mode: ProgressMode) -> Self {
        self.config.config.progress = mode;
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(name: &str, cmd: &str) -> Self {
        Self {
            task: TaskConfig {
                name: name.to_string(),
                cmd: cmd.to_string(),
                before: None,
                after: None,
                deps: vec![],
            },
        }
    }

    pub fn before(mut self, cmd: &str) -> Self {
        self.task.before = Some(cmd.to_string());
        self
    }

    pub fn after(mut self, cmd: &str) -> Self {
        self.task.after = Some(cmd.to_string());
        self
    }

    pub fn dep(mut self, label: &str) -> Self {
        self.task.deps.push(label.to_string());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
