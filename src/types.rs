// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Canonical task label type used throughout the crate.
pub type TaskLabel = String;

/// Lifecycle of a single task within its registry.
///
/// ```text
/// Pending -> Running -> Succeeded
///                    -> Failed
/// Pending ----------> Skipped   (a dependency had failed)
/// ```
///
/// Re-running a label moves it back through `Running`; nothing is reset
/// automatically between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    /// Registered, never executed.
    #[default]
    Pending,
    /// Hooks are currently executing.
    Running,
    Succeeded,
    /// `before`, `callback` or `after` returned an error.
    Failed,
    /// Never executed because a dependency had failed. Counts as failed for
    /// anything that depends on this task.
    Skipped,
}

impl TaskStatus {
    /// Whether the task reached a terminal state.
    pub fn ran(self) -> bool {
        matches!(
            self,
            TaskStatus::Succeeded | TaskStatus::Failed | TaskStatus::Skipped
        )
    }

    pub fn failed(self) -> bool {
        matches!(self, TaskStatus::Failed | TaskStatus::Skipped)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Succeeded => "succeeded",
            TaskStatus::Failed => "failed",
            TaskStatus::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Whether the console reporter animates a spinner per running task.
///
/// - `Auto`: animate only when stderr is a terminal.
/// - `Always`: always animate.
/// - `Never`: plain append-only log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for ProgressMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ProgressMode::Auto),
            "always" => Ok(ProgressMode::Always),
            "never" => Ok(ProgressMode::Never),
            other => Err(format!(
                "invalid progress mode: {other} (expected \"auto\", \"always\" or \"never\")"
            )),
        }
    }
}
