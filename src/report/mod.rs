// src/report/mod.rs

//! Progress reporting.
//!
//! The registry never prints. It hands [`TaskEvent`]s to an injected
//! [`Reporter`], and hooks route their own output through the same sink via
//! `TaskContext::println`, so a live progress indicator can redraw around it.
//!
//! - [`console`] renders spinners and coloured banners for terminals.
//! - [`format`] holds the plain-text pieces shared with error messages.

pub mod console;
pub mod format;

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::registry::{RunSummary, Stage};
use crate::types::TaskLabel;

pub use self::console::ConsoleReporter;

/// Events emitted while tasks execute.
#[derive(Debug, Clone)]
pub enum TaskEvent {
    /// The task was picked up. Followed by either `Skipped` or the outcome
    /// of its hooks.
    Started { label: TaskLabel },
    /// A line of output produced by the task while it runs.
    Output { label: TaskLabel, line: String },
    /// All stages succeeded. `elapsed` covers the callback stage only.
    Succeeded { label: TaskLabel, elapsed: Duration },
    /// A stage returned an error; later stages were not run.
    Failed {
        label: TaskLabel,
        stage: Stage,
        error: String,
    },
    /// The task was not executed because `dependency` had failed.
    Skipped {
        label: TaskLabel,
        dependency: TaskLabel,
    },
    /// A bulk run over the whole registry finished.
    Finished(RunSummary),
}

impl TaskEvent {
    /// Label of the task this event concerns, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            TaskEvent::Started { label }
            | TaskEvent::Output { label, .. }
            | TaskEvent::Succeeded { label, .. }
            | TaskEvent::Failed { label, .. }
            | TaskEvent::Skipped { label, .. } => Some(label),
            TaskEvent::Finished(_) => None,
        }
    }
}

/// Sink for task progress.
pub trait Reporter: Send + Sync {
    fn report(&self, event: &TaskEvent);
}

/// Reporter that only forwards events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &TaskEvent) {
        match event {
            TaskEvent::Started { label } => debug!(task = %label, "task started"),
            TaskEvent::Output { label, line } => info!(task = %label, "{}", line),
            TaskEvent::Succeeded { label, elapsed } => info!(
                task = %label,
                elapsed = %format::format_elapsed(*elapsed),
                "task succeeded"
            ),
            TaskEvent::Failed {
                label,
                stage,
                error,
            } => warn!(task = %label, %stage, error = %error, "task failed"),
            TaskEvent::Skipped { label, dependency } => warn!(
                task = %label,
                dependency = %dependency,
                "task skipped because a dependency failed"
            ),
            TaskEvent::Finished(summary) => info!(
                succeeded = summary.succeeded.len(),
                failed = summary.failed.len(),
                skipped = summary.skipped.len(),
                elapsed = %format::format_elapsed(summary.elapsed),
                "run finished"
            ),
        }
    }
}

/// Reporter that keeps every event in memory, for inspection in tests.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<TaskEvent>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events received so far, in order.
    pub fn events(&self) -> Vec<TaskEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Output lines printed by the given task.
    pub fn output_of(&self, label: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                TaskEvent::Output { label: l, line } if l == label => Some(line),
                _ => None,
            })
            .collect()
    }

    /// Labels in the order they were picked up, skipped ones included.
    pub fn started(&self) -> Vec<TaskLabel> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                TaskEvent::Started { label } => Some(label),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, event: &TaskEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
