// src/registry/mod.rs

//! Ordered task registry and the sequential execution engine.
//!
//! - [`task`] holds task definitions, hooks and the per-task record.
//! - `deps` decides whether a task may run, must skip, or is being run
//!   too early.
//! - [`runner`] sequences `before`, `callback` and `after` for one run.
//!
//! A [`Registry`] is a cheap handle; clones share the same tasks. Its lock is
//! only ever held for short bookkeeping sections and never across an
//! `.await`, which is what lets a hook call back into the registry that is
//! running it.

mod deps;
pub mod runner;
pub mod task;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::errors::{Result, TasklineError};
use crate::registry::deps::{DependencyCheck, check_dependencies};
use crate::registry::runner::{StageOutcome, run_stages};
use crate::report::{ConsoleReporter, Reporter, TaskEvent};
use crate::types::{TaskLabel, TaskStatus};

pub use runner::Stage;
pub use task::{Hook, HookFuture, Task, TaskContext, TaskDefinition};

/// Per-label outcome of a bulk [`Registry::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: Vec<TaskLabel>,
    pub failed: Vec<TaskLabel>,
    /// Not executed because a dependency failed.
    pub skipped: Vec<TaskLabel>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len() + self.skipped.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

#[derive(Default)]
struct RegistryState {
    /// Labels in registration order.
    order: Vec<TaskLabel>,
    tasks: HashMap<TaskLabel, Task>,
}

impl RegistryState {
    /// Every dependency must be registered at an earlier position than the
    /// slot `label` occupies (or will occupy, for a new label).
    fn validate(&self, label: &str, definition: &TaskDefinition) -> Result<()> {
        let slot = self.position(label).unwrap_or(self.order.len());

        for dep in definition.dependency_labels() {
            let earlier = self.position(dep).is_some_and(|pos| pos < slot);
            if !earlier {
                return Err(TasklineError::DependencyOrder {
                    task: label.to_string(),
                    dependency: dep.clone(),
                });
            }
        }
        Ok(())
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.order.iter().position(|l| l == label)
    }

    /// Insert or overwrite. An overwritten label keeps its position.
    fn insert(&mut self, label: TaskLabel, definition: TaskDefinition) {
        if !self.tasks.contains_key(&label) {
            self.order.push(label.clone());
        }
        self.tasks
            .insert(label.clone(), Task::new(label, definition));
    }
}

struct Shared {
    state: Mutex<RegistryState>,
    reporter: Arc<dyn Reporter>,
}

/// Ordered, label-keyed collection of tasks.
#[derive(Clone)]
pub struct Registry {
    shared: Arc<Shared>,
}

impl Registry {
    /// Build a registry that reports to the console.
    ///
    /// Definitions are registered in iteration order. If any of them depends
    /// on a label that was not registered earlier, the whole construction
    /// fails with [`TasklineError::DependencyOrder`].
    pub fn new<I, L>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = (L, TaskDefinition)>,
        L: Into<TaskLabel>,
    {
        Self::with_reporter(definitions, Arc::new(ConsoleReporter::default()))
    }

    /// Like [`Registry::new`], with an injected reporter.
    pub fn with_reporter<I, L>(definitions: I, reporter: Arc<dyn Reporter>) -> Result<Self>
    where
        I: IntoIterator<Item = (L, TaskDefinition)>,
        L: Into<TaskLabel>,
    {
        let mut state = RegistryState::default();

        for (label, definition) in definitions {
            let label = label.into();
            state.validate(&label, &definition)?;
            state.insert(label, definition);
        }

        debug!(tasks = state.order.len(), "registry constructed");

        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                reporter,
            }),
        })
    }

    /// Snapshot of the task registered under `label`.
    pub fn get(&self, label: &str) -> Result<Task> {
        self.lock()
            .tasks
            .get(label)
            .cloned()
            .ok_or_else(|| TasklineError::UnknownLabel(label.to_string()))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.lock().tasks.contains_key(label)
    }

    /// Snapshots of all tasks, in registration order.
    pub fn tasks(&self) -> Vec<Task> {
        let state = self.lock();
        state
            .order
            .iter()
            .filter_map(|label| state.tasks.get(label).cloned())
            .collect()
    }

    /// All labels, in registration order.
    pub fn labels(&self) -> Vec<TaskLabel> {
        self.lock().order.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().order.is_empty()
    }

    /// Run every task registered when the call starts, one after another, in
    /// registration order.
    ///
    /// Task failures do not stop the sweep and do not make this return an
    /// error; they are recorded on the tasks and in the summary. Only usage
    /// errors are returned.
    ///
    /// Panics raised by a hook are not caught. They unwind out of this call
    /// and leave the task in [`TaskStatus::Running`].
    pub async fn run(&self) -> Result<RunSummary> {
        let labels = self.labels();
        info!(tasks = labels.len(), "running all tasks");

        let started = Instant::now();
        let mut summary = RunSummary::default();

        for label in labels {
            match self.run_label(&label).await? {
                TaskStatus::Succeeded => summary.succeeded.push(label),
                TaskStatus::Skipped => summary.skipped.push(label),
                _ => summary.failed.push(label),
            }
        }

        summary.elapsed = started.elapsed();
        self.report(&TaskEvent::Finished(summary.clone()));

        Ok(summary)
    }

    /// Run exactly the task registered under `label`.
    ///
    /// As with [`Registry::run`], a panicking hook leaves the task
    /// [`TaskStatus::Running`].
    pub async fn run_task(&self, label: &str) -> Result<TaskStatus> {
        self.run_label(label).await
    }

    /// Register `definition` under `label`, replacing any task of that name,
    /// and run it immediately.
    ///
    /// The definition is validated first; if that fails the registry is left
    /// untouched.
    pub async fn run_with(
        &self,
        label: impl Into<TaskLabel>,
        definition: TaskDefinition,
    ) -> Result<TaskStatus> {
        let label = label.into();

        {
            let mut state = self.lock();
            state.validate(&label, &definition)?;
            state.insert(label.clone(), definition);
        }
        debug!(task = %label, "registered ad-hoc task");

        self.run_label(&label).await
    }

    async fn run_label(&self, label: &str) -> Result<TaskStatus> {
        let (definition, check) = {
            let state = self.lock();
            let task = state
                .tasks
                .get(label)
                .ok_or_else(|| TasklineError::UnknownLabel(label.to_string()))?;
            (
                task.definition().clone(),
                check_dependencies(&state.tasks, task),
            )
        };

        match check {
            DependencyCheck::Satisfied => {}
            DependencyCheck::Failed { dependency } => {
                info!(
                    task = %label,
                    dependency = %dependency,
                    "skipping task because a dependency failed"
                );
                self.set_status(label, TaskStatus::Skipped);
                self.report(&TaskEvent::Started {
                    label: label.to_string(),
                });
                self.report(&TaskEvent::Skipped {
                    label: label.to_string(),
                    dependency,
                });
                return Ok(TaskStatus::Skipped);
            }
            DependencyCheck::NotRun { dependency, unmet } => {
                warn!(
                    task = %label,
                    dependency = %dependency,
                    ?unmet,
                    "task run before its dependency"
                );
                return Err(TasklineError::DependencyNotRun {
                    task: label.to_string(),
                    dependency,
                    unmet,
                });
            }
        }

        self.set_status(label, TaskStatus::Running);
        self.report(&TaskEvent::Started {
            label: label.to_string(),
        });

        let ctx = TaskContext::new(label.to_string(), self.clone());

        let status = match run_stages(&definition, &ctx).await {
            StageOutcome::Succeeded { elapsed } => {
                debug!(task = %label, elapsed_ms = elapsed.as_millis() as u64, "task succeeded");
                self.set_status(label, TaskStatus::Succeeded);
                self.report(&TaskEvent::Succeeded {
                    label: label.to_string(),
                    elapsed,
                });
                TaskStatus::Succeeded
            }
            StageOutcome::Failed { stage, error } => {
                let error = format!("{error:#}");
                warn!(task = %label, %stage, error = %error, "task failed");
                self.set_status(label, TaskStatus::Failed);
                self.report(&TaskEvent::Failed {
                    label: label.to_string(),
                    stage,
                    error,
                });
                TaskStatus::Failed
            }
        };

        Ok(status)
    }

    fn set_status(&self, label: &str, status: TaskStatus) {
        if let Some(task) = self.lock().tasks.get_mut(label) {
            task.set_status(status);
        }
    }

    pub(crate) fn report(&self, event: &TaskEvent) {
        self.shared.reporter.report(event);
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("labels", &self.labels())
            .finish_non_exhaustive()
    }
}
