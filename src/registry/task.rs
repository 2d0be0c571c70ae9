// src/registry/task.rs

//! Task definitions, hooks, and the per-task record owned by a registry.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::registry::Registry;
use crate::report::TaskEvent;
use crate::types::{TaskLabel, TaskStatus};

/// Boxed future returned by every hook invocation.
pub type HookFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// A zero-argument asynchronous operation (besides its [`TaskContext`]).
///
/// Cloning a hook is cheap; the closure is shared.
#[derive(Clone)]
pub struct Hook(Arc<dyn Fn(TaskContext) -> HookFuture + Send + Sync>);

impl Hook {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self(Arc::new(move |ctx: TaskContext| -> HookFuture { Box::pin(f(ctx)) }))
    }

    pub(crate) fn call(&self, ctx: TaskContext) -> HookFuture {
        (self.0)(ctx)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hook(..)")
    }
}

/// Everything needed to register a task: the callback, optional lifecycle
/// hooks, and the labels it depends on.
///
/// ```rust,ignore
/// let def = TaskDefinition::new(|ctx| async move {
///     ctx.println("building");
///     Ok(())
/// })
/// .after(|ctx| async move {
///     ctx.println("built");
///     Ok(())
/// })
/// .depends_on("lint");
/// ```
#[derive(Clone, Debug)]
pub struct TaskDefinition {
    pub(crate) callback: Hook,
    pub(crate) before: Option<Hook>,
    pub(crate) after: Option<Hook>,
    pub(crate) dependencies: Vec<TaskLabel>,
}

impl TaskDefinition {
    pub fn new<F, Fut>(callback: F) -> Self
    where
        F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self::from_hook(Hook::new(callback))
    }

    pub fn from_hook(callback: Hook) -> Self {
        Self {
            callback,
            before: None,
            after: None,
            dependencies: Vec::new(),
        }
    }

    /// Run `hook` right before the callback.
    pub fn before<F, Fut>(self, hook: F) -> Self
    where
        F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.before_hook(Hook::new(hook))
    }

    /// Run `hook` right after a successful callback.
    pub fn after<F, Fut>(self, hook: F) -> Self
    where
        F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.after_hook(Hook::new(hook))
    }

    pub fn before_hook(mut self, hook: Hook) -> Self {
        self.before = Some(hook);
        self
    }

    pub fn after_hook(mut self, hook: Hook) -> Self {
        self.after = Some(hook);
        self
    }

    pub fn depends_on(mut self, label: impl Into<TaskLabel>) -> Self {
        self.dependencies.push(label.into());
        self
    }

    pub fn dependencies<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskLabel>,
    {
        self.dependencies.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn dependency_labels(&self) -> &[TaskLabel] {
        &self.dependencies
    }
}

/// A registered task together with its run state.
///
/// Values handed out by [`Registry::get`] and [`Registry::tasks`] are
/// snapshots; the registry keeps the authoritative copy.
#[derive(Clone, Debug)]
pub struct Task {
    label: TaskLabel,
    definition: TaskDefinition,
    status: TaskStatus,
}

impl Task {
    pub(crate) fn new(label: TaskLabel, definition: TaskDefinition) -> Self {
        Self {
            label,
            definition,
            status: TaskStatus::Pending,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn dependencies(&self) -> &[TaskLabel] {
        &self.definition.dependencies
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Execution finished, or was skipped because a dependency failed.
    pub fn ran(&self) -> bool {
        self.status.ran()
    }

    pub fn failed(&self) -> bool {
        self.status.failed()
    }

    pub fn has_before(&self) -> bool {
        self.definition.before.is_some()
    }

    pub fn has_after(&self) -> bool {
        self.definition.after.is_some()
    }

    pub(crate) fn definition(&self) -> &TaskDefinition {
        &self.definition
    }

    pub(crate) fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }
}

/// Handle passed to every hook invocation.
#[derive(Clone)]
pub struct TaskContext {
    label: TaskLabel,
    registry: Registry,
}

impl TaskContext {
    pub(crate) fn new(label: TaskLabel, registry: Registry) -> Self {
        Self { label, registry }
    }

    /// Label of the task being executed.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The registry that owns this task. Hooks may use it to run, or
    /// register and run, further tasks.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Print a line of task output through the registry's reporter.
    pub fn println(&self, line: impl Into<String>) {
        self.registry.report(&TaskEvent::Output {
            label: self.label.clone(),
            line: line.into(),
        });
    }
}

impl fmt::Debug for TaskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskContext")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
