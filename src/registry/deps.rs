// src/registry/deps.rs

//! Dependency satisfaction for a single task run.
//!
//! A dependency that never ran is a caller mistake and becomes an error; a
//! dependency that failed makes the dependent skip. The two cases are kept
//! apart on purpose.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::registry::task::Task;
use crate::types::TaskLabel;

/// How far below a never-run dependency we look for further unmet
/// dependencies when building the error message.
const UNMET_SEARCH_DEPTH: usize = 1;

/// Result of checking a task's dependencies before running it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DependencyCheck {
    /// Every dependency ran and succeeded.
    Satisfied,
    /// `dependency` failed (or was itself skipped).
    Failed { dependency: TaskLabel },
    /// `dependency` has not run yet.
    NotRun {
        dependency: TaskLabel,
        unmet: Vec<TaskLabel>,
    },
}

/// Check the dependencies of `task` in declaration order, stopping at the
/// first one that is not satisfied.
pub(crate) fn check_dependencies(
    tasks: &HashMap<TaskLabel, Task>,
    task: &Task,
) -> DependencyCheck {
    for dep_label in task.dependencies() {
        let Some(dep) = tasks.get(dep_label) else {
            // Registration rejects unknown dependencies, and tasks are never
            // removed.
            warn!(
                task = %task.label(),
                dep = %dep_label,
                "dependency missing from registry"
            );
            return DependencyCheck::NotRun {
                dependency: dep_label.clone(),
                unmet: Vec::new(),
            };
        };

        if !dep.ran() {
            return DependencyCheck::NotRun {
                dependency: dep_label.clone(),
                unmet: unmet_below(tasks, dep),
            };
        }

        if dep.failed() {
            return DependencyCheck::Failed {
                dependency: dep_label.clone(),
            };
        }
    }

    DependencyCheck::Satisfied
}

/// Breadth-first walk over the dependencies of `root`, bounded by
/// [`UNMET_SEARCH_DEPTH`] levels, collecting labels that have not run.
fn unmet_below(tasks: &HashMap<TaskLabel, Task>, root: &Task) -> Vec<TaskLabel> {
    let mut unmet = Vec::new();
    let mut seen: HashSet<&str> = HashSet::from([root.label()]);
    let mut frontier: Vec<&Task> = vec![root];

    for _ in 0..UNMET_SEARCH_DEPTH {
        let mut next = Vec::new();

        for node in frontier {
            for label in node.dependencies() {
                if !seen.insert(label.as_str()) {
                    continue;
                }
                if let Some(dep) = tasks.get(label) {
                    if !dep.ran() {
                        unmet.push(label.clone());
                        next.push(dep);
                    }
                }
            }
        }

        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    unmet
}
