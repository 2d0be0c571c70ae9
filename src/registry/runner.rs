// src/registry/runner.rs

//! Hook sequencing for one task run: `before`, `callback`, `after`.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::registry::task::{TaskContext, TaskDefinition};

/// Which part of a task was executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Before,
    Callback,
    After,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Before => "before",
            Stage::Callback => "callback",
            Stage::After => "after",
        };
        f.write_str(s)
    }
}

/// Outcome of running a task's stages.
#[derive(Debug)]
pub(crate) enum StageOutcome {
    /// Every stage succeeded. `elapsed` is the callback's wall-clock time.
    Succeeded { elapsed: Duration },
    Failed { stage: Stage, error: anyhow::Error },
}

/// Run the stages of `definition` in order, stopping at the first error.
pub(crate) async fn run_stages(definition: &TaskDefinition, ctx: &TaskContext) -> StageOutcome {
    if let Some(before) = &definition.before {
        debug!(task = %ctx.label(), "running before hook");
        if let Err(error) = before.call(ctx.clone()).await {
            return StageOutcome::Failed {
                stage: Stage::Before,
                error,
            };
        }
    }

    debug!(task = %ctx.label(), "running callback");
    let started = Instant::now();
    let result = definition.callback.call(ctx.clone()).await;
    let elapsed = started.elapsed();

    if let Err(error) = result {
        return StageOutcome::Failed {
            stage: Stage::Callback,
            error,
        };
    }

    if let Some(after) = &definition.after {
        debug!(task = %ctx.label(), "running after hook");
        if let Err(error) = after.call(ctx.clone()).await {
            return StageOutcome::Failed {
                stage: Stage::After,
                error,
            };
        }
    }

    StageOutcome::Succeeded { elapsed }
}
