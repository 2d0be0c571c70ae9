// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod registry;
pub mod report;
pub mod types;

use std::sync::Arc;

use anyhow::{Result, bail};
use indicatif::MultiProgress;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::config::loader::load_and_validate;
use crate::report::{ConsoleReporter, Reporter, TracingReporter};

pub use crate::errors::TasklineError;
pub use crate::registry::{Hook, Registry, RunSummary, Task, TaskContext, TaskDefinition};
pub use crate::types::{ProgressMode, TaskLabel, TaskStatus};

/// High-level entry point used by `main.rs`.
///
/// Loads the task file, builds a registry reporting to the console (or only
/// to the log with `--quiet`), then runs either the single task named by
/// `--task` or every task in order. Spinners are drawn on `progress`, which
/// should be the one the log writer suspends around. Returns an error if any
/// task failed or was skipped.
pub async fn run(args: CliArgs, progress: MultiProgress) -> Result<()> {
    let cfg = load_and_validate(&args.config)?;

    if args.list {
        for label in cfg.labels() {
            println!("{label}");
        }
        return Ok(());
    }

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let reporter: Arc<dyn Reporter> = if args.quiet {
        Arc::new(TracingReporter)
    } else {
        let mode = args
            .progress
            .map(ProgressMode::from)
            .unwrap_or(cfg.config.progress);
        Arc::new(ConsoleReporter::with_progress(mode, progress))
    };
    let registry = Registry::with_reporter(cfg.definitions(), reporter)?;

    match args.task {
        Some(label) => {
            let status = registry.run_task(&label).await?;
            info!(task = %label, %status, "task finished");
            if status.failed() {
                bail!("task '{label}' {status}");
            }
        }
        None => {
            let summary = registry.run().await?;
            if !summary.is_success() {
                bail!(
                    "{} of {} task(s) failed, {} skipped",
                    summary.failed.len(),
                    summary.total(),
                    summary.skipped.len()
                );
            }
        }
    }

    Ok(())
}

/// Simple dry-run output: print tasks, hooks and dependencies.
fn print_dry_run(cfg: &ConfigFile) {
    println!("taskline dry-run");
    println!("  config.progress = {:?}", cfg.config.progress);
    println!();

    println!("tasks ({}):", cfg.task.len());
    for task in &cfg.task {
        println!("  - {}", task.name);
        if let Some(ref before) = task.before {
            println!("      before: {before}");
        }
        println!("      cmd: {}", task.cmd);
        if let Some(ref after) = task.after {
            println!("      after: {after}");
        }
        if !task.deps.is_empty() {
            println!("      deps: {:?}", task.deps);
        }
    }

    debug!("dry-run complete (no execution)");
}
