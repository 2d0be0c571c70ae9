// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::default_config_path;
use crate::types::ProgressMode;

/// Command-line arguments for `taskline`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskline",
    version,
    about = "Run labelled tasks in order, with dependencies and before/after hooks.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the task file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Run only this task. Its dependencies must not be pending.
    #[arg(long, value_name = "NAME")]
    pub task: Option<String>,

    /// Print task labels in registration order and exit.
    #[arg(long)]
    pub list: bool,

    /// Parse + validate, print the tasks, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,

    /// No banners or spinners; task progress and output go to the log only.
    #[arg(long, conflicts_with = "progress")]
    pub quiet: bool,

    /// Spinner animation; overrides `[config].progress`.
    #[arg(long, value_enum, value_name = "MODE")]
    pub progress: Option<ProgressArg>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKLINE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Progress mode as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum ProgressArg {
    Auto,
    Always,
    Never,
}

impl From<ProgressArg> for ProgressMode {
    fn from(arg: ProgressArg) -> Self {
        match arg {
            ProgressArg::Auto => ProgressMode::Auto,
            ProgressArg::Always => ProgressMode::Always,
            ProgressArg::Never => ProgressMode::Never,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
