// src/logging.rs

//! Logging setup for `taskline` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `TASKLINE_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! Logs go to stderr through the same `MultiProgress` the console reporter
//! draws its spinners on, so a log line never lands in the middle of a
//! spinner redraw.

use std::io::{self, Write};

use anyhow::Result;
use indicatif::MultiProgress;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::MakeWriter;

use crate::cli::LogLevel;

/// Initialise the global logging subscriber. Call once at startup.
///
/// `progress` must be the `MultiProgress` handed to the console reporter.
pub fn init_logging(cli_level: Option<LogLevel>, progress: MultiProgress) -> Result<()> {
    let level = match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => std::env::var("TASKLINE_LOG")
            .ok()
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(tracing::Level::INFO),
    };

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(SuspendingWriter::new(progress, io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    Ok(())
}

/// [`MakeWriter`] that hides the progress bars while each log event is
/// written to `inner`, then redraws them.
pub struct SuspendingWriter<M> {
    progress: MultiProgress,
    inner: M,
}

impl<M> SuspendingWriter<M> {
    pub fn new(progress: MultiProgress, inner: M) -> Self {
        Self { progress, inner }
    }
}

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for SuspendingWriter<M> {
    type Writer = SuspendedWrite<'a, M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendedWrite {
            progress: &self.progress,
            inner: self.inner.make_writer(),
        }
    }
}

/// Writer produced by [`SuspendingWriter`] for a single log event.
pub struct SuspendedWrite<'a, W> {
    progress: &'a MultiProgress,
    inner: W,
}

impl<W: Write> Write for SuspendedWrite<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let inner = &mut self.inner;
        self.progress.suspend(|| inner.write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        let inner = &mut self.inner;
        self.progress.suspend(|| inner.write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

/// Parse a level name as accepted in `TASKLINE_LOG`.
pub fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
