// src/report/console.rs

//! Terminal presentation: one spinner per running task plus coloured status
//! banners.
//!
//! Spinners live in an `indicatif` [`MultiProgress`], so nested runs started
//! from a hook get their own line, and any output printed while a spinner is
//! active goes through `MultiProgress::println`, which redraws the bars below
//! it. When animation is off (or stderr is not a terminal) everything is
//! printed as plain append-only lines.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use console::{Term, style};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::report::format::{
    FAILED_DETAIL, banner_label, format_elapsed, skipped_detail,
};
use crate::report::{Reporter, TaskEvent};
use crate::types::{ProgressMode, TaskLabel};

const TICK: Duration = Duration::from_millis(80);

/// Console reporter used by the CLI and by `Registry::new`.
pub struct ConsoleReporter {
    progress: Option<MultiProgress>,
    spinners: Mutex<HashMap<TaskLabel, ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new(mode: ProgressMode) -> Self {
        Self::with_progress(mode, MultiProgress::new())
    }

    /// Draw spinners on `progress`, which may be shared with the log writer
    /// (see [`crate::logging::SuspendingWriter`]). It is left unused when
    /// `mode` turns animation off.
    pub fn with_progress(mode: ProgressMode, progress: MultiProgress) -> Self {
        let animate = match mode {
            ProgressMode::Always => true,
            ProgressMode::Never => false,
            ProgressMode::Auto => Term::stderr().is_term(),
        };

        Self {
            progress: animate.then_some(progress),
            spinners: Mutex::new(HashMap::new()),
        }
    }

    /// Append-only reporter without spinners.
    pub fn plain() -> Self {
        Self::new(ProgressMode::Never)
    }

    fn print(&self, line: &str) {
        match &self.progress {
            Some(mp) if !mp.is_hidden() => {
                if mp.println(line).is_err() {
                    println!("{line}");
                }
            }
            _ => println!("{line}"),
        }
    }

    fn start_spinner(&self, label: &str) {
        let Some(mp) = &self.progress else {
            self.print(&format!("{} {}", style("▶").dim(), style(label).bold()));
            return;
        };

        let bar = mp.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(style(label).bold().to_string());
        bar.enable_steady_tick(TICK);

        let previous = self
            .spinners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(label.to_string(), bar);

        // Same label re-run from inside its own hook.
        if let Some(previous) = previous {
            previous.finish_and_clear();
            mp.remove(&previous);
        }
    }

    fn stop_spinner(&self, label: &str) {
        let bar = self
            .spinners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(label);

        if let (Some(mp), Some(bar)) = (&self.progress, bar) {
            bar.finish_and_clear();
            mp.remove(&bar);
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(ProgressMode::Auto)
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: &TaskEvent) {
        match event {
            TaskEvent::Started { label } => self.start_spinner(label),
            TaskEvent::Output { line, .. } => self.print(line),
            TaskEvent::Succeeded { label, elapsed } => {
                self.stop_spinner(label);
                self.print(&format!(
                    "{} {}",
                    style(banner_label(label)).white().on_green().bold(),
                    style(format_elapsed(*elapsed)).dim()
                ));
            }
            TaskEvent::Failed {
                label,
                stage,
                error,
            } => {
                self.print(&format!("{} {}", style(format!("{stage}:")).red(), error));
                self.stop_spinner(label);
                self.print(&format!(
                    "{} {}",
                    style(banner_label(label)).white().on_red().bold(),
                    style(FAILED_DETAIL).dim()
                ));
            }
            TaskEvent::Skipped { label, dependency } => {
                self.stop_spinner(label);
                self.print(&format!(
                    "{} {}",
                    style(banner_label(label)).black().on_color256(214).bold(),
                    style(skipped_detail(dependency)).dim()
                ));
            }
            // The per-task banners already tell the whole story.
            TaskEvent::Finished(_) => {}
        }
    }
}
