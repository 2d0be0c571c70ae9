// src/report/format.rs

//! Plain-text pieces shared by error messages and status banners.
//!
//! Nothing here applies colour; the console reporter styles these strings.

use std::time::Duration;

use crate::types::TaskLabel;

pub const FAILED_DETAIL: &str = "Task has failed";

/// Render an elapsed duration as `<n>ms`, or `<s.ss>s` from one second up.
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    if millis < 1000 {
        format!("{millis}ms")
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}

pub fn skipped_detail(dependency: &str) -> String {
    format!("Skipped because dependency \"{dependency}\" has failed")
}

/// Padded label used inside coloured banners.
pub fn banner_label(label: &str) -> String {
    format!("  {label}  ")
}

/// Suffix for `DependencyNotRun` listing further dependencies that have not
/// run either. Empty when there are none.
pub fn unmet_suffix(unmet: &[TaskLabel]) -> String {
    if unmet.is_empty() {
        return String::new();
    }
    let quoted: Vec<String> = unmet.iter().map(|l| format!("\"{l}\"")).collect();
    format!(" (which itself still needs {})", quoted.join(", "))
}
