// src/exec/mod.rs

//! Process execution for tasks defined in a config file.
//!
//! [`command`] turns a shell command line into a [`Hook`](crate::registry::Hook)
//! using `tokio::process::Command`; the process output is streamed into the
//! task's reporter line by line.

pub mod command;

pub use command::{run_shell, shell_hook};
