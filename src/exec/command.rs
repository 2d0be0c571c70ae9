// src/exec/command.rs

//! Shell-command hooks.

use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::registry::{Hook, TaskContext};

/// Build a hook that runs `cmd` through the platform shell.
pub fn shell_hook(cmd: impl Into<String>) -> Hook {
    let cmd: Arc<str> = Arc::from(cmd.into());
    Hook::new(move |ctx| {
        let cmd = Arc::clone(&cmd);
        async move { run_shell(&cmd, &ctx).await }
    })
}

/// Run `cmd` through `sh -c` (`cmd /C` on Windows), forwarding every stdout
/// and stderr line to the task's output. A non-zero exit status is an error.
pub async fn run_shell(cmd: &str, ctx: &TaskContext) -> Result<()> {
    info!(task = %ctx.label(), cmd = %cmd, "starting process");

    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };

    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .with_context(|| format!("spawning `{cmd}` for task '{}'", ctx.label()))?;

    // Drain stderr alongside stdout so neither pipe fills up.
    let stderr_pump = child.stderr.take().map(|stderr| {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                ctx.println(line);
            }
        })
    });

    if let Some(stdout) = child.stdout.take() {
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .with_context(|| format!("reading output of `{cmd}`"))?
        {
            ctx.println(line);
        }
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for `{cmd}` in task '{}'", ctx.label()))?;

    if let Some(pump) = stderr_pump {
        if let Err(e) = pump.await {
            debug!(task = %ctx.label(), error = %e, "stderr reader ended abnormally");
        }
    }

    debug!(
        task = %ctx.label(),
        exit_code = status.code().unwrap_or(-1),
        success = status.success(),
        "process exited"
    );

    if !status.success() {
        match status.code() {
            Some(code) => bail!("`{cmd}` exited with status {code}"),
            None => bail!("`{cmd}` was terminated by a signal"),
        }
    }

    Ok(())
}
