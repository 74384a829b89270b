// src/exec/command.rs

//! Single command runner.

use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A shell command line to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub line: String,
}

impl CommandSpec {
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }

    /// Join CLI arguments back into one shell line.
    pub fn from_args(args: &[String]) -> Self {
        Self::new(args.join(" "))
    }

    fn shell(&self) -> Command {
        if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.line);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.line);
            c
        }
    }
}

/// How a command run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The process exited on its own with this code. A child that died from
    /// a signal reports `128 + signal`, the way shells do.
    Exited(i32),
    /// The cancellation token fired and the process was killed.
    Killed,
}

/// Run `spec` to completion, or kill it once `cancel` fires.
///
/// The child inherits stdout/stderr. It is also killed if this future is
/// dropped, so a deadline that drops the operation never leaks the process.
pub async fn run_command(spec: CommandSpec, cancel: CancellationToken) -> Result<CommandOutcome> {
    info!(cmd = %spec.line, "starting command");

    let mut cmd = spec.shell();
    cmd.stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for command '{}'", spec.line))?;

    tokio::select! {
        status_res = child.wait() => {
            let status = status_res
                .with_context(|| format!("waiting for process of command '{}'", spec.line))?;

            let code = exit_code(status);
            info!(
                cmd = %spec.line,
                exit_code = code,
                success = status.success(),
                "command exited"
            );
            Ok(CommandOutcome::Exited(code))
        }

        _ = cancel.cancelled() => {
            info!(cmd = %spec.line, "cancellation requested; killing process");
            if let Err(e) = child.kill().await {
                warn!(cmd = %spec.line, error = %e, "failed to kill child process on cancellation");
            } else {
                debug!(cmd = %spec.line, "child process killed");
            }
            Ok(CommandOutcome::Killed)
        }
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
