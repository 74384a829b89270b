// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod supervisor;
pub mod types;

use std::path::Path;

use anyhow::{Result, bail};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_or_default};
use crate::errors::BoundedError;
use crate::exec::{CommandOutcome, CommandSpec, run_command};
use crate::supervisor::{Deadline, Supervisor, observe};

pub use crate::errors::TimeboxError;
pub use crate::supervisor::{ProgressTracker, spawn_with_timeout, with_cancellation, with_timeout};

/// Exit code when the deadline wins (same as coreutils `timeout`).
pub const EXIT_TIMEOUT: i32 = 124;

/// Exit code when interrupted with Ctrl-C.
pub const EXIT_INTERRUPTED: i32 = 130;

/// Exit code when the child was killed for any other reason.
pub const EXIT_KILLED: i32 = 137;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - deadline selection (flags, category preset, default)
/// - the bounded, cancellable command run
/// - Ctrl-C handling
///
/// Returns the process exit code.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_or_default(args.config.as_deref().map(Path::new))?;
    let supervisor = Supervisor::from_config(&cfg);
    let deadline = resolve_deadline(&supervisor, &args);

    if args.dry_run {
        print_dry_run(&cfg, &deadline, &args);
        return Ok(0);
    }

    if args.command.is_empty() {
        bail!("no command given; usage: timebox [OPTIONS] -- COMMAND...");
    }
    let spec = CommandSpec::from_args(&args.command);

    // Ctrl-C → cancel the parent token.
    let shutdown = CancellationToken::new();
    {
        let token = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            token.cancel();
        });
    }

    info!(
        cmd = %spec.line,
        timeout_ms = deadline.timeout_ms(),
        "running command under deadline"
    );

    let tracker = supervisor.tracker(spec.line.clone());
    let result = observe(
        &tracker,
        supervisor.progress_interval(),
        supervisor.run_cancellable(|token| run_command(spec, token), &deadline, &shutdown),
    )
    .await;

    debug!(
        elapsed_ms = u64::try_from(tracker.get_elapsed().as_millis()).unwrap_or(u64::MAX),
        "command finished"
    );
    exit_code_for(result)
}

/// Pick the deadline for this invocation.
///
/// `--timeout-ms` / `--message` override whichever base deadline applies;
/// the base is the `--category` preset if given, else the default.
pub fn resolve_deadline(supervisor: &Supervisor, args: &CliArgs) -> Deadline {
    let base = match args.category {
        Some(cat) => supervisor.preset(cat).clone(),
        None => supervisor.default_deadline().clone(),
    };

    let mut deadline = match args.timeout_ms {
        Some(ms) => Deadline::new(ms, base.message()).with_grace(base.grace()),
        None => base,
    };
    if let Some(ref msg) = args.message {
        deadline = deadline.with_message(msg.as_str());
    }
    deadline
}

/// Map a bounded command outcome onto a process exit code.
pub fn exit_code_for(result: std::result::Result<CommandOutcome, BoundedError<anyhow::Error>>) -> Result<i32> {
    match result {
        Ok(CommandOutcome::Exited(code)) => Ok(code),
        Ok(CommandOutcome::Killed) => Ok(EXIT_KILLED),
        Err(BoundedError::Timeout(msg)) => {
            error!(message = %msg, "command timed out");
            eprintln!("timebox: {msg}");
            Ok(EXIT_TIMEOUT)
        }
        Err(BoundedError::Cancelled) => {
            info!("interrupted; command killed");
            Ok(EXIT_INTERRUPTED)
        }
        Err(BoundedError::Upstream(e)) => Err(e),
        Err(BoundedError::Aborted(reason)) => bail!("command task aborted: {reason}"),
    }
}

/// Simple dry-run output: print settings and the chosen deadline.
fn print_dry_run(cfg: &ConfigFile, deadline: &Deadline, args: &CliArgs) {
    println!("timebox dry-run");
    println!(
        "  default: {} ms, \"{}\"",
        cfg.default_deadline().timeout_ms(),
        cfg.default_deadline().message()
    );
    println!("  slow_warning: {} ms ({:?})", cfg.slow_warning().as_millis(), cfg.warn_policy());
    println!("  progress_interval: {} ms", cfg.progress_interval().as_millis());
    println!("  cancel_grace: {} ms", deadline.grace().as_millis());
    println!();

    println!("presets:");
    for (category, preset) in cfg.presets().iter() {
        println!("  - {category}: {} ms, \"{}\"", preset.timeout_ms(), preset.message());
    }
    println!();

    println!("selected: {} ms, \"{}\"", deadline.timeout_ms(), deadline.message());
    if !args.command.is_empty() {
        println!("command: {}", args.command.join(" "));
    }

    debug!("dry-run complete (no execution)");
}
