// src/exec/mod.rs

//! Process execution layer.
//!
//! Runs a shell command under a [`CancellationToken`](tokio_util::sync::CancellationToken)
//! so the supervisor can kill it when its deadline fires.
//!
//! - [`command`] builds the platform shell invocation and owns the child
//!   process lifecycle.

pub mod command;

pub use command::{CommandOutcome, CommandSpec, run_command};
