// src/supervisor/race.rs

//! First-settled-wins races between an operation and its deadline.
//!
//! Three flavours:
//! - [`with_timeout`]: the operation future is polled in place and dropped
//!   if the deadline wins.
//! - [`with_cancellation`]: the operation receives a [`CancellationToken`]
//!   that fires when the deadline wins, and may get a grace period to clean
//!   up.
//! - [`spawn_with_timeout`]: the operation runs on its own Tokio task and is
//!   left running (detached) if the deadline wins.
//!
//! In every flavour exactly one timer is armed per call, and at most one
//! outcome is ever returned. A loser's late result is dropped here and never
//! surfaces anywhere else.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::BoundedError;

use super::deadline::Deadline;

/// Race `operation` against `deadline`.
///
/// Resolves with the operation's own value, or its own error wrapped in
/// [`BoundedError::Upstream`]. Fails with [`BoundedError::Timeout`] carrying
/// the deadline's message if the timer fires first.
///
/// If both become ready in the same instant the operation wins: it is
/// polled before the timer.
pub async fn with_timeout<F, T, E>(operation: F, deadline: &Deadline) -> Result<T, BoundedError<E>>
where
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(deadline.timeout(), operation).await {
        Ok(result) => result.map_err(BoundedError::Upstream),
        Err(_elapsed) => {
            debug!(
                timeout_ms = deadline.timeout_ms(),
                message = %deadline.message(),
                "deadline elapsed before operation settled"
            );
            Err(BoundedError::Timeout(deadline.message().to_string()))
        }
    }
}

/// Race a cancellable operation against `deadline`.
///
/// `operation` is handed a child token of `parent`. When the deadline wins,
/// that token is cancelled and the operation is polled for up to
/// `deadline.grace()` so it can abort in-flight work; whatever it returns
/// during the grace period is discarded.
///
/// If `parent` is cancelled first, the child token fires too and the call
/// fails with [`BoundedError::Cancelled`], even if the operation reacts to
/// its token in the same instant and returns its own error.
pub async fn with_cancellation<Op, Fut, T, E>(
    operation: Op,
    deadline: &Deadline,
    parent: &CancellationToken,
) -> Result<T, BoundedError<E>>
where
    Op: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let token = parent.child_token();
    let fut = operation(token.clone());
    tokio::pin!(fut);

    let failure = tokio::select! {
        biased;
        result = &mut fut => {
            // The child token fires together with the parent, so an operation
            // that bails out on cancellation can settle in the same poll.
            if parent.is_cancelled() {
                debug!("caller cancelled bounded operation; discarding its result");
                return Err(BoundedError::Cancelled);
            }
            return result.map_err(BoundedError::Upstream);
        }
        _ = parent.cancelled() => {
            debug!("caller cancelled bounded operation");
            BoundedError::Cancelled
        }
        _ = tokio::time::sleep(deadline.timeout()) => {
            debug!(
                timeout_ms = deadline.timeout_ms(),
                message = %deadline.message(),
                "deadline elapsed; cancelling operation"
            );
            BoundedError::Timeout(deadline.message().to_string())
        }
    };

    token.cancel();

    let grace = deadline.grace();
    if !grace.is_zero() {
        match tokio::time::timeout(grace, &mut fut).await {
            Ok(_discarded) => debug!("operation settled within cancellation grace; result discarded"),
            Err(_) => warn!(
                grace_ms = u64::try_from(grace.as_millis()).unwrap_or(u64::MAX),
                "operation ignored cancellation for the whole grace period; dropping it"
            ),
        }
    }

    Err(failure)
}

/// Race a spawned operation against `deadline` without cancelling it.
///
/// The operation runs on its own Tokio task. If the deadline wins, the task
/// is detached and keeps running to completion; its eventual result is
/// thrown away. Callers must not assume the underlying work stops.
pub async fn spawn_with_timeout<F, T, E>(operation: F, deadline: &Deadline) -> Result<T, BoundedError<E>>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let handle = tokio::spawn(operation);

    match tokio::time::timeout(deadline.timeout(), handle).await {
        Ok(Ok(result)) => result.map_err(BoundedError::Upstream),
        Ok(Err(join_err)) => {
            warn!(error = %join_err, "bounded operation task failed");
            Err(BoundedError::Aborted(join_err.to_string()))
        }
        Err(_elapsed) => {
            debug!(
                timeout_ms = deadline.timeout_ms(),
                message = %deadline.message(),
                "deadline elapsed; leaving operation task running detached"
            );
            Err(BoundedError::Timeout(deadline.message().to_string()))
        }
    }
}
