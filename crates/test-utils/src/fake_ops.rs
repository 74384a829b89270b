//! Fake backend operations with controllable timing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Stand-in for whatever a real storage or network client fails with.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FakeBackendError {
    #[error("row not found")]
    NotFound,

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Succeed with `value` after `ms` milliseconds.
pub async fn delay_ok<T>(ms: u64, value: T) -> Result<T, FakeBackendError> {
    sleep(Duration::from_millis(ms)).await;
    Ok(value)
}

/// Fail with `err` after `ms` milliseconds.
pub async fn delay_err<T>(ms: u64, err: FakeBackendError) -> Result<T, FakeBackendError> {
    sleep(Duration::from_millis(ms)).await;
    Err(err)
}

/// Never settles.
pub async fn never<T>() -> Result<T, FakeBackendError> {
    std::future::pending().await
}

/// Records what a cancellable fake operation went through.
#[derive(Debug, Clone, Default)]
pub struct CancelAware {
    observed_cancel: Arc<AtomicBool>,
    cleaned_up: Arc<AtomicBool>,
    completed: Arc<AtomicBool>,
}

impl CancelAware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Work for `work_ms`, unless `token` fires first; then spend
    /// `cleanup_ms` cleaning up before giving up.
    pub async fn run(
        self,
        token: CancellationToken,
        work_ms: u64,
        cleanup_ms: u64,
    ) -> Result<&'static str, FakeBackendError> {
        tokio::select! {
            _ = sleep(Duration::from_millis(work_ms)) => {
                self.completed.store(true, Ordering::SeqCst);
                Ok("done")
            }
            _ = token.cancelled() => {
                self.observed_cancel.store(true, Ordering::SeqCst);
                sleep(Duration::from_millis(cleanup_ms)).await;
                self.cleaned_up.store(true, Ordering::SeqCst);
                Err(FakeBackendError::Unavailable("cancelled".to_string()))
            }
        }
    }

    pub fn observed_cancel(&self) -> bool {
        self.observed_cancel.load(Ordering::SeqCst)
    }

    pub fn cleaned_up(&self) -> bool {
        self.cleaned_up.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }
}

/// Flag set by an operation when it finishes, used to see whether work
/// kept running after its caller gave up.
#[derive(Debug, Clone, Default)]
pub struct CompletionFlag(Arc<AtomicBool>);

impl CompletionFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_after(self, ms: u64) -> Result<(), FakeBackendError> {
        sleep(Duration::from_millis(ms)).await;
        self.0.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
