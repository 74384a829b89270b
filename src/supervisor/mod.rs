// src/supervisor/mod.rs

//! Bounded operation supervisor.
//!
//! - [`deadline`] holds the per-call [`Deadline`] value.
//! - [`presets`] holds built-in constants and the per-category table.
//! - [`race`] implements the operation-vs-timer races.
//! - [`progress`] provides elapsed-time tracking for slow operations.
//!
//! [`Supervisor`] ties these to a validated [`ConfigFile`], so callers (and
//! tests) can inject arbitrary deadlines instead of relying on constants.

pub mod deadline;
pub mod presets;
pub mod progress;
pub mod race;

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::ConfigFile;
use crate::errors::BoundedError;
use crate::types::{Category, WarnPolicy};

pub use deadline::Deadline;
pub use presets::Presets;
pub use progress::{ProgressTracker, observe};
pub use race::{spawn_with_timeout, with_cancellation, with_timeout};

/// Configured front door for bounded operations.
///
/// Holds no per-call state: concurrent calls on one supervisor never
/// interfere with each other.
#[derive(Debug, Clone)]
pub struct Supervisor {
    default_deadline: Deadline,
    presets: Presets,
    slow_warning: Duration,
    warn_policy: WarnPolicy,
    progress_interval: Duration,
}

impl Supervisor {
    pub fn new(config: ConfigFile) -> Self {
        Self::from_config(&config)
    }

    pub fn from_config(config: &ConfigFile) -> Self {
        Self {
            default_deadline: config.default_deadline().clone(),
            presets: config.presets().clone(),
            slow_warning: config.slow_warning(),
            warn_policy: config.warn_policy(),
            progress_interval: config.progress_interval(),
        }
    }

    pub fn default_deadline(&self) -> &Deadline {
        &self.default_deadline
    }

    pub fn preset(&self, category: Category) -> &Deadline {
        self.presets.get(category)
    }

    /// Build a deadline, filling unset parts from the configured default.
    pub fn deadline(&self, timeout_ms: Option<u64>, message: Option<&str>) -> Deadline {
        let mut deadline = self.default_deadline.clone();
        if let Some(ms) = timeout_ms {
            deadline = Deadline::new(ms, deadline.message()).with_grace(deadline.grace());
        }
        if let Some(msg) = message {
            deadline = deadline.with_message(msg);
        }
        deadline
    }

    /// Bound `operation` by the default deadline.
    pub async fn run<F, T, E>(&self, operation: F) -> Result<T, BoundedError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        with_timeout(operation, &self.default_deadline).await
    }

    pub async fn run_with<F, T, E>(&self, operation: F, deadline: &Deadline) -> Result<T, BoundedError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        with_timeout(operation, deadline).await
    }

    /// Bound `operation` by the preset for `category`.
    pub async fn run_preset<F, T, E>(&self, category: Category, operation: F) -> Result<T, BoundedError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        debug!(%category, "running operation under category preset");
        with_timeout(operation, self.presets.get(category)).await
    }

    pub async fn query<F, T, E>(&self, operation: F) -> Result<T, BoundedError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.run_preset(Category::Query, operation).await
    }

    pub async fn auth<F, T, E>(&self, operation: F) -> Result<T, BoundedError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.run_preset(Category::Auth, operation).await
    }

    pub async fn insert<F, T, E>(&self, operation: F) -> Result<T, BoundedError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.run_preset(Category::Insert, operation).await
    }

    /// See [`with_cancellation`].
    pub async fn run_cancellable<Op, Fut, T, E>(
        &self,
        operation: Op,
        deadline: &Deadline,
        parent: &CancellationToken,
    ) -> Result<T, BoundedError<E>>
    where
        Op: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        with_cancellation(operation, deadline, parent).await
    }

    /// See [`spawn_with_timeout`].
    pub async fn run_detached<F, T, E>(&self, operation: F, deadline: &Deadline) -> Result<T, BoundedError<E>>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        spawn_with_timeout(operation, deadline).await
    }

    /// Bound `operation` by `deadline` while a tracker named `name` checks
    /// for slowness every progress interval.
    pub async fn run_tracked<F, T, E>(
        &self,
        name: &str,
        operation: F,
        deadline: &Deadline,
    ) -> Result<T, BoundedError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        let tracker = self.tracker(name);
        let result = observe(&tracker, self.progress_interval, with_timeout(operation, deadline)).await;

        debug!(
            operation = %name,
            elapsed_ms = u64::try_from(tracker.get_elapsed().as_millis()).unwrap_or(u64::MAX),
            timed_out = matches!(result, Err(BoundedError::Timeout(_))),
            "tracked operation finished"
        );

        result
    }

    /// Create a progress tracker using the configured threshold and policy.
    pub fn tracker(&self, name: impl Into<String>) -> ProgressTracker {
        ProgressTracker::with_threshold(name, self.slow_warning, self.warn_policy)
    }

    pub fn progress_interval(&self) -> Duration {
        self.progress_interval
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new(ConfigFile::default())
    }
}
