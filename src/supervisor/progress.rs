// src/supervisor/progress.rs

//! Elapsed-time tracking for slow-operation diagnostics.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{trace, warn};

use crate::types::WarnPolicy;

use super::presets::slow_warning_threshold;

/// Shortest period `observe` will poll a tracker at.
pub const MIN_CHECK_INTERVAL: Duration = Duration::from_millis(1);

/// Records when an operation started and warns once it runs long.
///
/// Holds no external resource; drop it whenever the caller stops polling.
#[derive(Debug)]
pub struct ProgressTracker {
    name: String,
    started: Instant,
    warn_after: Duration,
    policy: WarnPolicy,
    warnings: AtomicU64,
}

impl ProgressTracker {
    /// Tracker with the built-in 5 s threshold, warning on every check.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_threshold(name, slow_warning_threshold(), WarnPolicy::Every)
    }

    pub fn with_threshold(name: impl Into<String>, warn_after: Duration, policy: WarnPolicy) -> Self {
        Self {
            name: name.into(),
            started: Instant::now(),
            warn_after,
            policy,
            warnings: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Elapsed time since creation. Never decreases.
    pub fn get_elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Elapsed time since creation, logging a warning if past the threshold.
    ///
    /// With [`WarnPolicy::Every`] each call past the threshold warns again.
    pub fn check_progress(&self) -> Duration {
        let elapsed = self.get_elapsed();

        if elapsed > self.warn_after {
            let should_warn = match self.policy {
                WarnPolicy::Every => {
                    self.warnings.fetch_add(1, Ordering::Relaxed);
                    true
                }
                WarnPolicy::Once => self
                    .warnings
                    .compare_exchange(0, 1, Ordering::Relaxed, Ordering::Relaxed)
                    .is_ok(),
            };
            if should_warn {
                warn!(
                    operation = %self.name,
                    elapsed_ms = as_millis(elapsed),
                    threshold_ms = as_millis(self.warn_after),
                    "operation is taking longer than expected"
                );
            }
        } else {
            trace!(operation = %self.name, elapsed_ms = as_millis(elapsed), "progress check");
        }

        elapsed
    }

    pub fn is_slow(&self) -> bool {
        self.get_elapsed() > self.warn_after
    }

    /// Number of slow-operation warnings emitted so far.
    pub fn warnings_emitted(&self) -> u64 {
        self.warnings.load(Ordering::Relaxed)
    }
}

/// Drive `future` to completion, calling `tracker.check_progress()` every
/// `interval` while it is pending.
///
/// The future's output is returned unchanged. A zero `interval` is clamped
/// to [`MIN_CHECK_INTERVAL`].
pub async fn observe<F>(tracker: &ProgressTracker, interval: Duration, future: F) -> F::Output
where
    F: Future,
{
    tokio::pin!(future);

    let interval = interval.max(MIN_CHECK_INTERVAL);

    // First tick of `interval_at` is one period out, not immediate.
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            output = &mut future => return output,
            _ = ticker.tick() => {
                tracker.check_progress();
            }
        }
    }
}

fn as_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn no_warning_before_threshold() {
        let tracker = ProgressTracker::new("fetch listings");
        tokio::time::advance(Duration::from_millis(4_999)).await;
        tracker.check_progress();
        assert_eq!(tracker.warnings_emitted(), 0);
        assert!(!tracker.is_slow());
    }

    #[tokio::test(start_paused = true)]
    async fn every_policy_repeats_warning() {
        let tracker = ProgressTracker::new("fetch listings");
        tokio::time::advance(Duration::from_millis(5_001)).await;
        tracker.check_progress();
        tracker.check_progress();
        tracker.check_progress();
        assert_eq!(tracker.warnings_emitted(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_is_clamped_instead_of_panicking() {
        let tracker =
            ProgressTracker::with_threshold("count rows", Duration::from_millis(2), WarnPolicy::Every);
        let out = observe(&tracker, Duration::ZERO, async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            5u8
        })
        .await;
        assert_eq!(out, 5);
        assert!(tracker.warnings_emitted() >= 1);

        let ready = observe(&ProgressTracker::new("ready"), Duration::ZERO, async { 7u8 }).await;
        assert_eq!(ready, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn once_policy_warns_a_single_time() {
        let tracker =
            ProgressTracker::with_threshold("sign in", Duration::from_millis(10), WarnPolicy::Once);
        tokio::time::advance(Duration::from_millis(11)).await;
        tracker.check_progress();
        tracker.check_progress();
        assert_eq!(tracker.warnings_emitted(), 1);
    }
}
