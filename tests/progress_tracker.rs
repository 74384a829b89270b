// tests/progress_tracker.rs

use std::time::Duration;

use timebox::errors::BoundedError;
use timebox::supervisor::{Deadline, ProgressTracker, observe};
use timebox::types::WarnPolicy;
use timebox_test_utils::builders::ConfigFileBuilder;
use timebox_test_utils::fake_ops::delay_ok;
use timebox_test_utils::init_tracing;

#[tokio::test(start_paused = true)]
async fn elapsed_never_decreases() {
    let tracker = ProgressTracker::new("load farm listings");

    let mut last = tracker.get_elapsed();
    for step in [0u64, 1, 10, 0, 250, 3] {
        tokio::time::advance(Duration::from_millis(step)).await;
        let now = tracker.get_elapsed();
        assert!(now >= last, "elapsed went backwards: {last:?} -> {now:?}");
        last = now;
    }
    assert!(last >= Duration::from_millis(264));
}

#[tokio::test(start_paused = true)]
async fn check_progress_returns_elapsed_and_warns_past_threshold() {
    init_tracing();

    let tracker = ProgressTracker::new("insert livestock listing");

    tokio::time::advance(Duration::from_millis(1_000)).await;
    let elapsed = tracker.check_progress();
    assert!(elapsed >= Duration::from_millis(1_000));
    assert_eq!(tracker.warnings_emitted(), 0);

    tokio::time::advance(Duration::from_millis(5_000)).await;
    tracker.check_progress();
    tracker.check_progress();
    assert_eq!(tracker.warnings_emitted(), 2);
    assert!(tracker.is_slow());
}

#[tokio::test(start_paused = true)]
async fn observe_checks_periodically_and_returns_output_unchanged() {
    init_tracing();

    let tracker =
        ProgressTracker::with_threshold("slow query", Duration::from_millis(100), WarnPolicy::Every);

    let out = observe(&tracker, Duration::from_millis(50), delay_ok(400, "rows")).await;
    assert_eq!(out, Ok("rows"));

    // Checks at 50, 100, ... ms; those past 100 ms warn.
    let warnings = tracker.warnings_emitted();
    assert!((4..=8).contains(&warnings), "unexpected warning count {warnings}");
}

#[tokio::test(start_paused = true)]
async fn once_policy_warns_a_single_time_under_observe() {
    let tracker =
        ProgressTracker::with_threshold("slow query", Duration::from_millis(100), WarnPolicy::Once);

    let _ = observe(&tracker, Duration::from_millis(50), delay_ok(1_000, ())).await;
    assert_eq!(tracker.warnings_emitted(), 1);
}

#[tokio::test(start_paused = true)]
async fn supervisor_trackers_use_configured_threshold() {
    let sup = ConfigFileBuilder::new()
        .slow_warning_ms(10)
        .warn_policy(WarnPolicy::Once)
        .supervisor();

    let tracker = sup.tracker("sign in");
    tokio::time::advance(Duration::from_millis(11)).await;
    tracker.check_progress();
    tracker.check_progress();
    assert_eq!(tracker.warnings_emitted(), 1);
    assert_eq!(tracker.name(), "sign in");
}

#[tokio::test(start_paused = true)]
async fn run_tracked_is_still_bounded() {
    init_tracing();

    let sup = ConfigFileBuilder::new()
        .slow_warning_ms(20)
        .progress_interval_ms(10)
        .supervisor();

    let ok = sup.run_tracked("fast", delay_ok(5, 1), &Deadline::millis(100)).await;
    assert_eq!(ok, Ok(1));

    let slow = sup
        .run_tracked("slow", delay_ok(500, 1), &Deadline::new(100, "too slow"))
        .await;
    assert_eq!(slow, Err(BoundedError::Timeout("too slow".to_string())));
}
