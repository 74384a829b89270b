use std::time::Duration;

use proptest::prelude::*;
use timebox::errors::BoundedError;
use timebox::supervisor::{Deadline, with_timeout};
use timebox_test_utils::fake_ops::{FakeBackendError, delay_err, delay_ok};

/// Run `f` on a fresh current-thread runtime with a paused clock, so
/// virtual deadlines of any length resolve instantly and deterministically.
fn block_on_paused<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .expect("building paused runtime")
        .block_on(f)
}

proptest! {
    #[test]
    fn outcome_is_decided_by_who_settles_first(
        op_ms in 0u64..5_000,
        timeout_ms in 1u64..5_000,
        fail in any::<bool>(),
        message in "[a-z ]{1,20}",
    ) {
        let deadline = Deadline::new(timeout_ms, message.clone());

        let res: Result<u64, BoundedError<FakeBackendError>> = block_on_paused(async {
            if fail {
                with_timeout(delay_err(op_ms, FakeBackendError::NotFound), &deadline).await
            } else {
                with_timeout(delay_ok(op_ms, op_ms), &deadline).await
            }
        });

        if op_ms < timeout_ms {
            // Settled first: its own outcome, unmodified.
            if fail {
                prop_assert_eq!(res, Err(BoundedError::Upstream(FakeBackendError::NotFound)));
            } else {
                prop_assert_eq!(res, Ok(op_ms));
            }
        } else if op_ms > timeout_ms {
            prop_assert_eq!(res, Err(BoundedError::Timeout(message)));
        } else {
            // Same instant: either side may win, but exactly one does.
            let ok = match &res {
                Ok(v) => *v == op_ms && !fail,
                Err(BoundedError::Upstream(e)) => *e == FakeBackendError::NotFound && fail,
                Err(BoundedError::Timeout(m)) => *m == message,
                Err(_) => false,
            };
            prop_assert!(ok, "unexpected boundary outcome {:?}", res);
        }
    }

    #[test]
    fn timeout_returns_at_the_deadline(timeout_ms in 1u64..10_000) {
        let waited = block_on_paused(async {
            let start = tokio::time::Instant::now();
            let _ = with_timeout(delay_ok(timeout_ms + 1_000, ()), &Deadline::millis(timeout_ms)).await;
            start.elapsed()
        });

        prop_assert!(waited >= Duration::from_millis(timeout_ms));
        prop_assert!(waited < Duration::from_millis(timeout_ms + 10));
    }
}
