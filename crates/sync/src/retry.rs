//! Bounded retry helper
//!
//! Several flows want "try, wait a fixed delay, try once more, then give
//! up" - never an unbounded poll loop. This is the single combinator for
//! that pattern.

use std::future::Future;
use std::time::Duration;

/// Run `attempt`; if `accept` rejects the outcome, wait `delay` and run it
/// exactly once more. The second outcome is returned as-is - no third try.
pub async fn retry_once<T, F, Fut, P>(delay: Duration, mut attempt: F, accept: P) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = T>,
    P: Fn(&T) -> bool,
{
    let first = attempt().await;
    if accept(&first) {
        return first;
    }
    tokio::time::sleep(delay).await;
    attempt().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn accepted_first_attempt_runs_once() {
        let calls = AtomicUsize::new(0);
        let out = retry_once(
            Duration::from_millis(1),
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                42
            },
            |_| true,
        )
        .await;
        assert_eq!(out, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejected_outcome_retries_exactly_once() {
        let calls = AtomicUsize::new(0);
        // Never accepted: must stop after the second attempt regardless
        let out = retry_once(
            Duration::from_millis(1),
            || async { calls.fetch_add(1, Ordering::SeqCst) },
            |_| false,
        )
        .await;
        assert_eq!(out, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn retry_outcome_is_returned() {
        let calls = AtomicUsize::new(0);
        let out = retry_once(
            Duration::from_millis(1),
            || async { calls.fetch_add(1, Ordering::SeqCst) },
            |n| *n > 0,
        )
        .await;
        assert_eq!(out, 1);
    }
}
