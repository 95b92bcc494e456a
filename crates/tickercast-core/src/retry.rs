//! Bounded exponential backoff for transient collaborator faults.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries it
//! while the error reports itself as transient (network/timeout/5xx class).
//! Logical faults — malformed responses, missing credentials, 4xx — are
//! returned immediately: retrying cannot fix them, and at the stage level
//! they indicate a systemic misconfiguration rather than a per-item flake.

use std::future::Future;
use std::time::Duration;

/// Classifies an error as transient (worth retrying after a backoff delay)
/// or permanent. Implemented by every collaborator error enum.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

const BACKOFF_START_SECS: u64 = 2;
const BACKOFF_CAP_SECS: u64 = 10;

/// Runs `operation` with up to `max_retries` additional attempts on
/// transient errors.
///
/// Backoff doubles from 2 s and is capped at 10 s: 2 s, 4 s, 8 s, 10 s, …
/// On exhaustion the last error is returned so the caller can convert it to
/// a per-item skip.
///
/// # Errors
///
/// Returns the last error once retries are exhausted, or the first
/// non-transient error immediately.
pub async fn retry_with_backoff<T, E, F, Fut>(max_retries: u32, mut operation: F) -> Result<T, E>
where
    E: Transient + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_transient() || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay = backoff_delay(attempt);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_secs = delay.as_secs(),
                    error = %err,
                    "transient fault — retrying after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    let secs = BACKOFF_START_SECS.saturating_mul(1u64 << u64::from((attempt - 1).min(62)));
    Duration::from_secs(secs.min(BACKOFF_CAP_SECS))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    #[derive(Debug)]
    enum TestError {
        Flaky,
        Fatal,
    }

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                TestError::Flaky => write!(f, "flaky"),
                TestError::Fatal => write!(f, "fatal"),
            }
        }
    }

    impl Transient for TestError {
        fn is_transient(&self) -> bool {
            matches!(self, TestError::Flaky)
        }
    }

    #[test]
    fn backoff_doubles_from_two_seconds_and_caps_at_ten() {
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
        assert_eq!(backoff_delay(3), Duration::from_secs(8));
        assert_eq!(backoff_delay(4), Duration::from_secs(10));
        assert_eq!(backoff_delay(9), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, TestError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_error_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, || {
            let c = Arc::clone(&c);
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(TestError::Flaky)
                } else {
                    Ok::<u32, TestError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn returns_last_error_after_exhausting_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, TestError>(TestError::Flaky)
            }
        })
        .await;
        // max_retries = 2 → 3 total attempts.
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(TestError::Flaky)));
    }

    #[tokio::test]
    async fn does_not_retry_non_transient_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, TestError>(TestError::Fatal)
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(TestError::Fatal)));
    }
}
