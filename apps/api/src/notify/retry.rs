//! Bounded retry for email sends.
//!
//! Permanent rejections stop immediately. Transient failures wait longer than
//! other (network-level) failures before the next attempt.

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Will fail the same way again (e.g. SMTP 5xx).
    Permanent,
    /// Server asked us to try later (e.g. SMTP 4xx).
    Transient,
    /// Connection, TLS or timeout problems.
    Network,
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub transient_delay: Duration,
    pub network_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            transient_delay: Duration::from_secs(4),
            network_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug)]
pub struct RetryFailure<E> {
    pub attempts: u32,
    pub error: E,
}

/// Runs `operation` until it succeeds, fails permanently, or attempts run out.
pub async fn retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    classify: impl Fn(&E) -> FailureKind,
    mut operation: F,
) -> Result<T, RetryFailure<E>>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        let error = match operation().await {
            Ok(value) => {
                info!("Email sent on attempt {attempt}");
                return Ok(value);
            }
            Err(e) => e,
        };

        let kind = classify(&error);
        warn!(
            "Email attempt {}/{} failed ({:?}): {}",
            attempt, policy.max_attempts, kind, error
        );

        if kind == FailureKind::Permanent || attempt >= policy.max_attempts {
            return Err(RetryFailure {
                attempts: attempt,
                error,
            });
        }

        let delay = match kind {
            FailureKind::Transient => policy.transient_delay,
            _ => policy.network_delay,
        };
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use tokio::time::Instant;

    use super::*;

    #[derive(Debug)]
    struct FakeError(FailureKind);

    impl std::fmt::Display for FakeError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }

    fn kind(e: &FakeError) -> FailureKind {
        e.0
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_then_success() {
        let calls = Cell::new(0);
        let started = Instant::now();

        let result = retry(&RetryPolicy::default(), kind, || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 3 {
                    Err(FakeError(FailureKind::Transient))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(8) && elapsed < Duration::from_secs(9));
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_failure_is_not_retried() {
        let calls = Cell::new(0);

        let err = retry(&RetryPolicy::default(), kind, || {
            calls.set(calls.get() + 1);
            async { Err::<(), _>(FakeError(FailureKind::Permanent)) }
        })
        .await
        .unwrap_err();

        assert_eq!(err.attempts, 1);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_failures_exhaust_five_attempts() {
        let calls = Cell::new(0);
        let started = Instant::now();

        let err = retry(&RetryPolicy::default(), kind, || {
            calls.set(calls.get() + 1);
            async { Err::<(), _>(FakeError(FailureKind::Network)) }
        })
        .await
        .unwrap_err();

        assert_eq!(err.attempts, 5);
        assert_eq!(calls.get(), 5);
        // Four 2s pauses between five attempts, none after the last.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(8) && elapsed < Duration::from_secs(9));
    }
}
