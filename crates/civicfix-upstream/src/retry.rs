use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use civicfix_core::retry::{BackoffPolicy, RetryableError};

/// Run `op` under a per-attempt timeout, retrying transient failures with
/// the policy's backoff. Non-transient failures return immediately.
///
/// Dropping the returned future cancels the in-flight attempt.
pub async fn with_retry<T, E, F, Fut>(
    service: &str,
    policy: &BackoffPolicy,
    attempt_timeout: Duration,
    mut op: F,
) -> Result<T, E>
where
    E: RetryableError + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut retry = 0u32;
    loop {
        let outcome = match tokio::time::timeout(attempt_timeout, op()).await {
            Ok(result) => result,
            Err(_) => Err(E::timed_out(service, attempt_timeout)),
        };

        let err = match outcome {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !err.is_transient() {
            return Err(err);
        }

        retry += 1;
        match policy.delay_for(retry) {
            Some(delay) => {
                debug!(
                    service,
                    retry,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient upstream failure, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            None => {
                warn!(service, attempts = retry, error = %err, "upstream retries exhausted");
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use civicfix_core::errors::{EmbeddingError, UpstreamError};

    use super::*;

    fn fast_policy(attempts: u32) -> BackoffPolicy {
        BackoffPolicy::new(attempts, Duration::from_millis(1), Duration::from_millis(4))
    }

    fn unreachable() -> UpstreamError {
        UpstreamError::Unreachable {
            service: "classifier".into(),
            reason: "connection refused".into(),
        }
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = with_retry("classifier", &fast_policy(3), Duration::from_secs(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(unreachable())
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> =
            with_retry("classifier", &fast_policy(3), Duration::from_secs(1), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(unreachable()) }
            })
            .await;
        assert!(matches!(result, Err(UpstreamError::Unreachable { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> =
            with_retry("verifier", &fast_policy(3), Duration::from_secs(1), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(UpstreamError::Status {
                        service: "verifier".into(),
                        status: 400,
                        body: "bad image".into(),
                    })
                }
            })
            .await;
        assert!(matches!(result, Err(UpstreamError::Status { status: 400, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn slow_attempts_time_out_and_count_as_transient() {
        let calls = AtomicU32::new(0);
        let result: Result<(), UpstreamError> =
            with_retry("classifier", &fast_policy(2), Duration::from_millis(20), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(())
                }
            })
            .await;
        assert!(matches!(result, Err(UpstreamError::Timeout { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn embedding_errors_use_the_same_policy() {
        let calls = AtomicU32::new(0);
        let result: Result<(), EmbeddingError> =
            with_retry("embedding", &fast_policy(3), Duration::from_secs(1), || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(EmbeddingError::DimensionMismatch {
                        expected: 3072,
                        actual: 768,
                    })
                }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
