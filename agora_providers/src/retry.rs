use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Delays slept between attempts. An operation is tried at most
/// `delays.len() + 1` times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    delays: Vec<Duration>,
}

impl Default for RetryPolicy {
    /// 2s, 4s, 6s, 8s, then 10s twice: seven attempts in total.
    fn default() -> Self {
        Self::from_secs(&[2, 4, 6, 8, 10, 10])
    }
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(delays: Vec<Duration>) -> Self {
        Self { delays }
    }

    #[must_use]
    pub fn from_secs(delays: &[u64]) -> Self {
        Self::new(delays.iter().copied().map(Duration::from_secs).collect())
    }

    /// Single attempt, no retries.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(Vec::new())
    }

    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.delays.len() + 1
    }
}

/// Retry an async operation following `policy`.
///
/// Returns the first success, or the error of the final attempt.
pub async fn retry_with_backoff<F, Fut, T, E>(operation: F, policy: &RetryPolicy) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    retry_with_backoff_if(operation, policy, |_| true).await
}

/// Like [`retry_with_backoff`], but an error for which `is_retryable`
/// returns false is returned immediately.
pub async fn retry_with_backoff_if<F, Fut, T, E, R>(
    mut operation: F,
    policy: &RetryPolicy,
    is_retryable: R,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
    R: Fn(&E) -> bool,
{
    let max_attempts = policy.max_attempts();
    let mut delays = policy.delays.iter();
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                if !is_retryable(&e) {
                    warn!("Request failed (attempt {attempt}/{max_attempts}): {e}. Not retrying");
                    return Err(e);
                }
                let Some(delay) = delays.next() else {
                    return Err(e);
                };
                warn!(
                    "Request failed (attempt {attempt}/{max_attempts}): {e}. Retrying after {}ms...",
                    delay.as_millis()
                );
                sleep(*delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(vec![Duration::from_millis(1); 3])
    }

    #[tokio::test]
    async fn retry_succeeds_on_first_attempt() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), String>(())
                }
            },
            &fast_policy(),
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_succeeds_after_failures() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result: std::result::Result<(), String> = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    let count = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    if count < 3 {
                        Err(String::from("fail"))
                    } else {
                        Ok(())
                    }
                }
            },
            &fast_policy(),
        )
        .await;
        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_fails_after_all_attempts() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result: std::result::Result<(), String> = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    let count = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    Err(format!("fail {count}"))
                }
            },
            &fast_policy(),
        )
        .await;
        assert_eq!(result, Err(String::from("fail 4")));
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn no_retry_policy_tries_once() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result: std::result::Result<(), String> = retry_with_backoff(
            || {
                let attempts = attempts.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(String::from("fail"))
                }
            },
            &RetryPolicy::none(),
        )
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_retryable_error_returns_immediately() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let result: std::result::Result<(), String> = retry_with_backoff_if(
            || {
                let attempts = attempts.clone();
                async move {
                    let count = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                    if count < 2 {
                        Err(String::from("transient"))
                    } else {
                        Err(String::from("fatal"))
                    }
                }
            },
            &fast_policy(),
            |e| e != "fatal",
        )
        .await;
        assert_eq!(result, Err(String::from("fatal")));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn default_policy_matches_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 7);
    }
}
