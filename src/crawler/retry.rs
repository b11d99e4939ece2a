//! Retry-forever combinator for transient failures
//!
//! Failures are split in two:
//! - [`FailureKind::Transient`] - network or filesystem hiccups; the operation
//!   is attempted again after a fixed backoff, with no attempt limit
//! - [`FailureKind::Fatal`] - everything else; returned to the caller at once

use crate::CrawlError;
use std::future::Future;
use std::time::Duration;

/// Default delay between attempts (1 second)
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Classification of a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Expected to resolve itself; retried
    Transient,

    /// Contract violation or programming error; aborts the run
    Fatal,
}

/// Errors that know whether they are worth retrying
pub trait Retryable {
    fn failure_kind(&self) -> FailureKind;
}

impl Retryable for std::io::Error {
    fn failure_kind(&self) -> FailureKind {
        FailureKind::Transient
    }
}

impl Retryable for CrawlError {
    fn failure_kind(&self) -> FailureKind {
        match self {
            CrawlError::Http { source, .. } if is_transient_http(source) => FailureKind::Transient,
            CrawlError::Io(_) => FailureKind::Transient,
            _ => FailureKind::Fatal,
        }
    }
}

/// Connection-level reqwest failures: DNS, refused, reset, timeout, truncated body
fn is_transient_http(error: &reqwest::Error) -> bool {
    if error.is_status() || error.is_builder() || error.is_redirect() {
        return false;
    }
    error.is_connect() || error.is_timeout() || error.is_request() || error.is_body()
}

/// Fixed-backoff retry policy
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BACKOFF)
    }
}

impl RetryPolicy {
    pub fn new(backoff: Duration) -> Self {
        Self { backoff }
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }
}

/// Runs `operation` until it succeeds or fails fatally
///
/// `label` names the operation in log output.
///
/// # Example
///
/// ```no_run
/// use puzzle_crawler::crawler::{retry_forever, RetryPolicy};
///
/// # async fn example() -> std::io::Result<()> {
/// let policy = RetryPolicy::default();
/// let text = retry_forever(&policy, "read page", || tokio::fs::read_to_string("page.html")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn retry_forever<T, E, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, E>
where
    E: Retryable + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt: u64 = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.failure_kind() == FailureKind::Transient => {
                tracing::debug!(
                    "{} failed (attempt {}), retrying in {:?}: {}",
                    label,
                    attempt,
                    policy.backoff,
                    e
                );
                attempt += 1;
                tokio::time::sleep(policy.backoff).await;
            }
            Err(e) => return Err(e),
        }
    }
}
