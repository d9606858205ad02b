//! Bounded retry with exponential backoff and jitter.
//!
//! One retry policy serves every call site that talks to a flaky remote:
//! the caller hands over an async operation and a classifier saying which
//! of its failures are worth retrying. The policy runs the operation up to
//! `max_retries` times and sleeps between attempts.
//!
//! # Backoff Strategy
//!
//! The delay after the n-th failed attempt (n starting at 1) is:
//! ```text
//! delay = 2^(n-1) seconds + uniform_random(0, 1) seconds
//! ```
//! With the default of 3 attempts that is roughly 1s, then 2s, with up to a
//! second of jitter each. A failure the classifier marks non-retryable is
//! returned immediately, with no sleep and no further attempts.

use rand::{Rng, rng};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, warn};

/// Run `op` up to `max_retries` times, backing off between attempts.
///
/// # Arguments
///
/// * `max_retries` - Total number of attempts (treated as 1 if given 0)
/// * `is_retryable` - Classifier: `true` means the failure is transient and
///   another attempt may succeed
/// * `op` - The operation; called once per attempt
///
/// # Returns
///
/// The first successful result, or the error that ended the attempts:
/// either the first non-retryable failure, or the last failure once
/// `max_retries` is exhausted.
pub async fn retry_with_backoff<T, E, Op, Fut, Cl>(
    max_retries: usize,
    is_retryable: Cl,
    mut op: Op,
) -> Result<T, E>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    Cl: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let max_attempts = max_retries.max(1);
    let total_t0 = Instant::now();
    let mut attempt = 0usize;

    loop {
        let attempt_t0 = Instant::now();
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                let attempt_dt = attempt_t0.elapsed();
                let total_dt = total_t0.elapsed();

                if !is_retryable(&e) {
                    error!(
                        attempt,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                        error = %e,
                        "attempt failed with non-retryable error; giving up"
                    );
                    return Err(e);
                }

                if attempt >= max_attempts {
                    error!(
                        attempt,
                        max = max_attempts,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        error = %e,
                        "exhausted retries"
                    );
                    return Err(e);
                }

                // backoff calc
                let jitter = rng().random_range(0.0..1.0);
                let delay = Duration::from_secs(1 << (attempt - 1))
                    + Duration::from_secs_f64(jitter);

                warn!(
                    attempt,
                    max = max_attempts,
                    elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                    ?delay,
                    error = %e,
                    "attempt failed; backing off"
                );
                sleep(delay).await;
            }
        }
    }
}
