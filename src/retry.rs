use std::thread;
use std::time::Duration;

use crate::options::effective_period;
use crate::{try_run, Failure, RetryOptions};

/// Runs `op` up to `attempts` times, sleeping `period` between failures.
///
/// - `attempts` is the total number of invocations: `3` means at most three
///   calls, a negative value retries until `op` succeeds, `0` never calls `op`.
/// - `on_error` receives every failure, including panics caught by
///   [`try_run`], before the loop decides whether to sleep.
/// - `period` defaults to five seconds when `None` or zero.
///
/// The first `Ok(())` ends the loop. Nothing is slept after the last attempt.
///
/// Returning a sentinel error on every call turns the loop into a fixed-rate
/// scheduler that runs `op` exactly `attempts` times:
///
/// ```
/// use std::time::Duration;
/// use retry_recover::retry;
///
/// let mut runs = 0;
/// retry(
///     || {
///         runs += 1;
///         Err("re-schedule")
///     },
///     3,
///     None,
///     Some(Duration::from_millis(1)),
/// );
/// assert_eq!(runs, 3);
/// ```
pub fn retry<E, F>(
    op: F,
    attempts: i64,
    mut on_error: Option<&mut dyn FnMut(Failure<E>)>,
    period: Option<Duration>,
) where
    F: FnMut() -> Result<(), E>,
{
    let options = RetryOptions {
        attempts,
        period: effective_period(period),
    };
    retry_with(&options, op, |failure| {
        if let Some(handler) = on_error.as_mut() {
            handler(failure);
        }
    });
}

/// Same loop as [`retry`], configured through [`RetryOptions`].
///
/// The calling thread is blocked while sleeping.
pub fn retry_with<E, F, H>(options: &RetryOptions, mut op: F, mut on_error: H)
where
    F: FnMut() -> Result<(), E>,
    H: FnMut(Failure<E>),
{
    let period = options.period();
    let mut remaining = options.attempts;
    #[cfg(feature = "tracing")]
    let mut attempt = 0u64;

    while remaining != 0 {
        if remaining > 0 {
            remaining -= 1;
        }
        #[cfg(feature = "tracing")]
        {
            attempt += 1;
        }

        match try_run(&mut op) {
            Ok(()) => break,
            Err(failure) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    attempt,
                    remaining,
                    recovered = failure.is_recovered(),
                    "attempt failed"
                );
                on_error(failure);
                if remaining != 0 {
                    wait_before_retry(period);
                }
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(attempt, "retry loop finished");
}

fn wait_before_retry(period: Duration) {
    #[cfg(feature = "tracing")]
    tracing::debug!("retrying after {:?}", period);

    thread::sleep(period);
}
