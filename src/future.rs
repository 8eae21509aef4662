//! Async counterparts of [`try_run`](crate::try_run) and
//! [`retry_with`](crate::retry_with).
//!
//! Attempts still run one after another on the calling task; only the sleep
//! between them yields to the runtime via `tokio::time::sleep`.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::time::sleep;

use crate::{Failure, Recovered, RetryOptions};

/// Awaits `fut`, turning a panic raised while polling it into
/// [`Failure::Recovered`].
pub async fn try_run_async<T, E, Fut>(fut: Fut) -> crate::Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result.map_err(Failure::Error),
        Err(payload) => Err(Failure::Recovered(Recovered::new(payload))),
    }
}

/// Async version of [`retry_with`](crate::retry_with).
///
/// `op` is called to build a fresh future for every attempt. Counting,
/// callback order and the default period match the blocking loop.
///
/// Must be polled inside a tokio runtime with the time driver enabled;
/// `tokio::time::sleep` panics otherwise.
pub async fn retry_async<E, F, Fut, H>(options: &RetryOptions, mut op: F, mut on_error: H)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
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

        // Building the future may itself panic; keep that inside the boundary.
        let outcome = match crate::try_run(|| Ok::<_, E>(op())) {
            Ok(fut) => try_run_async(fut).await,
            Err(failure) => Err(failure),
        };

        match outcome {
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
                    #[cfg(feature = "tracing")]
                    tracing::debug!("retrying after {:?}", period);
                    sleep(period).await;
                }
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(attempt, "retry loop finished");
}
