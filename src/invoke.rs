use std::panic::{self, AssertUnwindSafe};

use crate::{Failure, Recovered};

/// Runs `op` once, turning a panic into [`Failure::Recovered`].
///
/// An `Err` returned by `op` comes back unchanged as [`Failure::Error`].
///
/// ```
/// use retry_recover::{try_run, Failure};
///
/// let result: Result<(), Failure<&str>> = try_run(|| panic!("boom"));
/// let recovered = result.unwrap_err();
/// assert!(recovered.is_recovered());
/// ```
///
/// The process panic hook still runs before the panic is caught, so the
/// default hook prints the message to stderr.
pub fn try_run<T, E, F>(op: F) -> crate::Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
{
    // The caller gets the failure back and decides what to do with any state
    // `op` left half-updated.
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(result) => result.map_err(Failure::Error),
        Err(payload) => Err(Failure::Recovered(Recovered::new(payload))),
    }
}
