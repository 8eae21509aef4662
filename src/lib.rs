//! `retry-recover` runs a fallible closure until it succeeds or runs out of
//! attempts, catching panics along the way.
//!
//! - [`try_run`] calls a closure once and turns a panic into a
//!   [`Failure::Recovered`] value.
//! - [`retry`] and [`retry_with`] call it repeatedly with a fixed delay
//!   between failed attempts, handing every failure to a callback.
//! - [`retry_async`] and [`try_run_async`] do the same for futures.
//!
//! ```
//! use std::time::Duration;
//! use retry_recover::{retry, Failure};
//!
//! let mut seen = Vec::new();
//! let mut on_error = |failure: Failure<&str>| seen.push(failure.is_recovered());
//! let mut calls = 0;
//! retry(
//!     || {
//!         calls += 1;
//!         match calls {
//!             1 => Err("transient"),
//!             2 => panic!("worse"),
//!             _ => Ok(()),
//!         }
//!     },
//!     5,
//!     Some(&mut on_error),
//!     Some(Duration::from_millis(1)),
//! );
//! assert_eq!(calls, 3);
//! assert_eq!(seen, vec![false, true]);
//! ```

mod error;
mod future;
mod invoke;
mod options;
mod retry;

pub use error::{DetachedFailure, Failure, PanicMessage, Recovered, RECOVERED_MESSAGE};
pub use future::{retry_async, try_run_async};
pub use invoke::try_run;
pub use options::{RetryOptions, DEFAULT_PERIOD, UNBOUNDED};
pub use retry::{retry, retry_with};

/// Outcome of one attempt: the operation's value, or how it failed.
pub type Result<T, E> = std::result::Result<T, Failure<E>>;
