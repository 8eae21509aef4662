use std::any::Any;
use std::fmt;

/// Fixed text shown for a recovered panic. The payload is reached through
/// [`Recovered::caused_by`], never through the message.
pub const RECOVERED_MESSAGE: &str = "RECOVERED, UNKNOWN ERROR; CALL caused_by()";

/// Failure value produced by one attempt.
///
/// A recovered panic payload is `Send` but not `Sync`, so `Failure<E>` is
/// never `Sync` either and `?` will not lift it into `anyhow::Error` or
/// `Box<dyn Error + Send + Sync>`. [`Failure::detach`] gives a copy that is.
#[derive(Debug, thiserror::Error)]
pub enum Failure<E> {
    /// The operation returned `Err` through its ordinary return path.
    #[error("{0}")]
    Error(E),
    /// The operation panicked; the payload is kept inside.
    #[error(transparent)]
    Recovered(#[from] Recovered),
}

impl<E> Failure<E> {
    /// Returns `true` when this failure came from a panic.
    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered(_))
    }

    /// Borrows the ordinary error, if any.
    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Error(err) => Some(err),
            Self::Recovered(_) => None,
        }
    }

    /// Borrows the recovered panic, if any.
    pub fn as_recovered(&self) -> Option<&Recovered> {
        match self {
            Self::Error(_) => None,
            Self::Recovered(recovered) => Some(recovered),
        }
    }

    /// Takes the ordinary error, discarding a recovered panic.
    pub fn into_error(self) -> Option<E> {
        match self {
            Self::Error(err) => Some(err),
            Self::Recovered(_) => None,
        }
    }

    /// Converts into a [`DetachedFailure`], which is `Sync` whenever `E` is.
    /// A recovered panic keeps only its message.
    pub fn detach(self) -> DetachedFailure<E> {
        match self {
            Self::Error(err) => DetachedFailure::Error(err),
            Self::Recovered(recovered) => DetachedFailure::Panicked(recovered.detach()),
        }
    }
}

/// [`Failure`] with the panic payload reduced to its message.
#[derive(Debug, thiserror::Error)]
pub enum DetachedFailure<E> {
    #[error("{0}")]
    Error(E),
    #[error(transparent)]
    Panicked(#[from] PanicMessage),
}

/// `Send + Sync` copy of a recovered panic, holding its message only.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("recovered panic: {}", .message.as_deref().unwrap_or("<non-string payload>"))]
pub struct PanicMessage {
    /// The panic message, when the payload was a string.
    pub message: Option<String>,
}

/// A panic caught at the attempt boundary.
///
/// The payload is whatever was passed to `panic!` (usually `&'static str` or
/// `String`, but `std::panic::panic_any` allows any `Send` value).
pub struct Recovered {
    payload: Box<dyn Any + Send + 'static>,
}

impl Recovered {
    pub(crate) fn new(payload: Box<dyn Any + Send + 'static>) -> Self {
        Self { payload }
    }

    /// Borrows the original panic payload.
    pub fn caused_by(&self) -> &(dyn Any + Send + 'static) {
        self.payload.as_ref()
    }

    /// Takes the original panic payload.
    pub fn into_caused_by(self) -> Box<dyn Any + Send + 'static> {
        self.payload
    }

    /// Downcasts the payload to a concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Returns the panic message when the payload is a string.
    pub fn panic_message(&self) -> Option<&str> {
        if let Some(s) = self.payload.downcast_ref::<&'static str>() {
            Some(*s)
        } else {
            self.payload.downcast_ref::<String>().map(String::as_str)
        }
    }

    /// Copies the panic message into a thread-safe error, leaving the
    /// payload here.
    pub fn detach(&self) -> PanicMessage {
        PanicMessage {
            message: self.panic_message().map(str::to_owned),
        }
    }

    /// Re-raises the original panic on the current thread.
    pub fn resume(self) -> ! {
        std::panic::resume_unwind(self.payload)
    }
}

impl fmt::Debug for Recovered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recovered")
            .field(
                "panic_message",
                &self.panic_message().unwrap_or("<non-string payload>"),
            )
            .finish()
    }
}

impl fmt::Display for Recovered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(RECOVERED_MESSAGE)
    }
}

impl std::error::Error for Recovered {}
