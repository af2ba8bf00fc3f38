use std::error::Error as StdError;
use std::fmt::{self, Debug, Display};

use thiserror::Error;

/// Errors reported by background workers and by synchronous stream operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The transform function of an adapter panicked. The adapter closed its output stream
    /// and stopped; elements after the failing one were not processed.
    #[error("transform panicked after {delivered} elements were delivered: {message}")]
    TransformPanicked {
        /// How many transformed elements were delivered before the panic.
        delivered: usize,

        /// The panic message, if the payload was a string.
        message: String,
    },

    /// The sequence feeding a background producer panicked while yielding an element.
    #[error("source sequence panicked after {produced} elements were produced: {message}")]
    SequencePanicked {
        /// How many elements were sent into the stream before the panic.
        produced: usize,

        /// The panic message, if the payload was a string.
        message: String,
    },

    /// Every receiver of the stream was dropped before all elements could be sent.
    #[error("stream receiver disconnected after {sent} elements were sent")]
    Disconnected {
        /// How many elements were sent before the disconnect was detected.
        sent: usize,
    },
}

/// A specialized `Result` type for stream operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

/// A [`drain()`][crate::drain] call ended before the requested number of elements arrived.
///
/// The elements received up to that point are handed back to the caller.
#[derive(Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum DrainError<T> {
    /// The stream was closed and fully drained.
    Closed {
        /// The number of elements that were requested.
        expected: usize,

        /// The elements received before the stream closed, in order.
        received: Vec<T>,
    },

    /// The deadline passed while waiting for more elements.
    TimedOut {
        /// The number of elements that were requested.
        expected: usize,

        /// The elements received before the deadline, in order.
        received: Vec<T>,
    },
}

impl<T> DrainError<T> {
    /// The elements received before the drain ended.
    #[must_use]
    pub fn received(&self) -> &[T] {
        match self {
            Self::Closed { received, .. } | Self::TimedOut { received, .. } => received,
        }
    }

    /// Takes ownership of the elements received before the drain ended.
    #[must_use]
    pub fn into_received(self) -> Vec<T> {
        match self {
            Self::Closed { received, .. } | Self::TimedOut { received, .. } => received,
        }
    }

    /// The number of elements that were requested.
    #[must_use]
    pub fn expected(&self) -> usize {
        match self {
            Self::Closed { expected, .. } | Self::TimedOut { expected, .. } => *expected,
        }
    }
}

// Manual impl so that Debug does not require `T: Debug`; element values are not interesting.
impl<T> Debug for DrainError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (variant, expected, received) = match self {
            Self::Closed { expected, received } => ("Closed", expected, received.len()),
            Self::TimedOut { expected, received } => ("TimedOut", expected, received.len()),
        };

        f.debug_struct(variant)
            .field("expected", expected)
            .field("received", &received)
            .finish()
    }
}

impl<T> Display for DrainError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed { expected, received } => write!(
                f,
                "stream closed after {} of {expected} elements were received",
                received.len()
            ),
            Self::TimedOut { expected, received } => write!(
                f,
                "timed out after {} of {expected} elements were received",
                received.len()
            ),
        }
    }
}

impl<T> StdError for DrainError<T> {}
