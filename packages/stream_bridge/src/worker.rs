use std::any::{Any, type_name};
use std::fmt;
use std::panic;
use std::thread::{self, JoinHandle as ThreadJoinHandle};

use tracing::{debug, warn};

use crate::{Error, Result};

/// Why a background worker stopped without error.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Completion {
    /// The input was exhausted and every element was delivered.
    Finished,

    /// Every receiver of the output stream was dropped, so there was nobody left to deliver to.
    Disconnected,

    /// The worker's [`CancellationToken`][crate::CancellationToken] was cancelled.
    Cancelled,
}

/// Handle to a background thread that moves elements into a stream.
///
/// Dropping the handle detaches the thread; it keeps running until its input is exhausted,
/// its output is abandoned or it is cancelled. If a detached worker already stopped with an
/// error, the error is logged as a warning.
pub struct Worker {
    name: String,
    handle: Option<ThreadJoinHandle<Result<Completion>>>,
}

impl Worker {
    /// Starts `body` on a new named thread.
    pub(crate) fn spawn<F>(name: String, body: F) -> Self
    where
        F: FnOnce() -> Result<Completion> + Send + 'static,
    {
        let thread_name = name.clone();

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                debug!(worker = %thread_name, "stream worker started");

                let outcome = body();

                match &outcome {
                    Ok(completion) => {
                        debug!(worker = %thread_name, ?completion, "stream worker exiting");
                    }
                    Err(error) => {
                        warn!(worker = %thread_name, %error, "stream worker failed");
                    }
                }

                outcome
            })
            .expect("failed to spawn stream worker thread: thread spawning failure is not supported");

        Self {
            name,
            handle: Some(handle),
        }
    }

    /// The name of the worker thread.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the worker has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .is_none_or(ThreadJoinHandle::is_finished)
    }

    /// Waits for the worker to stop and returns why it stopped.
    ///
    /// This blocks for as long as the worker is blocked. A worker feeding a bounded stream only
    /// stops once its elements have been received, the stream's receivers are dropped or it is
    /// cancelled.
    ///
    /// # Errors
    ///
    /// Returns the error the worker stopped with, such as a panic in user-supplied code.
    pub fn join(mut self) -> Result<Completion> {
        let handle = self
            .handle
            .take()
            .expect("worker handle is only taken when the worker is consumed");

        match handle.join() {
            Ok(outcome) => outcome,
            // User code runs under catch_unwind, so this is a bug in the worker loop itself.
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        if !handle.is_finished() {
            return;
        }

        if let Ok(Err(error)) = handle.join() {
            warn!(
                worker = %self.name,
                %error,
                "stream worker failed but its handle was dropped without being joined"
            );
        }
    }
}

impl fmt::Debug for Worker {
    #[cfg_attr(test, mutants::skip)] // Diagnostic output only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>())
            .field("name", &self.name)
            .field("finished", &self.is_finished())
            .finish_non_exhaustive()
    }
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

pub(crate) fn transform_panicked(delivered: usize, payload: &(dyn Any + Send)) -> Error {
    Error::TransformPanicked {
        delivered,
        message: panic_message(payload),
    }
}

pub(crate) fn sequence_panicked(produced: usize, payload: &(dyn Any + Send)) -> Error {
    Error::SequencePanicked {
        produced,
        message: panic_message(payload),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::panic::AssertUnwindSafe;

    use static_assertions::assert_impl_all;
    use testing::with_watchdog;

    use super::*;

    assert_impl_all!(Worker: Send, Sync);

    #[cfg_attr(miri, ignore)]
    #[test]
    fn join_returns_body_outcome() {
        with_watchdog(|| {
            let worker = Worker::spawn("test-worker".to_owned(), || Ok(Completion::Finished));

            assert_eq!(worker.name(), "test-worker");
            assert_eq!(worker.join().unwrap(), Completion::Finished);
        });
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn join_returns_body_error() {
        with_watchdog(|| {
            let worker = Worker::spawn("failing-worker".to_owned(), || {
                Err(Error::Disconnected { sent: 3 })
            });

            assert!(matches!(
                worker.join(),
                Err(Error::Disconnected { sent: 3 })
            ));
        });
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn dropping_failed_worker_does_not_panic() {
        with_watchdog(|| {
            let worker = Worker::spawn("dropped-worker".to_owned(), || {
                Err(Error::Disconnected { sent: 0 })
            });

            while !worker.is_finished() {
                thread::yield_now();
            }

            drop(worker);
        });
    }

    #[test]
    fn panic_message_handles_str_and_string() {
        let from_str = panic::catch_unwind(|| panic!("static message")).unwrap_err();
        let from_string =
            panic::catch_unwind(AssertUnwindSafe(|| panic!("{} message", "formatted")))
                .unwrap_err();
        let from_other = panic::catch_unwind(|| panic::panic_any(42_u32)).unwrap_err();

        assert_eq!(panic_message(&*from_str), "static message");
        assert_eq!(panic_message(&*from_string), "formatted message");
        assert_eq!(panic_message(&*from_other), "unknown panic payload");
    }
}
