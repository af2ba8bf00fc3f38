use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use tracing::debug;

/// Nothing is ever sent through the cancellation channel; it only ever disconnects.
#[derive(Debug)]
pub(crate) enum Signal {}

/// Requests background workers to stop.
///
/// Clones share the same state: cancelling any clone cancels all of them. A worker observes the
/// cancellation even while it is blocked waiting to send or receive an element.
///
/// Cancellation is final. A cancelled token cannot be reset.
///
/// # Example
///
/// ```rust
/// use stream_bridge::{Adapter, CancellationToken, Capacity, Completion};
///
/// let token = CancellationToken::new();
/// let adapter = Adapter::builder().cancellation(token.clone()).build();
///
/// // The source is never closed, so without cancellation the worker would wait forever.
/// let (_source_tx, source_rx) = Capacity::Unbounded.channel::<u32>();
/// let doubled = adapter.adapt(source_rx, |n| n * 2);
///
/// token.cancel();
/// assert_eq!(doubled.join().unwrap(), Completion::Cancelled);
/// ```
#[derive(Clone, Debug)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,

    // Dropping the sender disconnects `signal`, which wakes every `select!` waiting on it.
    trigger: Mutex<Option<Sender<Signal>>>,
    signal: Receiver<Signal>,
}

impl CancellationToken {
    /// Creates a token that has not been cancelled.
    #[must_use]
    pub fn new() -> Self {
        let (trigger, signal) = channel::bounded(0);

        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                trigger: Mutex::new(Some(trigger)),
                signal,
            }),
        }
    }

    /// Requests every worker observing this token to stop. Calling it again has no effect.
    pub fn cancel(&self) {
        // Release pairs with the Acquire in is_cancelled() so observers see prior writes.
        self.inner.cancelled.store(true, Ordering::Release);

        if self.inner.trigger.lock().take().is_some() {
            debug!("cancellation requested");
        }
    }

    /// Whether [`cancel()`][Self::cancel] has been called on this token or any clone of it.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// A receiver that becomes ready (disconnected) once the token is cancelled.
    pub(crate) fn signal(&self) -> &Receiver<Signal> {
        &self.inner.signal
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::thread;
    use std::time::Duration;

    use crossbeam::channel::{RecvTimeoutError, TryRecvError};
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(CancellationToken: Send, Sync, Clone);

    #[test]
    fn new_token_is_not_cancelled() {
        let token = CancellationToken::new();

        assert!(!token.is_cancelled());
        assert_eq!(token.signal().try_recv().unwrap_err(), TryRecvError::Empty);
    }

    #[test]
    fn cancel_disconnects_signal() {
        let token = CancellationToken::new();

        token.cancel();

        assert!(token.is_cancelled());
        assert_eq!(
            token.signal().try_recv().unwrap_err(),
            TryRecvError::Disconnected
        );
    }

    #[test]
    fn cancel_is_idempotent() {
        let token = CancellationToken::default();

        token.cancel();
        token.cancel();

        assert!(token.is_cancelled());
    }

    #[test]
    fn clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();

        clone.cancel();

        assert!(token.is_cancelled());
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn cancel_wakes_blocked_waiter() {
        let token = CancellationToken::new();

        let waiter = thread::spawn({
            let token = token.clone();
            move || token.signal().recv_timeout(Duration::from_secs(10))
        });

        thread::sleep(Duration::from_millis(10));
        token.cancel();

        assert_eq!(
            waiter.join().unwrap().unwrap_err(),
            RecvTimeoutError::Disconnected
        );
    }
}
