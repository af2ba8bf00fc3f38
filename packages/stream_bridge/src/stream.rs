use crossbeam::channel::{self, Receiver, Sender};

/// How many elements a stream buffers before senders have to wait for a receiver.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[expect(
    clippy::exhaustive_enums,
    reason = "a buffer is either bounded or not, there is nothing to add"
)]
pub enum Capacity {
    /// At most this many elements are buffered. Zero means every send waits for a matching
    /// receive (a rendezvous).
    Bounded(usize),

    /// Senders never wait.
    Unbounded,
}

impl Capacity {
    /// Every send waits until a receiver takes the element.
    pub const RENDEZVOUS: Self = Self::Bounded(0);

    /// Creates a channel with this capacity.
    #[must_use]
    pub fn channel<T>(self) -> (Sender<T>, Receiver<T>) {
        match self {
            Self::Bounded(capacity) => channel::bounded(capacity),
            Self::Unbounded => channel::unbounded(),
        }
    }

    /// The buffer limit, or `None` if unbounded.
    #[must_use]
    pub fn limit(self) -> Option<usize> {
        match self {
            Self::Bounded(capacity) => Some(capacity),
            Self::Unbounded => None,
        }
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self::RENDEZVOUS
    }
}

impl From<usize> for Capacity {
    fn from(capacity: usize) -> Self {
        Self::Bounded(capacity)
    }
}

/// Something elements can be received from.
///
/// Implemented by plain [`Receiver`]s and by the stream handles of this crate, so that
/// [`drain()`][crate::drain] accepts any of them.
pub trait Stream<T> {
    /// The receiving end of the underlying channel.
    fn receiver(&self) -> &Receiver<T>;
}

impl<T> Stream<T> for Receiver<T> {
    fn receiver(&self) -> &Receiver<T> {
        self
    }
}
