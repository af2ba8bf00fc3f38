use std::panic::{self, AssertUnwindSafe};

use crossbeam::channel::{self, Iter, Receiver, Sender, TrySendError};

use crate::worker::sequence_panicked;
use crate::{Completion, Error, Result, Stream, Worker};

const WORKER_NAME: &str = "stream-producer";

/// Exposes a finite sequence as a stream with a buffer of `capacity` elements.
///
/// * If `capacity` equals the length of the sequence, every element is placed in the buffer
///   before this function returns. No background worker is involved.
/// * Otherwise, a background worker sends the elements in order. This function returns
///   immediately. With a `capacity` smaller than the sequence, the worker waits whenever the
///   buffer is full and continues as the consumer makes room. A `capacity` of zero hands over
///   each element directly to a receiver.
///
/// The returned stream stays open after the last element has been produced, just like a
/// channel whose sender is still alive. Call [`Produced::close()`] or use
/// [`Produced::into_receiver()`] to get a stream that ends with the sequence.
///
/// # Panics
///
/// In the synchronous case, panics if the sequence yields more elements than its reported
/// length. A panic raised by the sequence itself propagates to the caller.
///
/// # Example
///
/// ```rust
/// use stream_bridge::{drain, to_stream};
///
/// let produced = to_stream(vec![10, 20, 30], 1);
/// assert!(!produced.is_synchronous());
///
/// assert_eq!(drain(&produced, 1).unwrap(), vec![10]);
/// assert_eq!(drain(&produced, 2).unwrap(), vec![20, 30]);
/// ```
#[must_use]
pub fn to_stream<I>(sequence: I, capacity: usize) -> Produced<I::Item>
where
    I: IntoIterator,
    I::IntoIter: ExactSizeIterator + Send + 'static,
    I::Item: Send + 'static,
{
    let elements = sequence.into_iter();

    if elements.len() == capacity {
        return fill(elements);
    }

    let (sender, receiver) = channel::bounded(capacity);

    let producer = Worker::spawn(WORKER_NAME.to_owned(), {
        let sender = sender.clone();
        move || produce(elements, &sender)
    });

    Produced {
        receiver,
        sender: Some(sender),
        producer: Some(producer),
        synchronous: false,
    }
}

/// Exposes a finite sequence as a stream whose buffer holds exactly the whole sequence.
///
/// Every element is in the buffer before this function returns and no background worker is
/// involved. Equivalent to calling [`to_stream()`] with the length of the sequence.
///
/// # Panics
///
/// Panics if the sequence yields more elements than its reported length. A panic raised by the
/// sequence itself propagates to the caller.
///
/// # Example
///
/// ```rust
/// use stream_bridge::to_stream_filled;
///
/// let produced = to_stream_filled(["a", "b", "c"]);
///
/// assert!(produced.is_synchronous());
/// assert_eq!(produced.len(), 3);
/// assert_eq!(produced.capacity(), Some(3));
/// ```
#[must_use]
pub fn to_stream_filled<I>(sequence: I) -> Produced<I::Item>
where
    I: IntoIterator,
    I::IntoIter: ExactSizeIterator,
{
    fill(sequence.into_iter())
}

fn fill<I>(elements: I) -> Produced<I::Item>
where
    I: ExactSizeIterator,
{
    let (sender, receiver) = channel::bounded(elements.len());

    for element in elements {
        match sender.try_send(element) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                panic!("sequence yielded more elements than its reported length")
            }
            Err(TrySendError::Disconnected(_)) => {
                unreachable!("the receiver is alive because we are holding it")
            }
        }
    }

    Produced {
        receiver,
        sender: Some(sender),
        producer: None,
        synchronous: true,
    }
}

fn produce<I>(mut elements: I, output: &Sender<I::Item>) -> Result<Completion>
where
    I: Iterator,
{
    let mut produced: usize = 0;

    loop {
        let next = panic::catch_unwind(AssertUnwindSafe(|| elements.next()))
            .map_err(|payload| sequence_panicked(produced, &*payload))?;

        let Some(element) = next else {
            return Ok(Completion::Finished);
        };

        if output.send(element).is_err() {
            return Ok(Completion::Disconnected);
        }

        produced = produced.saturating_add(1);
    }
}

/// Sends every element into the channel in order, waiting whenever the channel is full.
///
/// # Errors
///
/// Returns [`Error::Disconnected`] if every receiver of the channel has been dropped. Elements
/// after the first one that could not be delivered are not consumed from the iterator.
///
/// # Example
///
/// ```rust
/// use stream_bridge::{Capacity, drain, send_all};
///
/// let (tx, rx) = Capacity::Bounded(4).channel();
/// send_all(&tx, [1, 2, 3, 4]).unwrap();
///
/// assert_eq!(drain(&rx, 4).unwrap(), vec![1, 2, 3, 4]);
/// ```
pub fn send_all<T, I>(sender: &Sender<T>, elements: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
{
    let mut sent: usize = 0;

    for element in elements {
        sender
            .send(element)
            .map_err(|_disconnected| Error::Disconnected { sent })?;
        sent = sent.saturating_add(1);
    }

    Ok(())
}

/// A stream fed from a finite sequence by [`to_stream()`] or [`to_stream_filled()`].
///
/// The handle keeps its own sender alive, so receivers never observe the end of the stream
/// while the handle exists unless [`close()`][Self::close] is called. This sender can also be
/// used to append more elements after the sequence.
#[derive(Debug)]
pub struct Produced<T> {
    receiver: Receiver<T>,
    sender: Option<Sender<T>>,
    producer: Option<Worker>,
    synchronous: bool,
}

impl<T> Produced<T> {
    /// The receiving end of the stream.
    #[must_use]
    pub fn receiver(&self) -> &Receiver<T> {
        &self.receiver
    }

    /// Waits for the next element. Returns `None` once the stream is closed and drained.
    ///
    /// Blocks forever once the sequence is exhausted unless the stream has been closed.
    #[must_use]
    pub fn recv(&self) -> Option<T> {
        self.receiver.recv().ok()
    }

    /// Iterates over elements until the stream is closed and drained.
    pub fn iter(&self) -> Iter<'_, T> {
        self.receiver.iter()
    }

    /// Number of elements currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Whether no elements are currently buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Maximum number of buffered elements.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.receiver.capacity()
    }

    /// Whether every element was buffered up front, without a background worker.
    #[must_use]
    pub fn is_synchronous(&self) -> bool {
        self.synchronous
    }

    /// The sender kept by this handle, unless the stream has been closed.
    #[must_use]
    pub fn sender(&self) -> Option<&Sender<T>> {
        self.sender.as_ref()
    }

    /// Drops the sender kept by this handle.
    ///
    /// Once the background producer (if any) has sent its last element, receivers observe the
    /// end of the stream after draining the buffer.
    pub fn close(&mut self) {
        self.sender = None;
    }

    /// Waits for the background producer to send its last element and returns how it ended.
    ///
    /// Returns `None` for a synchronously filled stream or if the producer was already joined.
    /// With a buffer smaller than the remaining sequence, this only returns once a consumer on
    /// another thread has received enough elements.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SequencePanicked`] if the sequence panicked while yielding an element.
    pub fn join_producer(&mut self) -> Option<Result<Completion>> {
        self.producer.take().map(Worker::join)
    }

    /// Converts into a plain receiver that observes the end of the stream once the sequence
    /// has been fully produced and drained.
    ///
    /// The background producer, if any, keeps running detached. Nobody can join it afterwards,
    /// so if the sequence panics, this receiver sees the stream end early as if it closed
    /// normally. The panic is only logged.
    #[must_use]
    pub fn into_receiver(self) -> Receiver<T> {
        self.receiver
    }

    /// Splits into the receiver, the sender kept by the handle and the background producer.
    #[must_use]
    pub fn into_parts(self) -> (Receiver<T>, Option<Sender<T>>, Option<Worker>) {
        (self.receiver, self.sender, self.producer)
    }
}

impl<T> Stream<T> for Produced<T> {
    fn receiver(&self) -> &Receiver<T> {
        &self.receiver
    }
}

impl<'a, T> IntoIterator for &'a Produced<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
