use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};

use crossbeam::channel::{Iter, Receiver, Sender, select};

use crate::worker::transform_panicked;
use crate::{CancellationToken, Capacity, Completion, Result, Stream, Worker};

const DEFAULT_WORKER_NAME: &str = "stream-adapter";

/// Transforms every element of a source stream into a new stream on a background worker.
///
/// This is shorthand for [`Adapter::new().adapt(source, transform)`][Adapter::adapt], using a
/// rendezvous output stream and a private cancellation token.
///
/// # Example
///
/// ```rust
/// use stream_bridge::{Capacity, adapt, drain, send_all};
///
/// let (source_tx, source_rx) = Capacity::Bounded(3).channel();
/// send_all(&source_tx, [1, 2, 3]).unwrap();
/// drop(source_tx);
///
/// let texts = adapt(source_rx, |n: i32| n.to_string());
///
/// assert_eq!(drain(&texts, 3).unwrap(), vec!["1", "2", "3"]);
/// assert_eq!(texts.recv(), None);
/// ```
#[must_use]
pub fn adapt<T, D, F>(source: Receiver<T>, transform: F) -> Adapted<D>
where
    T: Send + 'static,
    D: Send + 'static,
    F: FnMut(T) -> D + Send + 'static,
{
    Adapter::new().adapt(source, transform)
}

/// Starts background workers that transform one stream into another.
///
/// Each call to [`adapt()`][Self::adapt] spawns exactly one worker thread that:
///
/// 1. Receives the next element from the source stream, in order.
/// 2. Calls the transform exactly once for that element.
/// 3. Sends the result to the output stream, waiting while the output is full.
///
/// The worker is the only sender of the output stream. The output closes when the worker stops,
/// which happens when the source is closed and drained, when every output receiver is dropped,
/// when the cancellation token is cancelled or when the transform panics.
///
/// A slow consumer of the output throttles the worker, which in turn leaves elements buffered
/// in the source stream.
///
/// # Example
///
/// ```rust
/// use stream_bridge::{Adapter, Capacity, drain};
///
/// let adapter = Adapter::builder()
///     .output_capacity(Capacity::Bounded(16))
///     .name("lengths")
///     .build();
///
/// let (words_tx, words_rx) = Capacity::Unbounded.channel();
/// let lengths = adapter.adapt(words_rx, |word: &str| word.len());
///
/// words_tx.send("stream").unwrap();
/// words_tx.send("bridge").unwrap();
/// drop(words_tx);
///
/// assert_eq!(drain(&lengths, 2).unwrap(), vec![6, 6]);
/// ```
#[derive(Clone, Debug)]
pub struct Adapter {
    output_capacity: Capacity,
    cancellation: Option<CancellationToken>,
    name: Cow<'static, str>,
}

impl Adapter {
    /// Creates an adapter with default settings.
    ///
    /// Use [`Adapter::builder()`] for custom configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a builder for configuring the adapter.
    #[must_use]
    pub fn builder() -> AdapterBuilder {
        AdapterBuilder::new()
    }

    /// Spawns a worker that feeds `transform(element)` for every element of `source` into the
    /// returned stream.
    #[must_use]
    pub fn adapt<T, D, F>(&self, source: Receiver<T>, transform: F) -> Adapted<D>
    where
        T: Send + 'static,
        D: Send + 'static,
        F: FnMut(T) -> D + Send + 'static,
    {
        let (output_tx, output_rx) = self.output_capacity.channel();

        // Without a shared token, every adapted stream gets its own so it can still be cancelled.
        let cancellation = self.cancellation.clone().unwrap_or_default();

        let worker = Worker::spawn(self.name.to_string(), {
            let cancellation = cancellation.clone();
            move || run(&source, &output_tx, transform, &cancellation)
        });

        Adapted {
            receiver: output_rx,
            worker,
            cancellation,
        }
    }
}

impl Default for Adapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring an [`Adapter`].
#[derive(Debug)]
#[must_use]
pub struct AdapterBuilder {
    output_capacity: Capacity,
    cancellation: Option<CancellationToken>,
    name: Cow<'static, str>,
}

impl AdapterBuilder {
    fn new() -> Self {
        Self {
            output_capacity: Capacity::RENDEZVOUS,
            cancellation: None,
            name: Cow::Borrowed(DEFAULT_WORKER_NAME),
        }
    }

    /// Sets the buffer size of output streams.
    ///
    /// Default is [`Capacity::RENDEZVOUS`]: the worker hands over each element directly to a
    /// receiver.
    pub fn output_capacity(mut self, capacity: Capacity) -> Self {
        self.output_capacity = capacity;
        self
    }

    /// Makes all workers started by the adapter observe the given token.
    ///
    /// By default, each adapted stream gets its own token, reachable via
    /// [`Adapted::cancellation()`].
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Sets the thread name of the workers.
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Builds the adapter with the configured settings.
    #[must_use]
    pub fn build(self) -> Adapter {
        Adapter {
            output_capacity: self.output_capacity,
            cancellation: self.cancellation,
            name: self.name,
        }
    }
}

fn run<T, D, F>(
    source: &Receiver<T>,
    output: &Sender<D>,
    mut transform: F,
    cancellation: &CancellationToken,
) -> Result<Completion>
where
    F: FnMut(T) -> D,
{
    let signal = cancellation.signal();
    let mut delivered: usize = 0;

    loop {
        // select! picks randomly among ready operations, so check explicitly to stop promptly.
        if cancellation.is_cancelled() {
            return Ok(Completion::Cancelled);
        }

        let element = select! {
            recv(source) -> message => match message {
                Ok(element) => element,
                // An upstream adapter sharing our token closes its output when cancelled.
                Err(_) if cancellation.is_cancelled() => return Ok(Completion::Cancelled),
                Err(_) => return Ok(Completion::Finished),
            },
            recv(signal) -> _ => return Ok(Completion::Cancelled),
        };

        let adapted = panic::catch_unwind(AssertUnwindSafe(|| transform(element)))
            .map_err(|payload| transform_panicked(delivered, &*payload))?;

        select! {
            send(output, adapted) -> result => {
                if result.is_err() {
                    return Ok(Completion::Disconnected);
                }
            },
            recv(signal) -> _ => return Ok(Completion::Cancelled),
        }

        delivered = delivered.saturating_add(1);
    }
}

/// The output of an [`Adapter`]: a stream of transformed elements and the worker producing them.
///
/// The stream closes once the worker stops. Use [`join()`][Self::join] to learn why.
#[derive(Debug)]
pub struct Adapted<D> {
    receiver: Receiver<D>,
    worker: Worker,
    cancellation: CancellationToken,
}

impl<D> Adapted<D> {
    /// The receiving end of the output stream.
    #[must_use]
    pub fn receiver(&self) -> &Receiver<D> {
        &self.receiver
    }

    /// Waits for the next element. Returns `None` once the stream is closed and drained.
    #[must_use]
    pub fn recv(&self) -> Option<D> {
        self.receiver.recv().ok()
    }

    /// Iterates over elements until the stream is closed and drained.
    pub fn iter(&self) -> Iter<'_, D> {
        self.receiver.iter()
    }

    /// The token the worker observes.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Asks the worker to stop. Elements it has not yet delivered are dropped.
    ///
    /// If the token is shared with other adapted streams, they are cancelled as well.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// The worker transforming the elements.
    #[must_use]
    pub fn worker(&self) -> &Worker {
        &self.worker
    }

    /// Drops the output stream and waits for the worker to stop.
    ///
    /// Elements not yet received are discarded. If the source stream is still open and idle,
    /// this waits until the source delivers another element, is closed or the worker is
    /// cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransformPanicked`][crate::Error::TransformPanicked] if the transform
    /// panicked.
    pub fn join(self) -> Result<Completion> {
        let (receiver, worker) = self.into_parts();
        drop(receiver);
        worker.join()
    }

    /// Splits into the output stream and the worker.
    #[must_use]
    pub fn into_parts(self) -> (Receiver<D>, Worker) {
        (self.receiver, self.worker)
    }
}

impl<D> Stream<D> for Adapted<D> {
    fn receiver(&self) -> &Receiver<D> {
        &self.receiver
    }
}

impl<'a, D> IntoIterator for &'a Adapted<D> {
    type Item = D;
    type IntoIter = Iter<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
