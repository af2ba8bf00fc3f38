use std::time::{Duration, Instant};

use crossbeam::channel::RecvTimeoutError;

use crate::{DrainError, Stream};

// Requested counts may be arbitrarily large; only preallocate up to this many slots.
const MAX_PREALLOCATED: usize = 1024;

/// Receives exactly `count` elements from a stream, in the order they arrive.
///
/// Blocks the calling thread until all elements have arrived. If fewer than `count` elements
/// will ever be sent and the stream is never closed, this blocks forever; use
/// [`drain_timeout()`] to bound the wait.
///
/// # Errors
///
/// Returns [`DrainError::Closed`] with the elements received so far if the stream is closed
/// and empty before `count` elements have arrived.
///
/// # Example
///
/// ```rust
/// use stream_bridge::{Capacity, drain, send_all};
///
/// let (tx, rx) = Capacity::Bounded(10).channel();
/// send_all(&tx, ["hi"; 5]).unwrap();
///
/// assert_eq!(drain(&rx, 5).unwrap(), vec!["hi"; 5]);
///
/// drop(tx);
/// let error = drain(&rx, 1).unwrap_err();
/// assert!(error.received().is_empty());
/// ```
pub fn drain<T, S>(stream: &S, count: usize) -> Result<Vec<T>, DrainError<T>>
where
    S: Stream<T> + ?Sized,
{
    let receiver = stream.receiver();
    let mut received = Vec::with_capacity(count.min(MAX_PREALLOCATED));

    while received.len() < count {
        match receiver.recv() {
            Ok(element) => received.push(element),
            Err(_) => {
                return Err(DrainError::Closed {
                    expected: count,
                    received,
                });
            }
        }
    }

    Ok(received)
}

/// Receives exactly `count` elements from a stream, giving up after `timeout`.
///
/// # Errors
///
/// Returns [`DrainError::TimedOut`] if the timeout elapses first and [`DrainError::Closed`] if
/// the stream is closed and empty first. Either error carries the elements received so far.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
///
/// use stream_bridge::{Capacity, DrainError, drain_timeout};
///
/// let (tx, rx) = Capacity::Unbounded.channel();
/// tx.send(1).unwrap();
///
/// let error = drain_timeout(&rx, 2, Duration::from_millis(10)).unwrap_err();
///
/// assert!(matches!(error, DrainError::TimedOut { .. }));
/// assert_eq!(error.into_received(), vec![1]);
/// ```
pub fn drain_timeout<T, S>(
    stream: &S,
    count: usize,
    timeout: Duration,
) -> Result<Vec<T>, DrainError<T>>
where
    S: Stream<T> + ?Sized,
{
    // A deadline too far in the future to represent is as good as no deadline.
    let Some(deadline) = Instant::now().checked_add(timeout) else {
        return drain(stream, count);
    };

    let receiver = stream.receiver();
    let mut received = Vec::with_capacity(count.min(MAX_PREALLOCATED));

    while received.len() < count {
        match receiver.recv_deadline(deadline) {
            Ok(element) => received.push(element),
            Err(RecvTimeoutError::Timeout) => {
                return Err(DrainError::TimedOut {
                    expected: count,
                    received,
                });
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(DrainError::Closed {
                    expected: count,
                    received,
                });
            }
        }
    }

    Ok(received)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::thread;

    use testing::with_watchdog;

    use super::*;
    use crate::{Capacity, send_all};

    #[test]
    fn drains_requested_prefix() {
        let (tx, rx) = Capacity::Bounded(10).channel();
        send_all(&tx, 0..10).unwrap();

        assert_eq!(drain(&rx, 5).unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(rx.len(), 5);
    }

    #[test]
    fn zero_count_returns_immediately() {
        let (_tx, rx) = Capacity::Unbounded.channel::<u8>();

        assert!(drain(&rx, 0).unwrap().is_empty());
    }

    #[test]
    fn closed_stream_returns_partial_elements() {
        let (tx, rx) = Capacity::Unbounded.channel();
        send_all(&tx, ["a", "b"]).unwrap();
        drop(tx);

        let error = drain(&rx, 3).unwrap_err();

        assert_eq!(
            error,
            DrainError::Closed {
                expected: 3,
                received: vec!["a", "b"],
            }
        );
    }

    #[test]
    fn huge_count_does_not_preallocate() {
        let (tx, rx) = Capacity::Unbounded.channel();
        tx.send(1_u8).unwrap();
        drop(tx);

        let error = drain(&rx, usize::MAX).unwrap_err();

        assert_eq!(error.received(), &[1]);
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn waits_for_late_elements() {
        with_watchdog(|| {
            let (tx, rx) = Capacity::RENDEZVOUS.channel();

            let sender = thread::spawn(move || send_all(&tx, [1, 2, 3]));

            assert_eq!(drain(&rx, 3).unwrap(), vec![1, 2, 3]);
            sender.join().unwrap().unwrap();
        });
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn timeout_returns_partial_elements() {
        with_watchdog(|| {
            let (tx, rx) = Capacity::Unbounded.channel();
            tx.send('a').unwrap();

            let error = drain_timeout(&rx, 2, Duration::from_millis(20)).unwrap_err();

            assert_eq!(
                error,
                DrainError::TimedOut {
                    expected: 2,
                    received: vec!['a'],
                }
            );
        });
    }

    #[test]
    fn timeout_reports_closed_stream() {
        let (tx, rx) = Capacity::Unbounded.channel::<u8>();
        drop(tx);

        let error = drain_timeout(&rx, 1, Duration::from_secs(10)).unwrap_err();

        assert!(matches!(error, DrainError::Closed { expected: 1, .. }));
    }

    #[test]
    fn timeout_with_enough_elements_succeeds() {
        let (tx, rx) = Capacity::Unbounded.channel();
        send_all(&tx, [1, 2]).unwrap();

        assert_eq!(
            drain_timeout(&rx, 2, Duration::from_secs(10)).unwrap(),
            vec![1, 2]
        );
    }

    #[test]
    fn unrepresentable_deadline_falls_back_to_plain_drain() {
        let (tx, rx) = Capacity::Unbounded.channel();
        tx.send(5).unwrap();

        assert_eq!(drain_timeout(&rx, 1, Duration::MAX).unwrap(), vec![5]);
    }
}
