use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts how many times a callback has been invoked, possibly from many threads.
///
/// Clones share the same count, so a clone can be moved into a callback while the original
/// stays with the test for assertions.
///
/// # Example
///
/// ```rust
/// use testing::CallCounter;
///
/// let calls = CallCounter::new();
/// let callback = {
///     let calls = calls.clone();
///     move || calls.increment()
/// };
///
/// callback();
/// callback();
///
/// assert_eq!(calls.count(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CallCounter {
    count: Arc<AtomicUsize>,
}

impl CallCounter {
    /// Creates a counter that starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one invocation.
    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of invocations recorded so far by this counter and all its clones.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn clones_share_count() {
        let counter = CallCounter::new();
        let clone = counter.clone();

        clone.increment();
        counter.increment();

        assert_eq!(counter.count(), 2);
        assert_eq!(clone.count(), 2);
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn counts_across_threads() {
        let counter = CallCounter::new();

        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        counter.increment();
                    }
                });
            }
        });

        assert_eq!(counter.count(), 400);
    }
}
