use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Polls `condition` until it holds or `timeout` elapses.
///
/// Background stream workers make progress on their own schedule, so assertions about their
/// effects (such as how many items are buffered) need to wait for the worker to catch up.
///
/// Returns whether the condition was observed to hold.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::thread;
/// use std::time::Duration;
///
/// use testing::eventually;
///
/// let flag = Arc::new(AtomicBool::new(false));
/// thread::spawn({
///     let flag = Arc::clone(&flag);
///     move || flag.store(true, Ordering::Relaxed)
/// });
///
/// assert!(eventually(Duration::from_secs(5), || flag.load(Ordering::Relaxed)));
/// ```
pub fn eventually<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let started = Instant::now();

    loop {
        if condition() {
            return true;
        }

        if started.elapsed() >= timeout {
            return false;
        }

        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn true_condition_returns_immediately() {
        assert!(eventually(Duration::ZERO, || true));
    }

    #[test]
    fn false_condition_times_out() {
        assert!(!eventually(Duration::from_millis(5), || false));
    }

    #[test]
    fn condition_becoming_true_is_observed() {
        let mut polls = 0_u32;

        let satisfied = eventually(Duration::from_secs(5), || {
            polls = polls.saturating_add(1);
            polls >= 3
        });

        assert!(satisfied);
        assert_eq!(polls, 3);
    }
}
