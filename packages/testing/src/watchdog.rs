use std::env;
use std::panic;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, RecvTimeoutError};

/// Environment variable that disables the watchdog when set to "1".
///
/// Mutation testing relies on hanging mutants actually hanging, so the watchdog must not
/// convert them into failures.
const DISABLE_VARIABLE: &str = "MUTATION_TESTING";

fn timeout() -> Duration {
    // Thread handoffs under Miri are orders of magnitude slower.
    if cfg!(miri) {
        Duration::from_secs(60)
    } else {
        Duration::from_secs(10)
    }
}

/// Runs a test body on a separate thread and fails the test if it does not finish in time.
///
/// Stream tests block on channel operations by nature, so a bug typically shows up as a hang
/// rather than as an assertion failure. The watchdog turns such hangs into panics.
///
/// A panic in the test body is re-raised on the calling thread with its original payload.
///
/// # Panics
///
/// Panics if the test body panics or exceeds the timeout.
///
/// # Example
///
/// ```rust
/// use testing::with_watchdog;
///
/// let sum = with_watchdog(|| (1..=4).sum::<u32>());
/// assert_eq!(sum, 10);
/// ```
pub fn with_watchdog<F, R>(test_body: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    if env::var(DISABLE_VARIABLE).as_deref() == Ok("1") {
        return test_body();
    }

    let (result_tx, result_rx) = channel::bounded(1);

    let test_thread = thread::Builder::new()
        .name("watched-test".to_owned())
        .spawn(move || {
            // If the watchdog already gave up, nobody is listening and that is fine.
            drop(result_tx.send(test_body()));
        })
        .expect("failed to spawn watched test thread");

    let timeout = timeout();

    match result_rx.recv_timeout(timeout) {
        Ok(result) => {
            test_thread
                .join()
                .expect("test thread delivered a result so it cannot have panicked");
            result
        }
        Err(RecvTimeoutError::Timeout) => {
            panic!("test did not finish within {timeout:?}, it is probably stuck");
        }
        Err(RecvTimeoutError::Disconnected) => match test_thread.join() {
            Err(payload) => panic::resume_unwind(payload),
            Ok(()) => panic!("test thread exited without delivering a result"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_result_of_fast_test() {
        assert_eq!(with_watchdog(|| 42), 42);
    }

    #[test]
    #[should_panic(expected = "inner failure")]
    fn propagates_panic_payload() {
        with_watchdog(|| panic!("inner failure"));
    }
}
