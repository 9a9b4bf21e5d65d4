//! Polling helpers for assertions on work done by background threads.

use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Polls `condition` until it holds or `timeout` elapses.
///
/// Returns the final evaluation, so callers can `assert!` on it.
///
/// ```rust
/// use daq_test_helpers::wait_until;
/// use std::time::Duration;
///
/// assert!(wait_until(Duration::from_millis(10), || true));
/// ```
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(POLL_INTERVAL);
    }
}
