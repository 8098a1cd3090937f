//! Trailing-edge debouncer for bursty value changes
//!
//! Synthesized input is slow relative to how fast a consumer can request
//! changes (e.g. a MIDI fader sweep produces dozens of values per second).
//! A [`Debouncer`] collapses a burst into one action: each call re-arms the
//! timer, and only the last call's action runs once the burst goes quiet.

use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Runs only the most recent action, `delay` after the last call.
///
/// Must be used from within a tokio runtime.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedules `action` to run after the delay, cancelling any action
    /// scheduled earlier that has not run yet.
    pub fn call<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = self.delay;
        let task = tokio::spawn(async move {
            sleep(delay).await;
            action();
        });

        let mut pending = self.pending.lock().expect("debouncer lock poisoned");
        if let Some(previous) = pending.replace(task) {
            previous.abort();
        }
    }

    /// Cancels the pending action, if any.
    pub fn cancel(&self) {
        if let Some(task) = self.pending.lock().expect("debouncer lock poisoned").take() {
            task.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
