use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

/// Cancel capability for a live ratings subscription.
///
/// Once [`Subscription::unsubscribe`] returns, the delivery thread has exited
/// and no callback will run again. Dropping the handle unsubscribes too.
#[derive(Debug)]
pub struct Subscription {
    cancelled: Arc<AtomicBool>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Subscription {
    pub(crate) fn new(cancelled: Arc<AtomicBool>, worker: JoinHandle<()>) -> Self {
        Self {
            cancelled,
            worker: Mutex::new(Some(worker)),
        }
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        !self.cancelled.load(Ordering::SeqCst)
            && self
                .worker
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .as_ref()
                .is_some_and(|worker| !worker.is_finished())
    }

    /// Stops delivery. Safe to call any number of times, including from
    /// inside a delivery callback.
    pub fn unsubscribe(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(worker) = worker else {
            return;
        };

        if worker.thread().id() == thread::current().id() {
            // Called from a callback; the loop exits once the callback returns.
            return;
        }
        worker.thread().unpark();
        if worker.join().is_err() {
            debug!("subscription worker panicked before shutdown");
        }
        debug!("ratings subscription closed");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

/// Sleeps for `interval` unless `cancelled` is raised first.
pub(crate) fn wait_unless_cancelled(cancelled: &AtomicBool, interval: Duration) {
    let deadline = Instant::now() + interval;
    while !cancelled.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::park_timeout(deadline - now);
    }
}
