//! Aggregate loading state across in-flight calls.
//!
//! [`LoadingTracker`] counts in-flight calls and broadcasts the busy flag to every listener
//! on each `begin`/`end`, whether or not the flag changed. `end` is clamped at zero so an
//! unmatched call cannot drive the count negative. A panicking listener is logged and the
//! remaining listeners still run.
//!
//! # Examples
//!
//! ```
//! use invoice_api::client::LoadingTracker;
//! use std::sync::{Arc, Mutex};
//!
//! let tracker = LoadingTracker::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let _registration = tracker.subscribe(move |busy| sink.lock().unwrap().push(busy));
//!
//! tracker.begin();
//! tracker.begin();
//! tracker.end();
//! tracker.end();
//! assert_eq!(*seen.lock().unwrap(), vec![true, true, true, false]);
//! ```

use super::interceptors::{Registration, Registry};
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Loading-state listener.
pub type LoadingListener = dyn Fn(bool) + Send + Sync;

/// In-flight call counter with broadcast notification.
pub struct LoadingTracker {
    count: Mutex<usize>,
    listeners: Registry<LoadingListener>,
}

impl LoadingTracker {
    /// Create an idle tracker.
    pub fn new() -> Self {
        LoadingTracker {
            count: Mutex::new(0),
            listeners: Registry::new(),
        }
    }

    /// Count one more in-flight call and notify.
    pub fn begin(&self) {
        let busy = {
            let mut count = self.count.lock();
            *count += 1;
            *count > 0
        };
        self.notify(busy);
    }

    /// Count one fewer in-flight call, never going below zero, and notify.
    pub fn end(&self) {
        let busy = {
            let mut count = self.count.lock();
            *count = count.saturating_sub(1);
            *count > 0
        };
        self.notify(busy);
    }

    /// Whether any call is in flight.
    pub fn is_loading(&self) -> bool {
        self.count() > 0
    }

    /// Number of calls in flight.
    pub fn count(&self) -> usize {
        *self.count.lock()
    }

    /// Register a listener.
    pub fn subscribe<F>(&self, listener: F) -> Registration
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.listeners.register(Arc::new(listener))
    }

    /// Begin now and end when the returned guard drops.
    ///
    /// The guard also ends the call when the owning future is dropped mid-flight.
    pub fn guard(&self) -> LoadingGuard<'_> {
        self.begin();
        LoadingGuard { tracker: self }
    }

    fn notify(&self, busy: bool) {
        for listener in self.listeners.snapshot() {
            if panic::catch_unwind(AssertUnwindSafe(|| listener(busy))).is_err() {
                tracing::warn!(busy, "loading listener panicked");
            }
        }
    }
}

impl Default for LoadingTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Ends a tracked call on drop.
#[must_use = "dropping the guard ends the call immediately"]
pub struct LoadingGuard<'a> {
    tracker: &'a LoadingTracker,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.tracker.end();
    }
}
