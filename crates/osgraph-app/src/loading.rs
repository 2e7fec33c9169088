//! Loading indicator
//!
//! Overlapping executions share one indicator: the host hears `true` when the
//! first one starts and `false` when the last one settles. A [`LoadingGuard`]
//! releases its slot on drop, so every exit path (success, service failure,
//! transport error, panic unwind) turns the indicator back off.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::bridge::QueryHost;

/// Counts executions in flight and signals edges to the host.
#[derive(Clone)]
pub struct LoadingTracker {
    in_flight: Arc<AtomicUsize>,
    host: Arc<dyn QueryHost>,
}

impl LoadingTracker {
    /// Tracker reporting to `host`.
    pub fn new(host: Arc<dyn QueryHost>) -> Self {
        Self {
            in_flight: Arc::new(AtomicUsize::new(0)),
            host,
        }
    }

    /// Mark one execution as started.
    #[must_use = "loading is cleared when the guard drops"]
    pub fn begin(&self) -> LoadingGuard {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            self.host.on_loading_change(true);
        }
        LoadingGuard {
            tracker: self.clone(),
        }
    }

    /// Executions currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for LoadingTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingTracker")
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

/// One execution's hold on the loading indicator.
#[derive(Debug)]
pub struct LoadingGuard {
    tracker: LoadingTracker,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if self.tracker.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.tracker.host.on_loading_change(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Signals(Mutex<Vec<bool>>);

    impl QueryHost for Signals {
        fn on_loading_change(&self, loading: bool) {
            self.0.lock().push(loading);
        }
    }

    #[test]
    fn single_guard_toggles_once() {
        let host = Arc::new(Signals::default());
        let tracker = LoadingTracker::new(host.clone());
        drop(tracker.begin());
        assert_eq!(*host.0.lock(), vec![true, false]);
        assert_eq!(tracker.in_flight(), 0);
    }

    #[test]
    fn overlapping_guards_signal_outer_edges_only() {
        let host = Arc::new(Signals::default());
        let tracker = LoadingTracker::new(host.clone());
        let first = tracker.begin();
        let second = tracker.begin();
        drop(first);
        assert_eq!(*host.0.lock(), vec![true]);
        drop(second);
        assert_eq!(*host.0.lock(), vec![true, false]);
    }
}
