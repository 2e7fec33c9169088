//! # Search Debouncer
//!
//! Collapses bursts of scheduled work into one run per quiet period.
//!
//! Every call to [`Debouncer::schedule`] takes a ticket. The scheduled task
//! sleeps for the window and then runs only if its ticket is still the newest
//! one. Work that already started is never interrupted: superseding a ticket
//! only prevents tasks that are still waiting out their window.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Default quiet period between the last keystroke and the search.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(300);

/// Trailing-edge debouncer backed by tokio timers.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    latest: Arc<AtomicU64>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl Debouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Quiet period.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Schedule `task` to run once the window elapses without another call.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = Arc::clone(&self.latest);
        let window = self.window;

        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if latest.load(Ordering::SeqCst) != ticket {
                tracing::trace!(ticket, "debounced task superseded");
                return;
            }
            task.await;
        })
    }

    /// Drop any task still waiting out its window.
    pub fn cancel_pending(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> std::pin::Pin<Box<dyn Future<Output = ()> + Send>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let make = move |keyword: &str| {
            let sink = Arc::clone(&sink);
            let keyword = keyword.to_string();
            Box::pin(async move { sink.lock().push(keyword) })
                as std::pin::Pin<Box<dyn Future<Output = ()> + Send>>
        };
        (calls, make)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_last_call() {
        let debouncer = Debouncer::default();
        let (calls, make) = recorder();

        let mut handles = Vec::new();
        for keyword in ["o", "oc", "oct", "octo", "octoc", "octoca", "octocat"] {
            handles.push(debouncer.schedule(make(keyword)));
            tokio::time::advance(Duration::from_millis(100)).await;
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*calls.lock(), vec!["octocat".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn separated_calls_each_fire() {
        let debouncer = Debouncer::new(Duration::from_millis(50));
        let (calls, make) = recorder();

        debouncer.schedule(make("first")).await.unwrap();
        debouncer.schedule(make("second")).await.unwrap();

        assert_eq!(*calls.lock(), vec!["first".to_string(), "second".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_pending_drops_waiting_task() {
        let debouncer = Debouncer::default();
        let (calls, make) = recorder();

        let handle = debouncer.schedule(make("never"));
        debouncer.cancel_pending();
        handle.await.unwrap();

        assert!(calls.lock().is_empty());
    }
}
