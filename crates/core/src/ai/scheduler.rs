//! Deferred AI moves
//!
//! Holds at most one pending task. Scheduling again or cancelling aborts the
//! previous one, so a reset can never be followed by a stale move.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

pub struct AiScheduler {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl AiScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Runs `task` after the think delay. Must be called inside a tokio runtime.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
    }

    /// Aborts the pending task. Returns true if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                if waiting {
                    debug!("pending ai move cancelled");
                }
                waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for AiScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_runs_after_delay() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut scheduler = AiScheduler::new(Duration::from_millis(10));

        let counter = hits.clone();
        scheduler.schedule(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(scheduler.is_pending());
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!scheduler.is_pending());
    }

    #[tokio::test]
    async fn test_cancel_prevents_run() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut scheduler = AiScheduler::new(Duration::from_millis(30));

        let counter = hits.clone();
        scheduler.schedule(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(scheduler.cancel());
        assert!(!scheduler.cancel());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reschedule_replaces_previous() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut scheduler = AiScheduler::new(Duration::from_millis(20));

        for _ in 0..3 {
            let counter = hits.clone();
            scheduler.schedule(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
