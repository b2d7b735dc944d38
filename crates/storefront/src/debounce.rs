//! Cancellable delayed tasks for search-as-you-type.
//!
//! A [`Debouncer`] holds at most one pending task. Scheduling a new task
//! cancels the previous one if its quiet period has not elapsed yet. Once a
//! task's delay has passed it runs to completion; later schedules do not
//! abort work that already started.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Runs the most recently scheduled task after a quiet period.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Quiet period before a scheduled task runs.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `task` to run after the quiet period, superseding any task
    /// that is still waiting.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        if let Some(previous) = self.replace(Some(cancel.clone())) {
            previous.cancel();
        }

        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::trace!("debounced task superseded");
                }
                () = tokio::time::sleep(delay) => task.await,
            }
        })
    }

    /// Cancel the waiting task, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.replace(None) {
            previous.cancel();
        }
    }

    fn replace(&self, next: Option<CancellationToken>) -> Option<CancellationToken> {
        std::mem::replace(
            &mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner),
            next,
        )
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
