//! Notification capability injected into the catalog controller.
//!
//! The controller only decides *what* to tell the user. How a notification
//! is shown (terminal line, log event, test recorder) is the front end's
//! business. Every queued notification is also logged at debug level.

use std::sync::{Mutex, PoisonError};

use qkart_core::Notification;

/// Displays a message of a given severity to the user.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Buffers notifications until the front end drains them.
///
/// The terminal storefront prints the queue after each command, the way a
/// snackbar stack shows up next to the page.
#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: Mutex<Vec<Notification>>,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all queued notifications, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of notifications waiting.
    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, notification: Notification) {
        tracing::debug!(severity = %notification.severity, message = %notification.message, "toast queued");
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_queue_drains_in_order() {
        let queue = ToastQueue::new();
        queue.notify(Notification::warning("first"));
        queue.notify(Notification::error("second"));
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert_eq!(
            drained,
            vec![Notification::warning("first"), Notification::error("second")]
        );
        assert!(queue.is_empty());
    }
}
