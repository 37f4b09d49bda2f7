//! Notification queue with timed eviction.
//!
//! The queue is a cheap handle shared by every page. Each pushed notification
//! owns one eviction task; dismissing the notification aborts exactly that
//! task, so an early dismissal can never race a later eviction.

use super::notification::{Notification, NotificationId, Severity};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::Instant;

/// Default lifetime of a notification.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug)]
struct Entry {
    notification: Notification,
    eviction: Option<AbortHandle>,
}

#[derive(Debug, Default)]
struct QueueInner {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Shared handle to the live notifications, in insertion order.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    inner: Arc<Mutex<QueueInner>>,
    timeout: Duration,
    revision: Arc<watch::Sender<u64>>,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl NotificationQueue {
    /// Creates an empty queue whose notifications live for `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(Mutex::new(QueueInner::default())),
            timeout,
            revision: Arc::new(revision),
        }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Appends a notification and schedules its removal.
    ///
    /// # Returns
    ///
    /// The id of the new notification, usable with [`NotificationQueue::dismiss`].
    pub fn push(&self, message: impl Into<String>, severity: Severity) -> NotificationId {
        let message = message.into();
        let id = {
            let mut inner = self.inner.lock();
            inner.next_id += 1;
            let id = NotificationId(inner.next_id);
            inner.entries.push(Entry {
                notification: Notification {
                    id,
                    message: message.clone(),
                    severity,
                    created_at: Instant::now(),
                },
                eviction: None,
            });
            id
        };

        let eviction = self.schedule_eviction(id);
        if let Some(entry) = self
            .inner
            .lock()
            .entries
            .iter_mut()
            .find(|entry| entry.notification.id == id)
        {
            entry.eviction = eviction;
        }

        tracing::debug!(id = %id, severity = %severity, message = %message, "notification pushed");
        self.bump();
        id
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.push(message, Severity::Info)
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.push(message, Severity::Success)
    }

    pub fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.push(message, Severity::Warning)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.push(message, Severity::Error)
    }

    /// Removes `id` immediately and cancels its scheduled eviction.
    ///
    /// Returns `false` if the notification was already gone.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let removed = {
            let mut inner = self.inner.lock();
            let position = inner.entries.iter().position(|entry| entry.notification.id == id);
            position.map(|index| inner.entries.remove(index))
        };

        match removed {
            Some(entry) => {
                if let Some(eviction) = entry.eviction {
                    eviction.abort();
                }
                tracing::debug!(id = %id, "notification dismissed");
                self.bump();
                true
            }
            None => false,
        }
    }

    /// Snapshot of the live notifications in insertion order.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .entries
            .iter()
            .map(|entry| entry.notification.clone())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Receiver whose value changes on every push, dismissal and eviction.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn schedule_eviction(&self, id: NotificationId) -> Option<AbortHandle> {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(id = %id, "no runtime for eviction timer, notification kept until dismissed");
            return None;
        };

        let inner = Arc::clone(&self.inner);
        let revision = Arc::clone(&self.revision);
        let timeout = self.timeout;

        let task = handle.spawn(async move {
            tokio::time::sleep(timeout).await;
            let evicted = {
                let mut inner = inner.lock();
                let before = inner.entries.len();
                inner.entries.retain(|entry| entry.notification.id != id);
                inner.entries.len() != before
            };
            if evicted {
                tracing::debug!(id = %id, "notification expired");
                revision.send_modify(|value| *value = value.wrapping_add(1));
            }
        });

        Some(task.abort_handle())
    }

    fn bump(&self) {
        self.revision.send_modify(|value| *value = value.wrapping_add(1));
    }
}
