//! Debounced mirror of a fast-changing value.
//!
//! [`Debounced`] holds the latest source value and a mirrored value published
//! on a `watch` channel. Every [`Debounced::set`] restarts a quiet-period timer
//! and aborts the pending one, so a burst of updates spaced closer than the
//! delay settles exactly once, on the last value of the burst.
//!
//! Timers are Tokio tasks; outside a runtime the mirror is updated immediately.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::AbortHandle;

/// A value mirrored from its source after `delay` of inactivity.
#[derive(Debug)]
pub struct Debounced<T> {
    delay: Duration,
    source: T,
    pending: Option<AbortHandle>,
    mirror: Arc<watch::Sender<T>>,
}

impl<T> Debounced<T>
where
    T: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static,
{
    /// Creates a debouncer whose mirror starts equal to `initial`.
    pub fn new(initial: T, delay: Duration) -> Self {
        let (mirror, _) = watch::channel(initial.clone());
        Self {
            delay,
            source: initial,
            pending: None,
            mirror: Arc::new(mirror),
        }
    }

    /// Records a new source value and restarts the quiet period.
    ///
    /// Setting the value the source already holds does nothing.
    pub fn set(&mut self, value: T) {
        if value == self.source {
            return;
        }
        self.source = value.clone();

        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let mirror = Arc::clone(&self.mirror);
        let delay = self.delay;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let task = handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    settle(&mirror, value);
                });
                self.pending = Some(task.abort_handle());
            }
            Err(_) => {
                tracing::debug!("no runtime for debounce timer, settling immediately");
                settle(&mirror, value);
            }
        }
    }

    /// Latest source value, settled or not.
    pub fn source(&self) -> &T {
        &self.source
    }

    /// Current mirrored value.
    pub fn value(&self) -> T {
        self.mirror.borrow().clone()
    }

    /// Receiver that observes each settled change.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.mirror.subscribe()
    }

    /// Returns `true` while a quiet-period timer is running.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Aborts any pending timer without settling.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl<T> Drop for Debounced<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

fn settle<T: PartialEq + std::fmt::Debug>(mirror: &watch::Sender<T>, value: T) {
    mirror.send_if_modified(|current| {
        if *current == value {
            false
        } else {
            tracing::trace!(value = ?value, "debounced value settled");
            *current = value;
            true
        }
    });
}
