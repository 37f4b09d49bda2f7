//! Transient user-facing notifications.
//!
//! - [`notification`]: `Notification`, `NotificationId`, `Severity`
//! - [`queue`]: `NotificationQueue`, the shared queue with timed eviction

pub mod notification;
pub mod queue;

pub use notification::{Notification, NotificationId, Severity};
pub use queue::{NotificationQueue, DEFAULT_TIMEOUT};
