//! Side effects emitted by the list-page event handler.
//!
//! The handler never touches the modal store, the notification queue or the
//! network. It returns a `Vec<Action<R>>` and the page driver executes them
//! in order, which keeps every transition testable without a runtime.
//!
//! # Example
//!
//! ```rust
//! use backoffice::app::{Action, ModalKind};
//! use backoffice::domain::Customer;
//! use backoffice::worker::{Generation, ServiceRequest};
//!
//! let actions: Vec<Action<Customer>> = vec![
//!     Action::CloseModal(ModalKind::Create),
//!     Action::Request(ServiceRequest::list(Generation::default().next())),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use super::modes::ModalKind;
use crate::modal::Payload;
use crate::notify::Severity;
use crate::worker::ServiceRequest;

/// Commands executed by the page driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Action<R> {
    /// Writes the modal's parameter into the address and stores `payload`.
    OpenModal {
        kind: ModalKind,
        value: String,
        payload: Payload,
    },

    /// Removes the modal's parameter and its side-channel record.
    CloseModal(ModalKind),

    /// Queues a transient notification.
    Notify { severity: Severity, message: String },

    /// Hands a request to the data-access worker.
    ///
    /// List and search requests replace any list request still in flight.
    Request(ServiceRequest<R>),
}

impl<R> Action<R> {
    pub fn notify(severity: Severity, message: impl Into<String>) -> Self {
        Self::Notify {
            severity,
            message: message.into(),
        }
    }
}
