//! List-resource controller.
//!
//! Every list page (customers, accounts, transactions) runs the same
//! controller, parameterized by the [`Resource`](crate::domain::Resource) it
//! shows. The layer follows a unidirectional data flow:
//!
//! ```text
//! User Intent → Event → handle_event → ListState mutations → Actions → Effects
//!                             ↑                                         ↓
//!                             └──── Service responses, settled search ──┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and the detached-modal policy
//! - [`modes`]: Load phase and modal kinds
//! - [`page`]: Driver executing actions and pumping asynchronous inputs
//! - [`state`]: Per-page list state

pub mod actions;
pub mod handler;
pub mod modes;
pub mod page;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, Event, PageModals, DETACHED_MODAL_MESSAGE};
pub use modes::{LoadPhase, ModalKeys, ModalKind};
pub use page::ListPage;
pub use state::ListState;
