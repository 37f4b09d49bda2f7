//! Domain layer for the back-office console.
//!
//! Core types independent of the transport and of the console front end.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`resource`]: Customer, account and transaction models plus the
//!   [`Resource`] trait shared by list pages

pub mod error;
pub mod resource;

pub use error::{BackofficeError, Result};
pub use resource::{
    Account, AccountKind, Customer, ReportRow, Resource, ResourceId, ResourceMessages,
    Transaction, TransactionKind,
};
