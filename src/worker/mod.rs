//! Background execution of data-access requests.
//!
//! Pages never await the network themselves. They emit requests, the worker
//! runs each on its own Tokio task, and responses come back on a channel the
//! page drains. Trace context travels with every request so the service span
//! nests under the user action that caused it.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Request execution and task spawning

pub mod handler;
pub mod messages;

pub use handler::{execute, spawn_request};
pub use messages::{Generation, ServiceRequest, ServiceResponse, TraceContext};
