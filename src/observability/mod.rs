//! OpenTelemetry tracing with file-based span export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → TracerProvider → FileSpanExporter → JSON lines
//! ```
//!
//! Spans are written to `<data_dir>/backoffice-otlp.json`, rotated at 10 MB
//! with three backups. Service requests capture the active span in a
//! [`TraceContext`](crate::worker::TraceContext) so their spawned tasks join
//! the trace of the event that issued them.
//!
//! # Usage
//!
//! ```rust,no_run
//! use backoffice::observability::init_tracing;
//! use backoffice::Config;
//!
//! init_tracing(&Config::default(), false);
//! tracing::debug!("console started");
//! ```

mod file_writer;
mod init;
mod tracer;

pub use init::{init_tracing, TRACE_FILE_NAME};
