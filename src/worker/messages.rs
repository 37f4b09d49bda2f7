//! Data-access request and response types.
//!
//! This module defines the protocol between a list page and the tasks that
//! talk to the REST services. Requests carry the trace context of the span
//! that issued them so that the service call shows up under the user action
//! that caused it, even though it runs on a separate task.

use crate::app::modes::ModalKind;
use crate::domain::ResourceId;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-task span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry so the spawned
/// service task can link its span to the issuing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across tasks.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if the current span context is invalid, which is the
    /// case whenever no OpenTelemetry layer is installed.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            let trace_id = format!("{:032x}", span_context.trace_id());
            let parent_span_id = format!("{:016x}", span_context.span_id());

            tracing::trace!(
                trace_id = %trace_id,
                parent_span_id = %parent_span_id,
                "capturing trace context"
            );

            Some(Self {
                trace_id,
                parent_span_id,
            })
        } else {
            None
        }
    }

    /// Rebuilds the remote OpenTelemetry context this trace context describes.
    #[must_use]
    pub fn to_otel_context(&self) -> Option<opentelemetry::Context> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(opentelemetry::Context::new().with_remote_span_context(span_context))
    }
}

/// Monotonic token identifying one list or search request of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generates constructors for `ServiceRequest` variants that attach the
/// current trace context.
macro_rules! service_request_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl<R> ServiceRequest<R> {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " request with current trace context")]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

service_request_builders! {
    list(List { generation: Generation }),
    search(Search { generation: Generation, filter: String }),
    create(Create { data: R }),
    update(Update { id: ResourceId, data: R }),
    delete(Delete { id: ResourceId, label: String }),
}

/// Requests sent from a page to the data-access worker.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceRequest<R> {
    /// Load the unfiltered collection.
    List {
        generation: Generation,
        trace_context: Option<TraceContext>,
    },

    /// Load the collection filtered by free text.
    Search {
        generation: Generation,
        filter: String,
        trace_context: Option<TraceContext>,
    },

    Create {
        data: R,
        trace_context: Option<TraceContext>,
    },

    Update {
        id: ResourceId,
        data: R,
        trace_context: Option<TraceContext>,
    },

    Delete {
        id: ResourceId,
        /// Label of the deleted item, echoed back for the success notification.
        label: String,
        trace_context: Option<TraceContext>,
    },
}

impl<R> ServiceRequest<R> {
    /// Generation of a list or search request.
    #[must_use]
    pub const fn generation(&self) -> Option<Generation> {
        match self {
            Self::List { generation, .. } | Self::Search { generation, .. } => Some(*generation),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_list(&self) -> bool {
        self.generation().is_some()
    }

    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::List { trace_context, .. }
            | Self::Search { trace_context, .. }
            | Self::Create { trace_context, .. }
            | Self::Update { trace_context, .. }
            | Self::Delete { trace_context, .. } => trace_context.as_ref(),
        }
    }

    /// Short operation name used in spans and logs.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::List { .. } => "list",
            Self::Search { .. } => "search",
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }
}

/// Responses sent from the worker back to the page.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceResponse<R> {
    /// A list or search request succeeded.
    Loaded { generation: Generation, items: Vec<R> },

    /// A list or search request failed.
    LoadFailed { generation: Generation, message: String },

    Created { item: R },

    Updated { item: R },

    /// A create or update failed; `kind` names the modal that submitted it.
    MutationFailed { kind: ModalKind, message: String },

    Deleted { id: ResourceId, label: String },

    DeleteFailed { message: String },
}
