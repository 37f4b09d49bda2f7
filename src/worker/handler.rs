//! Execution of data-access requests on background tasks.
//!
//! [`execute`] turns one [`ServiceRequest`] into exactly one
//! [`ServiceResponse`]; service failures become failure responses carrying the
//! user-facing message, so nothing escapes the task. [`spawn_request`] runs it
//! on the current Tokio runtime under a span linked to the issuing one and
//! posts the response back on the page's channel.

use crate::domain::{Resource, Result};
use crate::services::ResourceService;
use crate::worker::{ServiceRequest, ServiceResponse};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::Instrument;

/// Helper for handling service results with consistent logging.
fn handle_service_result<T, R, F, G>(
    operation: &str,
    result: Result<T>,
    on_success: F,
    on_failure: G,
) -> ServiceResponse<R>
where
    F: FnOnce(T) -> ServiceResponse<R>,
    G: FnOnce(String) -> ServiceResponse<R>,
{
    match result {
        Ok(value) => {
            tracing::debug!(operation = operation, "service operation successful");
            on_success(value)
        }
        Err(e) => {
            tracing::debug!(operation = operation, error = %e, "service operation failed");
            on_failure(e.user_message())
        }
    }
}

/// Runs `request` against `service` and returns its response.
pub async fn execute<R: Resource>(
    service: &dyn ResourceService<R>,
    request: ServiceRequest<R>,
) -> ServiceResponse<R> {
    use crate::app::modes::ModalKind;

    let operation = request.operation();

    match request {
        ServiceRequest::List { generation, .. } => handle_service_result(
            operation,
            service.list().await,
            |items| {
                tracing::debug!(item_count = items.len(), "collection listed");
                ServiceResponse::Loaded { generation, items }
            },
            |message| ServiceResponse::LoadFailed { generation, message },
        ),

        ServiceRequest::Search {
            generation, filter, ..
        } => handle_service_result(
            operation,
            service.search(&filter).await,
            |items| {
                tracing::debug!(item_count = items.len(), filter = %filter, "collection searched");
                ServiceResponse::Loaded { generation, items }
            },
            |message| ServiceResponse::LoadFailed { generation, message },
        ),

        ServiceRequest::Create { data, .. } => handle_service_result(
            operation,
            service.create(data).await,
            |item| ServiceResponse::Created { item },
            |message| ServiceResponse::MutationFailed {
                kind: ModalKind::Create,
                message,
            },
        ),

        ServiceRequest::Update { id, data, .. } => handle_service_result(
            operation,
            service.update(id, data).await,
            |item| ServiceResponse::Updated { item },
            |message| ServiceResponse::MutationFailed {
                kind: ModalKind::Edit,
                message,
            },
        ),

        ServiceRequest::Delete { id, label, .. } => handle_service_result(
            operation,
            service.delete(id).await,
            |()| ServiceResponse::Deleted { id, label },
            |message| ServiceResponse::DeleteFailed { message },
        ),
    }
}

/// Builds the span for a request, parented to the trace context it carries.
fn request_span<R: Resource>(request: &ServiceRequest<R>) -> tracing::Span {
    use tracing_opentelemetry::OpenTelemetrySpanExt;

    let span = tracing::debug_span!(
        "service_request",
        resource = R::COLLECTION,
        operation = request.operation(),
        generation = ?request.generation()
    );

    if let Some(context) = request.trace_context().and_then(|trace| trace.to_otel_context()) {
        span.set_parent(context);
    }

    span
}

/// Spawns `request` on the current runtime; the response is sent on `responses`.
///
/// Returns the task's abort handle, or `None` when there is no runtime to
/// spawn on, in which case the request is dropped.
pub fn spawn_request<R: Resource>(
    service: Arc<dyn ResourceService<R>>,
    request: ServiceRequest<R>,
    responses: mpsc::UnboundedSender<ServiceResponse<R>>,
) -> Option<AbortHandle> {
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        tracing::warn!(operation = request.operation(), "no runtime, request dropped");
        return None;
    };

    let span = request_span(&request);
    let task = handle.spawn(
        async move {
            let response = execute(service.as_ref(), request).await;
            if responses.send(response).is_err() {
                tracing::debug!("page gone, response dropped");
            }
        }
        .instrument(span),
    );

    Some(task.abort_handle())
}
