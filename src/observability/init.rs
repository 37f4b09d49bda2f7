//! Tracing subscriber setup.

use super::tracer;
use crate::infrastructure::paths;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the span export inside the data directory.
pub const TRACE_FILE_NAME: &str = "backoffice-otlp.json";

/// Installs the global subscriber.
///
/// Spans go to `<data_dir>/backoffice-otlp.json` through the OpenTelemetry
/// layer. When `console_logs` is set, events are also printed to stderr in
/// the compact `fmt` format.
///
/// # Parameters
///
/// * `config` - Supplies the filter directive and data directory
/// * `console_logs` - Enables the stderr layer
///
/// # Filter Resolution
///
/// 1. `RUST_LOG`, if set and valid
/// 2. `config.trace_level`
/// 3. `"info"`
///
/// Calling this more than once keeps the first subscriber. If the data
/// directory cannot be created, only the stderr layer (if any) is installed.
pub fn init_tracing(config: &Config, console_logs: bool) {
    let directive = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let data_dir = paths::data_dir(config);
    let otel_layer = match std::fs::create_dir_all(&data_dir) {
        Ok(()) => {
            let resource = Resource::new(vec![
                opentelemetry::KeyValue::new("service.name", "backoffice"),
                opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            ]);
            let provider =
                tracer::create_tracer_provider(data_dir.join(TRACE_FILE_NAME), resource);
            Some(OpenTelemetryLayer::new(provider.tracer(tracer::SCOPE_NAME)))
        }
        Err(e) => {
            eprintln!(
                "backoffice: trace export disabled, cannot create {}: {e}",
                data_dir.display()
            );
            None
        }
    };

    let fmt_layer = console_logs.then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .with(fmt_layer)
        .try_init();
}
