//! OpenTelemetry tracing setup.
//!
//! Configures structured logging with:
//! - W3C Trace Context propagation
//! - OTLP exporter for distributed tracing (when an endpoint is configured)
//!
//! Without an endpoint the global tracer provider stays a no-op, so the
//! manual service spans cost nothing and only logs are emitted.

use opentelemetry::trace::{TraceError, TracerProvider as _};
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{Config as TraceConfig, TracerProvider};
use opentelemetry_sdk::{runtime, Resource};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build an OTLP/gRPC tracer provider exporting in batches.
fn otlp_provider(endpoint: &str, service_name: &str) -> Result<TracerProvider, TraceError> {
    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint),
        )
        .with_trace_config(TraceConfig::default().with_resource(Resource::new(vec![
            KeyValue::new("service.name", service_name.to_string()),
        ])))
        .install_batch(runtime::Tokio)
}

/// Handle to the installed trace exporter.
///
/// Call [`TracingGuard::shutdown`] before exit so buffered spans are sent.
#[derive(Default)]
pub struct TracingGuard {
    provider: Option<TracerProvider>,
}

impl TracingGuard {
    /// Flush buffered spans and uninstall the global tracer provider.
    pub fn shutdown(self) {
        if let Some(provider) = self.provider {
            for result in provider.force_flush() {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "Failed to flush spans");
                }
            }
            global::shutdown_tracer_provider();
        }
    }
}

/// Initialize tracing.
///
/// This sets up:
/// - Console logging with structured format
/// - Environment-based filter (via RUST_LOG, falling back to `log_level`)
/// - The W3C trace-context propagator
/// - OTLP trace export and a `tracing` bridge layer if `otel_endpoint` is set
///
/// Must run inside a tokio runtime when an endpoint is given.
///
/// # Panics
///
/// Panics if tracing has already been initialized.
pub fn init_tracing(
    log_level: &str,
    otel_endpoint: Option<&str>,
    service_name: &str,
) -> Result<TracingGuard, TraceError> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info,catalog=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let provider = otel_endpoint
        .map(|endpoint| otlp_provider(endpoint, service_name))
        .transpose()?;
    let otel_layer = provider.as_ref().map(|provider| {
        global::set_tracer_provider(provider.clone());
        tracing_opentelemetry::layer().with_tracer(provider.tracer(service_name.to_string()))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .init();

    match otel_endpoint {
        Some(endpoint) => {
            tracing::info!(service = service_name, endpoint, "Tracing initialized with OTLP export");
        }
        None => tracing::info!(service = service_name, "Tracing initialized"),
    }

    Ok(TracingGuard { provider })
}

/// Initialize tracing for tests (only logs errors).
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("error")
        .with_test_writer()
        .try_init();
}
