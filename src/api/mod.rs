//! HTTP surface for Catalog.
//!
//! Routes:
//! - `/api/v1/products` - list (GET) and create (POST)
//! - `/api/v1/products/:id` - get (GET), update (PUT), delete (DELETE)
//! - `/health`, `/ready` - probes

pub mod error;
pub mod health;
pub mod products;

use axum::body::Body;
use axum::http::Request;
use axum::routing::get;
use axum::Router;
use opentelemetry::global;
use opentelemetry_http::HeaderExtractor;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::service::ProductService;

pub use error::ApiError;

/// Base path of the product resource.
pub const PRODUCTS_PATH: &str = "/api/v1/products";

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductService>,
}

impl AppState {
    pub fn new(products: ProductService) -> Self {
        Self {
            products: Arc::new(products),
        }
    }
}

/// Create the request span, parented on any incoming W3C trace context.
fn make_request_span(request: &Request<Body>) -> tracing::Span {
    let span = tracing::info_span!(
        "http.request",
        otel.kind = "server",
        method = %request.method(),
        uri = %request.uri(),
    );
    let parent = global::get_text_map_propagator(|propagator| {
        propagator.extract(&HeaderExtractor(request.headers()))
    });
    span.set_parent(parent);
    span
}

/// Trace context of the current request span.
///
/// Passed explicitly to service calls so their spans become children of
/// the request. Empty when no OpenTelemetry layer is installed, in which
/// case service spans start their own traces.
pub(crate) fn request_context() -> opentelemetry::Context {
    tracing::Span::current().context()
}

/// Create the HTTP router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            PRODUCTS_PATH,
            get(products::list_products).post(products::create_product),
        )
        .route(
            &format!("{PRODUCTS_PATH}/:id"),
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/health", get(health::health_handler))
        .route("/ready", get(health::ready_handler))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .with_state(state)
}
