//! Test utilities and in-process app harness for Catalog tests.
//!
//! Provides:
//! - Temporary database fixtures
//! - A router wired to an in-memory span exporter
//! - Request helpers for `tower::ServiceExt::oneshot`

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::export::trace::SpanData;
use opentelemetry_sdk::testing::trace::InMemorySpanExporter;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use catalog::api::{create_router, AppState};
use catalog::observability::SpanHelper;
use catalog::service::ProductService;
use catalog::storage::SqliteProductRepository;

/// Test fixture that manages a temporary database directory.
///
/// The directory is automatically cleaned up when the fixture is dropped.
pub struct TestFixture {
    /// Temporary directory for test database
    pub temp_dir: TempDir,
    /// Path to the database file
    pub db_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with a temporary database directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        Self { temp_dir, db_path }
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// In-process application with its own store and span exporter.
pub struct TestApp {
    pub router: Router,
    pub service: Arc<ProductService>,
    pub exporter: InMemorySpanExporter,
    pub provider: TracerProvider,
    pub fixture: TestFixture,
}

impl TestApp {
    /// Build a router over an empty temporary store.
    pub fn start() -> Self {
        let fixture = TestFixture::new();
        let repository =
            SqliteProductRepository::open(&fixture.db_path, 4).expect("failed to open store");
        let exporter = InMemorySpanExporter::default();
        let provider = TracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let service = ProductService::new(
            Arc::new(repository),
            SpanHelper::new(provider.tracer("catalog-test")),
        );
        let state = AppState::new(service);
        Self {
            router: create_router(state.clone()),
            service: state.products,
            exporter,
            provider,
            fixture,
        }
    }

    /// Send a request and return status plus parsed JSON body (if any).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Option<Value>) {
        let (status, text) = self.send_raw(request).await;
        let body = if text.is_empty() {
            None
        } else {
            Some(serde_json::from_str(&text).expect("body is not JSON"))
        };
        (status, body)
    }

    /// Send a request and return status plus the body as text.
    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();
        let text = String::from_utf8(bytes.to_vec()).expect("body is not UTF-8");
        (status, text)
    }

    /// Spans finished so far.
    pub fn finished_spans(&self) -> Vec<SpanData> {
        self.exporter
            .get_finished_spans()
            .expect("failed to read spans")
    }
}

/// Build a request without a body.
pub fn empty(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("invalid request")
}

/// Build a request with a JSON body.
pub fn json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("invalid request")
}
