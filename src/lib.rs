//! Catalog: a product-catalog REST service with manual span instrumentation.
//!
//! Catalog exposes list/get/create/update/delete over a single `Product`
//! entity persisted in SQLite. Every service call runs inside an
//! OpenTelemetry span whose parent is passed explicitly by the caller.
//!
//! # Architecture
//!
//! - **HTTP**: axum router under `/api/v1/products`
//! - **Traced service**: each operation wrapped by [`observability::span::SpanHelper`]
//! - **Durable**: SQLite in WAL mode behind an r2d2 pool
//! - **Observable**: `tracing` logs plus optional OTLP trace export
//!
//! # Modules
//!
//! - [`api`]: HTTP handlers and router
//! - [`config`]: CLI and environment configuration
//! - [`model`]: Product types
//! - [`observability`]: Subscriber setup and the span wrapper
//! - [`server`]: Server setup and lifecycle
//! - [`service`]: Product operations and startup seeding
//! - [`storage`]: SQLite persistence layer

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions,    // service::ProductService is fine
    clippy::must_use_candidate,         // Not all functions need #[must_use]
    clippy::missing_errors_doc,         // Error docs can be verbose
    clippy::missing_panics_doc,         // Panic docs can be verbose
    clippy::needless_raw_string_hashes, // r#""# is fine for SQL
    clippy::too_many_lines              // Some functions are inherently long
)]

pub mod api;
pub mod config;
pub mod model;
pub mod observability;
pub mod server;
pub mod service;
pub mod storage;
