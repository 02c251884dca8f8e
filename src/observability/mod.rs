//! Observability infrastructure.
//!
//! Provides:
//! - Structured logging with optional OpenTelemetry trace export
//! - W3C Trace Context propagation for incoming requests
//! - Manual span instrumentation for service calls

pub mod span;
pub mod tracing;

pub use span::{AttributeValue, IntoAttributeValue, SpanHelper, SpanScope};
