//! Manual span instrumentation for units of work.
//!
//! [`SpanHelper`] runs a closure inside a span and guarantees that the span
//! is ended exactly once on every exit path: `Ok`, `Err`, and panic. Parents
//! are passed explicitly as an [`opentelemetry::Context`] instead of being
//! read from ambient state, so the same call behaves identically on a tokio
//! worker and inside `spawn_blocking`.
//!
//! ```rust,ignore
//! let spans = SpanHelper::global();
//! let count = spans.in_span("product.service.get_all", &parent_cx, |scope| {
//!     scope.set_attribute("product.operation", "get_all");
//!     let products = repository.find_all()?;
//!     scope.set_attribute("product.count", products.len());
//!     Ok::<_, StoreError>(products.len())
//! })?;
//! ```

use std::fmt::Display;
use std::sync::Arc;

use opentelemetry::global;
use opentelemetry::trace::{SpanKind, Status, TraceContextExt, Tracer, TracerProvider};
use opentelemetry::{Context, KeyValue, Value};

/// Instrumentation scope name for manually created spans.
pub const TRACER_NAME: &str = "catalog.manual";

/// Typed span attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
}

impl AttributeValue {
    /// Attach any displayable value by its textual representation.
    pub fn display(value: impl Display) -> Self {
        Self::String(value.to_string())
    }
}

impl From<AttributeValue> for Value {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::String(v) => Value::from(v),
            AttributeValue::I64(v) => Value::I64(v),
            AttributeValue::F64(v) => Value::F64(v),
            AttributeValue::Bool(v) => Value::Bool(v),
        }
    }
}

/// Conversion into an optional span attribute value.
///
/// Returning `None` means the attribute is skipped entirely.
pub trait IntoAttributeValue {
    fn into_attribute_value(self) -> Option<AttributeValue>;
}

impl IntoAttributeValue for AttributeValue {
    fn into_attribute_value(self) -> Option<AttributeValue> {
        Some(self)
    }
}

impl<T: IntoAttributeValue> IntoAttributeValue for Option<T> {
    fn into_attribute_value(self) -> Option<AttributeValue> {
        self.and_then(IntoAttributeValue::into_attribute_value)
    }
}

impl IntoAttributeValue for &str {
    fn into_attribute_value(self) -> Option<AttributeValue> {
        Some(AttributeValue::String(self.to_owned()))
    }
}

impl IntoAttributeValue for &String {
    fn into_attribute_value(self) -> Option<AttributeValue> {
        Some(AttributeValue::String(self.clone()))
    }
}

impl IntoAttributeValue for String {
    fn into_attribute_value(self) -> Option<AttributeValue> {
        Some(AttributeValue::String(self))
    }
}

impl IntoAttributeValue for bool {
    fn into_attribute_value(self) -> Option<AttributeValue> {
        Some(AttributeValue::Bool(self))
    }
}

impl IntoAttributeValue for f64 {
    fn into_attribute_value(self) -> Option<AttributeValue> {
        Some(AttributeValue::F64(self))
    }
}

impl IntoAttributeValue for f32 {
    fn into_attribute_value(self) -> Option<AttributeValue> {
        Some(AttributeValue::F64(f64::from(self)))
    }
}

macro_rules! widen_to_i64 {
    ($($ty:ty),*) => {
        $(
            impl IntoAttributeValue for $ty {
                fn into_attribute_value(self) -> Option<AttributeValue> {
                    Some(AttributeValue::I64(i64::from(self)))
                }
            }
        )*
    };
}

widen_to_i64!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! fit_or_text {
    ($($ty:ty),*) => {
        $(
            impl IntoAttributeValue for $ty {
                fn into_attribute_value(self) -> Option<AttributeValue> {
                    Some(match i64::try_from(self) {
                        Ok(v) => AttributeValue::I64(v),
                        Err(_) => AttributeValue::display(self),
                    })
                }
            }
        )*
    };
}

fit_or_text!(isize, u64, usize, i128, u128);

/// Object-safe span starter so [`SpanHelper`] is not generic over the tracer.
trait StartSpan: Send + Sync {
    fn start(&self, name: &'static str, parent_cx: &Context) -> Context;
}

impl<T> StartSpan for T
where
    T: Tracer + Send + Sync,
    T::Span: Send + Sync + 'static,
{
    fn start(&self, name: &'static str, parent_cx: &Context) -> Context {
        let span = self
            .span_builder(name)
            .with_kind(SpanKind::Internal)
            .start_with_context(self, parent_cx);
        parent_cx.with_span(span)
    }
}

/// Handle passed to instrumented work.
///
/// Gives access to the active span and to the context nested calls should
/// use as their parent.
#[derive(Debug)]
pub struct SpanScope {
    cx: Context,
}

impl SpanScope {
    /// Context carrying this span, for use as a parent of nested spans.
    pub fn context(&self) -> &Context {
        &self.cx
    }

    /// Attach an attribute. `None` values are skipped.
    pub fn set_attribute(&self, key: &'static str, value: impl IntoAttributeValue) {
        if let Some(value) = value.into_attribute_value() {
            self.cx
                .span()
                .set_attribute(KeyValue::new(key, Value::from(value)));
        }
    }

    /// Record a named event on the span.
    pub fn add_event(&self, name: &'static str) {
        self.cx.span().add_event(name, Vec::new());
    }
}

/// Ends the span when dropped, marking it as failed if unwinding.
struct EndOnDrop<'a>(&'a Context);

impl Drop for EndOnDrop<'_> {
    fn drop(&mut self) {
        let span = self.0.span();
        if std::thread::panicking() {
            span.set_status(Status::error("panicked"));
        }
        span.end();
    }
}

/// Runs units of work inside spans.
#[derive(Clone)]
pub struct SpanHelper {
    tracer: Arc<dyn StartSpan>,
}

impl std::fmt::Debug for SpanHelper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SpanHelper")
    }
}

impl SpanHelper {
    /// Create a helper that starts spans with the given tracer.
    pub fn new<T>(tracer: T) -> Self
    where
        T: Tracer + Send + Sync + 'static,
        T::Span: Send + Sync + 'static,
    {
        Self {
            tracer: Arc::new(tracer),
        }
    }

    /// Create a helper whose tracer is registered under [`TRACER_NAME`]
    /// with the crate version.
    pub fn for_provider<P>(provider: &P) -> Self
    where
        P: TracerProvider,
        P::Tracer: Send + Sync + 'static,
        <P::Tracer as Tracer>::Span: Send + Sync + 'static,
    {
        Self::new(
            provider
                .tracer_builder(TRACER_NAME)
                .with_version(env!("CARGO_PKG_VERSION"))
                .build(),
        )
    }

    /// Create a helper backed by the global tracer provider.
    ///
    /// Spans are no-ops until a provider is installed.
    pub fn global() -> Self {
        Self::for_provider(&global::tracer_provider())
    }

    /// Run `work` in a span that is a child of the span in `parent_cx`.
    ///
    /// If `parent_cx` carries no span, the new span is a trace root.
    pub fn in_span<F, R, E>(&self, name: &'static str, parent_cx: &Context, work: F) -> Result<R, E>
    where
        F: FnOnce(&SpanScope) -> Result<R, E>,
        E: std::error::Error,
    {
        let cx = self.tracer.start(name, parent_cx);
        Self::execute(cx, work)
    }

    /// Run `work` in a span that starts a new trace.
    pub fn in_new_trace<F, R, E>(&self, name: &'static str, work: F) -> Result<R, E>
    where
        F: FnOnce(&SpanScope) -> Result<R, E>,
        E: std::error::Error,
    {
        let cx = self.tracer.start(name, &Context::new());
        Self::execute(cx, work)
    }

    fn execute<F, R, E>(cx: Context, work: F) -> Result<R, E>
    where
        F: FnOnce(&SpanScope) -> Result<R, E>,
        E: std::error::Error,
    {
        let scope = SpanScope { cx };
        let _end = EndOnDrop(&scope.cx);

        match work(&scope) {
            Ok(value) => {
                scope.cx.span().set_status(Status::Ok);
                Ok(value)
            }
            Err(err) => {
                let span = scope.cx.span();
                span.record_error(&err);
                span.set_status(Status::error(err.to_string()));
                Err(err)
            }
        }
    }
}
