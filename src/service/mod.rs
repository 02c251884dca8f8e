//! Product operations, each wrapped in a span.
//!
//! Every call takes the caller's trace context explicitly. The span it
//! opens is named `product.service.<op>` and carries
//! `product.operation=<op>`. Absence is reported through `Option`/`bool`
//! plus a span event, never as an error.

pub mod seed;

use opentelemetry::Context;
use std::sync::Arc;

use crate::model::{Product, ProductInput};
use crate::observability::SpanHelper;
use crate::storage::{ProductRepository, StoreError};

pub use seed::SAMPLE_PRODUCTS;

/// Business-facing product operations.
#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
    spans: SpanHelper,
}

impl ProductService {
    /// Create a service over the given store.
    pub fn new(repository: Arc<dyn ProductRepository>, spans: SpanHelper) -> Self {
        Self { repository, spans }
    }

    /// Return every persisted product.
    pub fn get_all(&self, cx: &Context) -> Result<Vec<Product>, StoreError> {
        self.spans.in_span("product.service.get_all", cx, |span| {
            tracing::info!("Fetching all products");
            span.set_attribute("product.operation", "get_all");
            let products = self.repository.find_all()?;
            span.set_attribute("product.count", products.len());
            Ok(products)
        })
    }

    /// Look up a product by id.
    pub fn get_by_id(&self, cx: &Context, id: i64) -> Result<Option<Product>, StoreError> {
        self.spans.in_span("product.service.get_by_id", cx, |span| {
            tracing::info!(id, "Fetching product");
            span.set_attribute("product.operation", "get_by_id");
            span.set_attribute("product.id", id);
            let product = self.repository.find_by_id(id)?;
            if product.is_none() {
                span.add_event("product.not_found");
            }
            Ok(product)
        })
    }

    /// Persist a new product and return it with its assigned id.
    pub fn create(&self, cx: &Context, input: ProductInput) -> Result<Product, StoreError> {
        self.spans.in_span("product.service.create", cx, |span| {
            tracing::info!(name = %input.name, "Creating new product");
            span.set_attribute("product.operation", "create");
            span.set_attribute("product.name", &input.name);
            let saved = self.repository.insert(&input)?;
            span.set_attribute("product.id", saved.id);
            tracing::info!(id = saved.id, "Product created");
            Ok(saved)
        })
    }

    /// Overwrite name, price and description of an existing product.
    ///
    /// Returns `None` without touching the store if `id` is unknown.
    pub fn update(
        &self,
        cx: &Context,
        id: i64,
        changes: ProductInput,
    ) -> Result<Option<Product>, StoreError> {
        self.spans.in_span("product.service.update", cx, |span| {
            tracing::info!(id, "Updating product");
            span.set_attribute("product.operation", "update");
            span.set_attribute("product.id", id);
            let updated = self.repository.update(id, &changes)?;
            match &updated {
                Some(_) => tracing::info!(id, "Product updated"),
                None => span.add_event("product.not_found_for_update"),
            }
            Ok(updated)
        })
    }

    /// Remove a product. Returns `false` if it did not exist.
    pub fn delete(&self, cx: &Context, id: i64) -> Result<bool, StoreError> {
        self.spans.in_span("product.service.delete", cx, |span| {
            tracing::info!(id, "Deleting product");
            span.set_attribute("product.operation", "delete");
            span.set_attribute("product.id", id);
            let deleted = self.repository.delete_by_id(id)?;
            if deleted {
                tracing::info!(id, "Product deleted");
            } else {
                span.add_event("product.not_found_for_delete");
                tracing::warn!(id, "Product not found for deletion");
            }
            Ok(deleted)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteProductRepository;
    use opentelemetry::trace::{Status, TracerProvider as _};
    use opentelemetry_sdk::testing::trace::InMemorySpanExporter;
    use opentelemetry_sdk::trace::TracerProvider;
    use tempfile::TempDir;

    struct Harness {
        service: ProductService,
        exporter: InMemorySpanExporter,
        _provider: TracerProvider,
        _temp_dir: TempDir,
    }

    fn harness() -> Harness {
        let temp_dir = TempDir::new().unwrap();
        let repository =
            SqliteProductRepository::open(temp_dir.path().join("test.db"), 2).unwrap();
        harness_with(Arc::new(repository), temp_dir)
    }

    fn harness_with(repository: Arc<dyn ProductRepository>, temp_dir: TempDir) -> Harness {
        let exporter = InMemorySpanExporter::default();
        let provider = TracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let service = ProductService::new(repository, SpanHelper::new(provider.tracer("test")));
        Harness {
            service,
            exporter,
            _provider: provider,
            _temp_dir: temp_dir,
        }
    }

    /// Store whose every call fails.
    struct UnavailableStore;

    fn unavailable() -> StoreError {
        StoreError::Database(rusqlite::Error::InvalidQuery)
    }

    impl ProductRepository for UnavailableStore {
        fn find_all(&self) -> Result<Vec<Product>, StoreError> {
            Err(unavailable())
        }

        fn find_by_id(&self, _id: i64) -> Result<Option<Product>, StoreError> {
            Err(unavailable())
        }

        fn insert(&self, _input: &ProductInput) -> Result<Product, StoreError> {
            Err(unavailable())
        }

        fn insert_all(&self, _inputs: &[ProductInput]) -> Result<Vec<Product>, StoreError> {
            Err(unavailable())
        }

        fn update(&self, _id: i64, _changes: &ProductInput) -> Result<Option<Product>, StoreError> {
            Err(unavailable())
        }

        fn delete_by_id(&self, _id: i64) -> Result<bool, StoreError> {
            Err(unavailable())
        }
    }

    fn widget() -> ProductInput {
        ProductInput::new("Widget", 9.99, "x")
    }

    #[test]
    fn test_create_assigns_id_and_echoes_fields() {
        let h = harness();
        let cx = Context::new();

        let created = h.service.create(&cx, widget()).unwrap();

        assert_eq!(created, widget().with_id(created.id));
        assert_eq!(h.service.get_by_id(&cx, created.id).unwrap(), Some(created));
    }

    #[test]
    fn test_missing_id_yields_absence_without_changes() {
        let h = harness();
        let cx = Context::new();
        let kept = h.service.create(&cx, widget()).unwrap();
        let missing = kept.id + 1000;

        assert_eq!(h.service.get_by_id(&cx, missing).unwrap(), None);
        assert_eq!(
            h.service
                .update(&cx, missing, ProductInput::new("New", 1.0, "y"))
                .unwrap(),
            None
        );
        assert!(!h.service.delete(&cx, missing).unwrap());
        assert_eq!(h.service.get_all(&cx).unwrap(), vec![kept]);
    }

    #[test]
    fn test_update_replaces_fields_and_keeps_id() {
        let h = harness();
        let cx = Context::new();
        let created = h.service.create(&cx, widget()).unwrap();

        let changes = ProductInput::new("Gadget", -3.5, "");
        let updated = h
            .service
            .update(&cx, created.id, changes.clone())
            .unwrap()
            .unwrap();

        assert_eq!(updated, changes.with_id(created.id));
        assert_eq!(h.service.get_by_id(&cx, created.id).unwrap(), Some(updated));
    }

    #[test]
    fn test_list_after_creates_and_deletes() {
        let h = harness();
        let cx = Context::new();

        let created: Vec<_> = (0..5_i32)
            .map(|i| {
                h.service
                    .create(&cx, ProductInput::new(format!("p{i}"), f64::from(i), "d"))
                    .unwrap()
            })
            .collect();
        for product in &created[..2] {
            assert!(h.service.delete(&cx, product.id).unwrap());
        }

        let remaining = h.service.get_all(&cx).unwrap();
        assert_eq!(remaining.len(), 3);
        assert!(h.service.get_by_id(&cx, created[0].id).unwrap().is_none());
    }

    #[test]
    fn test_spans_carry_operation_and_not_found_events() {
        let h = harness();
        let cx = Context::new();

        h.service.get_by_id(&cx, 404).unwrap();
        h.service.delete(&cx, 404).unwrap();
        h.service.update(&cx, 404, widget()).unwrap();

        let spans = h.exporter.get_finished_spans().unwrap();
        let expectations = [
            ("product.service.get_by_id", "get_by_id", "product.not_found"),
            ("product.service.delete", "delete", "product.not_found_for_delete"),
            ("product.service.update", "update", "product.not_found_for_update"),
        ];

        assert_eq!(spans.len(), expectations.len());
        for (name, operation, event) in expectations {
            let span = spans.iter().find(|s| s.name == name).unwrap();
            assert_eq!(span.status, Status::Ok);
            assert!(span.attributes.iter().any(|kv| {
                kv.key.as_str() == "product.operation" && kv.value.as_str() == operation
            }));
            assert!(span.events.events.iter().any(|e| e.name == event));
        }
    }

    #[test]
    fn test_get_all_records_count() {
        let h = harness();
        let cx = Context::new();
        h.service.create(&cx, widget()).unwrap();
        h.service.create(&cx, widget()).unwrap();

        h.service.get_all(&cx).unwrap();

        let spans = h.exporter.get_finished_spans().unwrap();
        let span = spans
            .iter()
            .find(|s| s.name == "product.service.get_all")
            .unwrap();
        assert!(span
            .attributes
            .iter()
            .any(|kv| kv.key.as_str() == "product.count"
                && kv.value == opentelemetry::Value::I64(2)));
    }

    #[test]
    fn test_store_failures_propagate_and_mark_spans_failed() {
        let h = harness_with(Arc::new(UnavailableStore), TempDir::new().unwrap());
        let cx = Context::new();

        let errors = [
            h.service.get_all(&cx).map(|_| ()),
            h.service.get_by_id(&cx, 1).map(|_| ()),
            h.service.create(&cx, widget()).map(|_| ()),
            h.service.update(&cx, 1, widget()).map(|_| ()),
            h.service.delete(&cx, 1).map(|_| ()),
        ];
        for result in errors {
            assert!(matches!(
                result,
                Err(StoreError::Database(rusqlite::Error::InvalidQuery))
            ));
        }

        let spans = h.exporter.get_finished_spans().unwrap();
        let names: Vec<_> = spans.iter().map(|s| s.name.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "product.service.get_all",
                "product.service.get_by_id",
                "product.service.create",
                "product.service.update",
                "product.service.delete",
            ]
        );
        for span in &spans {
            assert_eq!(span.status, Status::error(unavailable().to_string()));
            assert!(span.events.events.iter().any(|e| e.name == "exception"));
        }
    }
}
