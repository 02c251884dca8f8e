//! Startup seeding of sample products.

use super::ProductService;
use crate::model::{Product, ProductInput};
use crate::storage::StoreError;

/// Sample products inserted at startup as `(name, price, description)`.
pub const SAMPLE_PRODUCTS: [(&str, f64, &str); 3] = [
    (
        "Wireless Headphones",
        79.99,
        "High-quality Bluetooth wireless headphones with noise cancellation",
    ),
    (
        "USB-C Cable",
        12.99,
        "Durable 2-meter USB-C to USB-C charging and data cable",
    ),
    (
        "Laptop Stand",
        39.99,
        "Aluminum adjustable laptop stand for better ergonomics",
    ),
];

impl ProductService {
    /// Insert the sample products in one transaction.
    ///
    /// Runs as its own root trace so it never attaches to a request trace.
    /// Seeding is unconditional: running it twice inserts the samples twice.
    pub fn seed_sample_products(&self) -> Result<Vec<Product>, StoreError> {
        self.spans.in_new_trace("product.seed.initialize", |span| {
            span.set_attribute("product.operation", "seed.initialize");
            tracing::info!("Initializing sample products...");

            let inputs: Vec<_> = SAMPLE_PRODUCTS
                .iter()
                .map(|&(name, price, description)| ProductInput::new(name, price, description))
                .collect();
            let seeded = self.repository.insert_all(&inputs)?;

            span.set_attribute("product.seed.count", seeded.len());
            tracing::info!(count = seeded.len(), "Sample products initialized successfully");
            Ok(seeded)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::SpanHelper;
    use crate::storage::SqliteProductRepository;
    use opentelemetry::trace::{SpanId, TracerProvider as _};
    use opentelemetry::Context;
    use opentelemetry_sdk::testing::trace::InMemorySpanExporter;
    use opentelemetry_sdk::trace::TracerProvider;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_seed_inserts_samples_in_root_trace() {
        let temp_dir = TempDir::new().unwrap();
        let repository =
            SqliteProductRepository::open(temp_dir.path().join("test.db"), 2).unwrap();
        let exporter = InMemorySpanExporter::default();
        let provider = TracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let service = ProductService::new(
            Arc::new(repository),
            SpanHelper::new(provider.tracer("test")),
        );

        let seeded = service.seed_sample_products().unwrap();

        let names: Vec<_> = seeded.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Wireless Headphones", "USB-C Cable", "Laptop Stand"]);
        assert_eq!(service.get_all(&Context::new()).unwrap(), seeded);

        let spans = exporter.get_finished_spans().unwrap();
        let seed = spans
            .iter()
            .find(|s| s.name == "product.seed.initialize")
            .unwrap();
        assert_eq!(seed.parent_span_id, SpanId::INVALID);
        assert!(seed
            .attributes
            .iter()
            .any(|kv| kv.key.as_str() == "product.seed.count"
                && kv.value == opentelemetry::Value::I64(3)));
    }
}
