//! Products command implementation.

use anyhow::{bail, Context, Result};
use catalog::model::{Product, ProductInput};
use clap::Args;
use serde::Serialize;

use crate::client::ProductClient;
use crate::OutputFormat;

/// Product fields supplied on the command line.
#[derive(Args, Debug, Clone)]
pub struct ProductFields {
    /// Product name
    #[arg(long)]
    pub name: String,

    /// Unit price
    #[arg(long, allow_negative_numbers = true)]
    pub price: f64,

    /// Free-text description
    #[arg(long, default_value = "")]
    pub description: String,
}

impl From<ProductFields> for ProductInput {
    fn from(fields: ProductFields) -> Self {
        ProductInput::new(fields.name, fields.price, fields.description)
    }
}

#[derive(Serialize)]
struct ProductsOutput<'a> {
    products: &'a [Product],
    total: usize,
}

#[derive(Serialize)]
struct DeleteOutput {
    id: i64,
    deleted: bool,
}

pub async fn list(client: &ProductClient, format: OutputFormat) -> Result<()> {
    let products = client.list().await.context("failed to list products")?;

    match format {
        OutputFormat::Text => {
            if products.is_empty() {
                println!("No products found.");
            } else {
                print_table(&products);
                println!();
                println!("Total: {} product(s)", products.len());
            }
        }
        OutputFormat::Json => {
            let output = ProductsOutput {
                products: &products,
                total: products.len(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

pub async fn get(client: &ProductClient, id: i64, format: OutputFormat) -> Result<()> {
    match client.get(id).await.context("failed to fetch product")? {
        Some(product) => print_product(&product, format),
        None => bail!("product {} not found", id),
    }
}

pub async fn create(client: &ProductClient, fields: ProductFields, format: OutputFormat) -> Result<()> {
    let product = client
        .create(&fields.into())
        .await
        .context("failed to create product")?;

    if format == OutputFormat::Text {
        println!("Created product {}", product.id);
    }
    print_product(&product, format)
}

pub async fn update(
    client: &ProductClient,
    id: i64,
    fields: ProductFields,
    format: OutputFormat,
) -> Result<()> {
    let updated = client
        .update(id, &fields.into())
        .await
        .context("failed to update product")?;

    match updated {
        Some(product) => {
            if format == OutputFormat::Text {
                println!("Updated product {}", product.id);
            }
            print_product(&product, format)
        }
        None => bail!("product {} not found", id),
    }
}

pub async fn delete(client: &ProductClient, id: i64, format: OutputFormat) -> Result<()> {
    if !client.delete(id).await.context("failed to delete product")? {
        bail!("product {} not found", id);
    }

    match format {
        OutputFormat::Text => println!("Deleted product {}", id),
        OutputFormat::Json => {
            let output = DeleteOutput { id, deleted: true };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn print_product(product: &Product, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("  ID:          {}", product.id);
            println!("  Name:        {}", product.name);
            println!("  Price:       {:.2}", product.price);
            println!("  Description: {}", product.description);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(product)?);
        }
    }
    Ok(())
}

fn print_table(products: &[Product]) {
    println!("{:>6}  {:<32} {:>10}  {}", "ID", "NAME", "PRICE", "DESCRIPTION");
    println!("{}", "-".repeat(80));
    for product in products {
        println!(
            "{:>6}  {:<32} {:>10.2}  {}",
            product.id,
            truncate(&product.name, 32),
            product.price,
            truncate(&product.description, 28)
        );
    }
}

/// Shorten `text` to at most `max` characters, marking the cut with `...`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
