//! catalogctl: Command-line interface for the Catalog product service.
//!
//! Lists, inspects, creates, updates and deletes products over the
//! Catalog HTTP API.

mod client;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use client::ProductClient;
use commands::products::ProductFields;

/// Command-line interface for the Catalog product service.
#[derive(Parser)]
#[command(name = "catalogctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Catalog server endpoint (e.g., http://localhost:8080)
    #[arg(short, long, env = "CATALOG_ENDPOINT", default_value = "http://localhost:8080")]
    endpoint: String,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List all products
    List,
    /// Show one product
    Get {
        /// Product id
        id: i64,
    },
    /// Create a product
    Create(ProductFields),
    /// Replace the fields of a product
    Update {
        /// Product id
        id: i64,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ProductClient::new(&cli.endpoint);
    tracing::debug!(endpoint = %cli.endpoint, "Using Catalog endpoint");

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list(&client, cli.output).await?,
            ProductsAction::Get { id } => commands::products::get(&client, id, cli.output).await?,
            ProductsAction::Create(fields) => {
                commands::products::create(&client, fields, cli.output).await?
            }
            ProductsAction::Update { id, fields } => {
                commands::products::update(&client, id, fields, cli.output).await?
            }
            ProductsAction::Delete { id } => {
                commands::products::delete(&client, id, cli.output).await?
            }
        },
    }

    Ok(())
}
