mod config;

use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

use spendbook_mcp::{CategoryCatalog, SpendbookServer};
use spendbook_sqlite::SqliteStore;

use crate::config::{CliArgs, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliArgs::parse();
    let config = Config::load(&cli);

    init_tracing(&config);

    tracing::info!(path = %config.store.path.display(), "opening expense store");

    // A store that cannot be initialized (read-only location, disk full)
    // aborts startup before any tool is reachable.
    let store = SqliteStore::open(&config.store.path).await?;

    let categories = CategoryCatalog::load(Some(&config.resources.categories_file));

    let service = SpendbookServer::new(store, categories).serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}

fn init_tracing(config: &Config) {
    // stdout carries the MCP framing; logs go to stderr.
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
