//! # Inventario Textil Main Entry Point
//!
//! This is the main entry point for the inventory API service.

use anyhow::Context;
use inventario_textil::{
    config::ConfigLoader,
    db,
    repositories::ProductoRepository,
    seeds,
    server::run_server,
    telemetry,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from layered env files and variables
    let config_loader = ConfigLoader::new();
    let config = config_loader.load().context("loading configuration")?;

    telemetry::init_tracing(&config).context("initializing telemetry")?;

    log::info!("Loaded configuration for profile: {}", config.profile);
    if let Ok(redacted_json) = config.redacted_json() {
        log::debug!("Configuration: {}", redacted_json);
    }

    let db = db::init_pool(&config)
        .await
        .context("initializing database connection pool")?;

    if db::test_connection(&db).await {
        if config.auto_create_schema
            && let Err(e) = db::ensure_schema(&db).await
        {
            log::warn!("Could not create products table: {}", e);
        }

        if config.seed_sample_data {
            let repo = ProductoRepository::new(Arc::new(db.clone()));
            match seeds::seed_productos(&repo).await {
                Ok(created) => log::info!("Seeded {} sample products", created),
                Err(e) => log::warn!("Sample data seeding failed: {}", e),
            }
        }
    } else {
        log::warn!("Starting without a reachable database; requests will fail until it is up");
    }

    run_server(config, db).await
}
