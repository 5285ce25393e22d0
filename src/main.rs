use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use encore_api::api::{create_router, AppState};
use encore_api::catalog::SongCatalog;
use encore_api::config::Config;
use encore_api::services::{FeatureScaler, Recommender};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load and fit once, before serving anything; both are immutable from
    // here on.
    let catalog = SongCatalog::load(Path::new(&config.catalog_path))
        .with_context(|| format!("failed to load song catalog from {}", config.catalog_path))?;
    tracing::info!(songs = catalog.len(), path = %config.catalog_path, "catalog loaded");

    let scaler = FeatureScaler::fit(&catalog.feature_matrix())
        .context("failed to fit feature scaler over the catalog")?;

    let catalog = Arc::new(catalog);
    let recommender = Recommender::new(Arc::clone(&catalog), scaler, config.seed_policy());

    let address = format!("{}:{}", config.host, config.port);
    let state = AppState::new(catalog, recommender, config);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!(%address, "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
