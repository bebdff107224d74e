//! Whodini Local Backend
//!
//! A runnable stand-in for the Whodini SaaS backend: all state lives under
//! a local data directory, so front-end work can run against realistic
//! flows with nothing else deployed.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use whodini_backend::{routes, AppState, Config, FileBlobStore, SqliteCredentialStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "whodini_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!(?config, "Loaded configuration");

    // Open the stores under the data directory
    std::fs::create_dir_all(&config.data_dir)?;
    let blob_store = FileBlobStore::open(config.data_dir.join("blobs"))?;
    let credential_store =
        SqliteCredentialStore::open(config.data_dir.join("whodini_credentials_v1.sqlite"))?;

    // Create app state and router
    let state = Arc::new(AppState::new(blob_store, credential_store));
    let app = routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Whodini backend listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
