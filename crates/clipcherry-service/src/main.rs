//! CLIPcherry Service - HTTP API for the CLIPcherry content platform
//!
//! This is the main entry point for the CLIPcherry service.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clipcherry_service::sweeper::spawn_session_sweeper;
use clipcherry_service::{create_router, AppState, ServiceConfig, SessionBackend};
use clipcherry_store::{MemorySessionStore, SessionStore, SqliteStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,clipcherry=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CLIPcherry Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        database_url = %config.database_url,
        session_backend = ?config.session_backend,
        session_ttl_seconds = config.session_ttl_seconds,
        pepper_configured = config.password_pepper.is_some(),
        "Service configuration loaded"
    );

    // Initialize the relational store (migrations run on open)
    tracing::info!(url = %config.database_url, "Opening SQLite store");
    let store = Arc::new(SqliteStore::connect(&config.database_url).await?);

    let sessions = open_session_store(&config)?;
    spawn_session_sweeper(
        Arc::clone(&sessions),
        Duration::from_secs(config.session_sweep_seconds),
    );

    // Build app state
    let state = AppState::new(store, sessions, config.clone())?;

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Open the configured session store.
fn open_session_store(
    config: &ServiceConfig,
) -> Result<Arc<dyn SessionStore>, Box<dyn std::error::Error>> {
    match config.session_backend {
        SessionBackend::Memory => {
            tracing::info!("Using in-memory session store");
            Ok(Arc::new(MemorySessionStore::new()))
        }
        #[cfg(feature = "rocksdb-backend")]
        SessionBackend::Rocks => {
            tracing::info!(path = %config.session_dir, "Opening RocksDB session store");
            Ok(Arc::new(clipcherry_store::RocksSessionStore::open(
                &config.session_dir,
            )?))
        }
        #[cfg(not(feature = "rocksdb-backend"))]
        SessionBackend::Rocks => Err(
            "SESSION_BACKEND=rocks requires building with the `rocksdb-backend` feature".into(),
        ),
    }
}
