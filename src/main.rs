mod api;
mod config;
mod storage;
mod validation;

use crate::api::AppState;
use crate::config::AppConfig;
use crate::storage::{MongoThoughtStore, ThoughtStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("🚀 Starting Happy Thoughts API");

    // Load configuration
    let config = AppConfig::load()?;
    info!("📋 Configuration loaded");
    info!("   - Server: {}", config.bind_address());
    info!("   - Collection: {}", config.storage.collection);

    // Connect to the document store
    info!("💾 Connecting to MongoDB...");
    let store = MongoThoughtStore::connect(&config.storage).await?;
    store.ping().await?;
    store.ensure_indexes().await?;
    let total = store.count().await?;
    info!("✅ Thought store ready ({} thoughts)", total);

    let state = AppState::new(Arc::new(store));
    let app = api::router(state);

    // Start server
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 Server listening on http://{}", addr);
    info!("📡 Available endpoints:");
    info!("   GET    /                    - List endpoints");
    info!("   GET    /health              - Health check");
    info!("   GET    /thoughts            - Latest thoughts");
    info!("   POST   /thoughts            - Post a thought");
    info!("   POST   /thoughts/:id/likes  - Like a thought");
    info!("   PATCH  /thoughts/:id        - Update a thought");
    info!("   PUT    /thoughts/:id        - Replace a thought");
    info!("   DELETE /thoughts/:id        - Delete a thought");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutting down gracefully");

    Ok(())
}

/// Graceful shutdown handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown signal received");
}
