//! Blog Server Library
//!
//! HTTP backend for the blog: cookie-session auth, MongoDB storage for
//! users, posts and comments, image uploads onto local disk, and
//! static serving of the pre-built frontend bundle.

pub mod auth;
pub mod config;
pub mod ctx;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use auth::AuthManager;
use config::{AppState, ServerConfig};
use store::MongoStore;

/// Run the server: connect to the store, then serve until interrupted.
///
/// The listener is only bound after the database connection check
/// succeeds. A failed check is terminal; there is no retry. On
/// interrupt the listener stops accepting, in-flight requests drain,
/// and the store connection is closed before returning.
pub async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        // Already set, ignore
    }

    info!("=== Blog Server ===");

    let config = ServerConfig::from_env();
    config.ensure_dirs().await?;

    info!("Images directory: {:?}", config.images_dir);
    info!("Frontend bundle: {:?}", config.static_dir);

    // Open the store handle, then gate startup on a real round-trip.
    let store = Arc::new(MongoStore::open(&config.mongo_url).await?);
    if let Err(e) = store.ping().await {
        error!("Database connection failed: {}", e);
        return Err(e.into());
    }

    let auth = Arc::new(AuthManager::new(store.clone()));

    let state = AppState {
        config: config.clone(),
        store: store.clone(),
        auth,
    };

    let app = router::build_router(state)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("App is running on port {}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // In-flight requests have drained; release the store.
    store.close().await;
    info!("Server and database connection closed");

    Ok(())
}

/// Wait for an interrupt: Ctrl+C everywhere, SIGTERM on Unix.
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
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
