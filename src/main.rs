//! Item Service - A cached, transactional REST API for catalog items

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};

use item_service::{
    cache::MemoryCache, create_router, logging, spawn_cleanup_task, store, AppState, Config,
};

/// Main entry point for the item service.
///
/// # Startup Sequence
/// 1. Load configuration from environment variables
/// 2. Initialize tracing subscriber for logging
/// 3. Connect to the document store
/// 4. Create the response cache and start its sweep task
/// 5. Start HTTP server on configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    let _log_guards = logging::init(config.log_format, config.log_dir.as_deref());

    info!("Starting item service");
    info!(
        port = config.server_port,
        cache_ttl_secs = config.cache_ttl,
        cache_max_entries = config.cache_max_entries,
        default_page_limit = config.default_page_limit,
        max_page_limit = config.max_page_limit,
        "configuration loaded"
    );

    let store = store::connect(&config.store_uri)
        .with_context(|| format!("failed to connect to store at {}", config.store_uri))?;
    info!("document store connected");

    let cache = MemoryCache::new(config.cache_max_entries);
    let cleanup_handle = spawn_cleanup_task(
        cache.clone(),
        Duration::from_secs(config.cleanup_interval.max(1)),
    );

    let state = AppState::from_config(&config, store, Arc::new(cache));
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the cache sweep.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    cleanup_handle.abort();
    warn!("Cache sweep task aborted");
}
