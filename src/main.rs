//! Langdata Cache server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use langdata_cache::service::{InMemoryRepository, PlaceholderEngine};
use langdata_cache::{create_router, spawn_cleanup_task, AppState, Config, EventEmitter, StoreAdapter};

/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the key-value store (degraded on failure)
/// 4. Wire repository, engine, rate limiter and service
/// 5. Start background cleanup task
/// 6. Serve until SIGINT/SIGTERM, then release the store connection
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "langdata_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Langdata Cache Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, cleanup_interval={}s, submission_cooldown={}s, coalesce={}",
        config.server_port, config.cleanup_interval, config.submission_cooldown, config.coalesce
    );

    let emitter = EventEmitter::tracing();
    let adapter = StoreAdapter::connect(&config, emitter.clone()).await;
    let store_guard = adapter.close_guard();

    let state = AppState::from_config(
        &config,
        adapter.clone(),
        Arc::new(InMemoryRepository::new()),
        Arc::new(PlaceholderEngine),
        emitter,
    );

    let cleanup_handle = spawn_cleanup_task(
        adapter.clone(),
        state.service.limiter().clone(),
        config.cleanup_interval,
    );
    info!("Background cleanup task started");

    let served = serve(&config, state, cleanup_handle).await;

    store_guard.close().await;
    info!("Server shutdown complete");
    served
}

async fn serve(
    config: &Config,
    state: AppState,
    cleanup_handle: tokio::task::JoinHandle<()>,
) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            cleanup_handle.abort();
            return Err(e).with_context(|| format!("failed to bind {addr}"));
        }
    };
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then aborts the cleanup task.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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
    warn!("Cleanup task aborted");
}
