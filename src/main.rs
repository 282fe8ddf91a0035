//! rtexp - Real-time key expiration server
//!
//! Serves the expiration index over HTTP with a bundled in-memory keyspace.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rtexp::api::create_router;
use rtexp::tasks::{eviction_channel, spawn_eviction_task, spawn_keyspace_reaper};
use rtexp::{AppState, Config};

/// Main entry point for the expiration server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the expiration store and keyspace
/// 4. Start the keyspace reaper and the eviction task
/// 5. Serve the HTTP API until SIGINT/SIGTERM
/// 6. Stop the eviction task and drain the reaper
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rtexp=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting rtexp expiration server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, min_interval={}ms, max_interval={}ms, lookahead={}us",
        config.server_port, config.min_interval_ms, config.max_interval_ms, config.lookahead_us
    );

    let state = AppState::default();

    let (on_evict, evicted_rx) = eviction_channel();
    let reaper = spawn_keyspace_reaper(state.keyspace.clone(), evicted_rx);
    let eviction = spawn_eviction_task(
        state.expirations.clone(),
        config.scheduler_config(),
        on_evict,
    );
    info!("Background tasks started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // Stopping the eviction task drops the callback, which closes the reaper
    eviction.shutdown();
    eviction.join().await.context("eviction task panicked")?;
    reaper.await.context("reaper task panicked")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
}
