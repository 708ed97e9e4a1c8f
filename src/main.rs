//! Wajba log server - Binary Entry Point
//!
//! Opens the application log described by the `WAJBA_*` environment
//! variables and serves the diagnostic viewer over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use wajba_logs::api::{create_router, AppState};
use wajba_logs::{LogStore, LogStoreConfig};

const DEFAULT_BIND: &str = "127.0.0.1:7340";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wajba_logs=info,tower_http=info")),
        )
        .init();

    let bind_str = std::env::var("WAJBA_LOG_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let bind: SocketAddr = bind_str
        .parse()
        .map_err(|_| format!("WAJBA_LOG_BIND is not a valid socket address: {}", bind_str))?;

    info!(name = wajba_logs::NAME, version = wajba_logs::VERSION, "Starting log server");

    let config = LogStoreConfig::from_env();
    info!(
        log_dir = %config.log_dir.display(),
        export_dir = %config.export_dir.display(),
        max_file_size = config.max_file_size,
        "Opening application log"
    );

    let store = Arc::new(LogStore::with_config(config));
    store.initialize().await;

    let app = create_router(Arc::new(AppState::new(store.clone())));
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(%bind, "Log viewer listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.info("Log server stopped", None).await;
    store.dispose().await;
    info!("Shut down cleanly");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
