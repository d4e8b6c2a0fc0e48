//! vigil server
//!
//! Serves `/ping`, `/healthz` and the Prometheus scrape endpoint.
//! Usage: `vigil-server [config.yaml]` (defaults to `vigil.yaml`, built-in
//! defaults when that file does not exist). Log level via `RUST_LOG`.

use tracing_subscriber::{fmt, EnvFilter};

use vigil_core::error::{Result, VigilError};
use vigil_server::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(code = e.code(), error = %e, "vigil-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = match std::env::args().nth(1) {
        Some(path) => config::load_from_file(path)?,
        None => config::load_or_default(config::DEFAULT_CONFIG_PATH)?,
    };
    let listen = cfg.server.listen_addr()?;

    // Instruments are registered here; a duplicate name aborts startup.
    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, "vigil-server starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| VigilError::Io(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| VigilError::Io(format!("server failed: {e}")))?;

    tracing::info!("vigil-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
