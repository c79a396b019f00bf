//! Larder Server: Application entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use larder_server::{ServerConfig, ServerError, build_state, serve};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("larder=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Larder server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ServerError> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = ServerConfig::load(config_path.as_deref())?;

    info!(bind = %config.server.bind, "Starting Larder server...");

    let state = build_state(&config).await?;
    let listener = TcpListener::bind(&config.server.bind).await?;
    serve(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
