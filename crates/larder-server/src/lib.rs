//! Larder Server: REST API over the order and catalog services.

pub mod api;
pub mod config;
pub mod state;

use std::future::Future;
use std::sync::Arc;

use larder_auth::{AuthError, TenantResolver};
use larder_db::{DbError, DbManager};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

pub use config::{ConfigError, ServerConfig};
pub use state::AppState;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("auth setup failed: {0}")]
    Auth(#[from] AuthError),

    #[error("database setup failed: {0}")]
    Database(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DbError> for ServerError {
    fn from(err: DbError) -> Self {
        ServerError::Database(err.to_string())
    }
}

/// Connect to the database, apply migrations and assemble the state.
pub async fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let manager = DbManager::connect(&config.database)
        .await
        .map_err(|e| ServerError::Database(e.to_string()))?;
    larder_db::run_migrations(manager.client()).await?;

    let resolver = TenantResolver::new(&config.auth_config()?)?;
    Ok(AppState::new(manager.client().clone(), resolver, config))
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    let addr = listener.local_addr()?;
    info!(%addr, "Larder API listening");
    axum::serve(listener, api::router(Arc::new(state)))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("Larder API stopped");
    Ok(())
}
