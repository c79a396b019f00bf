//! Server configuration loaded from TOML.
//!
//! Resolution order for the file: explicit path (CLI argument), then the
//! `LARDER_CONFIG` environment variable, then `larder.toml` in the
//! working directory. Only the implicit default may be absent, in which
//! case built-in defaults apply.

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use larder_auth::AuthConfig;
use larder_db::DbConfig;
use larder_orders::OrderConfig;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "LARDER_CONFIG";

/// File used when no path is given.
pub const DEFAULT_CONFIG_NAME: &str = "larder.toml";

const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(String),
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpConfig,
    #[serde(default)]
    pub database: DbConfig,
    #[serde(default)]
    pub auth: AuthSection,
    #[serde(default)]
    pub orders: OrderConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Listen address, e.g. `0.0.0.0:8080`.
    pub bind: String,
    /// Upper bound for the `limit` query parameter.
    pub max_page_size: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".into(),
            max_page_size: 200,
        }
    }
}

/// `[auth]` section. The public key is given inline or as a path.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSection {
    pub issuer: String,
    pub public_key_pem: Option<String>,
    pub public_key_path: Option<PathBuf>,
    /// Development only: trust `X-Tenant-ID` when the token has no
    /// tenant claim.
    pub allow_tenant_header: bool,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            issuer: "larder".into(),
            public_key_pem: None,
            public_key_path: None,
            allow_tenant_header: false,
        }
    }
}

impl ServerConfig {
    /// Load, parse and validate configuration.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path);
        let config = match fs::read(&resolved) {
            Ok(bytes) => Self::parse(&bytes)?,
            Err(err) if !explicit && err.kind() == std::io::ErrorKind::NotFound => {
                Self::default()
            }
            Err(err) => {
                return Err(ConfigError::Io(format!("{}: {err}", resolved.display())));
            }
        };
        config.validate()?;
        Ok(config)
    }

    fn parse(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Check the configuration for internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server
            .bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid(format!("invalid bind address: {}", self.server.bind)))?;
        if self.server.max_page_size == 0 {
            return Err(ConfigError::Invalid(
                "server.max_page_size must be positive".to_string(),
            ));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url must be set".to_string()));
        }
        if self.auth.issuer.trim().is_empty() {
            return Err(ConfigError::Invalid("auth.issuer must be set".to_string()));
        }
        match (&self.auth.public_key_pem, &self.auth.public_key_path) {
            (None, None) => {
                return Err(ConfigError::Invalid(
                    "auth.public_key_pem or auth.public_key_path must be set".to_string(),
                ));
            }
            (Some(_), Some(_)) => {
                return Err(ConfigError::Invalid(
                    "set only one of auth.public_key_pem and auth.public_key_path".to_string(),
                ));
            }
            _ => {}
        }
        self.orders
            .validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        Ok(())
    }

    /// Build the verifier configuration, reading the key file if needed.
    pub fn auth_config(&self) -> Result<AuthConfig, ConfigError> {
        let public_key = match (&self.auth.public_key_pem, &self.auth.public_key_path) {
            (Some(pem), _) => pem.clone(),
            (None, Some(path)) => fs::read_to_string(path)
                .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?,
            (None, None) => {
                return Err(ConfigError::Invalid("no JWT public key configured".to_string()));
            }
        };
        Ok(AuthConfig {
            jwt_public_key_pem: public_key,
            jwt_issuer: self.auth.issuer.clone(),
            allow_tenant_header: self.auth.allow_tenant_header,
            ..AuthConfig::default()
        })
    }
}

/// Returns the path to read and whether it was asked for explicitly.
fn resolve_path(path: Option<&Path>) -> (PathBuf, bool) {
    if let Some(path) = path {
        return (path.to_path_buf(), true);
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        return (PathBuf::from(env_path), true);
    }
    (PathBuf::from(DEFAULT_CONFIG_NAME), false)
}
