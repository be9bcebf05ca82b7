//! Configuration for the signup service.

use crate::auth::{ExpiryUnit, TokenExpiry, DEFAULT_COST};
use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;

/// Service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Signing and hashing configuration
    pub auth: AuthConfig,

    /// Account storage configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for identity tokens
    pub jwt_secret: SecretString,

    /// bcrypt cost factor
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Token lifetime, interpreted according to `token_expiry_unit`
    #[serde(default = "default_token_expires_in")]
    pub token_expires_in: u64,

    /// Unit of `token_expires_in`; no default, must be set explicitly
    pub token_expiry_unit: ExpiryUnit,
}

impl AuthConfig {
    pub fn token_expiry(&self) -> TokenExpiry {
        TokenExpiry::new(self.token_expires_in, self.token_expiry_unit)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the JSON account file
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// Enable persistence (if false, accounts are in-memory only)
    #[serde(default)]
    pub persist: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            persist: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_bcrypt_cost() -> u32 {
    DEFAULT_COST
}

fn default_token_expires_in() -> u64 {
    3_600_000
}

fn default_store_path() -> PathBuf {
    PathBuf::from("/data/accounts.json")
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_source(config::Environment::default().separator("__"))
    }

    /// Build configuration from an explicit source.
    pub fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(source)
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
