//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOECART_INVENTORY_URL` - Base URL of the stock and catalog API
//!
//! ## Optional
//! - `SHOECART_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOECART_PORT` - Listen port (default: 3333)
//! - `SHOECART_INVENTORY_TOKEN` - Bearer token for the inventory API
//! - `SHOECART_INVENTORY_TIMEOUT_SECS` - Inventory request timeout (default: 10)
//! - `SHOECART_CATALOG_CACHE_TTL_SECS` - Product metadata cache TTL (default: 300)
//! - `SHOECART_DATA_DIR` - Directory for the cart snapshot (default: .shoecart)
//! - `SHOECART_STORAGE_KEY` - Snapshot key (default: @RocketShoes:cart)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::storage::CART_STORAGE_KEY;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Inventory API configuration
    pub inventory: InventoryConfig,
    /// Cart snapshot storage configuration
    pub storage: StorageConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Inventory API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct InventoryConfig {
    /// Base URL; `stock/{id}` and `products/{id}` are resolved against it
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
    /// How long product metadata stays cached
    pub catalog_ttl: Duration,
}

impl std::fmt::Debug for InventoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("catalog_ttl", &self.catalog_ttl)
            .finish()
    }
}

/// Cart snapshot storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding the snapshot file
    pub data_dir: PathBuf,
    /// Key the snapshot is stored under
    pub key: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env.parse_or("SHOECART_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = env.parse_or("SHOECART_PORT", 3333_u16)?;

        let inventory = InventoryConfig {
            base_url: env.required("SHOECART_INVENTORY_URL").and_then(|raw| {
                Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("SHOECART_INVENTORY_URL".to_string(), e.to_string())
                })
            })?,
            token: env.optional("SHOECART_INVENTORY_TOKEN").map(SecretString::from),
            timeout: Duration::from_secs(env.parse_or("SHOECART_INVENTORY_TIMEOUT_SECS", 10)?),
            catalog_ttl: Duration::from_secs(env.parse_or("SHOECART_CATALOG_CACHE_TTL_SECS", 300)?),
        };

        Ok(Self {
            host,
            port,
            inventory,
            storage: StorageConfig::from_lookup(&lookup),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StorageConfig {
    /// Load only the snapshot settings from environment variables.
    ///
    /// Needs no inventory settings, so it works for commands that never query
    /// stock or the catalog.
    #[must_use]
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the snapshot settings from an arbitrary variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env = Env(&lookup);
        Self {
            data_dir: env
                .optional("SHOECART_DATA_DIR")
                .map_or_else(|| PathBuf::from(".shoecart"), PathBuf::from),
            key: env
                .optional("SHOECART_STORAGE_KEY")
                .unwrap_or_else(|| CART_STORAGE_KEY.to_string()),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}
