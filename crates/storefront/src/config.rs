//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL; `https://` turns on secure cookies
//!   (default: <http://localhost:3000>)
//! - `STOREFRONT_CATALOG_PATH` - JSON product catalog (default: built-in catalog)
//! - `ORDER_PROCESSING_DELAY_MS` - Simulated order backend latency (default: 2000)
//! - `ORDER_SUCCESS_RATE` - Probability a placement succeeds, 0.0-1.0 (default: 0.8)
//! - `SESSION_IDLE_MINUTES` - Minutes before an idle cart is dropped (default: 60)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tringl_core::{Catalog, CatalogError};

const DEFAULT_PROCESSING_DELAY_MS: u64 = 2000;
const DEFAULT_SUCCESS_RATE: f64 = 0.8;
const DEFAULT_SESSION_IDLE_MINUTES: u64 = 60;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Failed to read catalog {path}: {source}")]
    CatalogIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid catalog {path}: {source}")]
    Catalog {
        path: PathBuf,
        source: CatalogError,
    },
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Optional JSON catalog replacing the built-in products
    pub catalog_path: Option<PathBuf>,
    /// Simulated order backend behaviour
    pub orders: OrderConfig,
    /// How long an untouched session keeps its cart
    pub session_idle: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Simulated order placement settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderConfig {
    /// Delay between submitting and learning the outcome
    pub processing_delay: Duration,
    /// Probability in `0.0..=1.0` that a placement succeeds
    pub success_rate: f64,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            processing_delay: Duration::from_millis(DEFAULT_PROCESSING_DELAY_MS),
            success_rate: DEFAULT_SUCCESS_RATE,
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            catalog_path: None,
            orders: OrderConfig::default(),
            session_idle: Duration::from_secs(DEFAULT_SESSION_IDLE_MINUTES * 60),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed or is
    /// out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_parsed_env("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = get_parsed_env("STOREFRONT_PORT", 3000_u16)?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let catalog_path = get_optional_env("STOREFRONT_CATALOG_PATH").map(PathBuf::from);

        let orders = OrderConfig::from_env()?;

        let idle_minutes = get_parsed_env("SESSION_IDLE_MINUTES", DEFAULT_SESSION_IDLE_MINUTES)?;
        if idle_minutes == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SESSION_IDLE_MINUTES".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            base_url,
            catalog_path,
            orders,
            session_idle: Duration::from_secs(idle_minutes.saturating_mul(60)),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Load the configured catalog, falling back to the built-in products.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file cannot be read or is invalid.
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        self.catalog_path
            .as_deref()
            .map_or_else(|| Ok(Catalog::builtin()), load_catalog_file)
    }
}

impl OrderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let delay_ms = get_parsed_env("ORDER_PROCESSING_DELAY_MS", DEFAULT_PROCESSING_DELAY_MS)?;
        let success_rate = get_parsed_env("ORDER_SUCCESS_RATE", DEFAULT_SUCCESS_RATE)?;
        validate_success_rate(success_rate, "ORDER_SUCCESS_RATE")?;

        Ok(Self {
            processing_delay: Duration::from_millis(delay_ms),
            success_rate,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, using `default` when it is unset.
fn get_parsed_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate that a probability is a finite number within `0.0..=1.0`.
fn validate_success_rate(rate: f64, var_name: &str) -> Result<(), ConfigError> {
    if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(())
}

fn load_catalog_file(path: &Path) -> Result<Catalog, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::CatalogIo {
        path: path.to_path_buf(),
        source,
    })?;
    Catalog::from_json(&json).map_err(|source| ConfigError::Catalog {
        path: path.to_path_buf(),
        source,
    })
}
