//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `LUSTRE_VENDOR_WAIT_DAYS` - Vendor lead time when a vendor has none on record (default: 21)
//! - `LUSTRE_ORDER_SORT` - Order listing sort key (default: `created_asc`)
//! - `LUSTRE_OUTPUT_DIR` - Directory for pass output files (default: `out`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate (default: 0.0)

use std::path::PathBuf;

use lustre_fulfillment::{DEFAULT_VENDOR_WAIT_DAYS, EngineConfig, OrderSort};
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Vendor lead time in days when a vendor has none on record
    pub vendor_wait_days: i64,
    /// Order listing sort key
    pub order_sort: OrderSort,
    /// Where pass outputs are written
    pub output_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate
    pub sentry_traces_sample_rate: f32,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let vendor_wait_days = match get_optional_env("LUSTRE_VENDOR_WAIT_DAYS") {
            Some(value) => parse_wait_days("LUSTRE_VENDOR_WAIT_DAYS", &value)?,
            None => DEFAULT_VENDOR_WAIT_DAYS,
        };
        let order_sort = get_env_or_default("LUSTRE_ORDER_SORT", "created_asc")
            .parse::<OrderSort>()
            .map_err(|e| ConfigError::InvalidEnvVar("LUSTRE_ORDER_SORT".to_string(), e))?;
        let output_dir = PathBuf::from(get_env_or_default("LUSTRE_OUTPUT_DIR", "out"));

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);

        Ok(Self {
            vendor_wait_days,
            order_sort,
            output_dir,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Engine settings, with an optional sort override from the command line.
    #[must_use]
    pub fn engine(&self, sort: Option<OrderSort>) -> EngineConfig {
        EngineConfig::default()
            .with_default_vendor_wait_days(self.vendor_wait_days)
            .with_order_sort(sort.unwrap_or(self.order_sort))
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

/// Parse a non-negative day count.
fn parse_wait_days(key: &str, value: &str) -> Result<i64, ConfigError> {
    let days = value
        .trim()
        .parse::<i64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if days < 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(days)
}
