//! # Configuration
//!
//! Layered configuration for the composer and its backends: serde defaults,
//! then an optional `config/query_composer.*` file (and its per-environment
//! overlay), then `COMPOSER__*` environment variables.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use query_composer::config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new().load()?;
//!
//! let strict = config.query.strict_joins;
//! let pool_size = config.database.max_connections;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigLoader;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    pub database: DatabaseConfig,
    pub query: QueryConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 5,
            acquire_timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }
}

/// Composition behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Reject references to tables with no registered join instead of skipping them
    pub strict_joins: bool,
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            strict_joins: true,
            default_page_size: 15,
            max_page_size: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset; derived from the environment otherwise
    pub level: Option<String>,
    pub format: LogFormat,
}

impl ComposerConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "database.url",
                "database configuration",
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigurationError::invalid_value(
                "database.max_connections",
                "0",
                "pool size must be greater than 0",
            ));
        }

        if self.query.default_page_size == 0 {
            return Err(ConfigurationError::invalid_value(
                "query.default_page_size",
                "0",
                "page size must be greater than 0",
            ));
        }

        if self.query.default_page_size > self.query.max_page_size {
            return Err(ConfigurationError::invalid_value(
                "query.default_page_size",
                self.query.default_page_size.to_string(),
                format!(
                    "must not exceed query.max_page_size ({})",
                    self.query.max_page_size
                ),
            ));
        }

        Ok(())
    }
}
