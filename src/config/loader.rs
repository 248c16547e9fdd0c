//! Configuration Loader
//!
//! Environment-aware loading on top of the `config` crate. Sources are layered
//! lowest to highest:
//!
//! 1. serde defaults
//! 2. `<dir>/query_composer.{toml,yaml,json,...}` (optional)
//! 3. `<dir>/query_composer.<environment>.*` (optional)
//! 4. `COMPOSER__SECTION__KEY` environment variables

use super::error::ConfigResult;
use super::ComposerConfig;
use config::{Config, Environment, File, Map};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

const FILE_STEM: &str = "query_composer";
const ENV_PREFIX: &str = "COMPOSER";
const ENV_SEPARATOR: &str = "__";

/// Builder for a validated [`ComposerConfig`]
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_directory: PathBuf,
    environment: String,
    explicit_file: Option<PathBuf>,
    env_source: Option<Map<String, String>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_directory: PathBuf::from("config"),
            environment: detect_environment(),
            explicit_file: None,
            env_source: None,
        }
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config_directory = directory.into();
        self
    }

    pub fn with_environment(mut self, environment: &str) -> Self {
        self.environment = environment.to_lowercase();
        self
    }

    /// Load this file instead of searching the config directory; it must exist
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// Read overrides from this map instead of the process environment
    pub fn with_env_source(mut self, source: Map<String, String>) -> Self {
        self.env_source = Some(source);
        self
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn load(&self) -> ConfigResult<ComposerConfig> {
        debug!(
            environment = %self.environment,
            directory = %self.config_directory.display(),
            "Loading configuration"
        );

        let mut builder = Config::builder();
        match &self.explicit_file {
            Some(path) => {
                builder = builder.add_source(File::from(path.as_path()).required(true));
            }
            None => {
                builder = builder
                    .add_source(optional_file(&self.config_directory.join(FILE_STEM)))
                    .add_source(optional_file(
                        &self
                            .config_directory
                            .join(format!("{FILE_STEM}.{}", self.environment)),
                    ));
            }
        }

        let environment = Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(self.env_source.clone());

        let config: ComposerConfig = builder
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        config.validate()?;

        debug!(
            strict_joins = config.query.strict_joins,
            max_connections = config.database.max_connections,
            "Configuration loaded"
        );
        Ok(config)
    }
}

fn optional_file(stem: &Path) -> File<config::FileSourceFile, config::FileFormat> {
    File::with_name(&stem.to_string_lossy()).required(false)
}

/// Current environment name from `COMPOSER_ENV`, then `APP_ENV`
pub fn detect_environment() -> String {
    env::var("COMPOSER_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
        .to_lowercase()
}
