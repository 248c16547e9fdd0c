//! # Structured Logging Module
//!
//! Environment-aware `tracing` setup. The composer logs generated SQL and join
//! resolution at `debug`, skipped joins at `warn` and pool connections at
//! `info`; applications call [`init_structured_logging`] once at startup (or
//! install their own subscriber, which is left untouched).

use crate::config::{LogFormat, LoggingConfig};
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize console logging with the environment-derived default level
pub fn init_structured_logging() {
    init_with_config(&LoggingConfig::default());
}

/// Initialize logging from configuration
///
/// `RUST_LOG` takes precedence over `config.level`, which takes precedence
/// over the level derived from `COMPOSER_ENV`/`APP_ENV`. Only the first call
/// has any effect.
pub fn init_with_config(config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = crate::config::loader::detect_environment();
        let default_level = config
            .level
            .clone()
            .unwrap_or_else(|| get_log_level(&environment).to_string());
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_level));

        let console = match config.format {
            LogFormat::Pretty => fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_filter(filter)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_target(true)
                .with_level(true)
                .with_filter(filter)
                .boxed(),
        };

        // An application or test harness may already own the global subscriber
        if tracing_subscriber::registry().with(console).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
            return;
        }

        tracing::info!(
            environment = %environment,
            level = %default_level,
            format = ?config.format,
            "Structured logging initialized"
        );
    });
}

/// Default filter directive for an environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        "test" => "warn",
        _ => "debug",
    }
}
