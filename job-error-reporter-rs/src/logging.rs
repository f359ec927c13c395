//! # Structured Logging
//!
//! Installs the global `tracing` subscriber used by the reporter and its clients.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

use crate::error::{ReporterError, Result};

// Flag to track if logging has been initialized
static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// The log level to use (trace, debug, info, warn, error)
    pub level: String,
    /// The service name for identification
    pub service_name: String,
    /// Whether to use JSON formatting
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            service_name: "job-error-reporter".to_string(),
            json_format: true,
        }
    }
}

impl TryFrom<config::Config> for LoggingConfig {
    type Error = config::ConfigError;

    fn try_from(cfg: config::Config) -> std::result::Result<Self, Self::Error> {
        let mut base = LoggingConfig::default();

        if let Ok(level) = cfg.get::<String>("logging.level") {
            base.level = level;
        }
        if let Ok(service_name) = cfg.get::<String>("logging.service_name") {
            base.service_name = service_name;
        }
        if let Ok(json_format) = cfg.get::<bool>("logging.json_format") {
            base.json_format = json_format;
        }

        Ok(base)
    }
}

/// Filter admitting events at `level` and above for every target
pub(crate) fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::new(level)
}

/// Initializes the structured logging system.
///
/// `RUST_LOG` wins over the configured level when set. Calling this more than
/// once is a no-op.
pub fn init_logging(config: Option<LoggingConfig>) -> Result<()> {
    // Claim initialization up front so concurrent callers install only once
    if LOGGING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let config = config.unwrap_or_default();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(&config.level));

    let registry = Registry::default().with(filter);

    // JSON and text layers have distinct types, so each branch installs its own
    // subscriber.
    let installed = if config.json_format {
        let json_layer = fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_target(true);
        tracing::subscriber::set_global_default(registry.with(json_layer))
    } else {
        let text_layer = fmt::layer().with_target(true).with_thread_names(true);
        tracing::subscriber::set_global_default(registry.with(text_layer))
    };

    if let Err(e) = installed {
        LOGGING_INITIALIZED.store(false, Ordering::SeqCst);
        return Err(ReporterError::configuration(format!(
            "Failed to set global subscriber: {}",
            e
        )));
    }

    tracing::info!(
        service = %config.service_name,
        level = %config.level,
        json = %config.json_format,
        "Structured logging initialized"
    );

    Ok(())
}
