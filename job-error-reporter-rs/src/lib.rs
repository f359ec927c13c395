//! # Job Error Reporter
//!
//! Forwards the failures of sync jobs to an external error tracker.
//!
//! Given the failure summary of a failed attempt, the reporter keeps the
//! failure reasons that a connector emitted through a trace message, resolves
//! the connector and workspace behind each one and hands it to a reporting
//! client together with a flat metadata mapping.
//!
//! ## Features
//!
//! - Trace-message filtering and source/destination attribution
//! - Per-reason error isolation, reporting never fails a job
//! - Logging and Sentry reporting clients
//! - Python and Java stack trace parsing for Sentry exceptions
//! - Environment-driven configuration and structured logging
//!

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod monitoring;
pub mod reporter;
pub mod repository;
pub mod web_url;

#[cfg(test)]
mod tests;

use std::sync::Arc;

// Re-export commonly used types
pub use client::{
    create_reporting_client, JobErrorReportingClient, LoggingJobErrorReportingClient,
    ReportMetadata, SentryJobErrorReportingClient,
};
pub use config::{JobErrorReportingConfig, JobErrorReportingStrategy};
pub use error::{ReporterError, Result};
pub use logging::{init_logging, LoggingConfig};
pub use reporter::{JobErrorReporter, ReportOutcome};
pub use repository::ConfigRepository;
pub use web_url::{UrlHelper, WebUrlHelper};

/// Initializes logging and builds a reporter from the environment
pub fn init_from_env(config_repository: Arc<dyn ConfigRepository>) -> Result<JobErrorReporter> {
    init_with_config(config_repository, crate::config::load_environment()?)
}

/// Initializes logging and builds a reporter from one configuration source
pub fn init_with_config(
    config_repository: Arc<dyn ConfigRepository>,
    cfg: ::config::Config,
) -> Result<JobErrorReporter> {
    let logging_config = LoggingConfig::try_from(cfg.clone()).ok();
    init_logging(logging_config)?;

    let reporting_config = JobErrorReportingConfig::try_from(cfg)?;
    JobErrorReporter::from_config(config_repository, &reporting_config)
}
