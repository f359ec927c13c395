//! Reporting clients
//!
//! A reporting client delivers one enriched failure reason to wherever job
//! errors are tracked. The reporter treats every client as fallible and never
//! lets a client error escape.

use std::collections::HashMap;
use std::sync::Arc;

use config_models::{FailureReason, StandardWorkspace};

use crate::config::{JobErrorReportingConfig, JobErrorReportingStrategy};
use crate::error::{ReporterError, Result};

pub mod logging;
pub mod sentry;
pub mod sentry_exception;

pub use logging::LoggingJobErrorReportingClient;
pub use sentry::{SentryDsn, SentryJobErrorReportingClient};

/// Flat tag mapping sent alongside each failure reason
pub type ReportMetadata = HashMap<String, String>;

/// Delivers a single job failure reason to an error tracker
#[cfg_attr(test, mockall::automock)]
pub trait JobErrorReportingClient: Send + Sync {
    fn report_job_failure_reason(
        &self,
        workspace: &StandardWorkspace,
        failure_reason: &FailureReason,
        docker_image: &str,
        metadata: &ReportMetadata,
    ) -> Result<()>;
}

/// Creates the reporting client selected by the configured strategy
pub fn create_reporting_client(
    config: &JobErrorReportingConfig,
) -> Result<Arc<dyn JobErrorReportingClient>> {
    match config.strategy {
        JobErrorReportingStrategy::Logging => Ok(Arc::new(LoggingJobErrorReportingClient::new())),
        JobErrorReportingStrategy::Sentry => {
            let dsn = config.sentry_dsn.as_deref().ok_or_else(|| {
                ReporterError::configuration("Sentry reporting selected without a DSN")
            })?;
            Ok(Arc::new(SentryJobErrorReportingClient::new(dsn)?))
        }
    }
}
