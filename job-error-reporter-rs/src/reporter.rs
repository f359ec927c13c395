//! # Job Error Reporter
//!
//! Turns the failure summary of a failed sync job into individual reports.
//! Only failure reasons that came from a connector trace message are
//! reported, since those carry a connector-authored error rather than a
//! platform-side symptom. Each reported reason is enriched with the
//! connection, workspace and connector definition it belongs to.
//!
//! Reporting never fails the caller: every reason is handled behind its own
//! `Result` boundary, and errors are logged and counted before moving on.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use config_models::{
    AttemptFailureSummary, ConnectorDefinition, DeploymentMode, FailureOrigin, FailureReason,
    JobSyncConfig,
};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::client::{create_reporting_client, JobErrorReportingClient, ReportMetadata};
use crate::config::JobErrorReportingConfig;
use crate::error::{ReporterError, Result};
use crate::monitoring;
use crate::repository::ConfigRepository;
use crate::web_url::{UrlHelper, WebUrlHelper};

pub const WORKSPACE_ID_META_KEY: &str = "workspace_id";
pub const CONNECTION_ID_META_KEY: &str = "connection_id";
pub const CONNECTION_URL_META_KEY: &str = "connection_url";
pub const DEPLOYMENT_MODE_META_KEY: &str = "deployment_mode";
pub const AIRBYTE_VERSION_META_KEY: &str = "airbyte_version";
pub const FAILURE_ORIGIN_META_KEY: &str = "failure_origin";
pub const FAILURE_TYPE_META_KEY: &str = "failure_type";
pub const CONNECTOR_DEFINITION_ID_META_KEY: &str = "connector_definition_id";
pub const CONNECTOR_REPOSITORY_META_KEY: &str = "connector_repository";
pub const CONNECTOR_NAME_META_KEY: &str = "connector_name";
pub const CONNECTOR_RELEASE_STAGE_META_KEY: &str = "connector_release_stage";

/// Every key present in a report's metadata
pub const METADATA_KEYS: [&str; 11] = [
    WORKSPACE_ID_META_KEY,
    CONNECTION_ID_META_KEY,
    CONNECTION_URL_META_KEY,
    DEPLOYMENT_MODE_META_KEY,
    AIRBYTE_VERSION_META_KEY,
    FAILURE_ORIGIN_META_KEY,
    FAILURE_TYPE_META_KEY,
    CONNECTOR_DEFINITION_ID_META_KEY,
    CONNECTOR_REPOSITORY_META_KEY,
    CONNECTOR_NAME_META_KEY,
    CONNECTOR_RELEASE_STAGE_META_KEY,
];

const UNKNOWN: &str = "unknown";

/// Counts of what happened to the trace-flagged reasons of one summary.
///
/// Reasons without the trace message flag are filtered out before counting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOutcome {
    /// Handed to the reporting client successfully
    pub reported: usize,
    /// Lookup error, reporting client error or panic
    pub failed: usize,
    /// Origin was neither source nor destination
    pub skipped: usize,
}

/// Reports sync job failures to the configured reporting client
pub struct JobErrorReporter {
    config_repository: Arc<dyn ConfigRepository>,
    url_helper: Arc<dyn UrlHelper>,
    reporting_client: Arc<dyn JobErrorReportingClient>,
    deployment_mode: DeploymentMode,
    airbyte_version: String,
}

impl JobErrorReporter {
    pub fn new(
        config_repository: Arc<dyn ConfigRepository>,
        url_helper: Arc<dyn UrlHelper>,
        reporting_client: Arc<dyn JobErrorReportingClient>,
        deployment_mode: DeploymentMode,
        airbyte_version: impl Into<String>,
    ) -> Self {
        Self {
            config_repository,
            url_helper,
            reporting_client,
            deployment_mode,
            airbyte_version: airbyte_version.into(),
        }
    }

    /// Wires a reporter from configuration, using [`WebUrlHelper`] and the
    /// client selected by the configured strategy.
    pub fn from_config(
        config_repository: Arc<dyn ConfigRepository>,
        config: &JobErrorReportingConfig,
    ) -> Result<Self> {
        config.validate()?;
        let reporting_client = create_reporting_client(config)?;

        info!(
            strategy = %config.strategy,
            deployment_mode = %config.deployment_mode,
            airbyte_version = %config.airbyte_version,
            "Job error reporter configured"
        );

        Ok(Self::new(
            config_repository,
            Arc::new(WebUrlHelper::new(config.webapp_url.clone())),
            reporting_client,
            config.deployment_mode,
            config.airbyte_version.clone(),
        ))
    }

    pub fn deployment_mode(&self) -> DeploymentMode {
        self.deployment_mode
    }

    pub fn airbyte_version(&self) -> &str {
        &self.airbyte_version
    }

    /// Reports every trace-flagged failure reason of a sync job, in order.
    ///
    /// Errors for one reason are logged and do not stop the others. A panic
    /// while handling a reason counts as a failed report. Clients may block,
    /// so call this off the async runtime (e.g. via `spawn_blocking`).
    pub fn report_sync_job_failure(
        &self,
        connection_id: Uuid,
        failure_summary: &AttemptFailureSummary,
        sync_config: &JobSyncConfig,
    ) -> ReportOutcome {
        let mut outcome = ReportOutcome::default();

        let trace_message_failures = failure_summary
            .failures
            .iter()
            .filter(|reason| reason.is_from_trace_message());

        for reason in trace_message_failures {
            let origin = reason
                .failure_origin
                .map(|origin| origin.value())
                .unwrap_or(UNKNOWN);

            let result = match reason.failure_origin {
                Some(FailureOrigin::Source) => isolate(|| {
                    self.report_source_failure(connection_id, reason, &sync_config.source_docker_image)
                }),
                Some(FailureOrigin::Destination) => isolate(|| {
                    self.report_destination_failure(
                        connection_id,
                        reason,
                        &sync_config.destination_docker_image,
                    )
                }),
                _ => {
                    debug!(
                        connection_id = %connection_id,
                        failure_origin = origin,
                        "Skipping failure reason not attributable to a connector"
                    );
                    monitoring::record_reason_skipped(origin);
                    outcome.skipped += 1;
                    continue;
                }
            };

            match result {
                Ok(()) => {
                    monitoring::record_report_sent(origin);
                    outcome.reported += 1;
                }
                Err(e) => {
                    error!(
                        connection_id = %connection_id,
                        failure_origin = origin,
                        error = %e,
                        "Error when reporting job failure reason"
                    );
                    monitoring::record_report_failed(origin);
                    outcome.failed += 1;
                }
            }
        }

        outcome
    }

    fn report_source_failure(
        &self,
        connection_id: Uuid,
        reason: &FailureReason,
        docker_image: &str,
    ) -> Result<()> {
        let definition = self
            .config_repository
            .get_source_definition_from_connection(connection_id)?;
        self.report_failure_reason(connection_id, reason, docker_image, &definition)
    }

    fn report_destination_failure(
        &self,
        connection_id: Uuid,
        reason: &FailureReason,
        docker_image: &str,
    ) -> Result<()> {
        let definition = self
            .config_repository
            .get_destination_definition_from_connection(connection_id)?;
        self.report_failure_reason(connection_id, reason, docker_image, &definition)
    }

    fn report_failure_reason(
        &self,
        connection_id: Uuid,
        reason: &FailureReason,
        docker_image: &str,
        definition: &dyn ConnectorDefinition,
    ) -> Result<()> {
        let workspace = self
            .config_repository
            .get_standard_workspace_from_connection(connection_id, true)?;
        let metadata = self.build_metadata(connection_id, workspace.workspace_id, reason, definition);

        self.reporting_client
            .report_job_failure_reason(&workspace, reason, docker_image, &metadata)
    }

    fn build_metadata(
        &self,
        connection_id: Uuid,
        workspace_id: Uuid,
        reason: &FailureReason,
        definition: &dyn ConnectorDefinition,
    ) -> ReportMetadata {
        let failure_origin = reason.failure_origin.map(|o| o.value()).unwrap_or(UNKNOWN);
        let failure_type = reason.failure_type.map(|t| t.value()).unwrap_or(UNKNOWN);
        let release_stage = definition
            .release_stage()
            .map(|stage| stage.value())
            .unwrap_or(UNKNOWN);

        ReportMetadata::from([
            (WORKSPACE_ID_META_KEY.to_string(), workspace_id.to_string()),
            (CONNECTION_ID_META_KEY.to_string(), connection_id.to_string()),
            (
                CONNECTION_URL_META_KEY.to_string(),
                self.url_helper.connection_url(workspace_id, connection_id),
            ),
            (DEPLOYMENT_MODE_META_KEY.to_string(), self.deployment_mode.name().to_string()),
            (AIRBYTE_VERSION_META_KEY.to_string(), self.airbyte_version.clone()),
            (FAILURE_ORIGIN_META_KEY.to_string(), failure_origin.to_string()),
            (FAILURE_TYPE_META_KEY.to_string(), failure_type.to_string()),
            (
                CONNECTOR_DEFINITION_ID_META_KEY.to_string(),
                definition.definition_id().to_string(),
            ),
            (
                CONNECTOR_REPOSITORY_META_KEY.to_string(),
                definition.docker_repository().to_string(),
            ),
            (CONNECTOR_NAME_META_KEY.to_string(), definition.name().to_string()),
            (CONNECTOR_RELEASE_STAGE_META_KEY.to_string(), release_stage.to_string()),
        ])
    }
}

/// Runs one reason's report, turning a panic into a reporting client error
fn isolate<F>(report: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    panic::catch_unwind(AssertUnwindSafe(report)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(ReporterError::reporting_client(format!(
            "Reporting panicked: {}",
            message
        )))
    })
}
