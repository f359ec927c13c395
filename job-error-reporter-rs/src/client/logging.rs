use config_models::{FailureReason, StandardWorkspace};
use tracing::info;

use super::{JobErrorReportingClient, ReportMetadata};
use crate::error::Result;

/// Writes job failure reports to the structured log instead of an external
/// tracker. Used when no error tracker is configured.
#[derive(Debug, Clone, Default)]
pub struct LoggingJobErrorReportingClient;

impl LoggingJobErrorReportingClient {
    pub fn new() -> Self {
        Self
    }
}

impl JobErrorReportingClient for LoggingJobErrorReportingClient {
    fn report_job_failure_reason(
        &self,
        workspace: &StandardWorkspace,
        failure_reason: &FailureReason,
        docker_image: &str,
        metadata: &ReportMetadata,
    ) -> Result<()> {
        info!(
            workspace_id = %workspace.workspace_id,
            docker_image = %docker_image,
            failure_origin = ?failure_reason.failure_origin,
            failure_type = ?failure_reason.failure_type,
            internal_message = ?failure_reason.internal_message,
            metadata = ?metadata,
            "Report job error"
        );
        Ok(())
    }
}
