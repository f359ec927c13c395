//! # Config Models
//!
//! Read-only snapshots of the platform records the job error reporter consumes:
//! attempt failure summaries, sync job configuration, connector definitions and
//! workspaces. The shapes follow the JSON documents kept by the config store, so
//! every model round-trips through `serde` with camelCase field names.

pub mod definition;
pub mod deployment;
pub mod error;
pub mod failure;
pub mod job;
pub mod workspace;

pub use definition::{
    ConnectorDefinition, ReleaseStage, StandardDestinationDefinition, StandardSourceDefinition,
};
pub use deployment::DeploymentMode;
pub use error::ModelError;
pub use failure::{
    AttemptFailureSummary, FailureOrigin, FailureReason, FailureType, Metadata, FROM_TRACE_MESSAGE,
};
pub use job::JobSyncConfig;
pub use workspace::StandardWorkspace;

pub type Result<T> = std::result::Result<T, ModelError>;
