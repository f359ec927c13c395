//! Error types for the job error reporter
//!
//! Lookup and reporting-client failures are swallowed per failure reason by the
//! reporter; the remaining variants surface from construction and configuration.

use thiserror::Error;

/// Result type for job error reporter operations
pub type Result<T> = std::result::Result<T, ReporterError>;

/// Main error type for the job error reporter
#[derive(Error, Debug)]
pub enum ReporterError {
    /// A definition or workspace could not be resolved for a connection
    #[error("Lookup of {entity} for {id} failed: {message}")]
    Lookup {
        entity: &'static str,
        id: String,
        message: String,
    },

    /// The downstream reporting transport rejected or failed a report
    #[error("Reporting client error: {0}")]
    ReportingClient(String),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The Sentry DSN could not be interpreted
    #[error("Invalid Sentry DSN: {0}")]
    InvalidDsn(String),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Payload serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReporterError {
    /// Create a lookup error for the given entity kind and identifier
    pub fn lookup(entity: &'static str, id: impl ToString, message: impl Into<String>) -> Self {
        ReporterError::Lookup {
            entity,
            id: id.to_string(),
            message: message.into(),
        }
    }

    /// Create a reporting client error
    pub fn reporting_client(message: impl Into<String>) -> Self {
        ReporterError::ReportingClient(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        ReporterError::Configuration(message.into())
    }

    /// Create an invalid DSN error
    pub fn invalid_dsn(message: impl Into<String>) -> Self {
        ReporterError::InvalidDsn(message.into())
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, ReporterError::Lookup { .. })
    }
}

impl From<config::ConfigError> for ReporterError {
    fn from(err: config::ConfigError) -> Self {
        ReporterError::configuration(err.to_string())
    }
}

impl From<url::ParseError> for ReporterError {
    fn from(err: url::ParseError) -> Self {
        ReporterError::invalid_dsn(err.to_string())
    }
}

impl From<config_models::ModelError> for ReporterError {
    fn from(err: config_models::ModelError) -> Self {
        ReporterError::configuration(err.to_string())
    }
}
