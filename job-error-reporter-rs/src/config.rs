//! Reporter configuration
//!
//! Values come from the process environment (optionally seeded from a `.env`
//! file) through the `config` crate. Keys are the lower-cased environment
//! variable names, e.g. `JOB_ERROR_REPORTING_STRATEGY` becomes
//! `job_error_reporting_strategy`.

use std::fmt;
use std::str::FromStr;

use config_models::DeploymentMode;
use serde::{Deserialize, Serialize};

use crate::error::{ReporterError, Result};

pub const DEFAULT_AIRBYTE_VERSION: &str = "dev";
pub const DEFAULT_WEBAPP_URL: &str = "http://localhost:8000";

/// Reads the process environment, after seeding it from `.env` when present.
///
/// A double underscore nests keys, so `LOGGING__LEVEL` becomes `logging.level`.
pub fn load_environment() -> Result<config::Config> {
    dotenv::dotenv().ok();

    let cfg = config::Config::builder()
        .add_source(config::Environment::default().separator("__"))
        .build()?;
    Ok(cfg)
}

/// Which reporting client receives job failure reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobErrorReportingStrategy {
    #[default]
    Logging,
    Sentry,
}

impl fmt::Display for JobErrorReportingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobErrorReportingStrategy::Logging => write!(f, "logging"),
            JobErrorReportingStrategy::Sentry => write!(f, "sentry"),
        }
    }
}

impl FromStr for JobErrorReportingStrategy {
    type Err = ReporterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "logging" => Ok(JobErrorReportingStrategy::Logging),
            "sentry" => Ok(JobErrorReportingStrategy::Sentry),
            other => Err(ReporterError::configuration(format!(
                "Unknown job error reporting strategy: {}",
                other
            ))),
        }
    }
}

/// Settings the reporter and its clients are constructed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobErrorReportingConfig {
    /// Embedded verbatim into every report
    pub deployment_mode: DeploymentMode,
    /// Platform version, embedded verbatim into every report
    pub airbyte_version: String,
    /// Base URL of the web app, used to build connection links
    pub webapp_url: String,
    pub strategy: JobErrorReportingStrategy,
    /// Required when `strategy` is `Sentry`
    pub sentry_dsn: Option<String>,
}

impl Default for JobErrorReportingConfig {
    fn default() -> Self {
        Self {
            deployment_mode: DeploymentMode::default(),
            airbyte_version: DEFAULT_AIRBYTE_VERSION.to_string(),
            webapp_url: DEFAULT_WEBAPP_URL.to_string(),
            strategy: JobErrorReportingStrategy::default(),
            sentry_dsn: None,
        }
    }
}

impl JobErrorReportingConfig {
    /// Loads configuration from the environment
    pub fn from_env() -> Result<Self> {
        Self::try_from(load_environment()?)
    }

    /// Checks settings that only make sense together
    pub fn validate(&self) -> Result<()> {
        if self.strategy == JobErrorReportingStrategy::Sentry
            && self.sentry_dsn.as_deref().map_or(true, |dsn| dsn.trim().is_empty())
        {
            return Err(ReporterError::configuration(
                "JOB_ERROR_REPORTING_SENTRY_DSN must be set when the sentry strategy is selected",
            ));
        }
        Ok(())
    }
}

impl TryFrom<config::Config> for JobErrorReportingConfig {
    type Error = ReporterError;

    fn try_from(cfg: config::Config) -> Result<Self> {
        // Start with defaults and override from config where present.
        let mut base = JobErrorReportingConfig::default();

        if let Ok(mode) = cfg.get::<String>("deployment_mode") {
            base.deployment_mode = mode.parse()?;
        }
        if let Ok(version) = cfg.get::<String>("airbyte_version") {
            base.airbyte_version = version;
        }
        if let Ok(url) = cfg.get::<String>("webapp_url") {
            base.webapp_url = url;
        }
        if let Ok(strategy) = cfg.get::<String>("job_error_reporting_strategy") {
            base.strategy = strategy.parse()?;
        }
        if let Ok(dsn) = cfg.get::<String>("job_error_reporting_sentry_dsn") {
            if !dsn.trim().is_empty() {
                base.sentry_dsn = Some(dsn);
            }
        }

        base.validate()?;
        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(pairs: &[(&str, &str)]) -> config::Config {
        let mut builder = config::Config::builder();
        for (key, value) in pairs {
            builder = builder.set_override(*key, *value).unwrap();
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let cfg = JobErrorReportingConfig::try_from(config_with(&[])).unwrap();

        assert_eq!(cfg, JobErrorReportingConfig::default());
        assert_eq!(cfg.strategy, JobErrorReportingStrategy::Logging);
        assert_eq!(cfg.deployment_mode, DeploymentMode::Oss);
    }

    #[test]
    fn test_overrides() {
        let cfg = JobErrorReportingConfig::try_from(config_with(&[
            ("deployment_mode", "CLOUD"),
            ("airbyte_version", "0.39.1-alpha"),
            ("webapp_url", "https://cloud.example.com/"),
            ("job_error_reporting_strategy", "sentry"),
            ("job_error_reporting_sentry_dsn", "https://key@o1.ingest.sentry.io/42"),
        ]))
        .unwrap();

        assert_eq!(cfg.deployment_mode, DeploymentMode::Cloud);
        assert_eq!(cfg.airbyte_version, "0.39.1-alpha");
        assert_eq!(cfg.webapp_url, "https://cloud.example.com/");
        assert_eq!(cfg.strategy, JobErrorReportingStrategy::Sentry);
        assert_eq!(cfg.sentry_dsn.as_deref(), Some("https://key@o1.ingest.sentry.io/42"));
    }

    #[test]
    fn test_sentry_strategy_requires_dsn() {
        let err = JobErrorReportingConfig::try_from(config_with(&[
            ("job_error_reporting_strategy", "SENTRY"),
            ("job_error_reporting_sentry_dsn", "  "),
        ]))
        .unwrap_err();

        assert!(matches!(err, ReporterError::Configuration(_)));
    }

    #[test]
    fn test_logging_and_reporting_share_one_source() {
        let cfg = config_with(&[
            ("logging.level", "debug"),
            ("logging.json_format", "false"),
            ("airbyte_version", "0.40.3"),
        ]);

        let logging = crate::logging::LoggingConfig::try_from(cfg.clone()).unwrap();
        let reporting = JobErrorReportingConfig::try_from(cfg).unwrap();

        assert_eq!(logging.level, "debug");
        assert!(!logging.json_format);
        assert_eq!(reporting.airbyte_version, "0.40.3");
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        assert!(JobErrorReportingConfig::try_from(config_with(&[(
            "job_error_reporting_strategy",
            "datadog"
        )]))
        .is_err());
        assert!(JobErrorReportingConfig::try_from(config_with(&[("deployment_mode", "edge")])).is_err());
    }
}
