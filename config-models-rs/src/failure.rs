//! Attempt failure records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModelError;

/// Metadata key set by the worker when a failure reason was built from a
/// connector's trace message rather than inferred by the platform
pub const FROM_TRACE_MESSAGE: &str = "from_trace_message";

/// Where in the sync pipeline a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureOrigin {
    Source,
    Destination,
    Replication,
    Persistence,
    Normalization,
    Dbt,
}

impl FailureOrigin {
    /// Lower-case wire value
    pub fn value(&self) -> &'static str {
        match self {
            FailureOrigin::Source => "source",
            FailureOrigin::Destination => "destination",
            FailureOrigin::Replication => "replication",
            FailureOrigin::Persistence => "persistence",
            FailureOrigin::Normalization => "normalization",
            FailureOrigin::Dbt => "dbt",
        }
    }
}

impl fmt::Display for FailureOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for FailureOrigin {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "source" => Ok(FailureOrigin::Source),
            "destination" => Ok(FailureOrigin::Destination),
            "replication" => Ok(FailureOrigin::Replication),
            "persistence" => Ok(FailureOrigin::Persistence),
            "normalization" => Ok(FailureOrigin::Normalization),
            "dbt" => Ok(FailureOrigin::Dbt),
            _ => Err(ModelError::unknown_variant("failure origin", s)),
        }
    }
}

/// Classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureType {
    ConfigError,
    SystemError,
    ManualCancellation,
}

impl FailureType {
    /// Lower-case wire value
    pub fn value(&self) -> &'static str {
        match self {
            FailureType::ConfigError => "config_error",
            FailureType::SystemError => "system_error",
            FailureType::ManualCancellation => "manual_cancellation",
        }
    }
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for FailureType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "config_error" => Ok(FailureType::ConfigError),
            "system_error" => Ok(FailureType::SystemError),
            "manual_cancellation" => Ok(FailureType::ManualCancellation),
            _ => Err(ModelError::unknown_variant("failure type", s)),
        }
    }
}

/// Free-form properties attached to a failure reason
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(flatten)]
    pub additional_properties: serde_json::Map<String, Value>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_additional_property<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.additional_properties.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.additional_properties.get(key)
    }

    /// True only when the trace message flag is present and set to boolean `true`
    pub fn is_from_trace_message(&self) -> bool {
        matches!(self.get(FROM_TRACE_MESSAGE), Some(Value::Bool(true)))
    }
}

/// A single cause of an attempt failure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureReason {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_origin: Option<FailureOrigin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_type: Option<FailureType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
    /// Epoch milliseconds
    #[serde(default)]
    pub timestamp: i64,
}

impl FailureReason {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure_origin(mut self, origin: FailureOrigin) -> Self {
        self.failure_origin = Some(origin);
        self
    }

    pub fn with_failure_type(mut self, failure_type: FailureType) -> Self {
        self.failure_type = Some(failure_type);
        self
    }

    pub fn with_internal_message(mut self, message: impl Into<String>) -> Self {
        self.internal_message = Some(message.into());
        self
    }

    pub fn with_external_message(mut self, message: impl Into<String>) -> Self {
        self.external_message = Some(message.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_stacktrace(mut self, stacktrace: impl Into<String>) -> Self {
        self.stacktrace = Some(stacktrace.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = Some(retryable);
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whether the reason was derived from a connector trace message
    pub fn is_from_trace_message(&self) -> bool {
        self.metadata
            .as_ref()
            .map_or(false, Metadata::is_from_trace_message)
    }
}

/// Ordered list of failure reasons recorded for one attempt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptFailureSummary {
    #[serde(default)]
    pub failures: Vec<FailureReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_success: Option<bool>,
}

impl AttemptFailureSummary {
    pub fn new(failures: Vec<FailureReason>) -> Self {
        Self {
            failures,
            partial_success: None,
        }
    }

    pub fn with_partial_success(mut self, partial_success: bool) -> Self {
        self.partial_success = Some(partial_success);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trace_message_flag() {
        let flagged = FailureReason::new()
            .with_metadata(Metadata::new().with_additional_property(FROM_TRACE_MESSAGE, true));
        let unflagged = FailureReason::new();
        let disabled = FailureReason::new()
            .with_metadata(Metadata::new().with_additional_property(FROM_TRACE_MESSAGE, false));
        let stringly = FailureReason::new()
            .with_metadata(Metadata::new().with_additional_property(FROM_TRACE_MESSAGE, "true"));

        assert!(flagged.is_from_trace_message());
        assert!(!unflagged.is_from_trace_message());
        assert!(!disabled.is_from_trace_message());
        assert!(!stringly.is_from_trace_message());
    }

    #[test]
    fn test_failure_reason_from_config_store_json() {
        let doc = json!({
            "failureOrigin": "destination",
            "failureType": "config_error",
            "internalMessage": "Invalid credentials",
            "metadata": { "from_trace_message": true, "attempt_number": 2 },
            "retryable": false,
            "timestamp": 1656093600000i64
        });

        let reason: FailureReason = serde_json::from_value(doc).unwrap();

        assert_eq!(reason.failure_origin, Some(FailureOrigin::Destination));
        assert_eq!(reason.failure_type, Some(FailureType::ConfigError));
        assert_eq!(reason.internal_message.as_deref(), Some("Invalid credentials"));
        assert!(reason.is_from_trace_message());
        assert_eq!(
            reason.metadata.as_ref().and_then(|m| m.get("attempt_number")),
            Some(&json!(2))
        );
    }

    #[test]
    fn test_enum_values_are_lower_case() {
        assert_eq!(FailureOrigin::Replication.to_string(), "replication");
        assert_eq!(FailureType::ManualCancellation.to_string(), "manual_cancellation");
        assert_eq!("SOURCE".parse::<FailureOrigin>().unwrap(), FailureOrigin::Source);
        assert!("platform".parse::<FailureOrigin>().is_err());
    }

    #[test]
    fn test_summary_preserves_order() {
        let summary: AttemptFailureSummary = serde_json::from_value(json!({
            "failures": [
                { "failureOrigin": "source", "timestamp": 1 },
                { "failureOrigin": "replication", "timestamp": 2 }
            ],
            "partialSuccess": true
        }))
        .unwrap();

        let origins: Vec<_> = summary.failures.iter().map(|f| f.failure_origin).collect();
        assert_eq!(
            origins,
            vec![Some(FailureOrigin::Source), Some(FailureOrigin::Replication)]
        );
        assert_eq!(summary.partial_success, Some(true));
    }
}
