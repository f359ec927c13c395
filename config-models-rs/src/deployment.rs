use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// How the platform instance emitting reports is deployed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeploymentMode {
    /// Self-hosted open source deployment
    #[default]
    Oss,
    /// Hosted cloud deployment
    Cloud,
}

impl DeploymentMode {
    /// The enum name as it appears in configuration and report metadata
    pub fn name(&self) -> &'static str {
        match self {
            DeploymentMode::Oss => "OSS",
            DeploymentMode::Cloud => "CLOUD",
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeploymentMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OSS" => Ok(DeploymentMode::Oss),
            "CLOUD" => Ok(DeploymentMode::Cloud),
            _ => Err(ModelError::unknown_variant("deployment mode", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("oss".parse::<DeploymentMode>().unwrap(), DeploymentMode::Oss);
        assert_eq!(" Cloud ".parse::<DeploymentMode>().unwrap(), DeploymentMode::Cloud);
        assert!("hybrid".parse::<DeploymentMode>().is_err());
    }

    #[test]
    fn test_name_is_upper_case() {
        assert_eq!(DeploymentMode::Oss.to_string(), "OSS");
        assert_eq!(serde_json::to_string(&DeploymentMode::Cloud).unwrap(), "\"CLOUD\"");
    }
}
