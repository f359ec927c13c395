//! Source and destination connector definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ModelError;

/// Maturity of a connector definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStage {
    Alpha,
    Beta,
    GenerallyAvailable,
    Custom,
}

impl ReleaseStage {
    pub fn value(&self) -> &'static str {
        match self {
            ReleaseStage::Alpha => "alpha",
            ReleaseStage::Beta => "beta",
            ReleaseStage::GenerallyAvailable => "generally_available",
            ReleaseStage::Custom => "custom",
        }
    }
}

impl fmt::Display for ReleaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for ReleaseStage {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alpha" => Ok(ReleaseStage::Alpha),
            "beta" => Ok(ReleaseStage::Beta),
            "generally_available" => Ok(ReleaseStage::GenerallyAvailable),
            "custom" => Ok(ReleaseStage::Custom),
            _ => Err(ModelError::unknown_variant("release stage", s)),
        }
    }
}

/// Read access shared by source and destination definitions
pub trait ConnectorDefinition {
    fn definition_id(&self) -> Uuid;
    fn name(&self) -> &str;
    fn docker_repository(&self) -> &str;
    fn release_stage(&self) -> Option<ReleaseStage>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardSourceDefinition {
    pub source_definition_id: Uuid,
    pub name: String,
    pub docker_repository: String,
    #[serde(default)]
    pub docker_image_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_stage: Option<ReleaseStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl StandardSourceDefinition {
    pub fn new(source_definition_id: Uuid, name: impl Into<String>, docker_repository: impl Into<String>) -> Self {
        Self {
            source_definition_id,
            name: name.into(),
            docker_repository: docker_repository.into(),
            docker_image_tag: String::new(),
            documentation_url: None,
            release_stage: None,
            release_date: None,
        }
    }

    pub fn with_docker_image_tag(mut self, tag: impl Into<String>) -> Self {
        self.docker_image_tag = tag.into();
        self
    }

    pub fn with_release_stage(mut self, release_stage: ReleaseStage) -> Self {
        self.release_stage = Some(release_stage);
        self
    }
}

impl ConnectorDefinition for StandardSourceDefinition {
    fn definition_id(&self) -> Uuid {
        self.source_definition_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn docker_repository(&self) -> &str {
        &self.docker_repository
    }

    fn release_stage(&self) -> Option<ReleaseStage> {
        self.release_stage
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardDestinationDefinition {
    pub destination_definition_id: Uuid,
    pub name: String,
    pub docker_repository: String,
    #[serde(default)]
    pub docker_image_tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_stage: Option<ReleaseStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl StandardDestinationDefinition {
    pub fn new(
        destination_definition_id: Uuid,
        name: impl Into<String>,
        docker_repository: impl Into<String>,
    ) -> Self {
        Self {
            destination_definition_id,
            name: name.into(),
            docker_repository: docker_repository.into(),
            docker_image_tag: String::new(),
            documentation_url: None,
            release_stage: None,
            release_date: None,
        }
    }

    pub fn with_docker_image_tag(mut self, tag: impl Into<String>) -> Self {
        self.docker_image_tag = tag.into();
        self
    }

    pub fn with_release_stage(mut self, release_stage: ReleaseStage) -> Self {
        self.release_stage = Some(release_stage);
        self
    }
}

impl ConnectorDefinition for StandardDestinationDefinition {
    fn definition_id(&self) -> Uuid {
        self.destination_definition_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn docker_repository(&self) -> &str {
        &self.docker_repository
    }

    fn release_stage(&self) -> Option<ReleaseStage> {
        self.release_stage
    }
}
