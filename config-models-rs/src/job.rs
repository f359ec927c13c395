use serde::{Deserialize, Serialize};

/// Connector images a sync job ran with.
///
/// These are the images in use at failure time, which may differ from the
/// definition's current image if the connector was upgraded since.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSyncConfig {
    pub source_docker_image: String,
    pub destination_docker_image: String,
}

impl JobSyncConfig {
    pub fn new(source_docker_image: impl Into<String>, destination_docker_image: impl Into<String>) -> Self {
        Self {
            source_docker_image: source_docker_image.into(),
            destination_docker_image: destination_docker_image.into(),
        }
    }
}
