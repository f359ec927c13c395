use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Workspace owning a connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardWorkspace {
    pub workspace_id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tombstone: Option<bool>,
}

impl StandardWorkspace {
    pub fn new(workspace_id: Uuid) -> Self {
        Self {
            workspace_id,
            name: String::new(),
            slug: String::new(),
            customer_id: None,
            email: None,
            tombstone: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn is_tombstoned(&self) -> bool {
        self.tombstone.unwrap_or(false)
    }
}
