//! Links into the web app.

use uuid::Uuid;

/// Builds user-facing URLs for platform resources
#[cfg_attr(test, mockall::automock)]
pub trait UrlHelper: Send + Sync {
    fn connection_url(&self, workspace_id: Uuid, connection_id: Uuid) -> String;
}

/// [`UrlHelper`] rooted at the configured web app URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebUrlHelper {
    webapp_url: String,
}

impl WebUrlHelper {
    pub fn new(webapp_url: impl Into<String>) -> Self {
        Self {
            webapp_url: webapp_url.into(),
        }
    }

    /// The web app URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.webapp_url
            .strip_suffix('/')
            .unwrap_or(&self.webapp_url)
    }

    pub fn workspace_url(&self, workspace_id: Uuid) -> String {
        format!("{}/workspaces/{}", self.base_url(), workspace_id)
    }
}

impl UrlHelper for WebUrlHelper {
    fn connection_url(&self, workspace_id: Uuid, connection_id: Uuid) -> String {
        format!("{}/connections/{}", self.workspace_url(workspace_id), connection_id)
    }
}
