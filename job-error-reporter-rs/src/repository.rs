//! Lookup interface onto the platform's config store.

use config_models::{StandardDestinationDefinition, StandardSourceDefinition, StandardWorkspace};
use uuid::Uuid;

use crate::error::Result;

/// Resolves connector definitions and workspaces for a connection.
///
/// Implementations return [`ReporterError::Lookup`](crate::ReporterError::Lookup)
/// when the connection or the related record cannot be found.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigRepository: Send + Sync {
    fn get_source_definition_from_connection(
        &self,
        connection_id: Uuid,
    ) -> Result<StandardSourceDefinition>;

    fn get_destination_definition_from_connection(
        &self,
        connection_id: Uuid,
    ) -> Result<StandardDestinationDefinition>;

    fn get_standard_workspace_from_connection(
        &self,
        connection_id: Uuid,
        include_tombstone: bool,
    ) -> Result<StandardWorkspace>;
}
