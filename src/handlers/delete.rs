//! Delete and refresh handlers for the admin console

use crate::ConsoleServerHandler;
use crate::validation::{self, console_error};
use mcp_attr::Result as McpResult;

impl ConsoleServerHandler {
    /// Removes one record from the module and its backend.
    pub async fn handle_delete(&self, module: String, id: String) -> McpResult<String> {
        let id = validation::parse_record_id(&id)?;
        let mut collection = self.loaded_collection(&module).await?;

        collection.delete(id).await.map_err(console_error)?;
        Ok(format!(
            "Deleted {} #{} ({} record(s) left)",
            collection.schema().name,
            id,
            collection.len()
        ))
    }

    /// Fetches the module again from its backend.
    pub async fn handle_refresh(&self, module: String) -> McpResult<String> {
        let mut collection = self
            .collection(&module)
            .map_err(console_error)?
            .lock()
            .await;

        let count = collection.refresh().await.map_err(console_error)?;
        Ok(format!(
            "Loaded {} record(s) of {} from {} backend",
            count,
            collection.schema().name,
            collection.backend().kind()
        ))
    }
}
