//! List handler for the admin console

use crate::ConsoleServerHandler;
use crate::formatting;
use crate::validation;
use mcp_attr::Result as McpResult;

impl ConsoleServerHandler {
    /// Handles list/filter operations - applies search and filters and formats the table.
    pub async fn handle_list(
        &self,
        module: String,
        search: Option<String>,
        filters: Vec<String>,
    ) -> McpResult<String> {
        let collection = self.loaded_collection(&module).await?;
        let filter = validation::parse_filter(collection.schema(), search.as_deref(), &filters)?;

        let records = collection.list(&filter);
        Ok(formatting::format_records(
            collection.schema(),
            &records,
            collection.len(),
            &self.config.display,
        ))
    }
}
