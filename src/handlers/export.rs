//! CSV export handler for the admin console

use crate::ConsoleServerHandler;
use crate::export;
use crate::validation;
use mcp_attr::Result as McpResult;
use tracing::info;

impl ConsoleServerHandler {
    /// Exports the records matching search and filters, exactly as `list` shows them.
    pub async fn handle_export_csv(
        &self,
        module: String,
        search: Option<String>,
        filters: Vec<String>,
        data_uri: bool,
    ) -> McpResult<String> {
        let collection = self.loaded_collection(&module).await?;
        let filter = validation::parse_filter(collection.schema(), search.as_deref(), &filters)?;

        let records = collection.list(&filter);
        let csv = export::to_csv(collection.schema(), &records);
        info!(module = %collection.schema().name, rows = records.len(), "exported csv");

        if data_uri {
            Ok(export::csv_data_uri(&csv))
        } else {
            Ok(csv)
        }
    }
}
