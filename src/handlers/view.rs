//! View and form handlers for the admin console

use crate::ConsoleServerHandler;
use crate::ui::{Form, View};
use crate::validation;
use mcp_attr::{Result as McpResult, bail_public};

impl ConsoleServerHandler {
    /// Renders one record read-only, with currency, dates and status badges formatted.
    pub async fn handle_view(&self, module: String, id: String) -> McpResult<String> {
        let id = validation::parse_record_id(&id)?;
        let collection = self.loaded_collection(&module).await?;

        let Some(record) = collection.get(id) else {
            bail_public!(
                _,
                "Record not found: {} #{} does not exist. Use list() to see available records.",
                collection.schema().name,
                id
            );
        };
        Ok(View::render(collection.schema(), record, &self.config.display).to_string())
    }

    /// Shows the form widgets, pre-populated when `id` names an existing record.
    pub async fn handle_form(&self, module: String, id: Option<String>) -> McpResult<String> {
        let id = match id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(validation::parse_record_id(raw)?),
            _ => None,
        };
        let collection = self.loaded_collection(&module).await?;

        let record = match id {
            Some(id) => {
                let Some(record) = collection.get(id) else {
                    bail_public!(
                        _,
                        "Record not found: {} #{} does not exist. Use list() to see available records.",
                        collection.schema().name,
                        id
                    );
                };
                Some(record)
            }
            None => None,
        };
        Ok(Form::new(collection.schema(), record).to_string())
    }
}
