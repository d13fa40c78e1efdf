//! Update handler for the admin console

use crate::ConsoleServerHandler;
use crate::error::ConsoleError;
use crate::formatting;
use crate::ui::Form;
use crate::validation::{self, console_error};
use mcp_attr::{Result as McpResult, bail_public};

impl ConsoleServerHandler {
    /// **Edit**: Opens the record's form pre-populated, applies the given fields and submits.
    /// Fields not mentioned keep their values; `field=` clears an optional field.
    /// **Note**: Record IDs are immutable.
    pub async fn handle_update(
        &self,
        module: String,
        id: String,
        fields: Vec<String>,
    ) -> McpResult<String> {
        let id = validation::parse_record_id(&id)?;
        let mut collection = self.loaded_collection(&module).await?;
        let schema = collection.schema().clone();

        let Some(record) = collection.get(id).cloned() else {
            bail_public!(
                _,
                "Record not found: {} #{} does not exist. Use list() to see available records.",
                schema.name,
                id
            );
        };

        let mut form = Form::new(&schema, Some(&record));
        validation::fill_form(&mut form, &fields)?;
        let changes = form
            .submit()
            .map_err(|e| console_error(ConsoleError::Validation(e)))?;

        let record = collection.update(id, &changes).await.map_err(console_error)?;
        Ok(formatting::format_saved(&schema, &record, false))
    }
}
