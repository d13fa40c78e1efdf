//! Create handler for the admin console

use crate::ConsoleServerHandler;
use crate::error::ConsoleError;
use crate::formatting;
use crate::ui::Form;
use crate::validation::{self, console_error};
use mcp_attr::{Result as McpResult, bail_public};

impl ConsoleServerHandler {
    /// Fills an empty form from `field=value` pairs and submits it.
    /// Nothing is saved when a required field is missing or a value does not parse.
    pub async fn handle_create(&self, module: String, fields: Vec<String>) -> McpResult<String> {
        if fields.is_empty() {
            bail_public!(
                _,
                "No fields given. Use form(module) to see the fields of '{}'.",
                module
            );
        }

        let mut collection = self.loaded_collection(&module).await?;
        let schema = collection.schema().clone();

        let mut form = Form::new(&schema, None);
        validation::fill_form(&mut form, &fields)?;
        let changes = form
            .submit()
            .map_err(|e| console_error(ConsoleError::Validation(e)))?;

        let record = collection.create(&changes).await.map_err(console_error)?;
        Ok(formatting::format_saved(&schema, &record, true))
    }
}
