//! Modules handler for the admin console

use crate::ConsoleServerHandler;
use crate::formatting::{self, ModuleSummary};
use mcp_attr::Result as McpResult;

impl ConsoleServerHandler {
    /// Describes every module without loading any of them.
    pub async fn handle_modules(&self) -> McpResult<String> {
        let mut guards = Vec::with_capacity(self.modules.len());
        for module in &self.modules {
            guards.push(module.collection.lock().await);
        }

        let summaries: Vec<ModuleSummary<'_>> = guards
            .iter()
            .map(|c| ModuleSummary {
                schema: c.schema(),
                backend: c.backend().kind(),
                count: c.is_loaded().then(|| c.len()),
            })
            .collect();

        Ok(formatting::format_modules(&summaries))
    }
}
