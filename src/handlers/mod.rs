//! MCP tool handlers for the admin console
//!
//! Each handler is in a separate file. Handlers lock one module's collection,
//! make sure it is loaded, and turn the result into text.

pub mod create;
pub mod delete;
pub mod export;
pub mod list;
pub mod modules;
pub mod update;
pub mod view;

use crate::ConsoleServerHandler;
use crate::collection::Collection;
use crate::validation::console_error;
use mcp_attr::Result as McpResult;
use tokio::sync::MutexGuard;

impl ConsoleServerHandler {
    /// Lock a module's collection, fetching it on first access
    pub(crate) async fn loaded_collection(&self, module: &str) -> McpResult<MutexGuard<'_, Collection>> {
        let mut collection = self
            .collection(module)
            .map_err(console_error)?
            .lock()
            .await;
        collection.ensure_loaded().await.map_err(console_error)?;
        Ok(collection)
    }
}
