//! Admin Console MCP Server Library
//!
//! This library provides a Model Context Protocol (MCP) server for schema-driven
//! administration of business records (billing entries, bank documents, tenders,
//! employees and so on). Every module is the same generic collection controller
//! instantiated with its own field schema and backend.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **MCP Layer**: `ConsoleServerHandler` - Handles MCP protocol communication
//! - **Domain Layer**: `records`, `ui` and `collection` modules - schemas, filtering,
//!   form/view/table rendering and the collection controller
//! - **Persistence Layer**: in-memory sample data, TOML files with optional Git
//!   sync, or a REST API
//!
//! # Example
//!
//! ```no_run
//! use admin_console::{ConsoleServerHandler, load_config};
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = load_config("console.toml")?;
//!     let handler = ConsoleServerHandler::new(config, false)?;
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

pub mod collection;
pub mod config;
pub mod error;
pub mod export;
mod formatting;
mod git_ops;
pub mod handlers;
pub mod logging;
pub mod records;
mod storage;
pub mod ui;
mod validation;

use anyhow::{Context, Result};
use mcp_attr::Result as McpResult;
use mcp_attr::server::{McpServer, mcp_server};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub use collection::{Backend, Collection, IdStrategy, OpState, RestBackend};
pub use config::{ApiConfig, BackendKind, ConsoleConfig, ModuleConfig, TokenProvider, load_config};
pub use error::{ConsoleError, ConsoleResult};
pub use records::{FieldChanges, FieldDescriptor, FieldKind, FieldValue, Record, RecordFilter, RecordId, RecordSchema};
pub use storage::Storage;
pub use ui::{DisplayLocale, Form, FormErrors, Table, View};

use records::catalog::sample_records_of;

/// One configured module and its collection
pub(crate) struct ModuleEntry {
    pub(crate) name: String,
    pub(crate) collection: Mutex<Collection>,
}

/// MCP Server handler for the admin console
///
/// Owns one collection per configured module. Collections load lazily on
/// first access and are locked independently, so a slow REST module does not
/// block the others.
pub struct ConsoleServerHandler {
    pub(crate) modules: Vec<ModuleEntry>,
    pub(crate) config: ConsoleConfig,
}

impl ConsoleServerHandler {
    /// Create a handler for every module of the configuration
    ///
    /// # Arguments
    /// * `config` - Loaded console configuration
    /// * `sync_git` - Commit every change of file-backed modules to Git
    pub fn new(config: ConsoleConfig, sync_git: bool) -> Result<Self> {
        config.validate()?;
        let data_dir = config.data_dir.clone().unwrap_or_else(|| PathBuf::from("."));

        let mut modules = Vec::with_capacity(config.modules.len());
        for module in &config.modules {
            let collection = build_collection(module, &config, &data_dir, sync_git)
                .with_context(|| format!("failed to set up module '{}'", module.name))?;
            info!(
                module = %module.name,
                backend = collection.backend().kind(),
                "module ready"
            );
            modules.push(ModuleEntry {
                name: module.name.clone(),
                collection: Mutex::new(collection),
            });
        }

        Ok(Self { modules, config })
    }

    /// Handler serving every built-in module from memory with sample data
    pub fn builtin() -> Result<Self> {
        Self::new(ConsoleConfig::builtin(), false)
    }

    /// Module names in configuration order
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name.as_str()).collect()
    }

    /// Look up a module's collection by name
    pub(crate) fn collection(&self, name: &str) -> ConsoleResult<&Mutex<Collection>> {
        let name = name.trim();
        self.modules
            .iter()
            .find(|m| m.name == name)
            .map(|m| &m.collection)
            .ok_or_else(|| ConsoleError::UnknownModule {
                name: name.to_string(),
                available: self.module_names().join(", "),
            })
    }
}

/// Build the collection of one module with its configured backend
fn build_collection(
    module: &ModuleConfig,
    config: &ConsoleConfig,
    data_dir: &std::path::Path,
    sync_git: bool,
) -> ConsoleResult<Collection> {
    let schema = module.schema()?;
    let backend = match module.backend {
        BackendKind::Memory => {
            let seed = if module.sample_data && module.fields.is_none() {
                let catalog_name = module.schema.as_deref().unwrap_or(&module.name);
                sample_records_of(catalog_name, &schema)
            } else {
                Vec::new()
            };
            Backend::Memory { seed }
        }
        BackendKind::File => Backend::File(Storage::new(module.data_path(data_dir), sync_git)),
        BackendKind::Rest => Backend::Rest(RestBackend::new(module.endpoint(&config.api), &config.api)?),
    };
    Collection::new(schema, backend, module.id_strategy())
}

impl Drop for ConsoleServerHandler {
    fn drop(&mut self) {
        // File modules push their git history here
        for module in &mut self.modules {
            if let Err(e) = module.collection.get_mut().shutdown() {
                warn!(module = %module.name, error = %e, "shutdown git sync failed");
            }
        }
    }
}

/// Admin console for business records: bank documents, billing, tenders,
/// employees, attendance and inventory.
///
/// Every module works the same way: a table of records with keyword search and
/// exact-match filters, a read-only view of one record, and a form to create or
/// edit records. Required fields must be filled before a form is accepted.
///
/// Key concepts:
/// - **module**: one record collection (e.g., "billing"); call `modules` to see them
/// - **fields**: `field=value` strings (e.g., "status=Paid"); empty value clears the field
/// - **filters**: `field=value` exact matches on filterable fields
///
/// Record IDs are numbers: 1, 2, 3 ("#3" is accepted too)
#[mcp_server]
impl McpServer for ConsoleServerHandler {
    /// **Discover**: List modules with their fields, search fields and filterable fields.
    /// **Workflow**: Start here to learn module names and field names.
    #[tool]
    async fn modules(&self) -> McpResult<String> {
        self.handle_modules().await
    }

    /// **Browse**: Table of a module's records, narrowed by keyword search and filters.
    /// **Use**: No search/filters=all records; search is case-insensitive over the search fields.
    #[tool]
    async fn list(
        &self,
        /// Module name (e.g., "billing")
        module: String,
        /// Keyword searched in the module's search fields (optional)
        search: Option<String>,
        /// Exact-match filters as field=value (e.g., ["status=Pending"]) (optional)
        filters: Option<Vec<String>>,
    ) -> McpResult<String> {
        self.handle_list(module, search, filters.unwrap_or_default())
            .await
    }

    /// **Inspect**: Read-only view of one record with formatted values and status badges.
    #[tool]
    async fn view(
        &self,
        /// Module name
        module: String,
        /// Record ID (e.g., "3")
        id: String,
    ) -> McpResult<String> {
        self.handle_view(module, id).await
    }

    /// **Prepare**: Show the form of a module, empty or pre-populated from a record.
    /// **Tip**: Shows each field's input type, options and whether it is required (*).
    #[tool]
    async fn form(
        &self,
        /// Module name
        module: String,
        /// Record ID to edit; omit for a new record (optional)
        id: Option<String>,
    ) -> McpResult<String> {
        self.handle_form(module, id).await
    }

    /// **Create**: Submit a new record. Missing required fields reject the submission.
    #[tool]
    async fn create(
        &self,
        /// Module name
        module: String,
        /// Field values as field=value (e.g., ["customer=Acme", "amount=1200", "status=Pending"])
        fields: Vec<String>,
    ) -> McpResult<String> {
        self.handle_create(module, fields).await
    }

    /// **Edit**: Change fields of an existing record; other fields keep their values.
    /// **Tip**: Use field= (empty value) to clear an optional field.
    #[tool]
    async fn update(
        &self,
        /// Module name
        module: String,
        /// Record ID to update
        id: String,
        /// Changed field values as field=value
        fields: Vec<String>,
    ) -> McpResult<String> {
        self.handle_update(module, id, fields).await
    }

    /// **Delete**: Remove a record permanently.
    #[tool]
    async fn delete(
        &self,
        /// Module name
        module: String,
        /// Record ID to delete
        id: String,
    ) -> McpResult<String> {
        self.handle_delete(module, id).await
    }

    /// **Reload**: Fetch a module's records again from its backend.
    #[tool]
    async fn refresh(
        &self,
        /// Module name
        module: String,
    ) -> McpResult<String> {
        self.handle_refresh(module).await
    }

    /// **Export**: CSV of the records currently matching search and filters.
    /// **Tip**: Set data_uri=true for a data:text/csv download link.
    #[tool]
    async fn export_csv(
        &self,
        /// Module name
        module: String,
        /// Keyword search, as in list (optional)
        search: Option<String>,
        /// Exact-match filters as field=value (optional)
        filters: Option<Vec<String>>,
        /// Return a percent-encoded data URI instead of raw CSV (optional)
        data_uri: Option<bool>,
    ) -> McpResult<String> {
        self.handle_export_csv(
            module,
            search,
            filters.unwrap_or_default(),
            data_uri.unwrap_or(false),
        )
        .await
    }
}
