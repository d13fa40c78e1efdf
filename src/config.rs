//! Console configuration
//!
//! One TOML file describes the display locale, the REST API connection and
//! every module the console serves. Each module gets its settings passed in
//! explicitly at construction; nothing is read from globals afterwards.
//!
//! ```toml
//! [display]
//! currency_symbol = "$"
//!
//! [api]
//! base_url = "http://localhost:5000/api"
//! token = { kind = "env", var = "ADMIN_API_TOKEN" }
//!
//! [[modules]]
//! name = "billing"
//! backend = "rest"
//! resource = "billings"
//! ```

use crate::collection::IdStrategy;
use crate::error::{ConsoleError, ConsoleResult};
use crate::records::catalog::{BUILTIN_SCHEMAS, builtin_schema};
use crate::records::{FieldDescriptor, RecordSchema};
use crate::ui::DisplayLocale;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

/// Where the bearer token for API calls comes from
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenProvider {
    #[default]
    None,
    Static {
        value: String,
    },
    /// Read from an environment variable on every request
    Env {
        var: String,
    },
}

impl TokenProvider {
    /// Current token, if any
    pub fn resolve(&self) -> Option<String> {
        match self {
            TokenProvider::None => None,
            TokenProvider::Static { value } => Some(value.clone()),
            TokenProvider::Env { var } => std::env::var(var).ok().filter(|t| !t.is_empty()),
        }
    }
}

/// Connection settings shared by REST-backed modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub token: TokenProvider,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: TokenProvider::None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Storage behind one module's collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// In-memory sample data, lost on restart
    #[default]
    Memory,
    /// TOML file on disk, optionally committed to git
    File,
    /// Remote REST endpoint
    Rest,
}

/// Settings of one business module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Module name used in tool calls (e.g., "billing")
    pub name: String,
    /// Built-in schema to use; defaults to the module name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Custom field list, replacing the built-in schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldDescriptor>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_field: Option<String>,
    #[serde(default)]
    pub backend: BackendKind,
    /// REST resource path under the base URL; defaults to the module name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// Overrides `api.base_url` for this module
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Data file of a file-backed module; defaults to `<data_dir>/<name>.toml`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_strategy: Option<IdStrategy>,
    /// Seed memory-backed modules with the built-in sample data
    #[serde(default = "default_true")]
    pub sample_data: bool,
}

impl ModuleConfig {
    /// A memory-backed module using the built-in schema of the same name
    pub fn builtin(name: &str) -> Self {
        Self {
            name: name.to_string(),
            schema: None,
            title: None,
            fields: None,
            search_fields: Vec::new(),
            filter_fields: Vec::new(),
            id_field: None,
            backend: BackendKind::Memory,
            resource: None,
            base_url: None,
            path: None,
            id_strategy: None,
            sample_data: true,
        }
    }

    /// Resolve the module's record schema (custom fields or built-in)
    pub fn schema(&self) -> ConsoleResult<RecordSchema> {
        let mut schema = match &self.fields {
            Some(fields) => {
                RecordSchema::new(&self.name, &self.name, fields.clone())
            }
            None => {
                let schema_name = self.schema.as_deref().unwrap_or(&self.name);
                let mut schema = builtin_schema(schema_name).ok_or_else(|| {
                    ConsoleError::Config(format!(
                        "Module '{}' refers to unknown schema '{}'. Built-in schemas: {}",
                        self.name,
                        schema_name,
                        BUILTIN_SCHEMAS.join(", ")
                    ))
                })?;
                schema.name = self.name.clone();
                schema
            }
        };

        if let Some(title) = &self.title {
            schema.title = title.clone();
        }
        if let Some(id_field) = &self.id_field {
            schema = schema.with_id_field(id_field);
        }
        if !self.search_fields.is_empty() {
            schema.search_fields = self.search_fields.clone();
        }
        if !self.filter_fields.is_empty() {
            schema.filter_fields = self.filter_fields.clone();
        }

        schema.validate().map_err(ConsoleError::Config)?;
        Ok(schema)
    }

    /// Id assignment rule: server-side for REST modules, max+1 otherwise
    pub fn id_strategy(&self) -> IdStrategy {
        self.id_strategy.unwrap_or(match self.backend {
            BackendKind::Rest => IdStrategy::Server,
            BackendKind::Memory | BackendKind::File => IdStrategy::MaxPlusOne,
        })
    }

    /// Full collection URL of a REST-backed module
    pub fn endpoint(&self, api: &ApiConfig) -> String {
        let base = self.base_url.as_deref().unwrap_or(&api.base_url);
        let resource = self.resource.as_deref().unwrap_or(&self.name);
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            resource.trim_start_matches('/')
        )
    }

    /// Data file path of a file-backed module
    pub fn data_path(&self, data_dir: &Path) -> PathBuf {
        match &self.path {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => data_dir.join(p),
            None => data_dir.join(format!("{}.toml", self.name)),
        }
    }
}

/// Top-level console configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub display: DisplayLocale,
    #[serde(default)]
    pub api: ApiConfig,
    /// Base directory for file-backed modules; defaults to the config file's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

impl ConsoleConfig {
    /// Every built-in module, memory-backed with sample data
    pub fn builtin() -> Self {
        Self {
            modules: BUILTIN_SCHEMAS
                .iter()
                .map(|name| ModuleConfig::builtin(name))
                .collect(),
            ..Self::default()
        }
    }

    /// Check the display locale, module name uniqueness and that every schema resolves
    pub fn validate(&self) -> ConsoleResult<()> {
        self.display.validate().map_err(ConsoleError::Config)?;
        if self.api.timeout_secs == 0 {
            return Err(ConsoleError::Config(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }
        let mut names = HashSet::new();
        for module in &self.modules {
            if module.name.trim().is_empty() {
                return Err(ConsoleError::Config("Module with an empty name".to_string()));
            }
            if !names.insert(module.name.as_str()) {
                return Err(ConsoleError::Config(format!(
                    "Duplicate module '{}'",
                    module.name
                )));
            }
            module.schema()?;
        }
        Ok(())
    }
}

/// Load the configuration file
///
/// A missing file yields the built-in configuration, as does a file that
/// declares no modules.
pub fn load_config(path: impl AsRef<Path>) -> Result<ConsoleConfig> {
    let path = path.as_ref();
    let mut config = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        toml::from_str::<ConsoleConfig>(&content)
            .with_context(|| format!("failed to parse config '{}'", path.display()))?
    } else {
        ConsoleConfig::default()
    };

    if config.modules.is_empty() {
        config.modules = ConsoleConfig::builtin().modules;
    }
    if config.data_dir.is_none() {
        config.data_dir = path.parent().map(Path::to_path_buf);
    }

    config.validate()?;
    Ok(config)
}
