//! File storage for file-backed modules
//!
//! Each module keeps its records in one TOML file (`[[records]]` tables
//! holding the same field names as the REST wire format). Loading goes
//! through the schema decoder like any other boundary.

use crate::git_ops::GitSync;
use crate::records::{Record, RecordSchema};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Current version of the data file layout
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    format_version: u32,
    #[serde(default)]
    records: Vec<Map<String, Value>>,
}

pub struct Storage {
    file_path: PathBuf,
    git: Option<GitSync>,
}

impl Storage {
    /// Create a storage for the given file; `sync_git` commits every save
    pub fn new(file_path: impl AsRef<Path>, sync_git: bool) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let git = if sync_git {
            let found = GitSync::discover(&file_path);
            if found.is_none() {
                warn!(path = %file_path.display(), "git sync requested but file is not in a git repository");
            }
            found
        } else {
            None
        };
        Self { file_path, git }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Load all records; a missing file is an empty collection
    pub fn load(&self, schema: &RecordSchema) -> Result<Vec<Record>> {
        if !self.file_path.exists() {
            debug!(path = %self.file_path.display(), "data file missing, starting empty");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("failed to read '{}'", self.file_path.display()))?;
        let file: StoreFile = toml::from_str(&content)
            .with_context(|| format!("failed to parse '{}'", self.file_path.display()))?;
        if file.format_version > FORMAT_VERSION {
            anyhow::bail!(
                "'{}' has format version {}, newer than supported version {}",
                self.file_path.display(),
                file.format_version,
                FORMAT_VERSION
            );
        }

        let rows: Vec<Value> = file.records.into_iter().map(Value::Object).collect();
        let (records, skipped) = schema.decode_all(&rows);
        if skipped > 0 {
            warn!(path = %self.file_path.display(), skipped, "skipped unreadable rows");
        }
        Ok(records)
    }

    /// Write all records and, with git sync, commit them with `message`
    pub fn save_with_message(
        &self,
        schema: &RecordSchema,
        records: &[Record],
        message: &str,
    ) -> Result<()> {
        let file = StoreFile {
            format_version: FORMAT_VERSION,
            records: records.iter().map(|r| schema.encode(r)).collect(),
        };
        let content = toml::to_string_pretty(&file)
            .with_context(|| format!("failed to serialize {} records", schema.name))?;

        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create '{}'", parent.display()))?;
        }
        fs::write(&self.file_path, content)
            .with_context(|| format!("failed to write '{}'", self.file_path.display()))?;

        if let Some(git) = &self.git {
            git.commit_change(message)
                .with_context(|| format!("failed to commit '{}'", message))?;
        }
        Ok(())
    }

    /// Push committed changes on shutdown when git sync is enabled
    pub fn shutdown(&self) -> Result<()> {
        match &self.git {
            Some(git) => {
                info!(path = %self.file_path.display(), "pushing data file changes");
                git.push_current_branch()
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::catalog::{builtin_schema, sample_records};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("billing.toml"), false);
        let schema = builtin_schema("billing").unwrap();
        assert!(storage.load(&schema).unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_records() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("nested").join("billing.toml"), false);
        let schema = builtin_schema("billing").unwrap();
        let records = sample_records(&schema);

        storage
            .save_with_message(&schema, &records, "Save billing")
            .unwrap();
        let loaded = storage.load(&schema).unwrap();
        assert_eq!(loaded, records);

        let content = fs::read_to_string(storage.file_path()).unwrap();
        assert!(content.contains("format_version = 1"));
        assert!(content.contains("[[records]]"));
    }

    #[test]
    fn test_rejects_newer_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("billing.toml");
        fs::write(&path, "format_version = 99\n").unwrap();
        let storage = Storage::new(&path, false);
        let schema = builtin_schema("billing").unwrap();
        let err = storage.load(&schema).unwrap_err();
        assert!(err.to_string().contains("newer than supported"));
    }
}
