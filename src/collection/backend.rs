use super::rest::RestBackend;
use crate::error::ConsoleResult;
use crate::records::{Record, RecordId, RecordSchema};
use crate::storage::Storage;

/// A mutation about to be made to a collection
#[derive(Debug, Clone, Copy)]
pub enum Change<'a> {
    /// `with_id` is false when the backend assigns the id
    Created { record: &'a Record, with_id: bool },
    Updated(&'a Record),
    Deleted(RecordId),
}

impl Change<'_> {
    /// Commit message describing the change
    pub fn describe(&self, module: &str) -> String {
        match self {
            Change::Created { record, .. } => format!("Create {} #{}", module, record.id),
            Change::Updated(record) => format!("Update {} #{}", module, record.id),
            Change::Deleted(id) => format!("Delete {} #{}", module, id),
        }
    }
}

/// Where a collection's records live
pub enum Backend {
    /// Sample data held in memory only
    Memory { seed: Vec<Record> },
    File(Storage),
    Rest(RestBackend),
}

impl Backend {
    pub fn kind(&self) -> &'static str {
        match self {
            Backend::Memory { .. } => "memory",
            Backend::File(_) => "file",
            Backend::Rest(_) => "rest",
        }
    }

    /// Fetch the whole collection
    pub async fn load(&self, schema: &RecordSchema) -> ConsoleResult<Vec<Record>> {
        match self {
            Backend::Memory { seed } => Ok(seed.clone()),
            Backend::File(storage) => Ok(storage.load(schema)?),
            Backend::Rest(rest) => rest.fetch_all(schema).await,
        }
    }

    /// Persist one change
    ///
    /// `snapshot` is the full collection as it will be after the change; file
    /// storage writes it whole, the REST backend sends only the change.
    /// Returns the backend's version of the affected record when it has one.
    pub async fn apply(
        &self,
        schema: &RecordSchema,
        change: Change<'_>,
        snapshot: &[Record],
    ) -> ConsoleResult<Option<Record>> {
        match self {
            Backend::Memory { .. } => Ok(None),
            Backend::File(storage) => {
                storage.save_with_message(schema, snapshot, &change.describe(&schema.name))?;
                Ok(None)
            }
            Backend::Rest(rest) => match change {
                Change::Created { record, with_id } => rest.insert(schema, record, with_id).await,
                Change::Updated(record) => rest.replace(schema, record).await,
                Change::Deleted(id) => {
                    rest.remove(schema, id).await?;
                    Ok(None)
                }
            },
        }
    }

    /// Flush anything pending before the process exits
    pub fn shutdown(&self) -> anyhow::Result<()> {
        match self {
            Backend::File(storage) => storage.shutdown(),
            Backend::Memory { .. } | Backend::Rest(_) => Ok(()),
        }
    }
}
