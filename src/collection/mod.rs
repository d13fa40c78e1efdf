//! Generic collection controller
//!
//! One `Collection` owns the in-memory records of one module and exposes
//! list/create/update/delete on top of its backend. Every module is the same
//! controller instantiated with its own schema and backend.
//!
//! Mutations build the next state aside and only swap it in after the backend
//! accepted the change, so a failed operation leaves prior records untouched.
//! Concurrent edits are last-write-wins.

mod backend;
mod rest;

pub use backend::{Backend, Change};
pub use rest::RestBackend;

use crate::error::{ConsoleError, ConsoleResult};
use crate::records::{FieldChanges, Record, RecordFilter, RecordId, RecordSchema};
use crate::ui::FormErrors;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// How a new record gets its id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Largest existing id plus one (1 for an empty collection)
    MaxPlusOne,
    /// Current epoch milliseconds, bumped above the largest existing id
    Timestamp,
    /// Assigned by the REST backend in its create response
    Server,
}

/// Progress of the collection's asynchronous operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpState {
    Idle,
    Loading,
}

pub struct Collection {
    schema: RecordSchema,
    backend: Backend,
    id_strategy: IdStrategy,
    records: Vec<Record>,
    loaded: bool,
    state: OpState,
    last_error: Option<String>,
}

impl Collection {
    pub fn new(schema: RecordSchema, backend: Backend, id_strategy: IdStrategy) -> ConsoleResult<Self> {
        if id_strategy == IdStrategy::Server && !matches!(backend, Backend::Rest(_)) {
            return Err(ConsoleError::Config(format!(
                "Module '{}': server-assigned ids need a rest backend, not {}",
                schema.name,
                backend.kind()
            )));
        }
        schema.validate().map_err(ConsoleError::Config)?;

        Ok(Self {
            schema,
            backend,
            id_strategy,
            records: Vec::new(),
            loaded: false,
            state: OpState::Idle,
            last_error: None,
        })
    }

    /// A memory-backed collection seeded with the given records
    pub fn in_memory(schema: RecordSchema, seed: Vec<Record>) -> ConsoleResult<Self> {
        Self::new(schema, Backend::Memory { seed }, IdStrategy::MaxPlusOne)
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn id_strategy(&self) -> IdStrategy {
        self.id_strategy
    }

    pub fn state(&self) -> OpState {
        self.state
    }

    /// Display string of the last failed operation, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    fn begin(&mut self, op: &str) {
        self.state = OpState::Loading;
        debug!(module = %self.schema.name, op, "operation started");
    }

    fn finish<T>(&mut self, op: &str, result: ConsoleResult<T>) -> ConsoleResult<T> {
        self.state = OpState::Idle;
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => {
                warn!(module = %self.schema.name, op, error = %e, "operation failed");
                self.last_error = Some(e.to_string());
            }
        }
        result
    }

    /// Fetch the collection from the backend, replacing the cached records
    ///
    /// Memory collections only load their seed once; later refreshes keep
    /// the records created since.
    pub async fn refresh(&mut self) -> ConsoleResult<usize> {
        if self.loaded && matches!(self.backend, Backend::Memory { .. }) {
            return Ok(self.records.len());
        }

        self.begin("refresh");
        let result = self.backend.load(&self.schema).await;
        let result = match result {
            Ok(records) => {
                self.records = records;
                self.loaded = true;
                info!(module = %self.schema.name, count = self.records.len(), "collection loaded");
                Ok(self.records.len())
            }
            Err(e) => Err(e),
        };
        self.finish("refresh", result)
    }

    /// Fetch once, on first access
    pub async fn ensure_loaded(&mut self) -> ConsoleResult<()> {
        if !self.loaded {
            self.refresh().await?;
        }
        Ok(())
    }

    /// Records matching the filter, in collection order
    pub fn list(&self, filter: &RecordFilter) -> Vec<Record> {
        let mut records = self.records.clone();
        filter.apply(&self.schema, &mut records);
        records
    }

    /// Id for a new record; with `Server` ids this is a placeholder never sent
    fn next_id(&self) -> ConsoleResult<RecordId> {
        let max = self.records.iter().map(|r| r.id.0).max().unwrap_or(0);
        let exhausted = || {
            ConsoleError::InvalidInput(format!(
                "{} id space exhausted: highest id is #{}",
                self.schema.name, max
            ))
        };
        match self.id_strategy {
            IdStrategy::Server => Ok(RecordId(max.saturating_add(1))),
            IdStrategy::MaxPlusOne => max.checked_add(1).map(RecordId).ok_or_else(exhausted),
            IdStrategy::Timestamp => {
                let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
                let after_max = max.checked_add(1).ok_or_else(exhausted)?;
                Ok(RecordId(now.max(after_max)))
            }
        }
    }

    /// Reject changes naming fields the schema does not declare
    fn check_field_names(&self, changes: &FieldChanges) -> ConsoleResult<()> {
        let unknown: Vec<&str> = changes
            .names()
            .into_iter()
            .filter(|name| self.schema.field(name).is_none())
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(ConsoleError::InvalidInput(format!(
                "Unknown field(s) for {}: {}",
                self.schema.name,
                unknown.join(", ")
            )))
        }
    }

    fn check_required(&self, record: &Record) -> ConsoleResult<()> {
        let missing = self.schema.missing_required(record);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConsoleError::Validation(FormErrors {
                missing,
                invalid: Vec::new(),
            }))
        }
    }

    /// Create a record from the submitted fields and return it
    pub async fn create(&mut self, changes: &FieldChanges) -> ConsoleResult<Record> {
        self.check_field_names(changes)?;
        let record = Record::from_changes(self.next_id()?, changes);
        self.check_required(&record)?;

        self.begin("create");
        let result = self.persist_create(record).await;
        self.finish("create", result)
    }

    async fn persist_create(&mut self, record: Record) -> ConsoleResult<Record> {
        let server_ids = self.id_strategy == IdStrategy::Server;
        let mut next = self.records.clone();
        next.push(record.clone());

        let change = Change::Created {
            record: &record,
            with_id: !server_ids,
        };
        let returned = self.backend.apply(&self.schema, change, &next).await?;

        let created = match (server_ids, returned) {
            (_, Some(server_record)) => {
                let mut created = record;
                created.overlay(server_record);
                created
            }
            (false, None) => record,
            (true, None) => {
                // The server may have stored it; resync on next access
                self.loaded = false;
                return Err(ConsoleError::Decode {
                    module: self.schema.name.clone(),
                    message: "create response did not include the new record id".to_string(),
                });
            }
        };

        if self.get(created.id).is_some() {
            self.loaded = false;
            return Err(ConsoleError::Decode {
                module: self.schema.name.clone(),
                message: format!("backend returned existing id #{} for a new record", created.id),
            });
        }

        next.pop();
        next.push(created.clone());
        self.records = next;
        info!(module = %self.schema.name, id = %created.id, "record created");
        Ok(created)
    }

    /// Merge fields into the record with `id`; an absent id is `NotFound`
    pub async fn update(&mut self, id: RecordId, changes: &FieldChanges) -> ConsoleResult<Record> {
        self.check_field_names(changes)?;
        let index = self.index_of(id)?;
        let mut merged = self.records[index].clone();
        merged.apply(changes);
        self.check_required(&merged)?;

        self.begin("update");
        let result = self.persist_update(index, merged).await;
        self.finish("update", result)
    }

    async fn persist_update(&mut self, index: usize, merged: Record) -> ConsoleResult<Record> {
        let mut next = self.records.clone();
        next[index] = merged.clone();

        let returned = self
            .backend
            .apply(&self.schema, Change::Updated(&merged), &next)
            .await?;
        let updated = match returned {
            Some(server_record) if server_record.id == merged.id => {
                let mut updated = merged;
                updated.overlay(server_record);
                updated
            }
            _ => merged,
        };

        next[index] = updated.clone();
        self.records = next;
        info!(module = %self.schema.name, id = %updated.id, "record updated");
        Ok(updated)
    }

    /// Remove the record with `id`
    pub async fn delete(&mut self, id: RecordId) -> ConsoleResult<()> {
        let index = self.index_of(id)?;

        self.begin("delete");
        let mut next = self.records.clone();
        next.remove(index);
        let result = self
            .backend
            .apply(&self.schema, Change::Deleted(id), &next)
            .await
            .map(|_| ());
        if result.is_ok() {
            self.records = next;
            info!(module = %self.schema.name, %id, "record deleted");
        }
        self.finish("delete", result)
    }

    fn index_of(&self, id: RecordId) -> ConsoleResult<usize> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| ConsoleError::NotFound {
                module: self.schema.name.clone(),
                id,
            })
    }

    /// Flush the backend before exit
    pub fn shutdown(&self) -> anyhow::Result<()> {
        self.backend.shutdown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{BadgeTone, FieldDescriptor, FieldValue};

    fn schema() -> RecordSchema {
        RecordSchema::new(
            "billing",
            "Billing",
            vec![
                FieldDescriptor::text("name", "Name").required(),
                FieldDescriptor::status(
                    "status",
                    "Status",
                    &[("Paid", BadgeTone::Success), ("Pending", BadgeTone::Warning)],
                ),
            ],
        )
        .searchable(&["name"])
        .filterable(&["status"])
    }

    fn seeded() -> Collection {
        let seed = vec![
            Record::new(RecordId(1))
                .with("name", FieldValue::text("A"))
                .with("status", FieldValue::text("Paid")),
            Record::new(RecordId(3))
                .with("name", FieldValue::text("C"))
                .with("status", FieldValue::text("Pending")),
        ];
        Collection::in_memory(schema(), seed).unwrap()
    }

    #[tokio::test]
    async fn test_create_uses_max_plus_one() {
        let mut collection = seeded();
        collection.ensure_loaded().await.unwrap();

        let created = collection
            .create(&FieldChanges::new().with("name", FieldValue::text("X")))
            .await
            .unwrap();

        assert_eq!(created.id, RecordId(4));
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.state(), OpState::Idle);
    }

    #[tokio::test]
    async fn test_create_past_highest_id_is_rejected() {
        let seed = vec![Record::new(RecordId(u64::MAX)).with("name", FieldValue::text("Last"))];
        let mut collection = Collection::in_memory(schema(), seed).unwrap();
        collection.ensure_loaded().await.unwrap();

        let err = collection
            .create(&FieldChanges::new().with("name", FieldValue::text("X")))
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::InvalidInput(_)));
        assert!(err.to_string().contains("id space exhausted"));
        assert_eq!(collection.len(), 1);
    }

    #[tokio::test]
    async fn test_timestamp_ids_stay_unique() {
        let mut collection =
            Collection::new(schema(), Backend::Memory { seed: Vec::new() }, IdStrategy::Timestamp)
                .unwrap();
        collection.ensure_loaded().await.unwrap();

        let changes = FieldChanges::new().with("name", FieldValue::text("X"));
        let first = collection.create(&changes).await.unwrap();
        let second = collection.create(&changes).await.unwrap();
        assert!(second.id > first.id);
        assert!(first.id.0 > 1_600_000_000_000);
    }

    #[tokio::test]
    async fn test_update_merges_and_keeps_count() {
        let mut collection = seeded();
        collection.ensure_loaded().await.unwrap();

        let updated = collection
            .update(
                RecordId(3),
                &FieldChanges::new().with("status", FieldValue::text("Paid")),
            )
            .await
            .unwrap();
        assert_eq!(updated.text("name"), Some("C"));

        let all = collection.list(&RecordFilter::new());
        assert_eq!(all.len(), 2);
        let matching: Vec<_> = all.iter().filter(|r| r.id == RecordId(3)).collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].text("status"), Some("Paid"));
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found() {
        let mut collection = seeded();
        collection.ensure_loaded().await.unwrap();

        let err = collection
            .update(RecordId(99), &FieldChanges::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::NotFound { id: RecordId(99), .. }));
        assert_eq!(collection.len(), 2);
    }

    #[tokio::test]
    async fn test_update_cannot_clear_required_field() {
        let mut collection = seeded();
        collection.ensure_loaded().await.unwrap();

        let mut changes = FieldChanges::new();
        changes.set("name", None);
        let err = collection.update(RecordId(1), &changes).await.unwrap_err();
        assert!(matches!(err, ConsoleError::Validation(_)));
        assert_eq!(collection.get(RecordId(1)).unwrap().text("name"), Some("A"));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_fields() {
        let mut collection = seeded();
        collection.ensure_loaded().await.unwrap();

        let err = collection
            .create(
                &FieldChanges::new()
                    .with("name", FieldValue::text("X"))
                    .with("colour", FieldValue::text("red")),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("colour"));
        assert_eq!(collection.len(), 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let mut collection = seeded();
        collection.ensure_loaded().await.unwrap();

        collection.delete(RecordId(1)).await.unwrap();
        assert!(collection.get(RecordId(1)).is_none());
        assert!(matches!(
            collection.delete(RecordId(1)).await,
            Err(ConsoleError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_memory_refresh_keeps_created_records() {
        let mut collection = seeded();
        collection.ensure_loaded().await.unwrap();
        collection
            .create(&FieldChanges::new().with("name", FieldValue::text("X")))
            .await
            .unwrap();

        assert_eq!(collection.refresh().await.unwrap(), 3);
    }

    #[test]
    fn test_server_ids_need_rest_backend() {
        let result = Collection::new(schema(), Backend::Memory { seed: Vec::new() }, IdStrategy::Server);
        assert!(matches!(result, Err(ConsoleError::Config(_))));
    }
}
