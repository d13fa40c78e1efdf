use super::value::{FieldChanges, FieldValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Unique identifier of a record within one module
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .trim_start_matches('#')
            .parse::<u64>()
            .map(RecordId)
            .map_err(|_| format!("Invalid record ID '{}'. IDs are positive integers", s.trim()))
    }
}

/// One row of module-specific business data
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field assignment, mostly for sample data and tests
    pub fn with(mut self, name: &str, value: FieldValue) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// The field value as text when it is a textual value
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Merge changes into this record; `None` entries clear the field
    pub fn apply(&mut self, changes: &FieldChanges) {
        for (name, value) in changes.iter() {
            match value {
                Some(v) => {
                    self.fields.insert(name.clone(), v.clone());
                }
                None => {
                    self.fields.remove(name);
                }
            }
        }
    }

    /// Take the id and every field present in `other`; fields it lacks keep
    /// their current values
    pub fn overlay(&mut self, other: Record) {
        self.id = other.id;
        self.fields.extend(other.fields);
    }

    /// Build a new record from changes, ignoring cleared entries
    pub fn from_changes(id: RecordId, changes: &FieldChanges) -> Self {
        let mut record = Self::new(id);
        record.apply(changes);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_parse() {
        assert_eq!("12".parse::<RecordId>(), Ok(RecordId(12)));
        assert_eq!(" #7 ".parse::<RecordId>(), Ok(RecordId(7)));
        assert!("abc".parse::<RecordId>().is_err());
        assert!("-1".parse::<RecordId>().is_err());
    }

    #[test]
    fn test_apply_sets_and_clears() {
        let mut record = Record::new(RecordId(1))
            .with("name", FieldValue::text("Ada"))
            .with("notes", FieldValue::text("old"));

        let mut changes = FieldChanges::new();
        changes.set("name", Some(FieldValue::text("Grace")));
        changes.set("notes", None);
        record.apply(&changes);

        assert_eq!(record.text("name"), Some("Grace"));
        assert!(record.get("notes").is_none());
    }

    #[test]
    fn test_overlay_keeps_absent_fields() {
        let mut record = Record::new(RecordId(0))
            .with("customer", FieldValue::text("Hooli"))
            .with("status", FieldValue::text("Overdue"));
        record.overlay(Record::new(RecordId(7)).with("status", FieldValue::text("Paid")));

        assert_eq!(record.id, RecordId(7));
        assert_eq!(record.text("customer"), Some("Hooli"));
        assert_eq!(record.text("status"), Some("Paid"));
    }

    #[test]
    fn test_from_changes_ignores_cleared() {
        let mut changes = FieldChanges::new();
        changes.set("name", Some(FieldValue::text("X")));
        changes.set("notes", None);
        let record = Record::from_changes(RecordId(4), &changes);
        assert_eq!(record.fields.len(), 1);
        assert_eq!(record.id, RecordId(4));
    }
}
