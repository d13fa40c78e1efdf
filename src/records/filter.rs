//! Client-side search and filtering over an in-memory collection

use super::record::Record;
use super::schema::RecordSchema;
use super::value::FieldValue;

/// Free-text search intersected with exact-match equality filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub search: Option<String>,
    pub equals: Vec<(String, String)>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring search across the schema's search fields
    pub fn search(mut self, keyword: &str) -> Self {
        self.search = Some(keyword.to_string());
        self
    }

    /// Exact match on one field's raw value
    pub fn equals(mut self, field: &str, value: &str) -> Self {
        self.equals.push((field.to_string(), value.to_string()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search.as_deref().is_none_or(|s| s.trim().is_empty()) && self.equals.is_empty()
    }

    /// Whether one record passes every part of the filter
    pub fn matches(&self, schema: &RecordSchema, record: &Record) -> bool {
        self.matches_keyword(schema, record) && self.matches_equals(record)
    }

    fn matches_keyword(&self, schema: &RecordSchema, record: &Record) -> bool {
        let Some(keyword) = self.search.as_deref().map(str::trim) else {
            return true;
        };
        if keyword.is_empty() {
            return true;
        }
        let keyword_lower = keyword.to_lowercase();
        schema.search_fields.iter().any(|name| {
            record
                .text(name)
                .map(|s| s.to_lowercase().contains(&keyword_lower))
                .unwrap_or(false)
        })
    }

    fn matches_equals(&self, record: &Record) -> bool {
        self.equals.iter().all(|(field, expected)| {
            record
                .get(field)
                .map(|v| match v {
                    FieldValue::Text(s) => s == expected,
                    other => other.to_string() == *expected,
                })
                .unwrap_or(false)
        })
    }

    /// Keep only the records that match, preserving order
    pub fn apply(&self, schema: &RecordSchema, records: &mut Vec<Record>) {
        if self.is_empty() {
            return;
        }
        records.retain(|record| self.matches(schema, record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::field::{BadgeTone, FieldDescriptor};
    use crate::records::record::RecordId;

    fn schema() -> RecordSchema {
        RecordSchema::new(
            "billing",
            "Billing",
            vec![
                FieldDescriptor::text("customer", "Customer"),
                FieldDescriptor::textarea("notes", "Notes"),
                FieldDescriptor::currency("amount", "Amount"),
                FieldDescriptor::status(
                    "status",
                    "Status",
                    &[("Paid", BadgeTone::Success), ("Pending", BadgeTone::Warning)],
                ),
            ],
        )
        .searchable(&["customer", "notes"])
        .filterable(&["status"])
    }

    fn records() -> Vec<Record> {
        vec![
            Record::new(RecordId(1))
                .with("customer", FieldValue::text("Acme Corp"))
                .with("status", FieldValue::text("Paid")),
            Record::new(RecordId(2))
                .with("customer", FieldValue::text("Globex"))
                .with("notes", FieldValue::text("Call ACME first"))
                .with("status", FieldValue::text("Pending")),
            Record::new(RecordId(3))
                .with("customer", FieldValue::text("Initech"))
                .with("amount", FieldValue::Number(42.0))
                .with("status", FieldValue::text("Pending")),
        ]
    }

    #[test]
    fn test_status_filter_returns_exact_subset() {
        let mut list = vec![
            Record::new(RecordId(1)).with("status", FieldValue::text("Paid")),
            Record::new(RecordId(2)).with("status", FieldValue::text("Pending")),
        ];
        RecordFilter::new()
            .equals("status", "Pending")
            .apply(&schema(), &mut list);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, RecordId(2));
    }

    #[test]
    fn test_keyword_is_case_insensitive_across_search_fields() {
        let mut list = records();
        RecordFilter::new().search("acme").apply(&schema(), &mut list);
        let ids: Vec<u64> = list.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_keyword_ignores_non_search_fields() {
        let mut list = records();
        RecordFilter::new().search("42").apply(&schema(), &mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn test_keyword_and_equality_intersect() {
        let mut list = records();
        RecordFilter::new()
            .search("acme")
            .equals("status", "Pending")
            .apply(&schema(), &mut list);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, RecordId(2));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filter = RecordFilter::new().search("e").equals("status", "Pending");
        let mut once = records();
        filter.apply(&schema(), &mut once);
        let mut twice = once.clone();
        filter.apply(&schema(), &mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let mut list = records();
        let filter = RecordFilter::new().search("   ");
        assert!(filter.is_empty());
        filter.apply(&schema(), &mut list);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_equality_on_numbers_uses_raw_rendering() {
        let mut list = records();
        RecordFilter::new()
            .equals("amount", "42")
            .apply(&schema(), &mut list);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, RecordId(3));
    }
}
