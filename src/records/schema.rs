//! Record schemas and decoding at the API/storage boundary
//!
//! A schema is the list of field descriptors of one module plus the fields
//! used for search and filtering. Every record entering the console (REST
//! payloads, stored files) goes through [`RecordSchema::decode`], which
//! applies explicit fallback rules instead of ad hoc defaults.

use super::field::{FieldDescriptor, FieldKind};
use super::record::{Record, RecordId};
use super::value::{FieldValue, match_option, parse_date, parse_number};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

fn default_id_field() -> String {
    "id".to_string()
}

/// Field layout of one module's records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Machine name (e.g., "billing")
    pub name: String,
    /// Human title (e.g., "Billing Entries")
    pub title: String,
    /// Wire name of the identifier
    #[serde(default = "default_id_field")]
    pub id_field: String,
    pub fields: Vec<FieldDescriptor>,
    /// Textual fields searched by free-text search
    #[serde(default)]
    pub search_fields: Vec<String>,
    /// Enum fields available for exact-match filtering
    #[serde(default)]
    pub filter_fields: Vec<String>,
}

/// A value that could not be decoded as-is
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeIssue {
    pub field: String,
    pub problem: String,
}

impl fmt::Display for DecodeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.problem)
    }
}

impl RecordSchema {
    pub fn new(name: &str, title: &str, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            id_field: default_id_field(),
            fields,
            search_fields: Vec::new(),
            filter_fields: Vec::new(),
        }
    }

    pub fn searchable(mut self, fields: &[&str]) -> Self {
        self.search_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn filterable(mut self, fields: &[&str]) -> Self {
        self.filter_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_id_field(mut self, id_field: &str) -> Self {
        self.id_field = id_field.to_string();
        self
    }

    /// Find a field descriptor by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check the schema is internally consistent
    pub fn validate(&self) -> Result<(), String> {
        if self.fields.is_empty() {
            return Err(format!("Schema '{}' declares no fields", self.name));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name == self.id_field {
                return Err(format!(
                    "Schema '{}': field '{}' clashes with the id field",
                    self.name, field.name
                ));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(format!(
                    "Schema '{}': duplicate field '{}'",
                    self.name, field.name
                ));
            }
            match &field.kind {
                FieldKind::Select { options } if options.is_empty() => {
                    return Err(format!(
                        "Schema '{}': select field '{}' has no options",
                        self.name, field.name
                    ));
                }
                FieldKind::Status { options, fallback } => {
                    if options.is_empty() {
                        return Err(format!(
                            "Schema '{}': status field '{}' has no options",
                            self.name, field.name
                        ));
                    }
                    if let Some(fb) = fallback
                        && !options.iter().any(|o| &o.value == fb)
                    {
                        return Err(format!(
                            "Schema '{}': fallback '{}' of field '{}' is not one of its options",
                            self.name, fb, field.name
                        ));
                    }
                }
                _ => {}
            }
        }

        for name in &self.search_fields {
            match self.field(name) {
                Some(f) if f.kind.is_textual() => {}
                Some(_) => {
                    return Err(format!(
                        "Schema '{}': search field '{}' is not a text field",
                        self.name, name
                    ));
                }
                None => {
                    return Err(format!(
                        "Schema '{}': unknown search field '{}'",
                        self.name, name
                    ));
                }
            }
        }
        for name in &self.filter_fields {
            if self.field(name).is_none() {
                return Err(format!(
                    "Schema '{}': unknown filter field '{}'",
                    self.name, name
                ));
            }
        }
        Ok(())
    }

    /// Labels of required fields that have no value in the record
    pub fn missing_required(&self, record: &Record) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.required && record.get(&f.name).is_none())
            .map(|f| f.label.clone())
            .collect()
    }

    /// Decode one JSON object into a record
    ///
    /// Returns an error only when the id is missing or unusable; any other
    /// problem is resolved by a fallback rule and reported as an issue.
    pub fn decode(&self, row: &Map<String, Value>) -> Result<(Record, Vec<DecodeIssue>), String> {
        let id = match row.get(&self.id_field) {
            Some(Value::Number(n)) => n.as_u64().map(RecordId),
            Some(Value::String(s)) => s.parse::<RecordId>().ok(),
            _ => None,
        }
        .ok_or_else(|| {
            format!(
                "{} record without a usable '{}'",
                self.name, self.id_field
            )
        })?;

        let mut record = Record::new(id);
        let mut issues = Vec::new();

        for field in &self.fields {
            let raw = row.get(&field.name).unwrap_or(&Value::Null);
            match decode_value(&field.kind, raw) {
                Ok(Some(value)) => {
                    record.fields.insert(field.name.clone(), value);
                }
                Ok(None) => {}
                Err(problem) => {
                    let substitute = match &field.kind {
                        FieldKind::Status {
                            fallback: Some(fb), ..
                        } => Some(fb.clone()),
                        _ => None,
                    };
                    let problem = match &substitute {
                        Some(fb) => format!("{}; using fallback '{}'", problem, fb),
                        None => format!("{}; value dropped", problem),
                    };
                    if let Some(fb) = substitute {
                        record.fields.insert(field.name.clone(), FieldValue::Text(fb));
                    }
                    issues.push(DecodeIssue {
                        field: field.name.clone(),
                        problem,
                    });
                }
            }
        }

        Ok((record, issues))
    }

    /// Decode a list of rows, skipping rows that cannot become records
    ///
    /// Returns the decoded records and the number of skipped rows.
    pub fn decode_all(&self, rows: &[Value]) -> (Vec<Record>, usize) {
        let mut records = Vec::with_capacity(rows.len());
        let mut skipped = 0;
        for row in rows {
            let Some(object) = row.as_object() else {
                warn!(module = %self.name, "skipping non-object row");
                skipped += 1;
                continue;
            };
            match self.decode(object) {
                Ok((record, issues)) => {
                    for issue in &issues {
                        warn!(module = %self.name, id = %record.id, %issue, "lenient decode");
                    }
                    records.push(record);
                }
                Err(e) => {
                    warn!(module = %self.name, error = %e, "skipping row");
                    skipped += 1;
                }
            }
        }
        (records, skipped)
    }

    /// Encode a record as a JSON object (id plus every non-empty field)
    pub fn encode(&self, record: &Record) -> Map<String, Value> {
        let mut row = self.encode_fields(record);
        row.insert(self.id_field.clone(), Value::from(record.id.0));
        row
    }

    /// Encode only the declared fields of a record, without its id
    pub fn encode_fields(&self, record: &Record) -> Map<String, Value> {
        let mut row = Map::new();
        for field in &self.fields {
            if let Some(value) = record.get(&field.name) {
                row.insert(field.name.clone(), value.to_json());
            }
        }
        row
    }
}

/// Decode one JSON value for a field kind; `Ok(None)` is an empty field
///
/// A missing status is reported as an error when the field has a fallback
/// to substitute; otherwise it is an empty field.
fn decode_value(kind: &FieldKind, raw: &Value) -> Result<Option<FieldValue>, String> {
    match kind {
        FieldKind::Text | FieldKind::Textarea => match raw {
            Value::Null => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => Ok(Some(FieldValue::Text(s.clone()))),
            Value::Number(n) => Ok(Some(FieldValue::Text(n.to_string()))),
            Value::Bool(b) => Ok(Some(FieldValue::Text(b.to_string()))),
            Value::Array(_) | Value::Object(_) => Err("expected text".to_string()),
        },
        FieldKind::Number | FieldKind::Currency => match raw {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_f64()
                .map(|v| Some(FieldValue::Number(v)))
                .ok_or_else(|| format!("unrepresentable number {}", n)),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => parse_number(s).map(|v| Some(FieldValue::Number(v))),
            _ => Err("expected a number".to_string()),
        },
        FieldKind::Date => match raw {
            Value::Null => Ok(None),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => parse_date(s).map(|d| Some(FieldValue::Date(d))),
            _ => Err("expected a date string".to_string()),
        },
        FieldKind::Select { .. } => match raw {
            Value::Null => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => {
                let options = kind.options().unwrap_or_default();
                match_option(&options, s).map(|o| Some(FieldValue::text(o)))
            }
            _ => Err("expected one of the options".to_string()),
        },
        FieldKind::Status { fallback, .. } => {
            let options = kind.options().unwrap_or_default();
            match raw {
                Value::String(s) if !s.is_empty() => {
                    match_option(&options, s).map(|o| Some(FieldValue::text(o)))
                }
                Value::Null | Value::String(_) if fallback.is_none() => Ok(None),
                Value::Null | Value::String(_) => Err("missing status".to_string()),
                _ => Err("expected a status string".to_string()),
            }
        }
    }
}
