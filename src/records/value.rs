use super::field::FieldKind;
use chrono::{DateTime, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;

/// Wire and storage format of date fields
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A typed field value; an empty field is represented by the absence of a value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn text(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }

    /// The string content of textual values
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) | FieldValue::Date(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) | FieldValue::Date(_) => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            FieldValue::Text(_) | FieldValue::Number(_) => None,
        }
    }

    /// JSON representation used on the wire and in stored files
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Text(s) => serde_json::Value::String(s.clone()),
            FieldValue::Number(n) => {
                if is_whole(*n) {
                    serde_json::Value::from(*n as i64)
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null)
                }
            }
            FieldValue::Date(d) => serde_json::Value::String(d.format(DATE_FORMAT).to_string()),
        }
    }
}

fn is_whole(n: f64) -> bool {
    n.fract() == 0.0 && n.abs() < 1e15
}

/// Raw rendering: whole numbers without a decimal point, dates as `YYYY-MM-DD`
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) if is_whole(*n) => write!(f, "{}", *n as i64),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

/// Parse a number, tolerating a leading currency symbol and thousands separators
pub fn parse_number(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let cleaned: String = rest
        .trim_start_matches(['$', '€', '£', '¥'])
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    let value: f64 = cleaned
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw.trim()))?;
    if !value.is_finite() {
        return Err(format!("'{}' is not a finite number", raw.trim()));
    }
    Ok(if negative { -value } else { value })
}

/// Parse a date in `YYYY-MM-DD` form, or the date part of an RFC 3339 timestamp
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.date_naive()))
        .map_err(|_| {
            format!(
                "Invalid date format '{}'. Use YYYY-MM-DD (e.g., '2025-03-15')",
                trimmed
            )
        })
}

/// Match a value against a closed option set, case-insensitively, returning the canonical option
pub fn match_option<'a>(options: &[&'a str], raw: &str) -> Result<&'a str, String> {
    let trimmed = raw.trim();
    options
        .iter()
        .find(|o| **o == trimmed)
        .or_else(|| options.iter().find(|o| o.eq_ignore_ascii_case(trimmed)))
        .copied()
        .ok_or_else(|| {
            format!(
                "'{}' is not one of: {}",
                trimmed,
                options.join(", ")
            )
        })
}

/// Parse raw text entered for a field of the given kind
///
/// Returns `Ok(None)` for empty input, which means "no value".
pub fn parse_raw(kind: &FieldKind, raw: &str) -> Result<Option<FieldValue>, String> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let value = match kind {
        FieldKind::Text => FieldValue::Text(raw.trim().to_string()),
        // Multi-line content keeps its inner formatting
        FieldKind::Textarea => FieldValue::Text(raw.replace("\r\n", "\n")),
        FieldKind::Number | FieldKind::Currency => FieldValue::Number(parse_number(raw)?),
        FieldKind::Date => FieldValue::Date(parse_date(raw)?),
        FieldKind::Select { .. } | FieldKind::Status { .. } => {
            let options = kind.options().unwrap_or_default();
            FieldValue::text(match_option(&options, raw)?)
        }
    };
    Ok(Some(value))
}

/// Edits submitted for a record: `None` clears a field on update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldChanges {
    changes: BTreeMap<String, Option<FieldValue>>,
}

impl FieldChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style set of one value
    pub fn with(mut self, name: &str, value: FieldValue) -> Self {
        self.set(name, Some(value));
        self
    }

    pub fn set(&mut self, name: &str, value: Option<FieldValue>) {
        self.changes.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Option<FieldValue>> {
        self.changes.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<FieldValue>)> {
        self.changes.iter()
    }

    /// Names of the fields touched by these changes
    pub fn names(&self) -> Vec<&str> {
        self.changes.keys().map(String::as_str).collect()
    }
}

impl FromIterator<(String, Option<FieldValue>)> for FieldChanges {
    fn from_iter<I: IntoIterator<Item = (String, Option<FieldValue>)>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::field::{BadgeTone, FieldDescriptor};

    #[test]
    fn test_parse_number_variants() {
        assert_eq!(parse_number("1234.5"), Ok(1234.5));
        assert_eq!(parse_number("1,234.50"), Ok(1234.5));
        assert_eq!(parse_number("$1,234.50"), Ok(1234.5));
        assert_eq!(parse_number("-$12"), Ok(-12.0));
        assert!(parse_number("twelve").is_err());
        assert!(parse_number("NaN").is_err());
    }

    #[test]
    fn test_parse_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_date("2024-03-15"), Ok(expected));
        assert_eq!(parse_date("2024-03-15T10:30:00Z"), Ok(expected));
        assert!(parse_date("15/03/2024").is_err());
    }

    #[test]
    fn test_parse_raw_select_is_canonicalised() {
        let field = FieldDescriptor::status(
            "status",
            "Status",
            &[("Paid", BadgeTone::Success), ("Pending", BadgeTone::Warning)],
        );
        assert_eq!(
            parse_raw(&field.kind, "pending"),
            Ok(Some(FieldValue::text("Pending")))
        );
        assert!(parse_raw(&field.kind, "Lost").is_err());
    }

    #[test]
    fn test_parse_raw_empty_is_none() {
        assert_eq!(parse_raw(&FieldKind::Number, "   "), Ok(None));
        assert_eq!(parse_raw(&FieldKind::Text, ""), Ok(None));
    }

    #[test]
    fn test_display_and_json() {
        assert_eq!(FieldValue::Number(4.0).to_string(), "4");
        assert_eq!(FieldValue::Number(4.25).to_string(), "4.25");
        assert_eq!(FieldValue::Number(4.0).to_json(), serde_json::json!(4));
        let date = FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(date.to_string(), "2024-01-05");
        assert_eq!(date.to_json(), serde_json::json!("2024-01-05"));
    }
}
