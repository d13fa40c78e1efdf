//! Read-only record view and the shared per-kind display formatting

use crate::records::{BadgeTone, FieldKind, FieldValue, Record, RecordSchema};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%m/%d/%Y".to_string()
}

fn default_thousands_separator() -> char {
    ','
}

/// Locale settings used for currency and date display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayLocale {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// chrono format string for dates
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: char,
}

impl Default for DisplayLocale {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            date_format: default_date_format(),
            thousands_separator: default_thousands_separator(),
        }
    }
}

impl DisplayLocale {
    /// Reject a date format chrono cannot render
    pub fn validate(&self) -> Result<(), String> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(format!("invalid date_format '{}'", self.date_format));
        }
        Ok(())
    }

    /// Format an amount as a currency string, e.g. `$1,234.50` or `-$12.00`
    pub fn format_currency(&self, amount: f64) -> String {
        let fixed = format!("{:.2}", amount.abs());
        let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, c) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(self.thousands_separator);
            }
            grouped.push(c);
        }

        let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
        format!("{}{}{}.{}", sign, self.currency_symbol, grouped, cents)
    }
}

/// A formatted value ready for display
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayValue {
    Empty,
    Plain(String),
    Badge { text: String, tone: BadgeTone },
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Empty => f.write_str("-"),
            DisplayValue::Plain(s) => f.write_str(s),
            DisplayValue::Badge { text, .. } => write!(f, "[{}]", text),
        }
    }
}

/// Format one field value according to its kind
pub fn format_value(kind: &FieldKind, value: Option<&FieldValue>, locale: &DisplayLocale) -> DisplayValue {
    let Some(value) = value else {
        return DisplayValue::Empty;
    };

    match (kind, value) {
        (FieldKind::Currency, FieldValue::Number(n)) => DisplayValue::Plain(locale.format_currency(*n)),
        (FieldKind::Date, FieldValue::Date(d)) => {
            let mut text = String::new();
            if write!(text, "{}", d.format(&locale.date_format)).is_err() {
                text = d.to_string();
            }
            DisplayValue::Plain(text)
        }
        (FieldKind::Status { .. }, FieldValue::Text(s)) => DisplayValue::Badge {
            text: s.clone(),
            tone: kind.tone_of(s).unwrap_or_default(),
        },
        (_, other) => DisplayValue::Plain(other.to_string()),
    }
}

/// One line of a record view
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    pub name: String,
    pub label: String,
    pub value: DisplayValue,
}

/// Read-only rendering of a record
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub title: String,
    pub rows: Vec<ViewRow>,
}

impl View {
    /// Render every descriptor of the schema for the record
    ///
    /// Takes the record by shared reference; the view never changes it.
    pub fn render(schema: &RecordSchema, record: &Record, locale: &DisplayLocale) -> Self {
        let rows = schema
            .fields
            .iter()
            .map(|field| ViewRow {
                name: field.name.clone(),
                label: field.label.clone(),
                value: format_value(&field.kind, record.get(&field.name), locale),
            })
            .collect();

        Self {
            title: format!("{} #{}", schema.title, record.id),
            rows,
        }
    }

    pub fn row(&self, name: &str) -> Option<&ViewRow> {
        self.rows.iter().find(|r| r.name == name)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        let width = self.rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
        for row in &self.rows {
            match &row.value {
                DisplayValue::Badge { tone, .. } => writeln!(
                    f,
                    "  {:<width$}  {} ({})",
                    row.label,
                    row.value,
                    tone.color(),
                    width = width
                )?,
                _ => writeln!(f, "  {:<width$}  {}", row.label, row.value, width = width)?,
            }
        }
        Ok(())
    }
}
