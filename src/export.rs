//! CSV export of a record list
//!
//! The header line holds `ID` followed by the field labels; each record is
//! one line of raw values (ISO dates, plain numbers). Fields containing a
//! comma, a double quote, CR or LF are quoted per RFC 4180 with embedded
//! quotes doubled.

use crate::records::{Record, RecordSchema};

/// MIME prefix of the download link produced by [`csv_data_uri`]
pub const CSV_DATA_URI_PREFIX: &str = "data:text/csv;charset=utf-8,";

/// Quote one CSV field when it needs it
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render records as CSV text, one line per record, lines ending in `\n`
pub fn to_csv(schema: &RecordSchema, records: &[Record]) -> String {
    let mut out = String::new();

    let mut header = vec!["ID".to_string()];
    header.extend(schema.fields.iter().map(|f| escape_field(&f.label)));
    out.push_str(&header.join(","));
    out.push('\n');

    for record in records {
        let mut line = vec![record.id.to_string()];
        line.extend(schema.fields.iter().map(|f| {
            record
                .get(&f.name)
                .map(|v| escape_field(&v.to_string()))
                .unwrap_or_default()
        }));
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

/// Wrap CSV text in a `text/csv` data URI suitable for a download link
pub fn csv_data_uri(csv: &str) -> String {
    format!("{}{}", CSV_DATA_URI_PREFIX, urlencoding::encode(csv))
}
