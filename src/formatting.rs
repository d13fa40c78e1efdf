//! Text output of the tool handlers

use crate::records::{FieldKind, Record, RecordSchema};
use crate::ui::{DisplayLocale, Table};

/// One line of the `modules` listing
pub struct ModuleSummary<'a> {
    pub schema: &'a RecordSchema,
    pub backend: &'static str,
    /// `None` until the module has been loaded
    pub count: Option<usize>,
}

/// Describe every module with its fields and filterable fields
pub fn format_modules(modules: &[ModuleSummary<'_>]) -> String {
    if modules.is_empty() {
        return "No modules configured".to_string();
    }

    let mut result = format!("Found {} module(s):\n\n", modules.len());
    for module in modules {
        let schema = module.schema;
        let count = match module.count {
            Some(n) => format!("{} record(s)", n),
            None => "not loaded".to_string(),
        };
        result.push_str(&format!(
            "- {} ({}) [backend: {}, {}]\n",
            schema.name, schema.title, module.backend, count
        ));

        let fields: Vec<String> = schema
            .fields
            .iter()
            .map(|f| format!("{}{}:{}", f.name, if f.required { "*" } else { "" }, field_type(&f.kind)))
            .collect();
        result.push_str(&format!("  Fields: {}\n", fields.join(", ")));

        if !schema.search_fields.is_empty() {
            result.push_str(&format!("  Search: {}\n", schema.search_fields.join(", ")));
        }
        if !schema.filter_fields.is_empty() {
            result.push_str(&format!("  Filters: {}\n", schema.filter_fields.join(", ")));
        }
    }

    result
}

fn field_type(kind: &FieldKind) -> String {
    match kind.options() {
        Some(options) => format!("{}({})", kind.type_name(), options.join("|")),
        None => kind.type_name().to_string(),
    }
}

/// Table of the listed records, with the total when a filter hid some
pub fn format_records(
    schema: &RecordSchema,
    records: &[Record],
    total: usize,
    locale: &DisplayLocale,
) -> String {
    let table = Table::render(schema, records, locale).to_string();
    if records.len() < total {
        format!("{}\n({} of {} shown)\n", table.trim_end(), records.len(), total)
    } else {
        table
    }
}

/// Confirmation after a successful save
pub fn format_saved(schema: &RecordSchema, record: &Record, created: bool) -> String {
    let verb = if created { "created" } else { "updated" };
    let label = schema
        .search_fields
        .first()
        .and_then(|f| record.get(f))
        .map(|v| format!(" ({})", v))
        .unwrap_or_default();
    format!("{} #{}{} {}", schema.title, record.id, label, verb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::catalog::{builtin_schema, sample_records};

    #[test]
    fn test_format_modules_lists_fields() {
        let schema = builtin_schema("billing").unwrap();
        let out = format_modules(&[ModuleSummary {
            schema: &schema,
            backend: "memory",
            count: Some(3),
        }]);
        assert!(out.starts_with("Found 1 module(s)"));
        assert!(out.contains("- billing (Billing Entries) [backend: memory, 3 record(s)]"));
        assert!(out.contains("status*:status(Paid|Pending|Overdue)"));
        assert!(out.contains("Filters: status"));
    }

    #[test]
    fn test_format_records_reports_hidden_rows() {
        let schema = builtin_schema("billing").unwrap();
        let records = sample_records(&schema);
        let out = format_records(&schema, &records[..1], records.len(), &DisplayLocale::default());
        assert!(out.contains(&format!("(1 of {} shown)", records.len())));

        let out = format_records(&schema, &[], 3, &DisplayLocale::default());
        assert!(out.contains("No billing entries found"));
    }

    #[test]
    fn test_format_saved() {
        let schema = builtin_schema("billing").unwrap();
        let record = sample_records(&schema).remove(0);
        let out = format_saved(&schema, &record, true);
        assert!(out.starts_with("Billing Entries #1 ("));
        assert!(out.ends_with(" created"));
    }
}
