//! Descriptor-driven create/edit form
//!
//! A form renders one widget per field descriptor, optionally pre-populated
//! from an existing record, collects raw text edits and validates them on
//! submit. Submission borrows the form, so a failed submit leaves it open
//! with the user's edits intact.

use crate::records::{FieldChanges, FieldKind, Record, RecordId, RecordSchema, StatusOption, parse_raw};
use std::collections::BTreeMap;
use std::fmt;

/// Input widget matching a field kind
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    TextInput,
    NumberInput,
    DateInput,
    Select { options: Vec<String> },
    TextArea,
    CurrencyInput,
    StatusSelect { options: Vec<StatusOption> },
}

impl WidgetKind {
    fn for_kind(kind: &FieldKind) -> Self {
        match kind {
            FieldKind::Text => WidgetKind::TextInput,
            FieldKind::Number => WidgetKind::NumberInput,
            FieldKind::Date => WidgetKind::DateInput,
            FieldKind::Select { options } => WidgetKind::Select {
                options: options.clone(),
            },
            FieldKind::Textarea => WidgetKind::TextArea,
            FieldKind::Currency => WidgetKind::CurrencyInput,
            FieldKind::Status { options, .. } => WidgetKind::StatusSelect {
                options: options.clone(),
            },
        }
    }

    /// Hint shown next to the widget
    pub fn hint(&self) -> String {
        match self {
            WidgetKind::TextInput => "text".to_string(),
            WidgetKind::NumberInput => "number".to_string(),
            WidgetKind::DateInput => "date, YYYY-MM-DD".to_string(),
            WidgetKind::Select { options } => format!("one of: {}", options.join(" | ")),
            WidgetKind::TextArea => "multi-line text".to_string(),
            WidgetKind::CurrencyInput => "amount".to_string(),
            WidgetKind::StatusSelect { options } => format!(
                "one of: {}",
                options
                    .iter()
                    .map(|o| o.value.as_str())
                    .collect::<Vec<_>>()
                    .join(" | ")
            ),
        }
    }
}

/// One rendered input
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub name: String,
    pub label: String,
    pub required: bool,
    pub kind: WidgetKind,
    /// Current raw text of the input
    pub value: String,
}

/// Validation failure of a submitted form, naming the offending fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    /// Labels of required fields left empty
    pub missing: Vec<String>,
    /// Labels of fields whose value does not parse, with the problem
    pub invalid: Vec<(String, String)>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("Missing required fields: {}", self.missing.join(", ")));
        }
        for (label, problem) in &self.invalid {
            parts.push(format!("{}: {}", label, problem));
        }
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FormErrors {}

/// A create or edit form for one module
#[derive(Debug, Clone)]
pub struct Form<'a> {
    schema: &'a RecordSchema,
    record_id: Option<RecordId>,
    values: BTreeMap<String, String>,
}

impl<'a> Form<'a> {
    /// Open a form, pre-populated from `initial` when editing
    pub fn new(schema: &'a RecordSchema, initial: Option<&Record>) -> Self {
        let values = schema
            .fields
            .iter()
            .map(|field| {
                let raw = initial
                    .and_then(|r| r.get(&field.name))
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                (field.name.clone(), raw)
            })
            .collect();

        Self {
            schema,
            record_id: initial.map(|r| r.id),
            values,
        }
    }

    /// The id of the record being edited, `None` for a create form
    pub fn record_id(&self) -> Option<RecordId> {
        self.record_id
    }

    /// Record an edit; fails for names the schema does not declare
    pub fn set(&mut self, name: &str, raw: &str) -> Result<(), String> {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = raw.to_string();
                Ok(())
            }
            None => Err(format!(
                "Unknown field '{}' for {}. Fields: {}",
                name,
                self.schema.name,
                self.schema
                    .fields
                    .iter()
                    .map(|f| f.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// One widget per descriptor, in schema order
    pub fn widgets(&self) -> Vec<Widget> {
        self.schema
            .fields
            .iter()
            .map(|field| Widget {
                name: field.name.clone(),
                label: field.label.clone(),
                required: field.required,
                kind: WidgetKind::for_kind(&field.kind),
                value: self.values.get(&field.name).cloned().unwrap_or_default(),
            })
            .collect()
    }

    /// Validate and convert the edits into typed changes
    ///
    /// Every declared field appears in the result; empty inputs become `None`.
    pub fn submit(&self) -> Result<FieldChanges, FormErrors> {
        let mut errors = FormErrors::default();
        let mut changes = FieldChanges::new();

        for field in &self.schema.fields {
            let raw = self.values.get(&field.name).map(String::as_str).unwrap_or("");
            match parse_raw(&field.kind, raw) {
                Ok(None) if field.required => errors.missing.push(field.label.clone()),
                Ok(value) => changes.set(&field.name, value),
                Err(problem) => errors.invalid.push((field.label.clone(), problem)),
            }
        }

        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(errors)
        }
    }

    /// Submit and hand the changes to `on_submit` only when validation passes
    pub fn submit_with<T, F>(&self, on_submit: F) -> Result<T, FormErrors>
    where
        F: FnOnce(FieldChanges) -> T,
    {
        self.submit().map(on_submit)
    }
}

impl fmt::Display for Form<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record_id {
            Some(id) => writeln!(f, "Edit {} #{}", self.schema.title, id)?,
            None => writeln!(f, "New {}", self.schema.title)?,
        }
        for widget in self.widgets() {
            writeln!(
                f,
                "  {}{} ({}): {} [{}]",
                widget.label,
                if widget.required { " *" } else { "" },
                widget.name,
                if widget.value.is_empty() { "-" } else { widget.value.as_str() },
                widget.kind.hint()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{BadgeTone, FieldDescriptor, FieldValue};
    use std::cell::Cell;

    fn schema() -> RecordSchema {
        RecordSchema::new(
            "billing",
            "Billing",
            vec![
                FieldDescriptor::text("customer", "Customer").required(),
                FieldDescriptor::currency("amount", "Amount").required(),
                FieldDescriptor::date("due_date", "Due Date"),
                FieldDescriptor::status(
                    "status",
                    "Status",
                    &[("Paid", BadgeTone::Success), ("Pending", BadgeTone::Warning)],
                ),
                FieldDescriptor::textarea("notes", "Notes"),
            ],
        )
    }

    #[test]
    fn test_widgets_match_kinds() {
        let schema = schema();
        let form = Form::new(&schema, None);
        let widgets = form.widgets();

        assert_eq!(widgets.len(), 5);
        assert_eq!(widgets[0].kind, WidgetKind::TextInput);
        assert_eq!(widgets[1].kind, WidgetKind::CurrencyInput);
        assert_eq!(widgets[2].kind, WidgetKind::DateInput);
        assert!(matches!(widgets[3].kind, WidgetKind::StatusSelect { .. }));
        assert_eq!(widgets[4].kind, WidgetKind::TextArea);
        assert!(widgets.iter().all(|w| w.value.is_empty()));
        assert!(form.record_id().is_none());
    }

    #[test]
    fn test_prepopulates_from_record() {
        let schema = schema();
        let record = Record::new(RecordId(9))
            .with("customer", FieldValue::text("Acme"))
            .with("amount", FieldValue::Number(12.5));
        let form = Form::new(&schema, Some(&record));

        assert_eq!(form.record_id(), Some(RecordId(9)));
        assert_eq!(form.value("customer"), Some("Acme"));
        assert_eq!(form.value("amount"), Some("12.5"));
        assert_eq!(form.value("notes"), Some(""));
    }

    #[test]
    fn test_required_empty_blocks_callback() {
        let schema = schema();
        let mut form = Form::new(&schema, None);
        form.set("amount", "100").unwrap();

        let called = Cell::new(false);
        let result = form.submit_with(|_| called.set(true));

        assert!(!called.get());
        let errors = result.unwrap_err();
        assert_eq!(errors.missing, vec!["Customer".to_string()]);
        assert!(errors.to_string().contains("Missing required fields: Customer"));

        // The form stays usable after a failed submit
        form.set("customer", "Acme").unwrap();
        let changes = form.submit_with(|c| {
            called.set(true);
            c
        });
        assert!(called.get());
        let changes = changes.unwrap();
        assert_eq!(changes.get("customer"), Some(&Some(FieldValue::text("Acme"))));
        assert_eq!(changes.get("notes"), Some(&None));
    }

    #[test]
    fn test_invalid_values_are_named() {
        let schema = schema();
        let mut form = Form::new(&schema, None);
        form.set("customer", "Acme").unwrap();
        form.set("amount", "a lot").unwrap();
        form.set("status", "Lost").unwrap();

        let errors = form.submit().unwrap_err();
        assert!(errors.missing.is_empty());
        let labels: Vec<&str> = errors.invalid.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Amount", "Status"]);
    }

    #[test]
    fn test_set_unknown_field() {
        let schema = schema();
        let mut form = Form::new(&schema, None);
        assert!(form.set("colour", "red").unwrap_err().contains("Unknown field 'colour'"));
    }

    #[test]
    fn test_display_marks_required() {
        let schema = schema();
        let form = Form::new(&schema, None);
        let text = form.to_string();
        assert!(text.starts_with("New Billing"));
        assert!(text.contains("Customer * (customer)"));
        assert!(text.contains("one of: Paid | Pending"));
    }
}
