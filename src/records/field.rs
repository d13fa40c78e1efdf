use serde::{Deserialize, Serialize};
use std::fmt;

/// Colour of the badge a status value is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    /// Settled / healthy states (e.g., "Paid", "Present")
    Success,
    /// States waiting on someone (e.g., "Pending")
    Warning,
    /// States needing attention (e.g., "Overdue", "Absent")
    Danger,
    /// Informational states (e.g., "Open", "Submitted")
    Info,
    #[default]
    Neutral,
}

impl BadgeTone {
    /// Colour name used when the badge is rendered as text
    pub fn color(&self) -> &'static str {
        match self {
            BadgeTone::Success => "green",
            BadgeTone::Warning => "yellow",
            BadgeTone::Danger => "red",
            BadgeTone::Info => "blue",
            BadgeTone::Neutral => "gray",
        }
    }
}

/// One allowed value of a status field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOption {
    pub value: String,
    #[serde(default)]
    pub tone: BadgeTone,
}

impl StatusOption {
    pub fn new(value: &str, tone: BadgeTone) -> Self {
        Self {
            value: value.to_string(),
            tone,
        }
    }
}

/// The kind of a field, which decides how it is parsed, edited and displayed
///
/// Serialized with an internal `type` tag so modules can be declared in TOML:
/// `kind = { type = "select", options = ["A", "B"] }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Number,
    Date,
    Select {
        options: Vec<String>,
    },
    Textarea,
    Currency,
    Status {
        options: Vec<StatusOption>,
        /// Value substituted when a decoded record carries a missing or unknown status
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fallback: Option<String>,
    },
}

impl FieldKind {
    /// Allowed values for closed-set kinds (select and status)
    pub fn options(&self) -> Option<Vec<&str>> {
        match self {
            FieldKind::Select { options } => Some(options.iter().map(String::as_str).collect()),
            FieldKind::Status { options, .. } => {
                Some(options.iter().map(|o| o.value.as_str()).collect())
            }
            FieldKind::Text
            | FieldKind::Number
            | FieldKind::Date
            | FieldKind::Textarea
            | FieldKind::Currency => None,
        }
    }

    /// Whether values of this kind are free text and take part in search
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            FieldKind::Text | FieldKind::Textarea | FieldKind::Select { .. } | FieldKind::Status { .. }
        )
    }

    /// Badge tone for a status value; other kinds have no badge
    pub fn tone_of(&self, value: &str) -> Option<BadgeTone> {
        match self {
            FieldKind::Status { options, .. } => Some(
                options
                    .iter()
                    .find(|o| o.value == value)
                    .map(|o| o.tone)
                    .unwrap_or_default(),
            ),
            _ => None,
        }
    }

    /// Short name of the kind, as written in configuration files
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Date => "date",
            FieldKind::Select { .. } => "select",
            FieldKind::Textarea => "textarea",
            FieldKind::Currency => "currency",
            FieldKind::Status { .. } => "status",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Declarative description of one record field, driving forms, views and tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Key into the record's field map (also the wire name)
    pub name: String,
    /// Display text
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    /// Whether a form must reject submission when this field is empty
    #[serde(default)]
    pub required: bool,
}

impl FieldDescriptor {
    pub fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
        }
    }

    /// Marks the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn number(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub fn date(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Date)
    }

    pub fn textarea(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Textarea)
    }

    pub fn currency(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Currency)
    }

    pub fn select(name: &str, label: &str, options: &[&str]) -> Self {
        Self::new(
            name,
            label,
            FieldKind::Select {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
        )
    }

    pub fn status(name: &str, label: &str, options: &[(&str, BadgeTone)]) -> Self {
        Self::new(
            name,
            label,
            FieldKind::Status {
                options: options
                    .iter()
                    .map(|(value, tone)| StatusOption::new(value, *tone))
                    .collect(),
                fallback: None,
            },
        )
    }

    /// Sets the status fallback; has no effect on other kinds
    pub fn with_fallback(mut self, value: &str) -> Self {
        if let FieldKind::Status { fallback, .. } = &mut self.kind {
            *fallback = Some(value.to_string());
        }
        self
    }
}
