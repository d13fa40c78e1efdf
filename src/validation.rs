//! Argument parsing and validation for the tool handlers
//!
//! Tool arguments arrive as plain strings. This module turns them into typed
//! values and maps console errors to MCP errors with a readable message.

use crate::error::ConsoleError;
use crate::records::{RecordFilter, RecordId, RecordSchema, match_option};
use crate::ui::Form;
use mcp_attr::{Error as McpError, ErrorCode};

/// Error for a bad tool argument, visible to the client
pub fn invalid_params(message: impl Into<String>) -> McpError {
    McpError::new(ErrorCode::INVALID_PARAMS).with_message(message.into(), true)
}

/// Map a console error to a public MCP error
///
/// Input problems become `INVALID_PARAMS`; backend failures keep their
/// message but use `INTERNAL_ERROR`.
pub fn console_error(error: ConsoleError) -> McpError {
    let code = match &error {
        ConsoleError::UnknownModule { .. }
        | ConsoleError::NotFound { .. }
        | ConsoleError::Validation(_)
        | ConsoleError::InvalidInput(_) => ErrorCode::INVALID_PARAMS,
        ConsoleError::Decode { .. }
        | ConsoleError::Http { .. }
        | ConsoleError::Status { .. }
        | ConsoleError::Config(_)
        | ConsoleError::Storage(_) => ErrorCode::INTERNAL_ERROR,
    };
    McpError::new(code).with_message(error.to_string(), true)
}

/// Split a `field=value` argument at its first `=`
///
/// The value may be empty (clears the field) and may itself contain `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!(
            "Invalid field assignment '{}'. Use field=value (e.g., 'status=Paid')",
            raw
        )),
    }
}

/// Apply `field=value` arguments to a form
pub fn fill_form(form: &mut Form<'_>, fields: &[String]) -> Result<(), McpError> {
    for raw in fields {
        let (name, value) = parse_assignment(raw).map_err(invalid_params)?;
        form.set(&name, &value).map_err(invalid_params)?;
    }
    Ok(())
}

/// Build a record filter from the search keyword and `field=value` filters
///
/// Only the schema's filterable fields are accepted. Values of select and
/// status fields are matched case-insensitively and stored in their
/// canonical spelling.
pub fn parse_filter(
    schema: &RecordSchema,
    search: Option<&str>,
    filters: &[String],
) -> Result<RecordFilter, McpError> {
    let mut filter = RecordFilter::new();
    if let Some(keyword) = search
        && !keyword.trim().is_empty()
    {
        filter = filter.search(keyword.trim());
    }

    for raw in filters {
        let (name, value) = parse_assignment(raw).map_err(invalid_params)?;
        if !schema.filter_fields.iter().any(|f| f == &name) {
            return Err(invalid_params(format_invalid_filter_error(schema, &name)));
        }
        // Empty value means "all"
        if value.is_empty() {
            continue;
        }
        let value = match schema.field(&name).and_then(|f| f.kind.options()) {
            Some(options) => match_option(&options, &value)
                .map_err(|e| invalid_params(format!("Filter '{}': {}", name, e)))?
                .to_string(),
            None => value,
        };
        filter = filter.equals(&name, &value);
    }
    Ok(filter)
}

/// Parse a record id argument ("4" or "#4")
pub fn parse_record_id(raw: &str) -> Result<RecordId, McpError> {
    raw.parse::<RecordId>().map_err(|_| {
        invalid_params(format!(
            "Invalid record id '{}'. Use the numeric id shown by list() (e.g., '4')",
            raw
        ))
    })
}

pub fn format_invalid_filter_error(schema: &RecordSchema, name: &str) -> String {
    if schema.filter_fields.is_empty() {
        format!(
            "Field '{}' cannot be filtered. Module '{}' has no filterable fields; use search instead.",
            name, schema.name
        )
    } else {
        format!(
            "Field '{}' cannot be filtered.\nFilterable fields: {}",
            name,
            schema.filter_fields.join(", ")
        )
    }
}
