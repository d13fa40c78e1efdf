//! Record model: field descriptors, typed values and schemas
//!
//! This module contains the data structures shared by every business module.
//! It is split into submodules:
//! - `field`: field descriptors and the tagged field kinds
//! - `value`: typed values, raw-text parsing and submitted changes
//! - `record`: records and their identifiers
//! - `schema`: per-module layouts and boundary decoding
//! - `filter`: search and equality filtering
//! - `catalog`: built-in module schemas and sample data

pub mod catalog;
mod field;
mod filter;
mod record;
mod schema;
mod value;

pub use field::{BadgeTone, FieldDescriptor, FieldKind, StatusOption};
pub use filter::RecordFilter;
pub use record::{Record, RecordId};
pub use schema::{DecodeIssue, RecordSchema};
pub use value::{
    DATE_FORMAT, FieldChanges, FieldValue, match_option, parse_date, parse_number, parse_raw,
};
