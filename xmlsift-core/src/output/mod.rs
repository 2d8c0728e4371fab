//! Output formatting for search results
//!
//! Supports multiple output formats:
//! - text: one block per record (node, fields, text)
//! - lines: `node | name=value, … | text` per record
//! - value: record text only
//! - json: JSON array of records
//! - xml: the exportable XML fragment
//! - count: number of records

mod colors;
mod formatter;

pub use colors::{ansi, colorize_xml, paint, should_use_color};
pub use formatter::{
    format_field_names, format_field_values, format_message, format_records, OutputFormat,
    OutputOptions,
};
