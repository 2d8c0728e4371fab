//! User-facing view of a record
//!
//! A view is built from the record's flattened summary rather than its field
//! list, so anything shown to the user goes through the same
//! `name=value, name=value` form that gets displayed and exported.

use crate::record::{ElementRecord, FIELD_SEPARATOR, PAIR_SEPARATOR};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub node_name: String,
    pub fields: Vec<(String, String)>,
    pub text: String,
}

impl From<&ElementRecord> for ResultView {
    fn from(record: &ElementRecord) -> Self {
        ResultView {
            node_name: record.node_name.clone(),
            fields: parse_summary(&record.summary()),
            text: record.text.clone(),
        }
    }
}

/// Split a `name=value, name=value` summary back into ordered pairs.
///
/// Empty entries are dropped, each entry is split on its first `=`, and name
/// and value are trimmed. Entries without `=` are skipped.
pub fn parse_summary(summary: &str) -> Vec<(String, String)> {
    summary
        .split(PAIR_SEPARATOR)
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| pair.split_once(FIELD_SEPARATOR))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect()
}
