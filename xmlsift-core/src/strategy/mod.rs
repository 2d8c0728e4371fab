//! Search strategies
//!
//! Three interchangeable ways to find candidate elements in a document:
//! - `tree`: parse the whole document with xot and walk it
//! - `streaming`: one forward pass with quick-xml, materializing only the
//!   children of each candidate
//! - `query`: compile the filter into XPath 3.1 and evaluate it with xee-xpath
//!
//! All three return the same records in the same order for the same input.

mod query;
mod streaming;
mod tree;

pub use query::{build_query, QueryStrategy};
pub use streaming::StreamingStrategy;
pub use tree::TreeStrategy;

use crate::error::{Result, SiftError};
use crate::filter::SearchFilter;
use crate::index::FieldIndex;
use crate::record::{join_text, ElementRecord};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use xot::{Node, Value, Xot};

/// Lazy, single-pass sequence of records.
///
/// After an `Err` item the sequence ends.
pub type RecordIter = Box<dyn Iterator<Item = Result<ElementRecord>>>;

pub trait SearchStrategy {
    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Find every element named `tag` that passes `filter`, in document order
    fn search(&self, path: &Path, tag: &str, filter: &SearchFilter) -> Result<RecordIter>;

    /// Distinct values per field name across all candidates
    fn list_field_values(&self, path: &Path, tag: &str) -> Result<FieldIndex> {
        let mut index = FieldIndex::new();
        for record in self.search(path, tag, &SearchFilter::new())? {
            index.add_record(&record?);
        }
        Ok(index)
    }

    /// Names of all immediate children seen under any candidate
    fn list_field_names(&self, path: &Path, tag: &str) -> Result<BTreeSet<String>> {
        Ok(self.list_field_values(path, tag)?.field_names())
    }
}

/// Strategy selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StrategyKind {
    Tree,
    #[default]
    Streaming,
    Query,
}

impl StrategyKind {
    pub fn all() -> impl Iterator<Item = StrategyKind> {
        StrategyKind::iter()
    }

    /// Get list of all valid strategy names
    pub fn valid_names() -> Vec<String> {
        StrategyKind::iter().map(|kind| kind.to_string()).collect()
    }

    /// Parse a strategy name, reporting the valid names on failure
    pub fn parse(name: &str) -> Result<Self> {
        StrategyKind::from_str(name).map_err(|_| {
            SiftError::UnsupportedFormat(format!(
                "strategy '{}'. Valid strategies: {}",
                name,
                StrategyKind::valid_names().join(", ")
            ))
        })
    }

    pub fn build(self) -> Box<dyn SearchStrategy> {
        match self {
            StrategyKind::Tree => Box::new(TreeStrategy),
            StrategyKind::Streaming => Box::new(StreamingStrategy),
            StrategyKind::Query => Box::new(QueryStrategy),
        }
    }
}

/// Read a whole document with its line ends normalized; the file is closed
/// before returning
pub(crate) fn read_document(path: &Path) -> Result<String> {
    let xml = fs::read_to_string(path).map_err(|e| SiftError::from_read(path, e))?;
    Ok(normalize_newlines(&xml).into_owned())
}

/// Normalize CRLF and lone CR to LF.
///
/// Only applied to raw markup, so a `&#13;` reference still yields a CR.
pub(crate) fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Local name of an element node
pub(crate) fn element_name(xot: &Xot, node: Node) -> Option<&str> {
    xot.element(node).map(|element| xot.local_name_str(element.name()))
}

/// Every element named `tag` below `root`, in document order
pub(crate) fn collect_candidates(xot: &Xot, root: Node, tag: &str) -> Vec<Node> {
    let mut found = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if element_name(xot, node) == Some(tag) {
            found.push(node);
        }
        let children: Vec<Node> = xot.children(node).collect();
        stack.extend(children.into_iter().rev());
    }
    found
}

/// Project an element of a loaded tree into a record
pub(crate) fn project_element(xot: &Xot, node: Node) -> ElementRecord {
    let mut record = ElementRecord::new(element_name(xot, node).unwrap_or_default());
    let mut pieces: Vec<String> = Vec::new();

    for child in xot.children(node) {
        match xot.value(child) {
            Value::Element(element) => {
                let value = xot.string_value(child);
                let name = xot.local_name_str(element.name()).to_string();
                pieces.push(value.clone());
                record.fields.push((name, value));
            }
            Value::Text(text) => pieces.push(text.get().to_string()),
            _ => {}
        }
    }

    record.text = join_text(pieces.iter().map(String::as_str));
    record
}
