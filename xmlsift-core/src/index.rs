//! Field index: the distinct values seen per field name
//!
//! Rebuilt from scratch on every load. Names are compared case-sensitively,
//! exactly as they appear in the document.

use crate::record::ElementRecord;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldIndex {
    values: BTreeMap<String, BTreeSet<String>>,
}

impl FieldIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every field of a candidate
    pub fn add_record(&mut self, record: &ElementRecord) {
        for (name, value) in &record.fields {
            self.insert(name, value);
        }
    }

    pub fn insert(&mut self, name: &str, value: &str) {
        self.values
            .entry(name.to_string())
            .or_default()
            .insert(value.to_string());
    }

    /// Distinct field names, sorted
    pub fn field_names(&self) -> BTreeSet<String> {
        self.values.keys().cloned().collect()
    }

    /// Distinct values observed for one field
    pub fn values_for(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl<'a> FromIterator<&'a ElementRecord> for FieldIndex {
    fn from_iter<I: IntoIterator<Item = &'a ElementRecord>>(iter: I) -> Self {
        let mut index = FieldIndex::new();
        for record in iter {
            index.add_record(record);
        }
        index
    }
}
