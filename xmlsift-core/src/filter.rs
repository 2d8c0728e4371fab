//! Search filter shared by every strategy

use crate::record::{is_blank, ElementRecord};

/// Optional constraints applied to each candidate element
///
/// The field filter only applies when both `field_name` and `field_value`
/// are set. A missing or blank keyword matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub field_name: Option<String>,
    pub field_value: Option<String>,
    pub keyword: Option<String>,
}

impl SearchFilter {
    /// A filter that accepts every candidate
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a child element `name` whose value equals `value`
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.field_name = Some(name.into());
        self.field_value = Some(value.into());
        self
    }

    pub fn with_field_name(mut self, name: Option<String>) -> Self {
        self.field_name = name;
        self
    }

    pub fn with_field_value(mut self, value: Option<String>) -> Self {
        self.field_value = value;
        self
    }

    /// Require the record text to contain `keyword`, ignoring case
    pub fn with_keyword(mut self, keyword: Option<String>) -> Self {
        self.keyword = keyword;
        self
    }

    /// The (name, value) pair to test, if the field filter is active
    pub fn field(&self) -> Option<(&str, &str)> {
        match (&self.field_name, &self.field_value) {
            (Some(name), Some(value)) => Some((name.as_str(), value.as_str())),
            _ => None,
        }
    }

    /// The keyword to test, if it is present and not blank
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|k| !is_blank(k))
    }

    /// True when neither constraint is active
    pub fn is_empty(&self) -> bool {
        self.field().is_none() && self.keyword().is_none()
    }

    /// Test a projected record against the filter
    pub fn matches(&self, record: &ElementRecord) -> bool {
        self.matches_field(record) && self.matches_keyword(&record.text)
    }

    fn matches_field(&self, record: &ElementRecord) -> bool {
        match self.field() {
            Some((name, value)) => record.field_values(name).any(|v| v == value),
            None => true,
        }
    }

    fn matches_keyword(&self, text: &str) -> bool {
        match self.keyword() {
            Some(keyword) => text.to_lowercase().contains(&keyword.to_lowercase()),
            None => true,
        }
    }
}
