//! Element records produced by a search

use serde::Serialize;

/// Separator between `name=value` pairs in a flattened summary
pub const PAIR_SEPARATOR: char = ',';
/// Separator between a field name and its value in a flattened summary
pub const FIELD_SEPARATOR: char = '=';

/// A single matched element, flattened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementRecord {
    /// Local name of the matched element
    pub node_name: String,
    /// Immediate child elements as (name, value), in document order
    pub fields: Vec<(String, String)>,
    /// Non-blank child content joined with a single space
    pub text: String,
}

impl ElementRecord {
    /// Create a record with no fields and no text
    pub fn new(node_name: impl Into<String>) -> Self {
        ElementRecord {
            node_name: node_name.into(),
            fields: Vec::new(),
            text: String::new(),
        }
    }

    /// Add a field, keeping insertion order
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Set the concatenated text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Values of every field with the given name
    pub fn field_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Flatten the fields into `name=value, name=value`
    pub fn summary(&self) -> String {
        self.fields
            .iter()
            .map(|(name, value)| format!("{}{}{}", name, FIELD_SEPARATOR, value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for ElementRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} | {} | {}", self.node_name, self.summary(), self.text)
    }
}

/// True for text made only of XML whitespace (space, tab, CR, LF)
pub fn is_blank(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

/// Join child content pieces into record text, skipping blank pieces
pub fn join_text<'a, I>(pieces: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    pieces
        .into_iter()
        .filter(|p| !is_blank(p))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_keeps_field_order() {
        let record = ElementRecord::new("book")
            .with_field("title", "Dune")
            .with_field("author", "Herbert");
        assert_eq!(record.summary(), "title=Dune, author=Herbert");
    }

    #[test]
    fn test_display_matches_result_line() {
        let record = ElementRecord::new("book")
            .with_field("title", "Dune")
            .with_text("Dune");
        assert_eq!(record.to_string(), "book | title=Dune | Dune");
    }

    #[test]
    fn test_field_values_with_repeated_name() {
        let record = ElementRecord::new("book")
            .with_field("tag", "a")
            .with_field("title", "T")
            .with_field("tag", "b");
        let tags: Vec<_> = record.field_values("tag").collect();
        assert_eq!(tags, vec!["a", "b"]);
    }

    #[test]
    fn test_join_text_skips_blank_pieces() {
        assert_eq!(join_text(["A", "\n  ", "", "B"]), "A B");
        assert_eq!(join_text(["  padded "]), "  padded ");
        assert_eq!(join_text(Vec::<&str>::new()), "");
    }

    #[test]
    fn test_is_blank_only_xml_whitespace() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\r\n"));
        // non-breaking space is not XML whitespace
        assert!(!is_blank("\u{a0}"));
    }
}
