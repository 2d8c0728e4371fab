//! Output formatters for different output modes

use crate::export::build_fragment;
use crate::index::FieldIndex;
use crate::output::colors::{ansi, colorize_xml, paint};
use crate::record::ElementRecord;
use crate::view::ResultView;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^}]+)\}").unwrap());

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One block per record: node name, fields, text
    Text,
    /// One line per record: `node | name=value, … | text`
    Lines,
    /// Record text only
    Value,
    /// JSON array of records
    Json,
    /// Exported XML fragment
    Xml,
    /// Number of records
    Count,
}

impl OutputFormat {
    /// Parse format from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "lines" => Some(OutputFormat::Lines),
            "value" => Some(OutputFormat::Value),
            "json" => Some(OutputFormat::Json),
            "xml" => Some(OutputFormat::Xml),
            "count" => Some(OutputFormat::Count),
            _ => None,
        }
    }

    /// Get list of all valid format names
    pub fn valid_formats() -> &'static [&'static str] {
        &["text", "lines", "value", "json", "xml", "count"]
    }
}

/// Options for output formatting
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Custom message template, overrides the text and lines layouts
    pub message: Option<String>,
    /// Whether to use color in output
    pub use_color: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct JsonRecord<'a> {
    node: &'a str,
    fields: Vec<JsonField<'a>>,
    text: &'a str,
}

#[derive(Serialize)]
struct JsonField<'a> {
    name: &'a str,
    value: &'a str,
}

/// Format records according to the specified format
pub fn format_records(records: &[ElementRecord], format: OutputFormat, options: &OutputOptions) -> String {
    if let Some(template) = options.message.as_deref() {
        if matches!(format, OutputFormat::Text | OutputFormat::Lines) {
            return records
                .iter()
                .map(|r| format_message(template, r) + "\n")
                .collect();
        }
    }

    match format {
        OutputFormat::Text => format_text(records, options),
        OutputFormat::Lines => format_lines(records, options),
        OutputFormat::Value => format_value(records),
        OutputFormat::Json => format_json(records),
        OutputFormat::Xml => format_xml(records, options),
        OutputFormat::Count => format_count(records),
    }
}

fn format_text(records: &[ElementRecord], options: &OutputOptions) -> String {
    let mut output = String::new();
    for record in records {
        let view = ResultView::from(record);
        output.push_str(&paint(&view.node_name, ansi::BLUE, options.use_color));
        output.push('\n');
        for (name, value) in &view.fields {
            output.push_str(&format!(
                "  {}: {}\n",
                paint(name, ansi::CYAN, options.use_color),
                paint(value, ansi::YELLOW, options.use_color)
            ));
        }
        if !view.text.is_empty() {
            output.push_str(&format!("  {} {}\n", paint("text:", ansi::DIM, options.use_color), view.text));
        }
    }
    output
}

fn format_lines(records: &[ElementRecord], options: &OutputOptions) -> String {
    let mut output = String::new();
    for record in records {
        output.push_str(&format!(
            "{} | {} | {}\n",
            paint(&record.node_name, ansi::BLUE, options.use_color),
            record.summary(),
            record.text
        ));
    }
    output
}

fn format_value(records: &[ElementRecord]) -> String {
    let mut output = String::new();
    for record in records {
        output.push_str(&record.text);
        output.push('\n');
    }
    output
}

fn format_json(records: &[ElementRecord]) -> String {
    let json_records: Vec<JsonRecord> = records
        .iter()
        .map(|r| JsonRecord {
            node: &r.node_name,
            fields: r
                .fields
                .iter()
                .map(|(name, value)| JsonField { name, value })
                .collect(),
            text: &r.text,
        })
        .collect();

    serde_json::to_string_pretty(&json_records).unwrap_or_else(|_| "[]".to_string()) + "\n"
}

fn format_xml(records: &[ElementRecord], options: &OutputOptions) -> String {
    let fragment = build_fragment(records);
    if options.use_color {
        colorize_xml(&fragment)
    } else {
        fragment
    }
}

fn format_count(records: &[ElementRecord]) -> String {
    format!("{}\n", records.len())
}

/// Format the distinct field names, one per line
pub fn format_field_names(names: &BTreeSet<String>, json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(names).unwrap_or_else(|_| "[]".to_string()) + "\n";
    }
    names.iter().map(|name| format!("{}\n", name)).collect()
}

/// Format every field with its distinct values
pub fn format_field_values(index: &FieldIndex, json: bool, use_color: bool) -> String {
    if json {
        return serde_json::to_string_pretty(index).unwrap_or_else(|_| "{}".to_string()) + "\n";
    }

    let mut output = String::new();
    for name in index.field_names() {
        output.push_str(&paint(&name, ansi::CYAN, use_color));
        output.push('\n');
        for value in index.values_for(&name).into_iter().flatten() {
            output.push_str(&format!("  {}\n", value));
        }
    }
    output
}

/// Format a message template by replacing placeholders
///
/// `{node}`, `{text}` and `{summary}` refer to the record; any other
/// `{name}` is replaced by the first value of the field called `name`.
pub fn format_message(template: &str, record: &ElementRecord) -> String {
    if !template.contains('{') {
        return template.to_string();
    }

    PLACEHOLDER_RE
        .replace_all(template, |caps: &regex::Captures| {
            let expr = &caps[1];
            match expr {
                "node" => record.node_name.clone(),
                "text" => truncate(&record.text, 50),
                "summary" => record.summary(),
                field => record
                    .field_values(field)
                    .next()
                    .map(str::to_string)
                    .unwrap_or_default(),
            }
        })
        .to_string()
}

fn truncate(s: &str, max_len: usize) -> String {
    let normalized: String = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.chars().count() <= max_len {
        normalized
    } else {
        let kept: String = normalized.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
