//! Fragment export
//!
//! Turns the current result set into a well-formed XML fragment, optionally
//! wrapped in a minimal HTML page, and writes it to a local file. Uploading
//! the file somewhere else is left to the caller.

use crate::error::{Result, SiftError};
use crate::record::ElementRecord;
use quick_xml::escape::escape;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Root element of an exported fragment
pub const FRAGMENT_ROOT: &str = "results";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xml,
    Html,
}

impl ExportFormat {
    /// Get list of all valid format names
    pub fn valid_formats() -> &'static [&'static str] {
        &["xml", "html"]
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xml => "xml",
            ExportFormat::Html => "html",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = SiftError;

    /// Accepts `xml` / `html` in any case, with or without a leading dot
    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim();
        let tag = tag.strip_prefix('.').unwrap_or(tag);
        match tag.to_lowercase().as_str() {
            "xml" => Ok(ExportFormat::Xml),
            "html" => Ok(ExportFormat::Html),
            _ => Err(SiftError::UnsupportedFormat(format!(
                "'{}'. Valid formats: {}",
                s,
                ExportFormat::valid_formats().join(", ")
            ))),
        }
    }
}

/// Serialize records as `<results><node><field>value</field>…</node>…</results>`
///
/// A record without fields keeps its text as element content.
pub fn build_fragment(records: &[ElementRecord]) -> String {
    let mut output = String::new();
    output.push_str(&format!("<{}>\n", FRAGMENT_ROOT));

    for record in records {
        if record.fields.is_empty() {
            output.push_str(&format!(
                "  <{0}>{1}</{0}>\n",
                record.node_name,
                escape(record.text.as_str())
            ));
            continue;
        }

        output.push_str(&format!("  <{}>\n", record.node_name));
        for (name, value) in &record.fields {
            output.push_str(&format!("    <{0}>{1}</{0}>\n", name, escape(value.as_str())));
        }
        output.push_str(&format!("  </{}>\n", record.node_name));
    }

    output.push_str(&format!("</{}>\n", FRAGMENT_ROOT));
    output
}

/// Render records in the requested export format
pub fn render(records: &[ElementRecord], format: ExportFormat) -> String {
    let fragment = build_fragment(records);
    match format {
        ExportFormat::Xml => fragment,
        ExportFormat::Html => format!(
            "<html><body><pre>{}</pre></body></html>",
            escape(fragment.as_str())
        ),
    }
}

/// Write the rendered records to `dir/filtered_<timestamp>.<ext>`
pub fn save_local(dir: &Path, records: &[ElementRecord], format: ExportFormat) -> Result<PathBuf> {
    let file_name = format!(
        "filtered_{}.{}",
        chrono::Local::now().format("%Y%m%d_%H%M%S"),
        format.extension()
    );
    let path = dir.join(file_name);
    fs::write(&path, render(records, format))?;

    info!(
        event = "saving",
        path = %path.display(),
        records = records.len(),
        format = format.extension(),
        "saved fragment locally"
    );
    Ok(path)
}
