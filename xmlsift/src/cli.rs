//! CLI argument parsing using clap

use clap::Parser;
use std::path::PathBuf;

/// Inspect and filter XML elements with a tree, streaming or XPath strategy
#[derive(Parser, Debug)]
#[command(name = "xmlsift")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # All books, one line each
    xmlsift library.xml -t book -o lines

    # Books whose <genre> child is exactly "SciFi"
    xmlsift library.xml -t book --field genre --value SciFi

    # Case-insensitive keyword over the child text, using the XPath strategy
    xmlsift library.xml -t book -k herbert -s query --show-query

    # Filter choices: every field with its distinct values
    xmlsift library.xml -t book --list-values

    # Save the matching fragment as HTML next to the document
    xmlsift library.xml -t book -k scifi --export html --export-dir .
"#)]
pub struct Args {
    /// XML document to load
    #[arg()]
    pub file: PathBuf,

    /// Element name to search for (local name, any depth)
    #[arg(short = 't', long = "tag")]
    pub tag: String,

    /// Child element name for the field filter (needs --value)
    #[arg(long = "field")]
    pub field: Option<String>,

    /// Required value of the --field child (needs --field)
    #[arg(long = "value")]
    pub value: Option<String>,

    /// Case-insensitive keyword matched against the child text
    #[arg(short = 'k', long = "keyword")]
    pub keyword: Option<String>,

    /// Search strategy: tree, streaming (default), query
    #[arg(short = 's', long = "strategy", default_value = "streaming")]
    pub strategy: String,

    /// Output format: text (default), lines, value, json, xml, count
    #[arg(short = 'o', long = "output", default_value = "text")]
    pub output: String,

    /// Custom message template (supports {node}, {text}, {summary}, {<field>})
    #[arg(short = 'm', long = "message")]
    pub message: Option<String>,

    /// Limit output to first N records
    #[arg(short = 'n', long = "limit")]
    pub limit: Option<usize>,

    /// List the field names seen under the tag instead of searching
    #[arg(long = "list-fields")]
    pub list_fields: bool,

    /// List every field with its distinct values instead of searching
    #[arg(long = "list-values")]
    pub list_values: bool,

    /// Print the XPath expression generated for the filter
    #[arg(long = "show-query")]
    pub show_query: bool,

    /// Export the results as a fragment: xml or html
    #[arg(long = "export")]
    pub export: Option<String>,

    /// Directory for exported fragments
    #[arg(long = "export-dir", default_value = ".")]
    pub export_dir: PathBuf,

    /// Color output: auto (default), always, never
    #[arg(long = "color", default_value = "auto")]
    pub color: String,

    /// Disable color output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Show verbose output (repeat for more)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Append log events to this file as well as stderr
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}
