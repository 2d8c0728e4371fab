//! xmlsift-core: inspect and filter XML elements
//!
//! This library provides:
//! - Three interchangeable search strategies (xot tree, quick-xml stream,
//!   XPath 3.1 via xee-xpath) with identical matching semantics
//! - Flat element records and the field index used for filter choices
//! - Fragment export and multiple output formats

pub mod error;
pub mod export;
pub mod filter;
pub mod index;
pub mod output;
pub mod record;
pub mod strategy;
pub mod view;

pub use error::{Result, SiftError};
pub use export::{build_fragment, save_local, ExportFormat};
pub use filter::SearchFilter;
pub use index::FieldIndex;
pub use output::{format_records, OutputFormat, OutputOptions};
pub use record::ElementRecord;
pub use strategy::{
    build_query, QueryStrategy, RecordIter, SearchStrategy, StrategyKind, StreamingStrategy,
    TreeStrategy,
};
pub use view::{parse_summary, ResultView};
