//! Error type shared by every strategy and the export path

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading, querying or exporting
#[derive(Error, Debug)]
pub enum SiftError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Failed to evaluate query: {0}")]
    Query(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = SiftError> = std::result::Result<T, E>;

impl SiftError {
    pub(crate) fn parse(path: &Path, message: impl Into<String>) -> Self {
        SiftError::Parse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Map an error raised while opening or reading a document.
    ///
    /// A missing file is `NotFound`; any other read failure is a parse
    /// failure, since the document could not be consumed.
    pub(crate) fn from_read(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            SiftError::NotFound(path.to_path_buf())
        } else {
            SiftError::parse(path, err.to_string())
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SiftError::NotFound(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, SiftError::Parse { .. })
    }
}
