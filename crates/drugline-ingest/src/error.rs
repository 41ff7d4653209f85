//! Errors raised while reading sources and writing outputs

use std::fmt;
use std::path::{Path, PathBuf};

use drugline_core::Retryable;

/// Failure to load, parse or persist one file.
#[derive(Debug)]
pub enum IngestError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Csv {
        path: PathBuf,
        source: csv::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The document parsed but its top level is not an array.
    NotAnArray { path: PathBuf },
    /// Extension is neither `.csv` nor `.json`.
    UnsupportedFormat { path: PathBuf },
    /// Directory to scan for sources does not exist.
    MissingDirectory { path: PathBuf },
    Pattern { pattern: String, message: String },
}

impl IngestError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    /// File the error relates to, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. }
            | Self::Csv { path, .. }
            | Self::Json { path, .. }
            | Self::NotAnArray { path }
            | Self::UnsupportedFormat { path }
            | Self::MissingDirectory { path } => Some(path),
            Self::Pattern { .. } => None,
        }
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Csv { path, source } => write!(f, "{}: invalid CSV: {source}", path.display()),
            Self::Json { path, source } => write!(f, "{}: invalid JSON: {source}", path.display()),
            Self::NotAnArray { path } => {
                write!(f, "{}: expected a JSON array at top level", path.display())
            }
            Self::UnsupportedFormat { path } => {
                write!(f, "{}: unsupported file format", path.display())
            }
            Self::MissingDirectory { path } => {
                write!(f, "{}: directory does not exist", path.display())
            }
            Self::Pattern { pattern, message } => write!(f, "bad pattern '{pattern}': {message}"),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl Retryable for IngestError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Io { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}
