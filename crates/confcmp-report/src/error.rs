//! Error types for report inputs.

use std::path::PathBuf;

/// Errors that can occur while reading report inputs.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A differences file could not be read.
    #[error("cannot read differences file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A differences file line is malformed.
    #[error("{path:?}, line {line}: {reason}")]
    Differences {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// Convenience alias for report results.
pub type ReportResult<T> = Result<T, ReportError>;
