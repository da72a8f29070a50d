//! Error types for the normalization pipeline.

use std::path::PathBuf;

/// Errors that can occur while preparing or running the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// An include or exclude pattern is not a valid regular expression.
    #[error("invalid component pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// An inline rename rule is not of the form `old=new`.
    #[error("invalid rename rule {rule:?}: expected OLD=NEW")]
    InvalidRenameRule { rule: String },

    /// A line of a rename rules file is malformed.
    #[error("{path:?}:{line}: {reason}")]
    RenameFile {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A control file could not be read.
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A type-defaults file is not a JSON mapping of types to properties.
    #[error("invalid type defaults {path:?}: {reason}")]
    Defaults { path: PathBuf, reason: String },

    /// An options file is not valid TOML for [`crate::NormalizeOptions`].
    #[error("invalid options file {path:?}: {source}")]
    Options {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Convenience alias for normalization results.
pub type NormalizeResult<T> = Result<T, NormalizeError>;
