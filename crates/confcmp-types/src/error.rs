//! Error types for configuration loading and construction.

use std::path::PathBuf;

/// Errors that can occur while building or loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A component was registered under an empty name.
    #[error("component name must not be empty")]
    EmptyComponentName,

    /// The configuration file could not be read.
    #[error("cannot read configuration {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON.
    #[error("cannot parse configuration {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The top level of the document is not a mapping of components.
    #[error("configuration {path:?} is not a mapping of component names to properties")]
    NotAMapping { path: PathBuf },

    /// A component's value is not a property mapping.
    #[error("component {component} in {path:?} is not a property mapping")]
    ComponentNotAMapping { path: PathBuf, component: String },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
