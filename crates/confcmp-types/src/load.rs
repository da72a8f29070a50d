//! Configuration loader for JSON dumps.
//!
//! A dump is a JSON object whose keys are component names and whose values
//! are property objects. Loading is all-or-nothing: any unreadable or
//! malformed file aborts before normalization starts.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::config::Configuration;
use crate::error::{ConfigError, ConfigResult};

/// Load a single configuration dump.
pub fn load_configuration(path: &Path) -> ConfigResult<Configuration> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let Value::Object(map) = document else {
        return Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        });
    };

    let mut config = Configuration::new();
    for (name, properties) in map {
        let Value::Object(properties) = properties else {
            return Err(ConfigError::ComponentNotAMapping {
                path: path.to_path_buf(),
                component: name,
            });
        };
        config.insert(name, properties)?;
    }

    debug!(path = %path.display(), components = config.len(), "loaded configuration");
    Ok(config)
}

/// Load and merge several dumps; components from later files win.
pub fn load_configurations<P: AsRef<Path>>(paths: &[P]) -> ConfigResult<Configuration> {
    let mut merged = Configuration::new();
    for path in paths {
        merged.merge(load_configuration(path.as_ref())?);
    }
    Ok(merged)
}
