//! Declared default property values per component type.

use std::fs;
use std::path::Path;

use confcmp_types::{Properties, Value};
use indexmap::IndexMap;

use crate::error::{NormalizeError, NormalizeResult};

/// Source of per-type property defaults.
///
/// Default elimination queries the provider with candidate type names; a
/// `None` answer means nothing is known about that type and all of its
/// properties are kept.
pub trait TypeDefaultsProvider: Send + Sync {
    /// Declared defaults of `type_name`, if the type is known.
    fn defaults_for(&self, type_name: &str) -> Option<&Properties>;
}

/// In-memory defaults table.
///
/// Loadable from a JSON document of the form
/// `{ "TypeName": { "Property": default, ... }, ... }`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InMemoryTypeDefaults {
    types: IndexMap<String, Properties>,
}

impl InMemoryTypeDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the defaults of one type.
    pub fn insert(&mut self, type_name: impl Into<String>, defaults: Properties) {
        self.types.insert(type_name.into(), defaults);
    }

    /// Build from a JSON mapping of type names to default mappings.
    pub fn from_json(value: Value) -> Result<Self, String> {
        let Value::Object(map) = value else {
            return Err("expected a mapping of type names".into());
        };
        let mut defaults = Self::new();
        for (type_name, props) in map {
            match props {
                Value::Object(props) => defaults.insert(type_name, props),
                _ => return Err(format!("defaults of {type_name} are not a mapping")),
            }
        }
        Ok(defaults)
    }

    /// Load a JSON defaults file.
    pub fn load(path: &Path) -> NormalizeResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| NormalizeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|e| NormalizeError::Defaults {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(value).map_err(|reason| NormalizeError::Defaults {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeDefaultsProvider for InMemoryTypeDefaults {
    fn defaults_for(&self, type_name: &str) -> Option<&Properties> {
        self.types.get(type_name)
    }
}
