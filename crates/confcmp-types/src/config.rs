//! The flat configuration model: dotted component names mapped to properties.

use indexmap::map::{IntoIter, Iter};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};

/// Property mapping of a single component, in insertion order.
pub type Properties = Map<String, Value>;

/// Separator between the segments of a hierarchical component name.
pub const NAME_SEPARATOR: char = '.';

/// A flat configuration: component name to property mapping.
///
/// Insertion order is preserved so that everything derived from a
/// configuration (normalized copies, hierarchies, diff output) is
/// deterministic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    components: IndexMap<String, Properties>,
}

impl Configuration {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from `(name, properties)` pairs.
    ///
    /// Later duplicates replace earlier ones but keep the first position.
    pub fn from_components<I, S>(components: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (S, Properties)>,
        S: Into<String>,
    {
        let mut config = Self::new();
        for (name, properties) in components {
            config.insert(name, properties)?;
        }
        Ok(config)
    }

    /// Build a configuration from a JSON object of objects.
    pub fn from_json(value: Value) -> ConfigResult<Self> {
        let Value::Object(map) = value else {
            return Err(ConfigError::NotAMapping {
                path: "<inline>".into(),
            });
        };
        let mut config = Self::new();
        for (name, properties) in map {
            match properties {
                Value::Object(props) => {
                    config.insert(name, props)?;
                }
                _ => {
                    return Err(ConfigError::ComponentNotAMapping {
                        path: "<inline>".into(),
                        component: name,
                    })
                }
            }
        }
        Ok(config)
    }

    /// Insert a component, returning the properties it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        properties: Properties,
    ) -> ConfigResult<Option<Properties>> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::EmptyComponentName);
        }
        Ok(self.components.insert(name, properties))
    }

    /// Properties of the named component.
    pub fn get(&self, name: &str) -> Option<&Properties> {
        self.components.get(name)
    }

    /// Stored name and properties of the named component.
    pub fn get_key_value(&self, name: &str) -> Option<(&String, &Properties)> {
        self.components.get_key_value(name)
    }

    /// Returns `true` if a component with this exact name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Remove a component, preserving the order of the remaining ones.
    pub fn remove(&mut self, name: &str) -> Option<Properties> {
        self.components.shift_remove(name)
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if there are no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Iterate over `(name, properties)` in insertion order.
    pub fn iter(&self) -> Iter<'_, String, Properties> {
        self.components.iter()
    }

    /// Component names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    /// Build a new configuration with the same names, transforming each
    /// component's properties; components mapped to `None` are dropped.
    pub fn filter_map<F>(&self, mut f: F) -> Configuration
    where
        F: FnMut(&str, &Properties) -> Option<Properties>,
    {
        let components = self
            .components
            .iter()
            .filter_map(|(name, props)| f(name, props).map(|props| (name.clone(), props)))
            .collect();
        Configuration { components }
    }

    /// Merge `other` into `self`; components of `other` win on conflict.
    pub fn merge(&mut self, other: Configuration) {
        for (name, properties) in other.components {
            self.components.insert(name, properties);
        }
    }
}

impl IntoIterator for Configuration {
    type Item = (String, Properties);
    type IntoIter = IntoIter<String, Properties>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.into_iter()
    }
}

impl<'a> IntoIterator for &'a Configuration {
    type Item = (&'a String, &'a Properties);
    type IntoIter = Iter<'a, String, Properties>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

/// Last segment of a dotted component name.
pub fn last_segment(name: &str) -> &str {
    name.rsplit(NAME_SEPARATOR).next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Properties {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn rejects_empty_names() {
        let mut config = Configuration::new();
        let err = config.insert("", Properties::new()).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyComponentName));
    }

    #[test]
    fn preserves_insertion_order() {
        let config = Configuration::from_components([
            ("Zeta", props(json!({"a": 1}))),
            ("Alpha", props(json!({"b": 2}))),
            ("Mid", props(json!({}))),
        ])
        .unwrap();
        let names: Vec<_> = config.names().collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut config = Configuration::from_json(json!({
            "A": {}, "B": {}, "C": {}
        }))
        .unwrap();
        config.remove("A");
        let names: Vec<_> = config.names().collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[test]
    fn from_json_rejects_non_mapping_component() {
        let err = Configuration::from_json(json!({"A": [1, 2]})).unwrap_err();
        assert!(matches!(err, ConfigError::ComponentNotAMapping { component, .. } if component == "A"));
    }

    #[test]
    fn merge_overrides_properties() {
        let mut left = Configuration::from_json(json!({"A": {"x": 1}, "B": {}})).unwrap();
        let right = Configuration::from_json(json!({"A": {"x": 2}, "C": {}})).unwrap();
        left.merge(right);
        assert_eq!(left.len(), 3);
        assert_eq!(left.get("A").unwrap()["x"], json!(2));
        let names: Vec<_> = left.names().collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn filter_map_keeps_names_and_order() {
        let config = Configuration::from_json(json!({"A": {"x": 1}, "B": {}, "C": {"y": 2}})).unwrap();
        let non_empty = config.filter_map(|_, props| (!props.is_empty()).then(|| props.clone()));
        let names: Vec<_> = non_empty.names().collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn last_segment_of_dotted_name() {
        assert_eq!(last_segment("ToolSvc.ToolA.Sub"), "Sub");
        assert_eq!(last_segment("Plain"), "Plain");
    }

    #[test]
    fn serde_is_transparent() {
        let config = Configuration::from_json(json!({"A": {"x": "1"}})).unwrap();
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(text, r#"{"A":{"x":"1"}}"#);
    }
}
