//! Best-effort inference of component types from property values.
//!
//! Property values of the form `"Type/Instance"` declare that the component
//! named `Instance` is of type `Type`. Scanning every value of every
//! component yields an instance-to-type map used by default elimination.

use confcmp_types::{literal_or_self, split_typed_name, Configuration, Value};
use indexmap::IndexMap;
use tracing::debug;

/// Instance name to type name.
pub type TypeMap = IndexMap<String, String>;

/// Scan all property values and collect `Instance -> Type` declarations.
///
/// Never fails. When the same instance is declared with two different
/// types the last declaration wins.
pub fn infer_types(config: &Configuration) -> TypeMap {
    let mut types = TypeMap::new();
    for (_, properties) in config {
        for value in properties.values() {
            collect_types(value, &mut types);
        }
    }
    types
}

fn collect_types(value: &Value, types: &mut TypeMap) {
    match literal_or_self(value) {
        Value::String(s) => {
            if let Some((class, instance)) = split_typed_name(&s) {
                declare(types, instance, class);
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_types(item, types)),
        Value::Object(map) => map.values().for_each(|item| collect_types(item, types)),
        _ => {}
    }
}

fn declare(types: &mut TypeMap, instance: &str, class: &str) {
    if let Some(previous) = types.insert(instance.to_string(), class.to_string()) {
        if previous != class {
            debug!(instance, previous = %previous, class, "conflicting type declarations");
        }
    }
}
