//! Resolution of property values to the components they reference.

use confcmp_types::{literal_or_self, Configuration, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name prefix of the shared pool of public tools.
pub const SHARED_POOL: &str = "ToolSvc";

/// Component whose service lists declare the classes of service instances.
pub const APPLICATION_MANAGER: &str = "ApplicationMgr";

/// A reference from a property value to another component.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// Name of the referenced component.
    pub target: String,
    /// Declared or looked-up type of the target, if known.
    pub class: Option<String>,
}

impl Reference {
    pub fn new(target: impl Into<String>, class: Option<String>) -> Self {
        Self {
            target: target.into(),
            class,
        }
    }
}

/// Service instance to class, read from the application manager's service
/// lists. An instance listed with two different classes maps to `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceClassCache {
    classes: IndexMap<String, Option<String>>,
}

impl ServiceClassCache {
    /// Scan the application manager's `*Svc*` properties.
    pub fn from_configuration(config: &Configuration) -> Self {
        let mut classes: IndexMap<String, Option<String>> = IndexMap::new();
        let Some(manager) = config.get(APPLICATION_MANAGER) else {
            return Self { classes };
        };

        for (name, value) in manager {
            if !name.contains("Svc") {
                continue;
            }
            let Value::Array(items) = literal_or_self(value) else {
                continue;
            };
            for item in &items {
                let Some((class, instance)) = item.as_str().and_then(|s| s.split_once('/'))
                else {
                    continue;
                };
                if instance.contains('/') {
                    continue;
                }
                let entry = classes
                    .entry(instance.to_string())
                    .or_insert_with(|| Some(class.to_string()));
                if entry.as_deref() != Some(class) {
                    *entry = None;
                }
            }
        }
        Self { classes }
    }

    /// Class of a service instance, if it is known and unambiguous.
    pub fn class_of(&self, instance: &str) -> Option<&str> {
        self.classes.get(instance).and_then(Option::as_deref)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Resolves property values against one configuration.
///
/// Resolution is a pure function of the value, the owning component and the
/// configuration: the service-class cache is computed once when the resolver
/// is built and never updated afterwards.
#[derive(Clone, Debug)]
pub struct ReferenceResolver<'a> {
    config: &'a Configuration,
    services: ServiceClassCache,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(config: &'a Configuration) -> Self {
        Self {
            config,
            services: ServiceClassCache::from_configuration(config),
        }
    }

    /// The configuration references are resolved against.
    pub fn configuration(&self) -> &'a Configuration {
        self.config
    }

    /// All references held by `value`, a property of component `owner`.
    ///
    /// Precedence for a single name: a private sub-component of `owner`,
    /// then a public tool in the shared pool, then the bare instance when it
    /// carries a type or exists as a component. Lists are flattened.
    pub fn resolve(&self, value: &Value, owner: &str) -> Vec<Reference> {
        match literal_or_self(value) {
            Value::String(s) => self.resolve_name(&s, owner).into_iter().collect(),
            Value::Array(items) => items
                .iter()
                .flat_map(|item| self.resolve(item, owner))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Returns `true` if `value` references at least one component.
    pub fn is_reference(&self, value: &Value, owner: &str) -> bool {
        !self.resolve(value, owner).is_empty()
    }

    fn resolve_name(&self, s: &str, owner: &str) -> Option<Reference> {
        let parts: Vec<&str> = s.split('/').collect();
        let (mut class, instance) = match parts.as_slice() {
            [instance] => (None, *instance),
            [class, instance] => (Some((*class).to_string()), *instance),
            _ => return None,
        };
        if instance.is_empty() {
            return None;
        }

        let private = format!("{owner}.{instance}");
        if !owner.is_empty() && self.config.contains(&private) {
            return Some(Reference::new(private, class));
        }

        let public = format!("{SHARED_POOL}.{instance}");
        if self.config.contains(&public) {
            return Some(Reference::new(public, class));
        }

        if class.is_some() || self.config.contains(instance) {
            if class.is_none() {
                class = self.services.class_of(instance).map(str::to_string);
            }
            return Some(Reference::new(instance, class));
        }

        None
    }
}

/// Resolve `value` of component `owner` against `config`.
pub fn resolve_references(value: &Value, owner: &str, config: &Configuration) -> Vec<Reference> {
    ReferenceResolver::new(config).resolve(value, owner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> Configuration {
        Configuration::from_json(value).unwrap()
    }

    #[test]
    fn private_tool_wins_over_public_tool() {
        let conf = config(json!({
            "Alg1": {"Tool": "MyType/inst"},
            "Alg1.inst": {},
            "ToolSvc.inst": {}
        }));
        let refs = resolve_references(&json!("MyType/inst"), "Alg1", &conf);
        assert_eq!(refs, vec![Reference::new("Alg1.inst", Some("MyType".into()))]);
    }

    #[test]
    fn public_tool_when_no_private_copy() {
        let conf = config(json!({"Alg1": {}, "ToolSvc.inst": {}}));
        let refs = resolve_references(&json!("MyType/inst"), "Alg1", &conf);
        assert_eq!(refs, vec![Reference::new("ToolSvc.inst", Some("MyType".into()))]);
    }

    #[test]
    fn typed_bare_instance_resolves_even_if_absent() {
        let conf = config(json!({"Alg1": {}}));
        let refs = resolve_references(&json!("SvcType/someSvc"), "Alg1", &conf);
        assert_eq!(refs, vec![Reference::new("someSvc", Some("SvcType".into()))]);
    }

    #[test]
    fn untyped_name_needs_an_existing_component() {
        let conf = config(json!({"Alg1": {}, "Other": {}}));
        let resolver = ReferenceResolver::new(&conf);
        assert_eq!(
            resolver.resolve(&json!("Other"), "Alg1"),
            vec![Reference::new("Other", None)]
        );
        assert!(resolver.resolve(&json!("missing"), "Alg1").is_empty());
        assert!(resolver.resolve(&json!(42), "Alg1").is_empty());
    }

    #[test]
    fn quoted_string_is_unwrapped() {
        let conf = config(json!({"Alg1": {}, "Alg1.priv": {}}));
        let refs = resolve_references(&json!("'T/priv'"), "Alg1", &conf);
        assert_eq!(refs, vec![Reference::new("Alg1.priv", Some("T".into()))]);
    }

    #[test]
    fn lists_are_flattened() {
        let conf = config(json!({"Alg": {}, "Alg.a": {}, "ToolSvc.b": {}}));
        let refs = resolve_references(&json!("['TA/a', 'nothing', 'TB/b']"), "Alg", &conf);
        assert_eq!(
            refs,
            vec![
                Reference::new("Alg.a", Some("TA".into())),
                Reference::new("ToolSvc.b", Some("TB".into())),
            ]
        );
        assert!(resolve_references(&json!(["x", "y"]), "Alg", &conf).is_empty());
    }

    #[test]
    fn multi_separator_strings_are_not_references() {
        let conf = config(json!({"a": {}}));
        assert!(resolve_references(&json!("x/y/a"), "", &conf).is_empty());
        assert!(resolve_references(&json!("T/"), "", &conf).is_empty());
    }

    #[test]
    fn service_class_comes_from_application_manager() {
        let conf = config(json!({
            "ApplicationMgr": {
                "ExtSvc": "['StoreGateSvc/DetectorStore', 'MagFieldSvc/FieldSvc']",
                "TopAlg": "['Seq/Top']"
            },
            "FieldSvc": {},
            "DetectorStore": {},
            "Alg": {"Svc": "FieldSvc"}
        }));
        let resolver = ReferenceResolver::new(&conf);
        assert_eq!(
            resolver.resolve(&json!("FieldSvc"), "Alg"),
            vec![Reference::new("FieldSvc", Some("MagFieldSvc".into()))]
        );
    }

    #[test]
    fn conflicting_service_classes_are_unknown() {
        let conf = config(json!({
            "ApplicationMgr": {"ExtSvc": ["A/svc", "B/svc", "C/other"]}
        }));
        let cache = ServiceClassCache::from_configuration(&conf);
        assert_eq!(cache.class_of("svc"), None);
        assert_eq!(cache.class_of("other"), Some("C"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn resolution_is_repeatable() {
        let conf = config(json!({"Alg": {}, "Alg.t": {}}));
        let resolver = ReferenceResolver::new(&conf);
        let first = resolver.resolve(&json!("T/t"), "Alg");
        let second = resolver.resolve(&json!("T/t"), "Alg");
        assert_eq!(first, second);
    }
}
