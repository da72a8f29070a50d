use confcmp_refs::ReferenceResolver;
use confcmp_types::Configuration;

use crate::error::NormalizeResult;
use crate::stage::{NormalizeContext, NormalizeStage};

/// Property that expresses an ordered sequence of members.
pub const MEMBERS_PROPERTY: &str = "Members";

/// Keep only the structure of a configuration: properties that reference
/// other components, plus [`MEMBERS_PROPERTY`].
pub fn project_references(config: &Configuration) -> Configuration {
    let resolver = ReferenceResolver::new(config);
    config.filter_map(|name, properties| {
        Some(
            properties
                .iter()
                .filter(|(key, value)| {
                    key.as_str() == MEMBERS_PROPERTY || resolver.is_reference(value, name)
                })
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    })
}

/// Pipeline stage for [`project_references`].
pub struct ProjectReferencesStage;

impl NormalizeStage for ProjectReferencesStage {
    fn name(&self) -> &str {
        "project-references"
    }

    fn apply(
        &self,
        config: &Configuration,
        _context: &NormalizeContext,
    ) -> NormalizeResult<Configuration> {
        Ok(project_references(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_references_and_members() {
        let conf = Configuration::from_json(json!({
            "Seq": {"Members": ["AlgA", "AlgB"], "Sequential": true},
            "AlgA": {"Tool": "T/priv", "Cut": 3, "Svc": "SomeSvc/svc"},
            "AlgA.priv": {"Threshold": 1.0},
            "AlgB": {"Name": "missing"}
        }))
        .unwrap();
        let out = ProjectReferencesStage.apply(&conf, &NormalizeContext::new()).unwrap();

        let seq = out.get("Seq").unwrap();
        assert_eq!(seq.len(), 1);
        assert!(seq.contains_key("Members"));

        let alg = out.get("AlgA").unwrap();
        let keys: Vec<_> = alg.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Tool", "Svc"]);

        assert!(out.get("AlgA.priv").unwrap().is_empty());
        assert!(out.get("AlgB").unwrap().is_empty());
        assert_eq!(out.len(), 4);
    }
}
