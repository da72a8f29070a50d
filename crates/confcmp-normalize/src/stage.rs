use std::time::Duration;

use confcmp_refs::{infer_types, TypeMap};
use confcmp_types::Configuration;

use crate::error::NormalizeResult;
use crate::rules::RenameRules;

// ---------------------------------------------------------------------------
// NormalizeContext
// ---------------------------------------------------------------------------

/// Facts about the pipeline input, computed once per run and shared by
/// every stage.
///
/// Stages read the context instead of re-deriving it from the
/// configuration they receive, which earlier stages may have pruned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizeContext {
    /// Instance types inferred from the pipeline input.
    pub types: TypeMap,
}

impl NormalizeContext {
    /// An empty context: no instance types are known.
    pub fn new() -> Self {
        Self::default()
    }

    /// Infer instance types from `config`, the input of the pipeline.
    pub fn from_configuration(config: &Configuration) -> Self {
        Self {
            types: infer_types(config),
        }
    }

    /// Apply `rules` to the instance names of the type map, so lookups by
    /// renamed component names still find their type.
    pub fn with_renamed_instances(mut self, rules: &RenameRules) -> Self {
        if !rules.is_empty() {
            self.types = self
                .types
                .into_iter()
                .map(|(instance, class)| (rules.rename_component(&instance), class))
                .collect();
        }
        self
    }
}

// ---------------------------------------------------------------------------
// StageReport
// ---------------------------------------------------------------------------

/// Recorded effect of one stage on the configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageReport {
    /// Name of the stage that produced this report.
    pub stage_name: String,
    /// Component count before the stage ran.
    pub components_before: usize,
    /// Component count after the stage ran.
    pub components_after: usize,
    /// Total property count before the stage ran.
    pub properties_before: usize,
    /// Total property count after the stage ran.
    pub properties_after: usize,
    /// Wall-clock time the stage took.
    pub elapsed: Duration,
}

impl StageReport {
    pub(crate) fn new(
        stage_name: &str,
        before: &Configuration,
        after: &Configuration,
        elapsed: Duration,
    ) -> Self {
        Self {
            stage_name: stage_name.to_string(),
            components_before: before.len(),
            components_after: after.len(),
            properties_before: property_count(before),
            properties_after: property_count(after),
            elapsed,
        }
    }

    /// Returns `true` if the stage removed neither components nor properties.
    pub fn removed_nothing(&self) -> bool {
        self.components_before == self.components_after
            && self.properties_before == self.properties_after
    }
}

fn property_count(config: &Configuration) -> usize {
    config.iter().map(|(_, props)| props.len()).sum()
}

// ---------------------------------------------------------------------------
// NormalizeStage trait
// ---------------------------------------------------------------------------

/// A single transformation in the normalization pipeline.
///
/// Stages never mutate their input: each one returns a new configuration.
/// The trait is object-safe so stages can be stored in a
/// `Vec<Box<dyn NormalizeStage>>`.
pub trait NormalizeStage: Send + Sync {
    /// Human-readable name of this stage (e.g., "rename", "defaults").
    fn name(&self) -> &str;

    /// Transform `config` into a new configuration.
    fn apply(
        &self,
        config: &Configuration,
        context: &NormalizeContext,
    ) -> NormalizeResult<Configuration>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn context_types_follow_renames() {
        let conf = Configuration::from_json(json!({
            "Alg": {"Tool": "ToolType/priv", "Svc": "SvcType/svc"}
        }))
        .unwrap();
        let rules = RenameRules::from_args(&["priv=private"]).unwrap();
        let context = NormalizeContext::from_configuration(&conf).with_renamed_instances(&rules);

        assert_eq!(context.types.get("private").map(String::as_str), Some("ToolType"));
        assert!(!context.types.contains_key("priv"));
        assert_eq!(context.types.get("svc").map(String::as_str), Some("SvcType"));
    }
}
