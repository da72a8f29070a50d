use std::sync::Arc;
use std::time::{Duration, Instant};

use confcmp_types::Configuration;
use tracing::info;

use crate::error::NormalizeResult;
use crate::options::NormalizeOptions;
use crate::provider::TypeDefaultsProvider;
use crate::rules::RenameRules;
use crate::stage::{NormalizeContext, NormalizeStage, StageReport};
use crate::stages::{
    ComponentFilter, DefaultsStage, IncludeExcludeStage, ProjectReferencesStage, RenameStage,
    ShortenStage, StripIrrelevantStage,
};

// ---------------------------------------------------------------------------
// NormalizeOutcome
// ---------------------------------------------------------------------------

/// The outcome of running a configuration through the pipeline.
#[derive(Clone, Debug)]
pub struct NormalizeOutcome {
    /// The normalized configuration.
    pub configuration: Configuration,
    /// Per-stage reports in evaluation order.
    pub stage_reports: Vec<StageReport>,
    /// Total wall-clock time for the pipeline.
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// An ordered chain of normalization stages.
///
/// Each stage consumes the previous stage's output and produces a new
/// configuration; the input of [`Self::run`] is never modified. Instance
/// types are inferred once from that input and shared through a
/// [`NormalizeContext`].
pub struct Normalizer {
    stages: Vec<Box<dyn NormalizeStage>>,
    rename_rules: RenameRules,
}

impl Normalizer {
    /// Create a normalizer with an empty pipeline (the identity).
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            rename_rules: RenameRules::new(),
        }
    }

    /// Create the standard pipeline for `options`:
    /// include/exclude -> strip irrelevant -> rename -> defaults ->
    /// shorten -> project references. Disabled stages are left out.
    ///
    /// Fails only if an include or exclude pattern is invalid.
    pub fn from_options(
        options: &NormalizeOptions,
        rename_rules: RenameRules,
        defaults: Arc<dyn TypeDefaultsProvider>,
    ) -> NormalizeResult<Self> {
        let mut normalizer = Self::new();

        let filter = ComponentFilter::new(&options.include, &options.exclude)?;
        if !filter.is_empty() {
            normalizer.add_stage(Box::new(IncludeExcludeStage::new(
                filter,
                options.follow_depth,
            )));
        }
        if options.ignore_irrelevant {
            normalizer.add_stage(Box::new(StripIrrelevantStage::new(
                options.ignored_properties(),
            )));
        }
        if !rename_rules.is_empty() {
            normalizer.rename_rules = rename_rules.clone();
            normalizer.add_stage(Box::new(RenameStage::new(rename_rules)));
        }
        if options.ignore_defaults {
            normalizer.add_stage(Box::new(DefaultsStage::new(
                defaults,
                options.ignore_default_named,
            )));
        }
        if options.shorten_default_components {
            normalizer.add_stage(Box::new(ShortenStage));
        }
        if options.skip_properties {
            normalizer.add_stage(Box::new(ProjectReferencesStage));
        }

        Ok(normalizer)
    }

    /// Append a stage to the end of the pipeline.
    pub fn add_stage(&mut self, stage: Box<dyn NormalizeStage>) {
        self.stages.push(stage);
    }

    /// Number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Stage names in evaluation order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run `config` through every stage in order.
    pub fn run(&self, config: &Configuration) -> NormalizeResult<NormalizeOutcome> {
        let pipeline_start = Instant::now();
        let mut current = config.clone();
        let mut stage_reports = Vec::with_capacity(self.stages.len());
        let context =
            NormalizeContext::from_configuration(config).with_renamed_instances(&self.rename_rules);

        for stage in &self.stages {
            let stage_start = Instant::now();
            let next = stage.apply(&current, &context)?;
            let report = StageReport::new(stage.name(), &current, &next, stage_start.elapsed());
            info!(
                stage = %report.stage_name,
                components = report.components_after,
                properties = report.properties_after,
                "stage applied"
            );
            stage_reports.push(report);
            current = next;
        }

        Ok(NormalizeOutcome {
            configuration: current,
            stage_reports,
            elapsed: pipeline_start.elapsed(),
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InMemoryTypeDefaults;
    use serde_json::{json, Value};

    fn config(value: Value) -> Configuration {
        Configuration::from_json(value).unwrap()
    }

    fn no_defaults() -> Arc<dyn TypeDefaultsProvider> {
        Arc::new(InMemoryTypeDefaults::new())
    }

    fn all_enabled() -> NormalizeOptions {
        NormalizeOptions {
            include: vec!["Top".into()],
            follow_depth: 1,
            ignore_irrelevant: true,
            ignore_defaults: true,
            ignore_default_named: true,
            shorten_default_components: true,
            skip_properties: true,
            ..Default::default()
        }
    }

    #[test]
    fn default_options_build_an_identity_pipeline() {
        let n = Normalizer::from_options(
            &NormalizeOptions::default(),
            RenameRules::new(),
            no_defaults(),
        )
        .unwrap();
        assert_eq!(n.stage_count(), 0);

        let conf = config(json!({"A": {"x": 1}}));
        let outcome = n.run(&conf).unwrap();
        assert_eq!(outcome.configuration, conf);
        assert!(outcome.stage_reports.is_empty());
    }

    #[test]
    fn stages_run_in_fixed_order() {
        let n = Normalizer::from_options(
            &all_enabled(),
            RenameRules::from_args(&["a=b"]).unwrap(),
            no_defaults(),
        )
        .unwrap();
        assert_eq!(
            n.stage_names(),
            vec![
                "include-exclude",
                "strip-irrelevant",
                "rename",
                "eliminate-defaults",
                "shorten-default-named",
                "project-references",
            ]
        );
    }

    #[test]
    fn invalid_pattern_fails_construction() {
        let options = NormalizeOptions {
            exclude: vec!["[".into()],
            ..Default::default()
        };
        assert!(Normalizer::from_options(&options, RenameRules::new(), no_defaults()).is_err());
    }

    #[test]
    fn full_pipeline_end_to_end() {
        let conf = config(json!({
            "TopAlg": {"Tool": "ToolType/priv", "OutputLevel": 3, "Cut": 2},
            "TopAlg.priv": {"Svc": "MagSvc/MagSvc", "Threshold": 1},
            "Unrelated": {"x": 1}
        }));
        let mut defaults = InMemoryTypeDefaults::new();
        let Value::Object(tool_defaults) = json!({"Threshold": 1}) else {
            unreachable!()
        };
        defaults.insert("ToolType", tool_defaults);

        let options = NormalizeOptions {
            include: vec!["TopAlg$".into()],
            follow_depth: 1,
            ignore_irrelevant: true,
            ignore_defaults: true,
            shorten_default_components: true,
            ..Default::default()
        };
        let n = Normalizer::from_options(
            &options,
            RenameRules::from_args(&["priv=private"]).unwrap(),
            Arc::new(defaults),
        )
        .unwrap();
        let outcome = n.run(&conf).unwrap();
        let out = &outcome.configuration;

        let names: Vec<_> = out.names().collect();
        assert_eq!(names, vec!["TopAlg", "TopAlg.private"]);
        assert_eq!(out.get("TopAlg").unwrap()["Tool"], json!("ToolType/private"));
        assert!(!out.get("TopAlg").unwrap().contains_key("OutputLevel"));
        let tool = out.get("TopAlg.private").unwrap();
        assert_eq!(tool.len(), 1);
        assert_eq!(tool["Svc"], json!("MagSvc"));

        assert_eq!(outcome.stage_reports.len(), 5);
        assert_eq!(outcome.stage_reports[0].components_before, 3);
        assert_eq!(outcome.stage_reports[0].components_after, 2);
        assert!(outcome.stage_reports[2].removed_nothing());
        // the input is untouched
        assert_eq!(conf.len(), 3);
        assert!(conf.get("TopAlg").unwrap().contains_key("OutputLevel"));
    }

    #[test]
    fn types_come_from_the_pipeline_input() {
        let conf = config(json!({
            "Decl": {"Tool": "ToolType/tool"},
            "Top.tool": {"Cut": 5, "Mode": 1}
        }));
        let mut defaults = InMemoryTypeDefaults::new();
        let Value::Object(tool_defaults) = json!({"Cut": 5}) else {
            unreachable!()
        };
        defaults.insert("ToolType", tool_defaults);

        let options = NormalizeOptions {
            include: vec!["Top".into()],
            ignore_defaults: true,
            ..Default::default()
        };
        let n = Normalizer::from_options(&options, RenameRules::new(), Arc::new(defaults)).unwrap();
        let out = n.run(&conf).unwrap().configuration;

        // `Decl` is filtered out before defaults run; its declaration still counts
        let names: Vec<_> = out.names().collect();
        assert_eq!(names, vec!["Top.tool"]);
        let tool = out.get("Top.tool").unwrap();
        assert!(!tool.contains_key("Cut"));
        assert_eq!(tool["Mode"], json!(1));
    }
}
