use confcmp_types::Configuration;
use tracing::debug;

use crate::error::NormalizeResult;
use crate::rules::RenameRules;
use crate::stage::{NormalizeContext, NormalizeStage};

/// Rename every component key, and every reference to a renamed
/// component held in a property value.
///
/// When two components end up under the same name the later one wins.
pub fn rename_components(config: &Configuration, rules: &RenameRules) -> Configuration {
    let mut out = Configuration::new();
    for (name, properties) in config {
        let renamed = rules.rename_component(name);
        let properties = properties
            .iter()
            .map(|(key, value)| (key.clone(), rules.rename_value(value)))
            .collect();
        if renamed != *name {
            debug!(from = %name, to = %renamed, "renamed component");
        }
        if let Ok(Some(_)) = out.insert(renamed.clone(), properties) {
            debug!(name = %renamed, "rename collision, later component kept");
        }
    }
    out
}

/// Pipeline stage for [`rename_components`].
pub struct RenameStage {
    rules: RenameRules,
}

impl RenameStage {
    pub fn new(rules: RenameRules) -> Self {
        Self { rules }
    }
}

impl NormalizeStage for RenameStage {
    fn name(&self) -> &str {
        "rename"
    }

    fn apply(
        &self,
        config: &Configuration,
        _context: &NormalizeContext,
    ) -> NormalizeResult<Configuration> {
        Ok(rename_components(config, &self.rules))
    }
}
