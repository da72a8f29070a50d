use confcmp_types::Configuration;
use indexmap::IndexSet;

use crate::error::NormalizeResult;
use crate::stage::{NormalizeContext, NormalizeStage};

/// Remove the named properties from every component.
///
/// Components are kept even when this leaves them without properties.
pub fn strip_irrelevant(config: &Configuration, ignored: &IndexSet<String>) -> Configuration {
    config.filter_map(|_, properties| {
        Some(
            properties
                .iter()
                .filter(|(key, _)| !ignored.contains(key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    })
}

/// Pipeline stage for [`strip_irrelevant`].
pub struct StripIrrelevantStage {
    ignored: IndexSet<String>,
}

impl StripIrrelevantStage {
    pub fn new<I, S>(ignored: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored: ignored.into_iter().map(Into::into).collect(),
        }
    }
}

impl NormalizeStage for StripIrrelevantStage {
    fn name(&self) -> &str {
        "strip-irrelevant"
    }

    fn apply(
        &self,
        config: &Configuration,
        _context: &NormalizeContext,
    ) -> NormalizeResult<Configuration> {
        Ok(strip_irrelevant(config, &self.ignored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_listed_properties_only() {
        let conf = Configuration::from_json(json!({
            "Alg": {"OutputLevel": 3, "Cut": 1.5, "ExtraInputs": []},
            "Svc": {"OutputLevel": 2}
        }))
        .unwrap();
        let stage = StripIrrelevantStage::new(["OutputLevel", "ExtraInputs"]);
        let out = stage.apply(&conf, &NormalizeContext::new()).unwrap();

        assert_eq!(out.get("Alg").unwrap().len(), 1);
        assert_eq!(out.get("Alg").unwrap()["Cut"], json!(1.5));
        // emptied components stay
        assert!(out.get("Svc").unwrap().is_empty());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn input_is_not_modified() {
        let conf = Configuration::from_json(json!({"Alg": {"OutputLevel": 3}})).unwrap();
        let _ = strip_irrelevant(&conf, &["OutputLevel".to_string()].into_iter().collect());
        assert_eq!(conf.get("Alg").unwrap().len(), 1);
    }
}
