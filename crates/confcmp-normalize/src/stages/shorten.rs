use confcmp_types::value::rewrite_strings;
use confcmp_types::{split_typed_name, Configuration, Value};

use crate::error::NormalizeResult;
use crate::stage::{NormalizeContext, NormalizeStage};

/// Collapse `"X/X"` to `"X"`.
pub fn shorten_value(value: &Value) -> Value {
    rewrite_strings(value, &mut |s: &str| {
        let (class, instance) = split_typed_name(s)?;
        (class == instance).then(|| instance.to_string())
    })
}

/// Collapse every default-named `"X/X"` reference in every property value.
pub fn shorten_default_named(config: &Configuration) -> Configuration {
    config.filter_map(|_, properties| {
        Some(
            properties
                .iter()
                .map(|(key, value)| (key.clone(), shorten_value(value)))
                .collect(),
        )
    })
}

/// Pipeline stage for [`shorten_default_named`].
pub struct ShortenStage;

impl NormalizeStage for ShortenStage {
    fn name(&self) -> &str {
        "shorten-default-named"
    }

    fn apply(
        &self,
        config: &Configuration,
        _context: &NormalizeContext,
    ) -> NormalizeResult<Configuration> {
        Ok(shorten_default_named(config))
    }
}
