use std::sync::Arc;

use confcmp_refs::TypeMap;
use confcmp_types::{last_segment, split_typed_name, stringify, Configuration, Properties, Value};
use tracing::debug;

use crate::error::NormalizeResult;
use crate::provider::TypeDefaultsProvider;
use crate::stage::{NormalizeContext, NormalizeStage};

/// Prefix of event-store keys, stripped before comparing with a default.
pub const STORE_PREFIX: &str = "StoreGateSvc+";

/// Declared defaults of a component, trying in order the inferred type of
/// the full name, the inferred type of the last segment, the last segment
/// and the full name.
pub fn defaults_of<'p>(
    name: &str,
    types: &TypeMap,
    provider: &'p dyn TypeDefaultsProvider,
) -> Option<&'p Properties> {
    let short = last_segment(name);
    let candidates = [
        types.get(name).map(String::as_str),
        types.get(short).map(String::as_str),
        Some(short),
        Some(name),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|type_name| provider.defaults_for(type_name))
}

/// Returns `true` if `value` is equivalent to the declared `default`.
///
/// Both sides are compared in their dump form with [`STORE_PREFIX`]
/// stripped. With `default_named`, a `"Type/instance"` value whose instance
/// equals the default also counts.
pub fn is_default(value: &Value, default: &Value, default_named: bool) -> bool {
    let value_text = stringify(value);
    let default_text = stringify(default);
    let value_text = strip_store(&value_text);
    let default_text = strip_store(&default_text);

    if value_text == default_text {
        return true;
    }
    if default_named {
        if let Some((_, instance)) = split_typed_name(value_text) {
            return instance == default_text;
        }
    }
    false
}

fn strip_store(s: &str) -> &str {
    s.strip_prefix(STORE_PREFIX).unwrap_or(s)
}

/// Drop every property equal to its type's declared default.
///
/// Components whose type the provider does not know keep all properties. A
/// component that loses its last property here is dropped; one that had no
/// properties to begin with is kept.
pub fn eliminate_defaults(
    config: &Configuration,
    types: &TypeMap,
    provider: &dyn TypeDefaultsProvider,
    default_named: bool,
) -> Configuration {
    config.filter_map(|name, properties| {
        let Some(defaults) = defaults_of(name, types, provider) else {
            debug!(component = name, "no declared defaults");
            return Some(properties.clone());
        };

        let kept: Properties = properties
            .iter()
            .filter(|(key, value)| match defaults.get(key.as_str()) {
                Some(default) => !is_default(value, default, default_named),
                None => true,
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        if kept.is_empty() && !properties.is_empty() {
            debug!(component = name, "all properties at default, component dropped");
            return None;
        }
        Some(kept)
    })
}

/// Pipeline stage for [`eliminate_defaults`].
///
/// Unless an explicit type map is given, the types of the run's
/// [`NormalizeContext`] are used. Either way the types are fixed for the
/// run, so applying the stage to its own output changes nothing.
pub struct DefaultsStage {
    provider: Arc<dyn TypeDefaultsProvider>,
    types: Option<TypeMap>,
    default_named: bool,
}

impl DefaultsStage {
    pub fn new(provider: Arc<dyn TypeDefaultsProvider>, default_named: bool) -> Self {
        Self {
            provider,
            types: None,
            default_named,
        }
    }

    /// Use `types` instead of the types of the run's context.
    pub fn with_types(mut self, types: TypeMap) -> Self {
        self.types = Some(types);
        self
    }
}

impl NormalizeStage for DefaultsStage {
    fn name(&self) -> &str {
        "eliminate-defaults"
    }

    fn apply(
        &self,
        config: &Configuration,
        context: &NormalizeContext,
    ) -> NormalizeResult<Configuration> {
        let types = self.types.as_ref().unwrap_or(&context.types);
        Ok(eliminate_defaults(
            config,
            types,
            self.provider.as_ref(),
            self.default_named,
        ))
    }
}
