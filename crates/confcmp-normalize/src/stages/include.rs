use confcmp_refs::ReferenceResolver;
use confcmp_types::Configuration;
use indexmap::IndexSet;
use regex::Regex;
use tracing::debug;

use crate::error::{NormalizeError, NormalizeResult};
use crate::stage::{NormalizeContext, NormalizeStage};

/// Compiled include and exclude patterns.
///
/// Patterns match at the start of a component name. With only include
/// patterns a component must match one of them; with only exclude patterns
/// it must match none; with both, both conditions hold.
#[derive(Clone, Debug)]
pub struct ComponentFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl ComponentFilter {
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> NormalizeResult<Self> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Returns `true` if there is nothing to filter on.
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Matches an exclude pattern.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(name))
    }

    /// Selected by the patterns alone, without reference following.
    pub fn is_selected(&self, name: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|re| re.is_match(name));
        included && !self.is_excluded(name)
    }
}

fn compile<S: AsRef<str>>(patterns: &[S]) -> NormalizeResult<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            let pattern = p.as_ref();
            Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
                NormalizeError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                }
            })
        })
        .collect()
}

/// Keep the components selected by `filter`, plus every component reachable
/// from them by following references for at most `depth` hops.
///
/// `must_follow` is owned by the caller: names already in it are treated as
/// reached, and every component reached by following is added to it.
/// Explicitly excluded components are never reached. The output keeps the
/// input order.
pub fn include_exclude(
    config: &Configuration,
    filter: &ComponentFilter,
    depth: usize,
    must_follow: &mut IndexSet<String>,
) -> Configuration {
    let resolver = ReferenceResolver::new(config);

    let mut included: IndexSet<&str> = config
        .names()
        .filter(|name| {
            filter.is_selected(name) || (must_follow.contains(*name) && !filter.is_excluded(name))
        })
        .collect();
    let mut frontier: Vec<&str> = included.iter().copied().collect();

    for hop in 1..=depth {
        let mut reached = Vec::new();
        for &name in &frontier {
            let Some(properties) = config.get(name) else {
                continue;
            };
            for value in properties.values() {
                for reference in resolver.resolve(value, name) {
                    let Some((target, _)) = config.get_key_value(&reference.target) else {
                        continue;
                    };
                    if filter.is_excluded(target) || included.contains(target.as_str()) {
                        continue;
                    }
                    must_follow.insert(target.clone());
                    included.insert(target.as_str());
                    reached.push(target.as_str());
                }
            }
        }
        debug!(hop, reached = reached.len(), "followed references");
        if reached.is_empty() {
            break;
        }
        frontier = reached;
    }

    config.filter_map(|name, properties| included.contains(name).then(|| properties.clone()))
}

/// Pipeline stage for [`include_exclude`].
pub struct IncludeExcludeStage {
    filter: ComponentFilter,
    depth: usize,
}

impl IncludeExcludeStage {
    pub fn new(filter: ComponentFilter, depth: usize) -> Self {
        Self { filter, depth }
    }
}

impl NormalizeStage for IncludeExcludeStage {
    fn name(&self) -> &str {
        "include-exclude"
    }

    fn apply(
        &self,
        config: &Configuration,
        _context: &NormalizeContext,
    ) -> NormalizeResult<Configuration> {
        let mut must_follow = IndexSet::new();
        Ok(include_exclude(config, &self.filter, self.depth, &mut must_follow))
    }
}
