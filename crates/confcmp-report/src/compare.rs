//! Property-level comparison of two configurations.
//!
//! Components present on only one side are listed by name. For components
//! present on both sides every property is compared after unwrapping
//! stringified literals, so `"[1, 2]"` and `[1, 2]` are the same value.

use confcmp_types::{literal_or_self, Configuration, Properties, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::differences::KnownDifferences;

/// What happened to a property between the left and right side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Only the right side sets it.
    Added,
    /// Only the left side sets it.
    Removed,
    /// Both sides set it to different values.
    Modified,
}

/// A single property difference of a component present on both sides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyChange {
    pub component: String,
    pub property: String,
    pub left: Option<Value>,
    pub right: Option<Value>,
}

impl PropertyChange {
    pub fn kind(&self) -> ChangeKind {
        match (&self.left, &self.right) {
            (None, _) => ChangeKind::Added,
            (_, None) => ChangeKind::Removed,
            _ => ChangeKind::Modified,
        }
    }
}

/// The result of comparing two configurations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Components only on the left, in left order.
    pub only_left: Vec<String>,
    /// Components only on the right, in right order.
    pub only_right: Vec<String>,
    /// Property differences of common components.
    pub changed: Vec<PropertyChange>,
    /// Number of differences hidden because they were known.
    pub suppressed: usize,
}

impl ComparisonReport {
    /// Returns `true` if no difference remains.
    pub fn is_empty(&self) -> bool {
        self.only_left.is_empty() && self.only_right.is_empty() && self.changed.is_empty()
    }

    /// Number of remaining differences, components and properties alike.
    pub fn len(&self) -> usize {
        self.only_left.len() + self.only_right.len() + self.changed.len()
    }

    pub fn additions(&self) -> usize {
        self.count(ChangeKind::Added)
    }

    pub fn removals(&self) -> usize {
        self.count(ChangeKind::Removed)
    }

    pub fn modifications(&self) -> usize {
        self.count(ChangeKind::Modified)
    }

    fn count(&self, kind: ChangeKind) -> usize {
        self.changed.iter().filter(|c| c.kind() == kind).count()
    }

    /// Property changes of one component.
    pub fn changes_of<'a>(&'a self, component: &'a str) -> impl Iterator<Item = &'a PropertyChange> {
        self.changed.iter().filter(move |c| c.component == component)
    }
}

/// Compare `left` against `right`, leaving out differences in `known`.
pub fn compare_configurations(
    left: &Configuration,
    right: &Configuration,
    known: &KnownDifferences,
) -> ComparisonReport {
    let mut report = ComparisonReport::default();

    for (name, left_props) in left {
        match right.get(name) {
            Some(right_props) => compare_properties(name, left_props, right_props, known, &mut report),
            None => report.only_left.push(name.clone()),
        }
    }
    report.only_right = right
        .names()
        .filter(|name| !left.contains(name))
        .map(str::to_string)
        .collect();

    debug!(
        only_left = report.only_left.len(),
        only_right = report.only_right.len(),
        changed = report.changed.len(),
        suppressed = report.suppressed,
        "compared configurations"
    );
    report
}

fn compare_properties(
    component: &str,
    left: &Properties,
    right: &Properties,
    known: &KnownDifferences,
    report: &mut ComparisonReport,
) {
    let left_keys = left.keys();
    let right_only = right.keys().filter(|k| !left.contains_key(*k));

    for property in left_keys.chain(right_only) {
        let l = left.get(property);
        let r = right.get(property);
        let same = match (l, r) {
            (Some(l), Some(r)) => l == r || literal_or_self(l) == literal_or_self(r),
            _ => false,
        };
        if same {
            continue;
        }
        if known.is_known(component, property, l, r) {
            report.suppressed += 1;
            continue;
        }
        report.changed.push(PropertyChange {
            component: component.to_string(),
            property: property.clone(),
            left: l.cloned(),
            right: r.cloned(),
        });
    }
}
