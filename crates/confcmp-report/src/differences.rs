//! Known differences: property changes the user expects and wants hidden.
//!
//! The file format is one difference per line:
//!
//! ```text
//! # comment
//! TopAlg.Cut 1=2
//! TopAlg.Tool.Mode =fast
//! ```
//!
//! The key is split at its last `.` into component and property. The value
//! part is split at its first `=`; an empty side matches anything.

use std::fs;
use std::path::Path;

use confcmp_types::{parse_literal, stringify, Value, NAME_SEPARATOR};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReportError, ReportResult};

/// One expected difference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownDifference {
    pub component: String,
    pub property: String,
    /// Expected left value in dump form; `None` matches any value.
    pub left: Option<String>,
    /// Expected right value in dump form; `None` matches any value.
    pub right: Option<String>,
}

impl KnownDifference {
    /// Returns `true` if this difference covers the given pair of values.
    ///
    /// An absent value only matches a wildcard side.
    pub fn matches(&self, left: Option<&Value>, right: Option<&Value>) -> bool {
        side_matches(self.left.as_deref(), left) && side_matches(self.right.as_deref(), right)
    }
}

fn side_matches(expected: Option<&str>, actual: Option<&Value>) -> bool {
    match (expected, actual) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(expected), Some(actual)) => canonical_text(expected) == canonical_value(actual),
    }
}

fn canonical_text(text: &str) -> String {
    parse_literal(text)
        .map(|v| stringify(&v))
        .unwrap_or_else(|| text.to_string())
}

fn canonical_value(value: &Value) -> String {
    match value {
        Value::String(s) => canonical_text(s),
        other => stringify(other),
    }
}

/// A set of known differences.
#[derive(Clone, Debug, Default)]
pub struct KnownDifferences {
    entries: Vec<KnownDifference>,
}

impl KnownDifferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, difference: KnownDifference) {
        self.entries.push(difference);
    }

    /// Read a differences file.
    ///
    /// Blank lines and `#` comments are skipped; any malformed line fails
    /// the whole file with its 1-based line number.
    pub fn load(path: &Path) -> ReportResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut known = Self::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let difference = parse_line(line).map_err(|reason| ReportError::Differences {
                path: path.to_path_buf(),
                line: index + 1,
                reason,
            })?;
            known.insert(difference);
        }

        debug!(path = %path.display(), entries = known.len(), "loaded known differences");
        Ok(known)
    }

    /// Load and concatenate several files.
    pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> ReportResult<Self> {
        let mut known = Self::new();
        for path in paths {
            known.entries.extend(Self::load(path.as_ref())?.entries);
        }
        Ok(known)
    }

    /// Returns `true` if some entry covers this property change.
    pub fn is_known(
        &self,
        component: &str,
        property: &str,
        left: Option<&Value>,
        right: Option<&Value>,
    ) -> bool {
        self.entries.iter().any(|d| {
            d.component == component && d.property == property && d.matches(left, right)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &KnownDifference> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_line(line: &str) -> Result<KnownDifference, String> {
    let (key, values) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| format!("expected `Component.Property Old=New`, got {line:?}"))?;
    let (component, property) = key
        .rsplit_once(NAME_SEPARATOR)
        .filter(|(c, p)| !c.is_empty() && !p.is_empty())
        .ok_or_else(|| format!("key {key:?} is not of the form Component.Property"))?;
    let (left, right) = values
        .trim()
        .split_once('=')
        .ok_or_else(|| format!("missing `=` in {values:?}"))?;

    Ok(KnownDifference {
        component: component.to_string(),
        property: property.to_string(),
        left: non_empty(left),
        right: non_empty(right),
    })
}

fn non_empty(side: &str) -> Option<String> {
    let side = side.trim();
    (!side.is_empty()).then(|| side.to_string())
}
