//! Component rename rules.
//!
//! Rules come from inline `old=new` arguments and from rules files with one
//! `Old=New` per line. A [`RenameRules`] value is built once per comparison
//! run and handed to the pipeline; registering an `old` name twice keeps
//! the last replacement.

use std::fs;
use std::path::Path;

use confcmp_types::value::rewrite_strings;
use confcmp_types::{split_typed_name, Value};
use indexmap::IndexMap;
use tracing::debug;

use crate::error::{NormalizeError, NormalizeResult};

/// Ordered `old -> new` component name fragments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenameRules {
    rules: IndexMap<String, String>,
}

impl RenameRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule, returning the replacement it overrode.
    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) -> Option<String> {
        let old = old.into();
        let new = new.into();
        let previous = self.rules.insert(old.clone(), new.clone());
        if let Some(previous) = &previous {
            if *previous != new {
                debug!(old = %old, previous = %previous, new = %new, "rename rule overridden");
            }
        }
        previous
    }

    /// Parse inline `old=new` arguments.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> NormalizeResult<Self> {
        let mut rules = Self::new();
        rules.extend_from_args(args)?;
        Ok(rules)
    }

    /// Register inline `old=new` arguments.
    pub fn extend_from_args<S: AsRef<str>>(&mut self, args: &[S]) -> NormalizeResult<()> {
        for arg in args {
            let arg = arg.as_ref();
            let (old, new) = parse_rule(arg).map_err(|_| NormalizeError::InvalidRenameRule {
                rule: arg.to_string(),
            })?;
            self.insert(old, new);
        }
        Ok(())
    }

    /// Register every rule of a rules file.
    ///
    /// Blank lines and `#` comments are skipped. Any malformed line rejects
    /// the whole file and nothing from it is registered.
    pub fn extend_from_file(&mut self, path: &Path) -> NormalizeResult<()> {
        let text = fs::read_to_string(path).map_err(|source| NormalizeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut parsed = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let rule = parse_rule(line).map_err(|reason| NormalizeError::RenameFile {
                path: path.to_path_buf(),
                line: index + 1,
                reason,
            })?;
            parsed.push(rule);
        }

        debug!(path = %path.display(), rules = parsed.len(), "loaded rename rules");
        for (old, new) in parsed {
            self.insert(old, new);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Replacement for an exact name, if any.
    pub fn get(&self, old: &str) -> Option<&str> {
        self.rules.get(old).map(String::as_str)
    }

    /// Rename a dotted component name.
    ///
    /// An exact whole-name rule wins. Otherwise rules are tried in
    /// registration order, each as an interior segment (`.old.`), a leading
    /// segment (`old.`) and a trailing segment (`.old`); the first match is
    /// applied once and the result is not renamed again.
    pub fn rename_component(&self, name: &str) -> String {
        if let Some(new) = self.rules.get(name) {
            return new.clone();
        }
        for (old, new) in &self.rules {
            let interior = format!(".{old}.");
            if name.contains(&interior) {
                return name.replace(&interior, &format!(".{new}."));
            }
            if let Some(rest) = name.strip_prefix(&format!("{old}.")) {
                return format!("{new}.{rest}");
            }
            if let Some(head) = name.strip_suffix(&format!(".{old}")) {
                return format!("{head}.{new}");
            }
        }
        name.to_string()
    }

    /// Rename component references held in a property value.
    ///
    /// Strings equal to a rule's `old`, or of the form `Type/old`, are
    /// rewritten; strings inside lists and stringified lists included.
    pub fn rename_value(&self, value: &Value) -> Value {
        rewrite_strings(value, &mut |s: &str| {
            if let Some(new) = self.rules.get(s) {
                return Some(new.clone());
            }
            let (class, instance) = split_typed_name(s)?;
            self.rules.get(instance).map(|new| format!("{class}/{new}"))
        })
    }
}

fn parse_rule(line: &str) -> Result<(String, String), String> {
    let Some((old, new)) = line.split_once('=') else {
        return Err(format!("expected OLD=NEW, got {line:?}"));
    };
    let (old, new) = (old.trim(), new.trim());
    if old.is_empty() || new.is_empty() {
        return Err(format!("empty side in rename rule {line:?}"));
    }
    Ok((old.to_string(), new.to_string()))
}
