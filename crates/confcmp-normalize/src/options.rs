use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NormalizeError, NormalizeResult};
use crate::rules::RenameRules;

/// Bookkeeping properties that never matter for a comparison.
pub const DEFAULT_IGNORED_PROPERTIES: &[&str] = &[
    "AuditAlgorithms",
    "AuditBeginRun",
    "AuditEndRun",
    "AuditExecute",
    "AuditFinalize",
    "AuditInitialize",
    "AuditReinitialize",
    "AuditRestart",
    "AuditServices",
    "AuditStart",
    "AuditStop",
    "AuditTools",
    "DetStore",
    "EventStore",
    "EvtStore",
    "ExtraInputs",
    "ExtraOutputs",
    "MetaDataStore",
    "NeededResources",
    "OutputLevel",
    "StoreGateSvc",
];

/// Options controlling which normalization stages run and how.
///
/// Every field has a neutral default, so an options file only needs to
/// mention what it changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeOptions {
    /// Regular expressions selecting components (matched at the start of
    /// the name).
    pub include: Vec<String>,
    /// Regular expressions rejecting components.
    pub exclude: Vec<String>,
    /// Maximum number of reference hops followed from selected components.
    pub follow_depth: usize,
    /// Strip bookkeeping properties.
    pub ignore_irrelevant: bool,
    /// Replaces [`DEFAULT_IGNORED_PROPERTIES`] when set.
    pub ignore_list: Option<Vec<String>>,
    /// Inline `old=new` rename rules.
    pub rename: Vec<String>,
    /// Rename rules files.
    pub rename_files: Vec<PathBuf>,
    /// Drop properties equal to their type's declared default.
    pub ignore_defaults: bool,
    /// Also drop `Type/instance` values whose instance is the default.
    pub ignore_default_named: bool,
    /// Collapse `X/X` values to `X`.
    pub shorten_default_components: bool,
    /// Keep only reference-valued properties and `Members`.
    pub skip_properties: bool,
}

impl NormalizeOptions {
    /// Parse options from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> NormalizeResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| NormalizeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| NormalizeError::Options {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Property names stripped by the irrelevant-property stage.
    pub fn ignored_properties(&self) -> Vec<String> {
        match &self.ignore_list {
            Some(list) => list.clone(),
            None => DEFAULT_IGNORED_PROPERTIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Assemble the rename rules of one comparison run.
    ///
    /// Files are registered in order, then inline rules, so an inline rule
    /// overrides a file rule for the same name.
    pub fn rename_rules(&self) -> NormalizeResult<RenameRules> {
        let mut rules = RenameRules::new();
        for path in &self.rename_files {
            rules.extend_from_file(path)?;
        }
        rules.extend_from_args(&self.rename)?;
        Ok(rules)
    }
}
