//! Normalization pipeline for confcmp.
//!
//! Before two configurations are compared they are run through the same
//! chain of independent stages, each producing a new configuration:
//!
//! 1. include/exclude by name pattern, following references
//! 2. strip bookkeeping properties
//! 3. rename components
//! 4. drop properties at their type's default value
//! 5. collapse default-named `X/X` references
//! 6. keep only reference-valued properties
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use confcmp_normalize::{InMemoryTypeDefaults, NormalizeOptions, Normalizer, RenameRules};
//! use confcmp_types::Configuration;
//!
//! let options = NormalizeOptions {
//!     exclude: vec!["Debug".into()],
//!     ..Default::default()
//! };
//! let normalizer = Normalizer::from_options(
//!     &options,
//!     RenameRules::new(),
//!     Arc::new(InMemoryTypeDefaults::new()),
//! )
//! .unwrap();
//!
//! let config = Configuration::from_json(serde_json::json!({
//!     "Alg": {"Cut": 1},
//!     "DebugAlg": {"Cut": 2}
//! }))
//! .unwrap();
//! let outcome = normalizer.run(&config).unwrap();
//! assert_eq!(outcome.configuration.len(), 1);
//! ```

pub mod error;
pub mod options;
pub mod pipeline;
pub mod provider;
pub mod rules;
pub mod stage;
pub mod stages;

pub use error::{NormalizeError, NormalizeResult};
pub use options::{NormalizeOptions, DEFAULT_IGNORED_PROPERTIES};
pub use pipeline::{NormalizeOutcome, Normalizer};
pub use provider::{InMemoryTypeDefaults, TypeDefaultsProvider};
pub use rules::RenameRules;
pub use stage::{NormalizeContext, NormalizeStage, StageReport};
pub use stages::defaults::{eliminate_defaults, is_default};
pub use stages::include::include_exclude;
pub use stages::irrelevant::strip_irrelevant;
pub use stages::project::project_references;
pub use stages::rename::rename_components;
pub use stages::shorten::shorten_default_named;
pub use stages::ComponentFilter;
