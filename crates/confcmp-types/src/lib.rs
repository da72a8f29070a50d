//! Foundation types for confcmp.
//!
//! A [`Configuration`] is a flat, insertion-ordered mapping from dotted
//! component names (`ToolSvc.ToolA.SubTool`) to property mappings. Property
//! values are plain [`serde_json::Value`]s.
//!
//! # Modules
//!
//! - [`config`] -- [`Configuration`] and [`Properties`]
//! - [`value`] -- literal parsing and dump-style rendering of property values
//! - [`load`] -- JSON configuration loader
//! - [`error`] -- [`ConfigError`]

pub mod config;
pub mod error;
pub mod load;
pub mod value;

pub use config::{last_segment, Configuration, Properties, NAME_SEPARATOR};
pub use error::{ConfigError, ConfigResult};
pub use load::{load_configuration, load_configurations};
pub use value::{literal_or_self, parse_literal, split_typed_name, stringify};

pub use serde_json::Value;
