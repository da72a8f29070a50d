//! Built-in normalization stages, in pipeline order.

pub mod defaults;
pub mod include;
pub mod irrelevant;
pub mod project;
pub mod rename;
pub mod shorten;

pub use defaults::DefaultsStage;
pub use include::{ComponentFilter, IncludeExcludeStage};
pub use irrelevant::StripIrrelevantStage;
pub use project::ProjectReferencesStage;
pub use rename::RenameStage;
pub use shorten::ShortenStage;
