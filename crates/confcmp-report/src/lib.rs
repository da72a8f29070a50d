//! Property-level comparison for confcmp.
//!
//! The aligner tells which components exist on only one side; this crate
//! compares the properties of the components present on both, and filters
//! out differences the user has declared as known.
//!
//! # Key Types
//!
//! - [`ComparisonReport`] / [`PropertyChange`] -- the outcome of a comparison
//! - [`KnownDifferences`] -- differences to suppress, read from a file

pub mod compare;
pub mod differences;
pub mod error;

pub use compare::{compare_configurations, ChangeKind, ComparisonReport, PropertyChange};
pub use differences::{KnownDifference, KnownDifferences};
pub use error::{ReportError, ReportResult};
