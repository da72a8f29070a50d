//! Tree alignment for confcmp.
//!
//! Aligns two hierarchies built by `confcmp-hierarchy` and marks every node
//! that has no counterpart on the other side. Insertions, deletions and
//! simple reorderings are tolerated; see [`align`] for the lookahead policy.

pub mod align;
pub mod diff;

pub use align::{mark_differences, AlignState, AlignmentReport};
pub use diff::{diff_configurations, HierarchyDiff};
