//! Hierarchy reconstruction for confcmp.
//!
//! Component names are dotted paths; this crate turns a flat
//! [`Configuration`](confcmp_types::Configuration) back into the tree those
//! paths imply, ready to be aligned against another tree.
//!
//! # Key Types
//!
//! - [`HierarchyNode`] / [`NodeKind`] -- leaves and grouping nodes
//! - [`HierarchyBuilder`] -- configuration to sibling sequence

pub mod builder;
pub mod node;

pub use builder::{build_hierarchy, HierarchyBuilder};
pub use node::{clear_marks, find_node, marked_paths, HierarchyNode, NodeKind};
