//! Reference handling for confcmp configurations.
//!
//! Property values frequently name other components, either bare
//! (`"FieldSvc"`) or qualified by a type (`"MagFieldSvc/FieldSvc"`). This
//! crate finds those references and infers component types from them.
//!
//! # Key Types
//!
//! - [`ReferenceResolver`] / [`Reference`] -- value to referenced components
//! - [`ServiceClassCache`] -- service classes declared by the application manager
//! - [`infer_types`] / [`TypeMap`] -- instance name to type name

pub mod infer;
pub mod resolve;

pub use infer::{infer_types, TypeMap};
pub use resolve::{
    resolve_references, Reference, ReferenceResolver, ServiceClassCache, APPLICATION_MANAGER,
    SHARED_POOL,
};
