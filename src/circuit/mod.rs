//! Circuit graph representation and validation.
//!
//! A lab circuit is a set of placed [`Component`]s with undirected,
//! symmetric connections between them. The [`ComponentRegistry`] owns the
//! graph and is the only way to change it; every connection is stored as an
//! id on both endpoints, so removal is a pure map/set edit.

mod registry;
mod types;
mod validate;

pub use registry::{Component, ComponentRegistry};
pub use types::*;
pub use validate::validate_registry;
