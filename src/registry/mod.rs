// src/registry/mod.rs

//! Definition store: aliases mapped to raw values or operations.
//!
//! - [`store`] owns the keyed entry map and the registration contract.
//! - [`entry`] defines the entry kinds, operations, and the execution
//!   context operations receive.
//! - [`deps`] is the pluggable dependency-extraction seam.
//! - [`validate`] is an optional static pre-flight over the declared graph.

pub mod deps;
pub mod entry;
pub mod store;
pub mod validate;

pub use deps::{signature_of, DeclaredDependencies, DependencySource};
pub use entry::{Entry, OpContext, Operation};
pub use store::Registry;
pub use validate::validate_registry;
