// src/registry/deps.rs

//! Dependency-name extraction.
//!
//! Operations carry an explicit, ordered list of alias names; this module is
//! the narrow seam the registry consults whenever an operation is defined.
//! Swapping in another [`DependencySource`] lets embedders rewrite or
//! normalize declarations without touching the resolver.

use crate::errors::{ResolveError, Result};
use crate::registry::entry::Operation;

/// Collaborator that produces the ordered dependency list for an operation.
pub trait DependencySource<V>: Send + Sync {
    /// Ordered alias names `operation` requires as positional inputs.
    ///
    /// Fails with [`ResolveError::InvalidOperation`] when the declaration is
    /// unusable; registration is rejected before any resolution is attempted.
    fn dependencies_of(&self, alias: &str, operation: &Operation<V>) -> Result<Vec<String>>;
}

/// Default source: trusts the list declared on the operation, after checking
/// that every name can actually be looked up later.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredDependencies;

impl<V> DependencySource<V> for DeclaredDependencies {
    fn dependencies_of(&self, alias: &str, operation: &Operation<V>) -> Result<Vec<String>> {
        let deps = operation.dependencies();
        for (index, name) in deps.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ResolveError::InvalidOperation {
                    alias: alias.to_string(),
                    reason: format!("dependency #{index} is empty"),
                });
            }
            if name.chars().any(char::is_whitespace) {
                return Err(ResolveError::InvalidOperation {
                    alias: alias.to_string(),
                    reason: format!("dependency \"{name}\" contains whitespace"),
                });
            }
        }
        Ok(deps.to_vec())
    }
}

/// Deterministic display signature for an unregistered operation, derived
/// from its declared dependency list.
pub fn signature_of(dependencies: &[String]) -> String {
    format!("fn({})", dependencies.join(", "))
}
