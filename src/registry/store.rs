// src/registry/store.rs

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::errors::Result;
use crate::registry::deps::{DeclaredDependencies, DependencySource};
use crate::registry::entry::{Entry, Operation};

/// Keyed store of definitions: alias -> value or operation.
///
/// The registry owns no execution logic. It is mutated by registration calls
/// only, which are expected to happen during a setup phase before concurrent
/// resolution begins; concurrent registration and resolution is unsupported.
pub struct Registry<V> {
    entries: HashMap<String, Entry<V>>,
    deps: Box<dyn DependencySource<V>>,
}

impl<V: Clone + Send + Sync + 'static> Registry<V> {
    pub fn new() -> Self {
        Self::with_dependency_source(Box::new(DeclaredDependencies))
    }

    /// Registry with a custom dependency-extraction collaborator.
    pub fn with_dependency_source(deps: Box<dyn DependencySource<V>>) -> Self {
        Self {
            entries: HashMap::new(),
            deps,
        }
    }

    /// Record `alias -> value`. No dependency inference; overwrites silently.
    pub fn define_value(&mut self, alias: impl Into<String>, value: V) {
        let alias = alias.into();
        debug!(alias = %alias, "defining value");
        self.entries.insert(alias, Entry::Value(value));
    }

    /// Record `alias -> operation`, attaching the dependency list produced
    /// by the extraction collaborator. Overwrites silently on success.
    pub fn define_operation(
        &mut self,
        alias: impl Into<String>,
        operation: Operation<V>,
    ) -> Result<()> {
        let alias = alias.into();
        let dependencies = self.deps.dependencies_of(&alias, &operation)?;
        debug!(alias = %alias, deps = ?dependencies, "defining operation");
        self.entries
            .insert(alias, Entry::Operation(operation.with_dependencies(dependencies)));
        Ok(())
    }

    /// Read access for the resolver; executes nothing.
    pub fn lookup(&self, alias: &str) -> Option<&Entry<V>> {
        self.entries.get(alias)
    }

    /// All registered aliases, in no particular order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    /// Registered entries; used by the static validation pass.
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, &Entry<V>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V: Clone + Send + Sync + 'static> Default for Registry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Registry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut aliases: Vec<&str> = self.entries.keys().map(|s| s.as_str()).collect();
        aliases.sort_unstable();
        f.debug_struct("Registry")
            .field("aliases", &aliases)
            .finish_non_exhaustive()
    }
}
