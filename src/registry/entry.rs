// src/registry/entry.rs

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::engine::cache::ResolveCache;
use crate::registry::deps;

/// What an alias maps to: a raw value, or a computation with dependencies.
///
/// An alias maps to exactly one entry kind at a time; redefining it replaces
/// the previous entry wholesale.
#[derive(Clone)]
pub enum Entry<V> {
    Value(V),
    Operation(Operation<V>),
}

impl<V> fmt::Debug for Entry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Value(_) => f.write_str("Value(..)"),
            Entry::Operation(op) => write!(f, "Operation({})", op.signature()),
        }
    }
}

type ComputeFn<V> = dyn Fn(OpContext<V>) -> BoxFuture<'static, anyhow::Result<V>> + Send + Sync;

/// A computation paired with its ordered dependency declaration.
///
/// The dependency list is explicit: order is argument order, duplicates are
/// preserved, uniqueness is not required. The body receives an [`OpContext`]
/// once all dependencies have settled.
pub struct Operation<V> {
    dependencies: Vec<String>,
    compute: Arc<ComputeFn<V>>,
}

impl<V> Clone for Operation<V> {
    fn clone(&self) -> Self {
        Self {
            dependencies: self.dependencies.clone(),
            compute: Arc::clone(&self.compute),
        }
    }
}

impl<V> fmt::Debug for Operation<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

impl<V> Operation<V> {
    /// Asynchronous operation over the given dependency aliases.
    pub fn new<I, S, F, Fut>(dependencies: I, compute: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(OpContext<V>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        Self {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            compute: Arc::new(move |ctx| compute(ctx).boxed()),
        }
    }

    /// Convenience for operations with no suspension points of their own.
    pub fn from_fn<I, S, F>(dependencies: I, compute: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(OpContext<V>) -> anyhow::Result<V> + Send + Sync + 'static,
        V: Send + 'static,
    {
        Self::new(dependencies, move |ctx| std::future::ready(compute(ctx)))
    }

    /// Declared dependency aliases, in argument order.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Deterministic display signature derived from the declared dependency
    /// list, e.g. `fn(base, scale)`. Used for cycle diagnostics when the
    /// operation is resolved without an alias.
    pub fn signature(&self) -> String {
        deps::signature_of(&self.dependencies)
    }

    /// Replace the declared list; used when a
    /// [`DependencySource`](crate::registry::DependencySource) rewrites it.
    pub(crate) fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub(crate) fn invoke(&self, ctx: OpContext<V>) -> BoxFuture<'static, anyhow::Result<V>> {
        (self.compute)(ctx)
    }
}

/// Execution context handed to an operation once all its dependencies have
/// settled.
///
/// Positional arguments appear in declaration order regardless of completion
/// order. The context can also read any *already settled* value from the
/// engine cache by alias, for ad-hoc lookups beyond the declared inputs.
pub struct OpContext<V> {
    args: Vec<V>,
    cache: ResolveCache<V>,
}

impl<V> fmt::Debug for OpContext<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpContext")
            .field("args", &self.args.len())
            .finish_non_exhaustive()
    }
}

impl<V: Clone + Send + Sync + 'static> OpContext<V> {
    pub(crate) fn new(args: Vec<V>, cache: ResolveCache<V>) -> Self {
        Self { args, cache }
    }

    /// Resolved dependency values, declaration order.
    pub fn args(&self) -> &[V] {
        &self.args
    }

    /// Positional argument `index`, if declared.
    pub fn arg(&self, index: usize) -> Option<&V> {
        self.args.get(index)
    }

    /// Consume the context, keeping just the positional arguments.
    pub fn into_args(self) -> Vec<V> {
        self.args
    }

    /// Read an already-resolved value from the cache by alias.
    ///
    /// Returns `None` for unknown aliases and for resolutions that are still
    /// in flight or ended in failure.
    pub fn get(&self, alias: &str) -> Option<V> {
        self.cache.peek_value(alias)
    }
}
