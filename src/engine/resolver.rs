// src/engine/resolver.rs

use std::sync::Arc;

use futures_util::future::{self, try_join_all, BoxFuture};
use futures_util::FutureExt;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::engine::cache::ResolveCache;
use crate::engine::path::ResolutionPath;
use crate::errors::{ResolveError, Result};
use crate::registry::{Entry, OpContext, Operation, Registry};

/// Engine identifier used when the caller does not name the instance. It
/// becomes the root element of every resolution path.
pub const DEFAULT_ENGINE_NAME: &str = "memodag";

/// What [`Resolver::resolve`] accepts: a registered alias, or a one-off
/// operation supplied directly.
pub enum ResolveTarget<V> {
    Alias(String),
    Operation(Operation<V>),
}

impl<V> From<&str> for ResolveTarget<V> {
    fn from(alias: &str) -> Self {
        ResolveTarget::Alias(alias.to_string())
    }
}

impl<V> From<String> for ResolveTarget<V> {
    fn from(alias: String) -> Self {
        ResolveTarget::Alias(alias)
    }
}

impl<V> From<Operation<V>> for ResolveTarget<V> {
    fn from(operation: Operation<V>) -> Self {
        ResolveTarget::Operation(operation)
    }
}

struct ResolverInner<V> {
    name: String,
    registry: RwLock<Registry<V>>,
    cache: ResolveCache<V>,
}

/// The engine: a registry, a memoizing cache, and the cycle-safe recursive
/// resolution algorithm.
///
/// Responsibilities:
/// - look a target up (cache first, then registry)
/// - recursively resolve its declared dependencies, fanning out concurrently
/// - invoke the operation once all dependencies have settled, arguments in
///   declaration order
/// - memoize the in-flight future so concurrent requesters of one alias
///   share a single execution
/// - detect cycles against the per-call resolution path
///
/// Cloning yields another handle to the same instance.
pub struct Resolver<V> {
    inner: Arc<ResolverInner<V>>,
}

impl<V> Clone for Resolver<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> Resolver<V> {
    pub fn new() -> Self {
        Self::named(DEFAULT_ENGINE_NAME)
    }

    /// Engine with an explicit identifier; the identifier roots every
    /// resolution path and tags all log events.
    pub fn named(name: impl Into<String>) -> Self {
        Self::with_registry(name, Registry::new())
    }

    /// Engine over a prepared registry, e.g. one built with a custom
    /// [`DependencySource`](crate::registry::DependencySource).
    pub fn with_registry(name: impl Into<String>, registry: Registry<V>) -> Self {
        Self {
            inner: Arc::new(ResolverInner {
                name: name.into(),
                registry: RwLock::new(registry),
                cache: ResolveCache::new(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Register a raw value. Does not touch the cache: an alias that already
    /// resolved keeps serving its cached result until [`set`](Self::set)
    /// overwrites the slot.
    pub fn define_value(&self, alias: impl Into<String>, value: V) {
        self.inner.registry.write().define_value(alias, value);
    }

    /// Register an operation. Fails with
    /// [`ResolveError::InvalidOperation`] when the dependency declaration is
    /// rejected by the extraction collaborator.
    pub fn define_operation(
        &self,
        alias: impl Into<String>,
        operation: Operation<V>,
    ) -> Result<()> {
        self.inner.registry.write().define_operation(alias, operation)
    }

    /// Write an already-resolved value straight into the cache, replacing
    /// any in-flight or settled slot. This is the explicit purge of an
    /// alias's computed state: the next resolution chain that reads `alias`
    /// sees `value`. Dependents that already cached their own results are
    /// not revisited.
    pub fn set(&self, alias: &str, value: V) {
        debug!(engine = %self.inner.name, alias = %alias, "setting cached value");
        self.inner.cache.put_value(alias, value);
    }

    /// The settled, successful value cached for `alias`, if any.
    pub fn cached(&self, alias: &str) -> Option<V> {
        self.inner.cache.peek_value(alias)
    }

    /// Static pre-flight validation of the registered operation graph; see
    /// [`validate_registry`](crate::registry::validate_registry).
    pub fn validate(&self) -> anyhow::Result<()> {
        crate::registry::validate_registry(&self.inner.registry.read())
    }

    /// Resolve an alias or a one-off operation to its eventual value.
    ///
    /// The returned future is `'static`: it owns a handle to the engine and
    /// can be spawned or raced freely. It must be awaited inside a Tokio
    /// runtime, because alias resolutions detach a driver task that runs
    /// them to completion even if the caller drops out.
    pub fn resolve(&self, target: impl Into<ResolveTarget<V>>) -> BoxFuture<'static, Result<V>> {
        let path = ResolutionPath::root(self.inner.name.clone());
        resolve_inner(Arc::clone(&self.inner), target.into(), path)
    }
}

impl<V: Clone + Send + Sync + 'static> Default for Resolver<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// One recursion step. Boxing keeps the recursive async call finite-sized.
fn resolve_inner<V: Clone + Send + Sync + 'static>(
    inner: Arc<ResolverInner<V>>,
    target: ResolveTarget<V>,
    path: ResolutionPath,
) -> BoxFuture<'static, Result<V>> {
    match target {
        ResolveTarget::Alias(alias) => resolve_alias(inner, alias, path),
        ResolveTarget::Operation(operation) => resolve_anonymous(inner, operation, path),
    }
}

fn resolve_alias<V: Clone + Send + Sync + 'static>(
    inner: Arc<ResolverInner<V>>,
    alias: String,
    path: ResolutionPath,
) -> BoxFuture<'static, Result<V>> {
    // Cycle check comes first, before the cache: a cached alias reappearing
    // in its own chain is still a cycle.
    if path.contains(&alias) {
        let chain = path.child(&alias);
        warn!(engine = %inner.name, path = %chain, "circular dependency");
        return future::ready(Err(ResolveError::CircularDependency { path: chain })).boxed();
    }

    if alias.trim().is_empty() {
        return future::ready(Err(ResolveError::InvalidTarget {
            path: path.child(&alias),
        }))
        .boxed();
    }

    let extended = path.child(&alias);
    debug!(engine = %inner.name, path = %extended, "resolving");

    let make_inner = Arc::clone(&inner);
    let make_alias = alias.clone();
    let make_path = extended.clone();
    let (shared, created) = inner.cache.get_or_insert_with(&alias, move |generation| {
        run_provider(make_inner, make_alias, make_path, generation).boxed()
    });

    if created {
        // Detached driver: runs the shared future to completion even when
        // every requester drops out, so abandoned branches still fill the
        // cache (and failed ones still clear their slot).
        let driver = shared.clone();
        tokio::spawn(async move {
            let _ = driver.await;
        });
    } else {
        debug!(engine = %inner.name, path = %extended, "resolving from cache");
    }

    shared.boxed()
}

/// Body of a freshly created cache slot: look up the provider, resolve its
/// dependencies, run it, and settle. On any failure the slot is evicted
/// *before* the shared future settles, so a failed resolution is never a
/// cache hit and the next request retries.
async fn run_provider<V: Clone + Send + Sync + 'static>(
    inner: Arc<ResolverInner<V>>,
    alias: String,
    path: ResolutionPath,
    generation: u64,
) -> Result<V> {
    let entry = {
        let registry = inner.registry.read();
        registry.lookup(&alias).cloned()
    };

    let entry = match entry {
        Some(entry) => entry,
        None => {
            warn!(engine = %inner.name, path = %path, "no provider found");
            inner.cache.evict_if_current(&alias, generation);
            return Err(ResolveError::UnresolvedProvider { path });
        }
    };

    match entry {
        Entry::Value(value) => {
            debug!(engine = %inner.name, path = %path, "resolved from registry value");
            Ok(value)
        }
        Entry::Operation(operation) => {
            match run_operation(Arc::clone(&inner), &operation, path.clone()).await {
                Ok(value) => {
                    debug!(engine = %inner.name, path = %path, "OK");
                    Ok(value)
                }
                Err(err) => {
                    warn!(engine = %inner.name, path = %path, error = %err, "ERROR");
                    inner.cache.evict_if_current(&alias, generation);
                    Err(err)
                }
            }
        }
    }
}

/// Fan the dependency list out, join in declaration order, and invoke.
async fn run_operation<V: Clone + Send + Sync + 'static>(
    inner: Arc<ResolverInner<V>>,
    operation: &Operation<V>,
    path: ResolutionPath,
) -> Result<V> {
    let dep_futures: Vec<_> = operation
        .dependencies()
        .iter()
        .map(|dep| {
            resolve_inner(
                Arc::clone(&inner),
                ResolveTarget::Alias(dep.clone()),
                path.clone(),
            )
        })
        .collect();

    // Dependencies may settle in any order; `try_join_all` hands the values
    // back in declaration order and fails fast on the first dependency
    // error, which propagates unmodified. In-flight siblings keep running on
    // their driver tasks and settle into the cache.
    let args = try_join_all(dep_futures).await?;

    let ctx = OpContext::new(args, inner.cache.clone());
    operation
        .invoke(ctx)
        .await
        .map_err(|err| ResolveError::operation_failed(path, err))
}

fn resolve_anonymous<V: Clone + Send + Sync + 'static>(
    inner: Arc<ResolverInner<V>>,
    operation: Operation<V>,
    path: ResolutionPath,
) -> BoxFuture<'static, Result<V>> {
    // Anonymous operations cannot recur into themselves (each supplied value
    // is distinct), so there is no cycle check here. They are also never
    // memoized: the signature exists for diagnostics only.
    let extended = path.child(&operation.signature());
    debug!(engine = %inner.name, path = %extended, "resolving anonymous operation");

    async move {
        match run_operation(Arc::clone(&inner), &operation, extended.clone()).await {
            Ok(value) => {
                debug!(engine = %inner.name, path = %extended, "OK");
                Ok(value)
            }
            Err(err) => {
                warn!(engine = %inner.name, path = %extended, error = %err, "ERROR");
                Err(err)
            }
        }
    }
    .boxed()
}
