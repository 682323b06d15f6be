// src/engine/cache.rs

//! Memoizing cache: alias -> shared in-flight or settled future.
//!
//! The cache is the only mutable state shared between concurrent
//! resolutions. The critical sequence (check for a slot, else create and
//! insert one) happens under a single lock in
//! [`ResolveCache::get_or_insert_with`], so two requesters of the same alias
//! can never both observe an empty slot and duplicate work. The lock is
//! never held across an `await`: slot futures are built lazily and only
//! polled after the lock is released.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use parking_lot::Mutex;
use tracing::debug;

use crate::errors::Result;

/// Shared handle to the eventual outcome of one alias resolution.
pub type ValueFuture<V> = Shared<BoxFuture<'static, Result<V>>>;

struct Slot<V> {
    /// Distinguishes this occupancy from later overwrites of the same alias.
    generation: u64,
    future: ValueFuture<V>,
}

struct CacheState<V> {
    slots: HashMap<String, Slot<V>>,
    next_generation: u64,
}

/// Cheaply cloneable cache handle; clones address the same slots.
pub struct ResolveCache<V> {
    state: Arc<Mutex<CacheState<V>>>,
}

impl<V> Clone for ResolveCache<V> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> ResolveCache<V> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                slots: HashMap::new(),
                next_generation: 0,
            })),
        }
    }

    /// Whether `alias` has a slot, in flight or settled.
    pub fn has(&self, alias: &str) -> bool {
        self.state.lock().slots.contains_key(alias)
    }

    /// The alias's future, if a slot exists.
    pub fn get(&self, alias: &str) -> Option<ValueFuture<V>> {
        self.state
            .lock()
            .slots
            .get(alias)
            .map(|slot| slot.future.clone())
    }

    /// Store a future under `alias`, replacing any previous slot.
    pub fn put(&self, alias: &str, future: ValueFuture<V>) {
        let mut state = self.state.lock();
        let generation = state.next_generation;
        state.next_generation += 1;
        state
            .slots
            .insert(alias.to_string(), Slot { generation, future });
    }

    /// Store an already-resolved value under `alias`, replacing any previous
    /// slot. This is the one explicit way to purge an alias's computed state.
    pub fn put_value(&self, alias: &str, value: V) {
        debug!(alias = %alias, "caching value");
        self.put(alias, futures_util::future::ready(Ok(value)).boxed().shared());
    }

    /// Atomic check-and-set: return the existing slot for `alias`, or build
    /// one with `make` and insert it before anyone else can observe the gap.
    ///
    /// `make` receives the generation of the new slot (for later
    /// [`evict_if_current`](Self::evict_if_current) calls) and must return
    /// the future without polling it. The second element of the returned
    /// pair is `true` when this call created the slot.
    pub fn get_or_insert_with<F>(&self, alias: &str, make: F) -> (ValueFuture<V>, bool)
    where
        F: FnOnce(u64) -> BoxFuture<'static, Result<V>>,
    {
        let mut state = self.state.lock();
        if let Some(slot) = state.slots.get(alias) {
            return (slot.future.clone(), false);
        }
        let generation = state.next_generation;
        state.next_generation += 1;
        let future = make(generation).shared();
        state.slots.insert(
            alias.to_string(),
            Slot {
                generation,
                future: future.clone(),
            },
        );
        (future, true)
    }

    /// Drop the alias's slot if it still belongs to `generation`.
    ///
    /// Failed resolutions call this before their shared future settles, so
    /// the next request retries instead of observing the failure as a hit.
    /// A slot overwritten in the meantime (e.g. by
    /// [`put_value`](Self::put_value)) is left alone.
    pub(crate) fn evict_if_current(&self, alias: &str, generation: u64) {
        let mut state = self.state.lock();
        if state
            .slots
            .get(alias)
            .is_some_and(|slot| slot.generation == generation)
        {
            debug!(alias = %alias, "evicting failed slot");
            state.slots.remove(alias);
        }
    }

    /// Clone the settled, successful value for `alias`, if any.
    ///
    /// In-flight and failed slots yield `None`.
    pub fn peek_value(&self, alias: &str) -> Option<V> {
        let state = self.state.lock();
        let slot = state.slots.get(alias)?;
        match slot.future.peek() {
            Some(Ok(value)) => Some(value.clone()),
            _ => None,
        }
    }
}

impl<V: Clone + Send + Sync + 'static> Default for ResolveCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
