// src/engine/mod.rs

//! The resolution engine.
//!
//! This module ties together:
//! - [`resolver`]: the engine handle and the recursive, cycle-safe
//!   resolution algorithm (fan-out, fan-in, memoization, error propagation)
//! - [`cache`]: the memoizing alias -> future map with the atomic
//!   get-or-create-and-insert primitive that makes coalescing safe
//! - [`path`]: the root-to-leaf chain used for cycle detection and
//!   diagnostics

pub mod cache;
pub mod path;
pub mod resolver;

pub use cache::{ResolveCache, ValueFuture};
pub use path::ResolutionPath;
pub use resolver::{ResolveTarget, Resolver, DEFAULT_ENGINE_NAME};
