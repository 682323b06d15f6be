// src/lib.rs

//! Lazy, memoized dependency resolution over named operations.
//!
//! Clients register *values* and *operations* under string aliases. An
//! operation declares, as an ordered list of aliases, which other entries it
//! needs as positional inputs. Resolving an alias recursively resolves its
//! dependencies, executes each operation at most once per engine instance
//! (concurrent requesters coalesce onto one in-flight future), detects
//! cycles before they recurse forever, and yields the final value
//! asynchronously.
//!
//! ```no_run
//! use memodag::{Operation, Resolver};
//!
//! # async fn demo() -> memodag::Result<()> {
//! let engine: Resolver<i64> = Resolver::new();
//!
//! engine.define_value("base", 2);
//! engine.define_operation(
//!     "squared",
//!     Operation::from_fn(["base"], |ctx| Ok(ctx.args()[0] * ctx.args()[0])),
//! )?;
//! engine.define_operation(
//!     "plus_one",
//!     Operation::from_fn(["squared"], |ctx| Ok(ctx.args()[0] + 1)),
//! )?;
//!
//! assert_eq!(engine.resolve("plus_one").await?, 5);
//! // "squared" is already cached; its body will not run again.
//! assert_eq!(engine.resolve("squared").await?, 4);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod errors;
pub mod registry;

pub use engine::{ResolutionPath, ResolveCache, ResolveTarget, Resolver, ValueFuture};
pub use errors::{ResolveError, Result};
pub use registry::{
    DeclaredDependencies, DependencySource, Entry, OpContext, Operation, Registry,
};
