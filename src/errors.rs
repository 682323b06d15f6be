// src/errors.rs

//! Typed error taxonomy surfaced by the resolver.
//!
//! Every resolution failure carries the path that led to it, so a top-level
//! caller always sees the full chain (e.g. `engine -> A -> B`). Errors are
//! `Clone` because an in-flight resolution is shared between all concurrent
//! requesters of the same alias; each requester receives the same failure.

use std::sync::Arc;

use thiserror::Error;

use crate::engine::path::ResolutionPath;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Failure modes of registration and resolution.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// An alias reappeared in the active resolution path.
    #[error("circular dependency found: {path}")]
    CircularDependency { path: ResolutionPath },

    /// A required alias has neither a cached value nor a registered entry.
    #[error("no provider found for {path}")]
    UnresolvedProvider { path: ResolutionPath },

    /// `resolve` was called with something that cannot name a provider.
    #[error("cannot resolve target: {path}")]
    InvalidTarget { path: ResolutionPath },

    /// An operation's dependency declaration was rejected at registration.
    #[error("invalid operation declaration for \"{alias}\": {reason}")]
    InvalidOperation { alias: String, reason: String },

    /// The operation body itself failed; the underlying error is preserved
    /// and propagates unmodified to every pending dependent.
    #[error("operation failed at {path}: {cause}")]
    OperationFailed {
        path: ResolutionPath,
        cause: Arc<anyhow::Error>,
    },
}

impl ResolveError {
    /// Wrap an operation-body failure together with the path it occurred at.
    pub fn operation_failed(path: ResolutionPath, cause: anyhow::Error) -> Self {
        ResolveError::OperationFailed {
            path,
            cause: Arc::new(cause),
        }
    }

    /// The resolution path attached to this error, if it has one.
    ///
    /// Only [`ResolveError::InvalidOperation`] is raised outside an active
    /// resolution and has no path.
    pub fn path(&self) -> Option<&ResolutionPath> {
        match self {
            ResolveError::CircularDependency { path }
            | ResolveError::UnresolvedProvider { path }
            | ResolveError::InvalidTarget { path }
            | ResolveError::OperationFailed { path, .. } => Some(path),
            ResolveError::InvalidOperation { .. } => None,
        }
    }
}
