// src/engine/path.rs

use std::fmt;

/// Root-to-leaf chain of signatures for one top-level resolution.
///
/// The path is copy-on-write: every recursion level extends its own clone,
/// so sibling branches of one fan-out never observe each other's segments.
/// Independent top-level requests each start from a fresh root, which is why
/// the same alias may appear in two unrelated resolution trees without being
/// flagged as circular.
///
/// The first segment is always the engine's own identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionPath {
    segments: Vec<String>,
}

impl ResolutionPath {
    /// New single-element path containing the engine's identifier.
    pub fn root(origin: impl Into<String>) -> Self {
        Self {
            segments: vec![origin.into()],
        }
    }

    /// Extended copy with `signature` appended; `self` is left untouched.
    pub fn child(&self, signature: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(signature.to_string());
        Self { segments }
    }

    /// Whether `signature` already occurs anywhere in the chain.
    pub fn contains(&self, signature: &str) -> bool {
        self.segments.iter().any(|s| s == signature)
    }

    /// All segments, root first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The signature currently being resolved.
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(|s| s.as_str())
    }
}

impl fmt::Display for ResolutionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join(" -> "))
    }
}
