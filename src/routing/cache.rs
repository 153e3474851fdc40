//! Compiled pattern cache.
//!
//! Setup runs on every dispatch, so the same pattern strings are handed to
//! the compiler again and again. This decorator memoizes successful
//! compilations keyed by pattern text. Failures are not cached and surface
//! on every attempt.

use std::sync::Arc;

use dashmap::DashMap;

use crate::routing::pattern::{PathMatcher, PatternCompiler, PatternError};

/// A [`PatternCompiler`] that remembers what it has already compiled.
#[derive(Debug)]
pub struct CachedCompiler<C> {
    inner: C,
    compiled: DashMap<String, Arc<dyn PathMatcher>>,
}

impl<C: PatternCompiler> CachedCompiler<C> {
    /// Wrap `inner` with an empty cache.
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            compiled: DashMap::new(),
        }
    }

    /// Number of cached patterns.
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    /// Returns true if nothing has been compiled yet.
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    /// Access the wrapped compiler.
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: PatternCompiler> PatternCompiler for CachedCompiler<C> {
    fn compile(&self, pattern: &str) -> Result<Arc<dyn PathMatcher>, PatternError> {
        if let Some(hit) = self.compiled.get(pattern) {
            return Ok(Arc::clone(hit.value()));
        }

        let matcher = self.inner.compile(pattern)?;
        tracing::trace!(pattern = %pattern, "Compiled path pattern");
        // Two callers racing on the same pattern both compile; the first insert wins.
        let entry = self
            .compiled
            .entry(pattern.to_string())
            .or_insert(matcher);
        Ok(Arc::clone(entry.value()))
    }
}
