//! Group selection and chain execution.
//!
//! # Responsibilities
//! - Find the first group with a pattern matching the request path
//! - Run that group's handlers in order under the convention's rules
//! - Reduce the run to a single [`Outcome`] or [`DispatchError`]
//!
//! # Design Decisions
//! - First registered group wins; later groups are never evaluated
//! - Within a group, the first matching pattern stops the scan, so a group
//!   runs at most once per request
//! - Patterns are compiled lazily in scan order; a compile error in a pattern
//!   that is never reached does not fail the dispatch

use std::marker::PhantomData;
use std::sync::Arc;

use crate::chain::handler::{Convention, Step};
use crate::error::DispatchError;
use crate::http::request::TrailRequest;
use crate::http::response::Outcome;
use crate::routing::pattern::{PathMatch, PatternCompiler, PatternError};
use crate::routing::registry::{HandlerGroup, Registry};

/// The group chosen for a request.
#[derive(Debug)]
pub struct Selection<'r, H> {
    /// Position of the group in the registry.
    pub index: usize,
    /// The selected group.
    pub group: &'r HandlerGroup<H>,
    /// The pattern that matched.
    pub pattern: &'r str,
    /// Match details from the pattern compiler.
    pub matched: PathMatch,
}

/// Runs a registry against requests under convention `C`.
pub struct ChainExecutor<C> {
    compiler: Arc<dyn PatternCompiler>,
    _convention: PhantomData<fn() -> C>,
}

impl<C> Clone for ChainExecutor<C> {
    fn clone(&self) -> Self {
        Self {
            compiler: Arc::clone(&self.compiler),
            _convention: PhantomData,
        }
    }
}

impl<C: Convention> ChainExecutor<C> {
    /// Create an executor using `compiler` for pattern matching.
    pub fn new(compiler: Arc<dyn PatternCompiler>) -> Self {
        Self {
            compiler,
            _convention: PhantomData,
        }
    }

    /// The pattern compiler in use.
    pub fn compiler(&self) -> &Arc<dyn PatternCompiler> {
        &self.compiler
    }

    /// Find the first group with a pattern matching `path`.
    pub fn select<'r>(
        &self,
        registry: &'r Registry<C::Handler>,
        path: &str,
    ) -> Result<Option<Selection<'r, C::Handler>>, PatternError> {
        for (index, group) in registry.groups().iter().enumerate() {
            for pattern in group.patterns() {
                let matcher = self.compiler.compile(pattern)?;
                if let Some(matched) = matcher.match_path(path) {
                    return Ok(Some(Selection {
                        index,
                        group,
                        pattern: pattern.as_str(),
                        matched,
                    }));
                }
            }
        }
        Ok(None)
    }

    /// Select a group for `request` and run its chain.
    pub async fn execute(
        &self,
        registry: &Registry<C::Handler>,
        request: &TrailRequest,
    ) -> Result<Outcome, DispatchError> {
        let path = request.path();

        let Some(selection) = self.select(registry, path)? else {
            tracing::debug!(
                path = %path,
                groups = registry.len(),
                "No handler group matched"
            );
            return Ok(Outcome::PassThrough);
        };

        tracing::debug!(
            path = %path,
            group = selection.index,
            pattern = %selection.pattern,
            params = ?selection.matched.params,
            handlers = selection.group.handlers().len(),
            "Handler group matched"
        );

        self.run_chain(&selection, request).await
    }

    /// Run the handlers of a selected group in order.
    pub async fn run_chain(
        &self,
        selection: &Selection<'_, C::Handler>,
        request: &TrailRequest,
    ) -> Result<Outcome, DispatchError> {
        for (position, handler) in selection.group.handlers().iter().enumerate() {
            match C::resolve(handler, request).await {
                Step::Advance => {
                    tracing::trace!(handler = position, "Handler advanced");
                }
                Step::Terminate(outcome) => {
                    tracing::trace!(
                        handler = position,
                        outcome = outcome.label(),
                        "Handler terminated chain"
                    );
                    return Ok(outcome);
                }
                Step::Violate => {
                    tracing::error!(
                        handler = position,
                        pattern = %selection.pattern,
                        convention = C::NAME,
                        "Handler neither advanced nor returned a response"
                    );
                    return Err(DispatchError::ProtocolViolation {
                        pattern: selection.pattern.to_string(),
                        handler: position,
                    });
                }
            }
        }

        // Chain exhausted without a terminal response
        Ok(Outcome::PassThrough)
    }
}
