//! Dispatcher: the entry point handed to the host.
//!
//! # Data Flow
//! ```text
//! dispatch(request)
//!     → fresh Registry (owned by this call)
//!     → setup(&mut Trail, None) populates it
//!     → ChainExecutor selects a group and runs its chain
//!     → Registry dropped on every exit path
//!     → Outcome | DispatchError
//! ```
//!
//! # Design Decisions
//! - No registry outlives a call, so overlapping dispatches cannot see each
//!   other's groups
//! - Setup runs synchronously before any handler; its second argument is
//!   reserved for request-aware setup and is always `None`
//! - Compiled patterns are cached across calls by default

use std::sync::Arc;
use std::time::Instant;

use futures_util::future::{BoxFuture, FutureExt};
use tracing::Instrument;

use crate::chain::executor::ChainExecutor;
use crate::chain::handler::{
    Continuation, ContinuationHandler, Convention, Sentinel, SentinelHandler,
};
use crate::error::DispatchError;
use crate::http::request::TrailRequest;
use crate::http::response::Outcome;
use crate::observability::metrics;
use crate::routing::cache::CachedCompiler;
use crate::routing::pattern::{PatternCompiler, PatternOptions, RegexCompiler};
use crate::routing::registry::{Registry, Trail};

type SetupFn<H> = dyn Fn(&mut Trail<'_, H>, Option<&TrailRequest>) + Send + Sync;

/// Result of one dispatch.
pub type DispatchResult = Result<Outcome, DispatchError>;

/// Registers handler groups and runs the matching chain for each request.
pub struct Dispatcher<C: Convention> {
    setup: Arc<SetupFn<C::Handler>>,
    executor: ChainExecutor<C>,
}

impl<C: Convention> Clone for Dispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            setup: Arc::clone(&self.setup),
            executor: self.executor.clone(),
        }
    }
}

impl<C: Convention> Dispatcher<C> {
    /// Create a dispatcher around `setup`, using the cached default compiler.
    pub fn new<F>(setup: F) -> Self
    where
        F: Fn(&mut Trail<'_, C::Handler>, Option<&TrailRequest>) + Send + Sync + 'static,
    {
        Self {
            setup: Arc::new(setup),
            executor: ChainExecutor::new(default_compiler(PatternOptions::default(), true)),
        }
    }

    /// Use the default compiler with custom options.
    pub fn with_options(self, options: PatternOptions, cache: bool) -> Self {
        self.with_compiler(default_compiler(options, cache))
    }

    /// Use a custom pattern compiler.
    pub fn with_compiler(self, compiler: Arc<dyn PatternCompiler>) -> Self {
        Self {
            setup: self.setup,
            executor: ChainExecutor::new(compiler),
        }
    }

    /// Run setup and the matching chain for `request`.
    pub async fn dispatch(&self, request: &TrailRequest) -> DispatchResult {
        let span = tracing::debug_span!(
            "dispatch",
            request_id = %request.id(),
            path = %request.path(),
            convention = C::NAME,
        );

        async {
            let started = Instant::now();

            // 1. Fresh registry for this call only
            let mut registry = Registry::new();

            // 2. Populate it
            (self.setup)(&mut Trail::new(&mut registry), None);
            tracing::trace!(groups = registry.len(), "Setup complete");

            // 3. Execute; the registry is dropped with this frame on every path
            let result = self.executor.execute(&registry, request).await;
            drop(registry);

            match &result {
                Ok(outcome) => metrics::record_dispatch(C::NAME, outcome.label(), started),
                Err(err) => {
                    if matches!(err, DispatchError::ProtocolViolation { .. }) {
                        metrics::record_protocol_violation(C::NAME);
                    }
                    metrics::record_dispatch(C::NAME, err.kind(), started);
                }
            }

            result
        }
        .instrument(span)
        .await
    }

    /// Turn the dispatcher into a plain request hook.
    pub fn into_hook(self) -> impl Fn(TrailRequest) -> BoxFuture<'static, DispatchResult> + Clone {
        let dispatcher = Arc::new(self);
        move |request: TrailRequest| {
            let dispatcher = Arc::clone(&dispatcher);
            async move { dispatcher.dispatch(&request).await }.boxed()
        }
    }
}

/// Create a continuation-convention dispatcher.
pub fn create_dispatcher<F>(setup: F) -> Dispatcher<Continuation>
where
    F: Fn(&mut Trail<'_, ContinuationHandler>, Option<&TrailRequest>)
        + Send
        + Sync
        + 'static,
{
    Dispatcher::new(setup)
}

/// Create a sentinel-convention dispatcher.
pub fn create_sentinel_dispatcher<F>(setup: F) -> Dispatcher<Sentinel>
where
    F: Fn(&mut Trail<'_, SentinelHandler>, Option<&TrailRequest>)
        + Send
        + Sync
        + 'static,
{
    Dispatcher::new(setup)
}

fn default_compiler(options: PatternOptions, cache: bool) -> Arc<dyn PatternCompiler> {
    let compiler = RegexCompiler::new(options);
    if cache {
        Arc::new(CachedCompiler::new(compiler))
    } else {
        Arc::new(compiler)
    }
}
