//! Handler calling conventions.
//!
//! # Responsibilities
//! - Define the two supported handler shapes
//! - Resolve one handler call into a [`Step`]
//!
//! # Conventions
//! - [`Continuation`]: handler gets `(request, next)`. A response terminates,
//!   `next.advance()` without a response continues, neither is a violation.
//! - [`Sentinel`]: handler gets `(request)`. A response carrying the
//!   pass-through marker continues, any other response terminates, no response
//!   at all terminates with pass-through.
//!
//! # Design Decisions
//! - The convention is a type parameter, so one engine never mixes the two
//! - "No response" differs between conventions: an error for continuation
//!   handlers, a pass-through for sentinel handlers

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::response::Response;
use futures_util::future::{BoxFuture, FutureExt};

use crate::http::request::TrailRequest;
use crate::http::response::{is_pass_through, Outcome};
use crate::routing::registry::IntoHandlers;

/// Future returned by handlers.
pub type HandlerFuture = BoxFuture<'static, Option<Response>>;

/// Resolution of a single handler call.
#[derive(Debug)]
pub enum Step {
    /// Run the next handler in the group.
    Advance,
    /// Stop the dispatch with this outcome.
    Terminate(Outcome),
    /// The handler broke the calling protocol.
    Violate,
}

/// A handler calling convention.
pub trait Convention: Send + Sync + 'static {
    /// Handler type registered under this convention.
    type Handler: Clone + Send + Sync + 'static;

    /// Name used in logs and metrics.
    const NAME: &'static str;

    /// Invoke `handler` and classify its result.
    fn resolve(handler: &Self::Handler, request: &TrailRequest) -> BoxFuture<'static, Step>;
}

/// Continuation callback handed to continuation-style handlers.
#[derive(Debug, Clone, Default)]
pub struct Next {
    advanced: Arc<AtomicBool>,
}

impl Next {
    /// Pass the request on to the next handler.
    pub fn advance(&self) {
        self.advanced.store(true, Ordering::SeqCst);
    }

    /// Returns true once `advance()` has been called.
    pub fn was_advanced(&self) -> bool {
        self.advanced.load(Ordering::SeqCst)
    }
}

type ContinuationFn = dyn Fn(TrailRequest, Next) -> HandlerFuture + Send + Sync;
type SentinelFn = dyn Fn(TrailRequest) -> HandlerFuture + Send + Sync;

/// Handler called with the request and a [`Next`] callback.
#[derive(Clone)]
pub struct ContinuationHandler(Arc<ContinuationFn>);

impl ContinuationHandler {
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(TrailRequest, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<Response>> + Send + 'static,
    {
        Self(Arc::new(move |req: TrailRequest, next: Next| {
            handler(req, next).boxed()
        }))
    }

    /// Invoke the handler.
    pub fn call(&self, request: TrailRequest, next: Next) -> HandlerFuture {
        (self.0)(request, next)
    }
}

impl fmt::Debug for ContinuationHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContinuationHandler")
    }
}

/// Handler called with the request only; signals continuation with the marker.
#[derive(Clone)]
pub struct SentinelHandler(Arc<SentinelFn>);

impl SentinelHandler {
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(TrailRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<Response>> + Send + 'static,
    {
        Self(Arc::new(move |req: TrailRequest| handler(req).boxed()))
    }

    /// Invoke the handler.
    pub fn call(&self, request: TrailRequest) -> HandlerFuture {
        (self.0)(request)
    }
}

impl fmt::Debug for SentinelHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SentinelHandler")
    }
}

/// Continuation convention: explicit `advance()` callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct Continuation;

impl Convention for Continuation {
    type Handler = ContinuationHandler;

    const NAME: &'static str = "continuation";

    fn resolve(handler: &Self::Handler, request: &TrailRequest) -> BoxFuture<'static, Step> {
        let next = Next::default();
        let call = handler.call(request.clone(), next.clone());

        async move {
            match call.await {
                Some(response) => Step::Terminate(Outcome::Respond(response)),
                None if next.was_advanced() => Step::Advance,
                None => Step::Violate,
            }
        }
        .boxed()
    }
}

/// Sentinel convention: pass-through marker on the returned response.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sentinel;

impl Convention for Sentinel {
    type Handler = SentinelHandler;

    const NAME: &'static str = "sentinel";

    fn resolve(handler: &Self::Handler, request: &TrailRequest) -> BoxFuture<'static, Step> {
        let call = handler.call(request.clone());

        async move {
            match call.await {
                Some(response) if is_pass_through(&response) => Step::Advance,
                Some(response) => Step::Terminate(Outcome::Respond(response)),
                None => Step::Terminate(Outcome::PassThrough),
            }
        }
        .boxed()
    }
}

macro_rules! impl_into_handlers {
    ($($handler:ty),*) => {
        $(
            impl IntoHandlers<$handler> for $handler {
                fn into_handlers(self) -> Vec<$handler> {
                    vec![self]
                }
            }

            impl IntoHandlers<$handler> for Vec<$handler> {
                fn into_handlers(self) -> Vec<$handler> {
                    self
                }
            }

            impl IntoHandlers<$handler> for &[$handler] {
                fn into_handlers(self) -> Vec<$handler> {
                    self.to_vec()
                }
            }

            impl<const N: usize> IntoHandlers<$handler> for [$handler; N] {
                fn into_handlers(self) -> Vec<$handler> {
                    self.into_iter().collect()
                }
            }
        )*
    };
}

impl_into_handlers!(ContinuationHandler, SentinelHandler);
