//! Path-scoped middleware dispatch for axum.
//!
//! Setup code registers groups of handlers under URL patterns; each request
//! runs the first matching group's handlers in order until one responds, or
//! passes through to the host's own routing.
//!
//! # Architecture Overview
//!
//! ```text
//!     Request ──▶ http::middleware ──▶ dispatch::Dispatcher
//!                                          │
//!                          fresh Registry ◀┤ setup(&mut Trail, None)
//!                                          ▼
//!                                   chain::ChainExecutor
//!                                     │            │
//!                       routing::pattern     chain::handler
//!                       (match groups)       (Continuation | Sentinel)
//!                                          │
//!     Response ◀── Outcome::Respond | PassThrough ──▶ downstream router
//! ```

pub mod chain;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod observability;
pub mod routing;

pub use chain::handler::{Continuation, ContinuationHandler, Convention, Next, Sentinel, SentinelHandler};
pub use config::schema::TrailConfig;
pub use dispatch::{create_dispatcher, create_sentinel_dispatcher, DispatchResult, Dispatcher};
pub use error::DispatchError;
pub use http::request::TrailRequest;
pub use http::response::{pass_through, Outcome};
pub use routing::registry::Trail;
