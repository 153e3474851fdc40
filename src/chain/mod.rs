//! Handler chains.
//!
//! # Data Flow
//! ```text
//! Registry + TrailRequest
//!     → executor.rs (first matching group, in registration order)
//!     → handler.rs (Convention::resolve per handler → Step)
//!     → Outcome | DispatchError
//! ```

pub mod executor;
pub mod handler;

pub use executor::{ChainExecutor, Selection};
pub use handler::{
    Continuation, ContinuationHandler, Convention, HandlerFuture, Next, Sentinel,
    SentinelHandler, Step,
};
