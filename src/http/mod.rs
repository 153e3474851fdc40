//! HTTP-facing types and the axum adapter.
//!
//! # Data Flow
//! ```text
//! axum Request
//!     → request.rs (TrailRequest: shared read-only view + request ID)
//!     → Dispatcher::dispatch
//!     → response.rs (Outcome, pass-through marker)
//!     → middleware.rs (respond, or run the downstream service)
//! ```

pub mod middleware;
pub mod request;
pub mod response;

pub use middleware::trail_middleware;
pub use request::{TrailRequest, X_REQUEST_ID};
pub use response::{is_pass_through, mark_pass_through, pass_through, Outcome, PASS_THROUGH_HEADER};
