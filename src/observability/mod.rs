//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! dispatcher / executor / registry produce:
//!     → logging.rs (structured log events, one span per dispatch)
//!     → metrics.rs (dispatch counters and latency histogram)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields instead of formatted strings
//! - Request ID recorded on the dispatch span, not repeated per event
//! - Metrics go through the `metrics` facade; without an installed recorder
//!   they are no-ops

pub mod logging;
pub mod metrics;
