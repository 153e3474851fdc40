//! Routing subsystem: pattern compilation and the per-dispatch registry.
//!
//! # Data Flow
//! ```text
//! setup(&mut Trail)
//!     → registry.rs (append HandlerGroup per register call)
//!
//! Per request:
//!     pattern text
//!     → cache.rs (memoized compile, optional)
//!     → pattern.rs (path-to-regexp syntax → anchored regex)
//!     → PathMatch or no match
//! ```
//!
//! # Design Decisions
//! - Registration never validates syntax; patterns compile lazily on first use
//! - Matching is delegated through the `PatternCompiler` trait
//! - Deterministic: same registrations always select the same group

pub mod cache;
pub mod pattern;
pub mod registry;

pub use cache::CachedCompiler;
pub use pattern::{
    PathMatch, PathMatcher, PathPattern, PatternCompiler, PatternError, PatternOptions,
    RegexCompiler,
};
pub use registry::{HandlerGroup, IntoHandlers, IntoPatterns, Registry, Trail};
