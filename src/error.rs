//! Error types for dispatch.
//!
//! # Design Decisions
//! - A protocol violation fails the whole dispatch; it is never retried
//! - Pattern compile errors are propagated unchanged from the compiler

use thiserror::Error;

use crate::routing::pattern::PatternError;

/// Errors surfaced by a dispatch call.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A continuation handler neither called `advance()` nor returned a response.
    #[error(
        "Handler #{handler} for route {pattern:?} did not complete gracefully. \
         Return a response or call next.advance()."
    )]
    ProtocolViolation {
        /// The pattern that selected the group.
        pattern: String,
        /// Position of the offending handler in its group.
        handler: usize,
    },

    /// A registered pattern could not be compiled.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

impl DispatchError {
    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::ProtocolViolation { .. } => "protocol_violation",
            DispatchError::Pattern(_) => "pattern_error",
        }
    }
}
