//! Dispatch outcomes and the pass-through marker.
//!
//! # Responsibilities
//! - Represent the terminal result of a dispatch
//! - Build and recognise the canonical pass-through response
//!
//! # Design Decisions
//! - Pass-through is signalled by `x-middleware-next: 1`, checked only through
//!   [`is_pass_through`]
//! - The canonical pass-through response is an empty `200 OK` carrying the marker

use axum::{
    body::Body,
    http::{HeaderValue, StatusCode},
    response::Response,
};

/// Marker header telling the host to continue with its own routing.
pub const PASS_THROUGH_HEADER: &str = "x-middleware-next";

const PASS_THROUGH_VALUE: &str = "1";

/// Build the canonical pass-through response.
pub fn pass_through() -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::OK;
    mark_pass_through(&mut response);
    response
}

/// Add the pass-through marker to an existing response.
pub fn mark_pass_through(response: &mut Response) {
    response.headers_mut().insert(
        PASS_THROUGH_HEADER,
        HeaderValue::from_static(PASS_THROUGH_VALUE),
    );
}

/// Returns true if `response` carries the pass-through marker.
pub fn is_pass_through(response: &Response) -> bool {
    response
        .headers()
        .get(PASS_THROUGH_HEADER)
        .map(|v| v.as_bytes() == PASS_THROUGH_VALUE.as_bytes())
        .unwrap_or(false)
}

/// Terminal result of one dispatch.
#[derive(Debug)]
pub enum Outcome {
    /// A handler produced this response.
    Respond(Response),
    /// No handler claimed the request; continue with host routing.
    PassThrough,
}

impl Outcome {
    /// Returns true for [`Outcome::PassThrough`] or a marked response.
    pub fn is_pass_through(&self) -> bool {
        match self {
            Outcome::PassThrough => true,
            Outcome::Respond(response) => is_pass_through(response),
        }
    }

    /// Borrow the response, if a handler produced one.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Outcome::Respond(response) => Some(response),
            Outcome::PassThrough => None,
        }
    }

    /// Render the outcome as a response.
    pub fn into_response(self) -> Response {
        match self {
            Outcome::Respond(response) => response,
            Outcome::PassThrough => pass_through(),
        }
    }

    /// Label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Respond(_) => "respond",
            Outcome::PassThrough => "pass_through",
        }
    }
}
