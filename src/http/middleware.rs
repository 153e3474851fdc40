//! Axum middleware running a [`Dispatcher`] in front of the host router.
//!
//! # Responsibilities
//! - Build a [`TrailRequest`] view from the incoming request head
//! - Answer with the handler's response, or hand the request downstream
//! - Map dispatch failures to `500 Internal Server Error`
//!
//! # Design Decisions
//! - Headers on a marked pass-through response are copied onto the
//!   downstream response, so handlers can decorate requests they let through
//! - The request body is never touched by handlers

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next as HostNext,
    response::{IntoResponse, Response},
};

use crate::chain::handler::Convention;
use crate::dispatch::Dispatcher;
use crate::http::request::TrailRequest;
use crate::http::response::{is_pass_through, Outcome, PASS_THROUGH_HEADER};

/// Use with `axum::middleware::from_fn_with_state(dispatcher, trail_middleware::<C>)`.
pub async fn trail_middleware<C: Convention>(
    State(dispatcher): State<Dispatcher<C>>,
    request: Request<Body>,
    next: HostNext,
) -> Response {
    // 1. Snapshot the head for handlers, keep the body for downstream
    let (parts, body) = request.into_parts();
    let view = TrailRequest::from_parts(&parts);
    let request = Request::from_parts(parts, body);

    // 2. Dispatch and translate the outcome
    match dispatcher.dispatch(&view).await {
        Ok(Outcome::PassThrough) => next.run(request).await,
        Ok(Outcome::Respond(marked)) if is_pass_through(&marked) => {
            let mut response = next.run(request).await;
            merge_headers(marked.into_parts().0.headers, response.headers_mut());
            response
        }
        Ok(Outcome::Respond(response)) => response,
        Err(err) => {
            tracing::error!(
                request_id = %view.id(),
                path = %view.path(),
                kind = err.kind(),
                error = %err,
                "Dispatch failed"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

/// Copy `source` onto `target`, replacing same-named headers.
fn merge_headers(source: HeaderMap, target: &mut HeaderMap) {
    let mut current = None;
    for (name, value) in source {
        // `None` means "same name as the previous entry"
        if let Some(name) = name {
            if name == PASS_THROUGH_HEADER || name == header::CONTENT_LENGTH {
                current = None;
                continue;
            }
            target.remove(&name);
            current = Some(name);
        }
        if let Some(name) = &current {
            target.append(name.clone(), value);
        }
    }
}
