//! Shared utilities for dispatch integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use trail_router::http::response::pass_through;
use trail_router::{ContinuationHandler, Next, SentinelHandler, TrailRequest};

/// Records which handlers ran, in order, and the request each one saw.
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<(&'static str, TrailRequest)>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, label: &'static str, request: &TrailRequest) {
        self.calls.lock().unwrap().push((label, request.clone()));
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().iter().map(|(l, _)| *l).collect()
    }

    pub fn count(&self, label: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == label)
            .count()
    }

    pub fn requests(&self, label: &str) -> Vec<TrailRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == label)
            .map(|(_, r)| r.clone())
            .collect()
    }
}

pub fn status(code: StatusCode) -> Response {
    let mut res = Response::new(Body::empty());
    *res.status_mut() = code;
    res
}

pub fn redirect(location: &'static str) -> Response {
    let mut res = status(StatusCode::TEMPORARY_REDIRECT);
    res.headers_mut()
        .insert(header::LOCATION, HeaderValue::from_static(location));
    res
}

// Continuation-style handlers

pub fn advancing(log: &CallLog, label: &'static str) -> ContinuationHandler {
    let log = log.clone();
    ContinuationHandler::new(move |req: TrailRequest, next: Next| {
        log.record(label, &req);
        async move {
            next.advance();
            None
        }
    })
}

pub fn responding(log: &CallLog, label: &'static str, code: StatusCode) -> ContinuationHandler {
    let log = log.clone();
    ContinuationHandler::new(move |req: TrailRequest, _next: Next| {
        log.record(label, &req);
        async move { Some(status(code)) }
    })
}

pub fn silent(log: &CallLog, label: &'static str) -> ContinuationHandler {
    let log = log.clone();
    ContinuationHandler::new(move |req: TrailRequest, _next: Next| {
        log.record(label, &req);
        async { None }
    })
}

// Sentinel-style handlers

pub fn sentinel_next(log: &CallLog, label: &'static str) -> SentinelHandler {
    sentinel_with(log, label, || Some(pass_through()))
}

pub fn sentinel_redirect(log: &CallLog, label: &'static str) -> SentinelHandler {
    sentinel_with(log, label, || Some(redirect("/redirect")))
}

pub fn sentinel_none(log: &CallLog, label: &'static str) -> SentinelHandler {
    sentinel_with(log, label, || None)
}

pub fn sentinel_with<F>(log: &CallLog, label: &'static str, result: F) -> SentinelHandler
where
    F: Fn() -> Option<Response> + Send + Sync + 'static,
{
    let log = log.clone();
    SentinelHandler::new(move |req: TrailRequest| {
        log.record(label, &req);
        let res = result();
        async move { res }
    })
}
