//! Request view handed to handlers.
//!
//! # Responsibilities
//! - Snapshot the routing-relevant parts of a host request (method, URI, headers)
//! - Carry a request ID for log correlation
//! - Stay cheap to clone so every handler can own a copy
//!
//! # Design Decisions
//! - Incoming `x-request-id` is reused; otherwise a UUID v4 is generated
//! - The body is not part of the view; it stays with the host request

use std::sync::Arc;

use axum::http::{
    header::{HeaderMap, HeaderValue},
    request::Parts,
    uri::InvalidUri,
    Method, Uri,
};
use uuid::Uuid;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

#[derive(Debug)]
struct RequestHead {
    id: String,
    method: Method,
    uri: Uri,
    headers: HeaderMap<HeaderValue>,
}

/// Shared, read-only view of an incoming request.
#[derive(Debug, Clone)]
pub struct TrailRequest {
    head: Arc<RequestHead>,
}

impl TrailRequest {
    /// Build a request view from its parts.
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        let id = headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            head: Arc::new(RequestHead {
                id,
                method,
                uri,
                headers,
            }),
        }
    }

    /// Snapshot the head of a host request.
    pub fn from_parts(parts: &Parts) -> Self {
        Self::new(parts.method.clone(), parts.uri.clone(), parts.headers.clone())
    }

    /// A bare GET request for `uri`.
    pub fn get(uri: &str) -> Result<Self, InvalidUri> {
        Ok(Self::new(Method::GET, uri.parse()?, HeaderMap::new()))
    }

    /// Request path, without the query string.
    pub fn path(&self) -> &str {
        self.head.uri.path()
    }

    /// Correlation ID.
    pub fn id(&self) -> &str {
        &self.head.id
    }

    pub fn method(&self) -> &Method {
        &self.head.method
    }

    pub fn uri(&self) -> &Uri {
        &self.head.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    /// Header value as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns true if both values view the same underlying request.
    pub fn same_request(&self, other: &TrailRequest) -> bool {
        Arc::ptr_eq(&self.head, &other.head)
    }
}
