//! Cross-origin policy for the lookup route.
//!
//! Every response leaving the service, including errors and caught panics,
//! goes through [`cors`] and carries the same header set:
//!
//! | Header | Value |
//! |---|---|
//! | `Access-Control-Allow-Origin` | request `Origin` if allow-listed, else `null` |
//! | `Access-Control-Allow-Methods` | `GET, OPTIONS` |
//! | `Access-Control-Allow-Headers` | preflight `Access-Control-Request-Headers`, else `Content-Type, Authorization` |
//! | `Access-Control-Max-Age` | configured, default 86400 |
//! | `Vary` | existing value merged with `Origin` |
//!
//! The allow-origin header is a browser hint only. A denied origin still
//! gets a full response.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, ACCESS_CONTROL_REQUEST_HEADERS, ORIGIN, VARY,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

pub const ALLOW_METHODS: &str = "GET, OPTIONS";
pub const DEFAULT_ALLOW_HEADERS: &str = "Content-Type, Authorization";
pub const DENIED_ORIGIN: &str = "null";

/// Immutable allow-list of exact origin strings. No wildcards, no
/// subdomain matching.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: Vec<String>,
    max_age: Duration,
}

impl OriginPolicy {
    pub fn new<I, S>(allowed: I, max_age: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
            max_age,
        }
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed.iter().any(|a| a == origin)
    }

    /// Compute the header set for a request.
    pub fn decide(&self, request_headers: &HeaderMap) -> CorsDecision {
        let allow_origin = request_headers
            .get(ORIGIN)
            .filter(|v| v.to_str().is_ok_and(|o| self.is_allowed(o)))
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DENIED_ORIGIN));

        let allow_headers = request_headers
            .get(ACCESS_CONTROL_REQUEST_HEADERS)
            .filter(|v| !v.as_bytes().trim_ascii().is_empty())
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_ALLOW_HEADERS));

        CorsDecision {
            allow_origin,
            allow_headers,
            max_age: HeaderValue::from(self.max_age.as_secs()),
        }
    }
}

/// Per-request CORS header values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsDecision {
    pub allow_origin: HeaderValue,
    pub allow_headers: HeaderValue,
    pub max_age: HeaderValue,
}

impl CorsDecision {
    /// Write the CORS headers onto a response, merging into any `Vary`.
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
        headers.insert(ACCESS_CONTROL_MAX_AGE, self.max_age.clone());

        let existing: Vec<&str> = headers
            .get_all(VARY)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        let merged = merge_vary(Some(&existing.join(", ")), "Origin");
        if let Ok(value) = HeaderValue::from_str(&merged) {
            headers.insert(VARY, value);
        }
    }
}

/// Add `token` to a comma-separated `Vary` value unless already present
/// (compared case-insensitively). Duplicate entries in `existing` collapse,
/// and `*` absorbs everything.
pub fn merge_vary(existing: Option<&str>, token: &str) -> String {
    let mut seen = HashSet::new();
    let mut entries: Vec<&str> = Vec::new();

    for entry in existing
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
    {
        if entry == "*" {
            return "*".to_string();
        }
        if seen.insert(entry.to_ascii_lowercase()) {
            entries.push(entry);
        }
    }

    if seen.insert(token.to_ascii_lowercase()) {
        entries.push(token);
    }
    entries.join(", ")
}

/// axum middleware applying [`OriginPolicy`].
///
/// `OPTIONS` on any path is a preflight: answered here with 204, no body,
/// and never routed.
pub async fn cors(State(policy): State<Arc<OriginPolicy>>, request: Request, next: Next) -> Response {
    let decision = policy.decide(request.headers());

    if request.method() == Method::OPTIONS {
        debug!(path = %request.uri().path(), "Answering CORS preflight");
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        decision.apply(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    decision.apply(response.headers_mut());
    response
}
