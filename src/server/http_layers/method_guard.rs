//! Method guard middleware
//!
//! The endpoint is read-only. Some legacy clients tunnel DELETE/PUT through
//! POST with an `X-HTTP-Method` override header; the override exists only so
//! disguised mutating requests can be detected and rejected outright.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

pub const METHOD_OVERRIDE_HEADER: &str = "x-http-method";

pub async fn reject_mutating_methods(request: Request<Body>, next: Next) -> Response {
    let mut effective_method = request.method().clone();

    if effective_method == Method::POST {
        if let Some(value) = request.headers().get(METHOD_OVERRIDE_HEADER) {
            // Only DELETE and PUT are recognized override values; anything
            // else is a malformed override. Either way the request mutates.
            effective_method = match value.to_str() {
                Ok("DELETE") => Method::DELETE,
                Ok("PUT") => Method::PUT,
                _ => {
                    debug!("Rejecting unexpected method override: {:?}", value);
                    return StatusCode::METHOD_NOT_ALLOWED.into_response();
                }
            };
        }
    }

    if effective_method != Method::GET {
        debug!("Rejecting non-GET method: {}", effective_method);
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    next.run(request).await
}
