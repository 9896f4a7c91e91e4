//! Shared API key authentication.
//!
//! When `security.api_key` is configured every protected route requires the
//! same key in the `X-API-Key` header. Without a configured key the API is
//! open, which is how a single front-desk install usually runs.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::crypto::api_key_matches;

use super::trace_id::get_request_id;
use crate::app::AppState;
use crate::error::ApiError;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Middleware that enforces the configured API key, if any.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.config.security.api_key() else {
        return next.run(req).await;
    };

    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim);
    let had_key = presented.is_some();
    let authorized = presented.is_some_and(|key| api_key_matches(key, expected));

    if authorized {
        return next.run(req).await;
    }
    if had_key {
        tracing::warn!(
            request_id = %get_request_id(req.extensions()),
            path = %req.uri().path(),
            "Rejected request with wrong API key"
        );
    }
    ApiError::Unauthorized("Invalid or missing API key".into()).into_response()
}
