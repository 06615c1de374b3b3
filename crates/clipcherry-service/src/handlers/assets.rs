//! Static front-end handler.
//!
//! Serves the gallery bundle by proxying to the asset upstream. Also acts as
//! the router fallback, so every unmatched path ends up here.

use std::sync::Arc;

use axum::extract::{OriginalUri, State};
use axum::http::{header, Method};
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::state::AppState;

/// The page served for the site root.
const INDEX_PATH: &str = "/public/index.html";

/// Map a request path onto the upstream path, if it is a servable asset.
///
/// Paths are matched still percent-encoded, so only plain segments of
/// `[A-Za-z0-9._-]` are accepted. Anything that could decode into a dot
/// segment or a separator (`%2e`, `%2f`, `\`) never reaches the upstream.
#[must_use]
pub fn resolve_asset_path(path: &str) -> Option<&str> {
    let rest = path.strip_prefix('/')?;
    let segments = rest.strip_suffix('/').unwrap_or(rest);
    if !segments.is_empty() && !segments.split('/').all(is_plain_segment) {
        return None;
    }

    match path {
        "/" | "/index.html" | "/public" | "/public/" | INDEX_PATH => Some(INDEX_PATH),
        p if p.starts_with("/public/") || p.starts_with("/css/") => Some(p),
        _ => None,
    }
}

/// A non-empty path segment that is not `.` or `..` and needs no decoding.
fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'))
}

/// Serve a static asset, or 404.
pub async fn serve_static(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, ApiError> {
    let not_found = || ApiError::NotFound("Not Found".into());

    if method != Method::GET && method != Method::HEAD {
        return Err(not_found());
    }

    let path = resolve_asset_path(uri.path()).ok_or_else(not_found)?;

    let asset = state
        .assets
        .fetch(path)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, path = %path, "Static asset fetch failed");
            ApiError::ExternalService("Static assets unavailable".into())
        })?
        .ok_or_else(not_found)?;

    Ok(([(header::CONTENT_TYPE, asset.content_type)], asset.body).into_response())
}
