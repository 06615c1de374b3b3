//! Bearer-session authentication.
//!
//! A login issues an opaque token stored in the session store with a fixed
//! expiry. Requests present it as `Authorization: Bearer <token>`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::Utc;

use clipcherry_core::{SessionToken, UserId};

use crate::error::ApiError;
use crate::state::AppState;

/// An authenticated user resolved from a live session.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// The user the session belongs to.
    pub user_id: UserId,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::Unauthorized)?;

        let session = state
            .sessions
            .get_session(&token, Utc::now())
            .await?
            .ok_or(ApiError::Unauthorized)?;

        Ok(Self {
            user_id: session.user_id,
        })
    }
}

/// Extract the bearer token from the authorization header.
fn bearer_token(parts: &Parts) -> Option<SessionToken> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(SessionToken::new(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/my-content");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_token_is_extracted() {
        let parts = parts_with(Some("Bearer abc123"));
        assert_eq!(bearer_token(&parts), Some(SessionToken::new("abc123")));
    }

    #[test]
    fn other_schemes_and_blank_tokens_are_ignored() {
        assert_eq!(bearer_token(&parts_with(None)), None);
        assert_eq!(bearer_token(&parts_with(Some("Basic abc123"))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer   "))), None);
    }
}
