//! Registration and login handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use clipcherry_core::{normalize_email, NewUser, Session, SessionToken};
use clipcherry_store::Store;

use crate::crypto;
use crate::error::ApiError;
use crate::extract::{required, Validate, ValidatedJson};
use crate::state::AppState;

/// Generic success response.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    /// Always `true`.
    pub success: bool,
}

/// Register request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

/// Checked registration input.
#[derive(Debug)]
pub struct Registration {
    username: String,
    email: String,
    password: String,
}

impl Validate for RegisterRequest {
    type Validated = Registration;

    fn validate(self) -> Result<Registration, ApiError> {
        match (
            required(self.username),
            required(self.email),
            required(self.password),
        ) {
            (Some(username), Some(email), Some(password)) => Ok(Registration {
                username: username.trim().to_string(),
                email: normalize_email(&email),
                password,
            }),
            _ => Err(ApiError::BadRequest("Missing required fields".into())),
        }
    }
}

/// Register a new user.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let password_hash =
        crypto::hash_password(&input.password, state.config.password_pepper.as_deref());

    let user = state
        .store
        .create_user(&NewUser {
            username: input.username,
            email: input.email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(SuccessResponse { success: true }))
}

/// Login request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

/// Checked login input.
#[derive(Debug)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Validate for LoginRequest {
    type Validated = Credentials;

    fn validate(self) -> Result<Credentials, ApiError> {
        match (required(self.email), required(self.password)) {
            (Some(email), Some(password)) => Ok(Credentials {
                email: normalize_email(&email),
                password,
            }),
            _ => Err(ApiError::BadRequest("Missing credentials".into())),
        }
    }
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub session: SessionToken,
}

/// Log in and open a session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let pepper = state.config.password_pepper.as_deref();

    let Some(user) = state.store.get_user_by_email(&input.email).await? else {
        // Same work as a password mismatch.
        let _ = crypto::hash_password(&input.password, pepper);
        return Err(ApiError::InvalidCredentials);
    };

    if !crypto::verify_password(&input.password, &user.password_hash, pepper) {
        tracing::debug!(user_id = %user.id, "Password mismatch");
        return Err(ApiError::InvalidCredentials);
    }

    let session = Session::issue(
        crypto::new_session_token(),
        user.id,
        Utc::now(),
        state.config.session_ttl(),
    );
    state.sessions.put_session(&session).await?;

    tracing::info!(user_id = %user.id, expires_at = %session.expires_at, "Session opened");

    Ok(Json(LoginResponse {
        session: session.token,
    }))
}
