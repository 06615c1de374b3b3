//! Subscription handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use clipcherry_core::{NewSubscription, Subscription, UserId};
use clipcherry_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{IdInput, Validate, ValidatedJson};
use crate::handlers::accounts::SuccessResponse;
use crate::state::AppState;

/// Subscriptions listing response.
#[derive(Debug, Serialize)]
pub struct SubscriptionsResponse {
    /// The caller's subscriptions, oldest first.
    pub subscriptions: Vec<Subscription>,
}

/// List the caller's subscriptions.
pub async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<SubscriptionsResponse>, ApiError> {
    let subscriptions = state.store.list_subscriptions_by_user(auth.user_id).await?;
    Ok(Json(SubscriptionsResponse { subscriptions }))
}

/// Subscribe request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubscribeRequest {
    creator_id: Option<IdInput>,
}

impl Validate for SubscribeRequest {
    type Validated = UserId;

    fn validate(self) -> Result<UserId, ApiError> {
        self.creator_id
            .ok_or_else(|| ApiError::BadRequest("Missing creator_id".into()))?
            .parse("Invalid creator_id")
    }
}

/// Subscribe the caller to a creator. Repeating it is a no-op.
pub async fn create_subscription(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(creator_id): ValidatedJson<SubscribeRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let subscription = state
        .store
        .create_subscription(&NewSubscription {
            user_id: auth.user_id,
            creator_id,
        })
        .await?;

    tracing::info!(
        subscription_id = %subscription.id,
        user_id = %auth.user_id,
        creator_id = %creator_id,
        "Subscribed"
    );

    Ok(Json(SuccessResponse { success: true }))
}
