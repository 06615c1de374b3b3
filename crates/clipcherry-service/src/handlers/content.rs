//! Content listing and creation handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clipcherry_core::{Content, ContentId, NewContent, UserId};
use clipcherry_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{required, Validate, ValidatedJson};
use crate::state::AppState;

/// A content row as shown in the public gallery. The media id is withheld.
#[derive(Debug, Serialize)]
pub struct PublicContent {
    /// Content ID.
    pub id: ContentId,
    /// Owning creator.
    pub creator_id: UserId,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Price in cents.
    pub price_cents: i64,
    /// Media kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Preview asset, if any.
    pub preview_id: Option<String>,
    /// Created timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Content> for PublicContent {
    fn from(content: Content) -> Self {
        Self {
            id: content.id,
            creator_id: content.creator_id,
            title: content.title,
            description: content.description,
            price_cents: content.price_cents,
            kind: content.kind,
            preview_id: content.preview_id,
            created_at: content.created_at,
        }
    }
}

/// Listing response.
#[derive(Debug, Serialize)]
pub struct ItemsResponse<T> {
    /// The rows.
    pub items: Vec<T>,
}

/// List public content.
pub async fn list_content(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ItemsResponse<PublicContent>>, ApiError> {
    let items = state.store.list_public_content().await?;

    Ok(Json(ItemsResponse {
        items: items.into_iter().map(PublicContent::from).collect(),
    }))
}

/// List everything the caller owns, private rows included.
pub async fn list_my_content(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ItemsResponse<Content>>, ApiError> {
    let items = state.store.list_content_by_creator(auth.user_id).await?;
    Ok(Json(ItemsResponse { items }))
}

/// Create content request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateContentRequest {
    title: Option<String>,
    description: Option<String>,
    price_cents: Option<i64>,
    #[serde(rename = "type")]
    kind: Option<String>,
    media_id: Option<String>,
    preview_id: Option<String>,
    is_private: Option<bool>,
}

/// Checked content input, not yet bound to an owner.
#[derive(Debug)]
pub struct ContentInput {
    title: String,
    description: String,
    price_cents: i64,
    kind: String,
    media_id: String,
    preview_id: Option<String>,
    is_private: bool,
}

impl Validate for CreateContentRequest {
    type Validated = ContentInput;

    fn validate(self) -> Result<ContentInput, ApiError> {
        let (Some(title), Some(description), Some(price_cents), Some(kind), Some(media_id)) = (
            required(self.title),
            required(self.description),
            self.price_cents,
            required(self.kind),
            required(self.media_id),
        ) else {
            return Err(ApiError::BadRequest("Missing content fields".into()));
        };

        if price_cents < 0 {
            return Err(ApiError::BadRequest("Price must not be negative".into()));
        }

        Ok(ContentInput {
            title,
            description,
            price_cents,
            kind,
            media_id,
            preview_id: required(self.preview_id),
            is_private: self.is_private.unwrap_or(false),
        })
    }
}

/// Create content response.
#[derive(Debug, Serialize)]
pub struct CreateContentResponse {
    /// Always `true`.
    pub success: bool,
    /// ID of the new row.
    pub id: ContentId,
}

/// Create a content row owned by the caller.
pub async fn create_content(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateContentRequest>,
) -> Result<Json<CreateContentResponse>, ApiError> {
    let content = state
        .store
        .create_content(&NewContent {
            creator_id: auth.user_id,
            title: input.title,
            description: input.description,
            price_cents: input.price_cents,
            kind: input.kind,
            media_id: input.media_id,
            preview_id: input.preview_id,
            is_private: input.is_private,
        })
        .await?;

    tracing::info!(
        content_id = %content.id,
        creator_id = %auth.user_id,
        is_private = content.is_private,
        "Content created"
    );

    Ok(Json(CreateContentResponse {
        success: true,
        id: content.id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> CreateContentRequest {
        CreateContentRequest {
            title: Some("Sunset".into()),
            description: Some("Golden hour".into()),
            price_cents: Some(499),
            kind: Some("video".into()),
            media_id: Some("m-1".into()),
            preview_id: None,
            is_private: None,
        }
    }

    #[test]
    fn defaults_to_public() {
        let input = body().validate().unwrap();
        assert!(!input.is_private);
        assert_eq!(input.description, "Golden hour");
    }

    #[test]
    fn blank_description_is_rejected() {
        for description in [None, Some(String::new()), Some("  ".into())] {
            let err = CreateContentRequest {
                description,
                ..body()
            }
            .validate()
            .unwrap_err();
            assert_eq!(err.to_string(), "Missing content fields");
        }
    }

    #[test]
    fn missing_media_is_rejected() {
        let err = CreateContentRequest {
            media_id: None,
            ..body()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing content fields");
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = CreateContentRequest {
            price_cents: Some(-1),
            ..body()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
