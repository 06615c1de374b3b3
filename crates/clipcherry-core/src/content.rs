//! Creator content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ContentId, UserId};

/// A creator-owned, priced, optionally private media record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Row id.
    pub id: ContentId,

    /// The owning user.
    pub creator_id: UserId,

    /// Title shown in the gallery.
    pub title: String,

    /// Free-form description.
    pub description: String,

    /// Price in US cents.
    pub price_cents: i64,

    /// Media kind (e.g. "video", "photo"). Free-form.
    #[serde(rename = "type")]
    pub kind: String,

    /// Identifier of the full media asset. Only the owner sees it.
    pub media_id: String,

    /// Identifier of a public preview asset, if any.
    pub preview_id: Option<String>,

    /// Hidden from the public listing when set.
    pub is_private: bool,

    /// When the content was created.
    pub created_at: DateTime<Utc>,
}

impl Content {
    /// Whether the content shows up in the public listing.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        !self.is_private
    }
}

/// Content about to be inserted.
#[derive(Debug, Clone)]
pub struct NewContent {
    /// The owning user (always the authenticated caller).
    pub creator_id: UserId,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Price in US cents, non-negative.
    pub price_cents: i64,
    /// Media kind.
    pub kind: String,
    /// Full media asset identifier.
    pub media_id: String,
    /// Optional preview asset identifier.
    pub preview_id: Option<String>,
    /// Private flag.
    pub is_private: bool,
}
