//! Subscriptions from a user to a creator.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CoreError, SubscriptionId, UserId};

/// A subscription of a user to a creator.
///
/// At most one subscription exists per `(user_id, creator_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Row id.
    pub id: SubscriptionId,
    /// The subscriber.
    pub user_id: UserId,
    /// The creator subscribed to.
    pub creator_id: UserId,
    /// Current status.
    pub status: SubscriptionStatus,
    /// When the subscription started.
    pub started_at: DateTime<Utc>,
    /// The creator's username, when the creator exists.
    pub creator_username: Option<String>,
}

/// A subscription about to be inserted.
#[derive(Debug, Clone, Copy)]
pub struct NewSubscription {
    /// The subscriber.
    pub user_id: UserId,
    /// The creator.
    pub creator_id: UserId,
}

/// Subscription status. Nothing ever moves a subscription out of `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// The subscription is live.
    Active,
}

impl SubscriptionStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            other => Err(CoreError::UnknownSubscriptionStatus(other.to_string())),
        }
    }
}
