//! Purchase orders.
//!
//! An order records an attempted crypto payment for a piece of content. Orders
//! are created `pending` and nothing in the platform advances them further.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ContentId, CoreError, OrderId, UserId};

/// Supported payment currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Bitcoin: one derived deposit address per (user, content).
    #[serde(rename = "BTC")]
    Btc,
    /// XRP: one shared account, payments told apart by destination tag.
    #[serde(rename = "XRP")]
    Xrp,
}

impl Currency {
    /// Ticker symbol, also the storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Xrp => "XRP",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BTC" => Ok(Self::Btc),
            "XRP" => Ok(Self::Xrp),
            other => Err(CoreError::UnsupportedCurrency(other.to_string())),
        }
    }
}

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Awaiting payment. Write-once: no settlement path exists.
    Pending,
}

impl OrderStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            other => Err(CoreError::UnknownOrderStatus(other.to_string())),
        }
    }
}

/// A purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Row id, also the XRP destination tag.
    pub id: OrderId,
    /// The purchasing user.
    pub user_id: UserId,
    /// The content being bought.
    pub content_id: ContentId,
    /// Payment currency.
    pub currency: Currency,
    /// Content price at order time, in US cents.
    pub price_cents: i64,
    /// Order status.
    pub status: OrderStatus,
    /// Where to send the payment.
    pub address: String,
    /// XRP destination tag; `None` for BTC.
    pub destination_tag: Option<u32>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
}

/// Where the payment for a new order goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A dedicated deposit address; no tag.
    Address(String),
    /// A shared account; the store assigns the tag from the new order's id.
    TaggedAccount(String),
}

impl Destination {
    /// The address payments are sent to.
    #[must_use]
    pub fn address(&self) -> &str {
        match self {
            Self::Address(address) | Self::TaggedAccount(address) => address,
        }
    }

    /// Whether the order needs a destination tag.
    #[must_use]
    pub const fn needs_tag(&self) -> bool {
        matches!(self, Self::TaggedAccount(_))
    }
}

/// An order about to be inserted.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// The purchasing user.
    pub user_id: UserId,
    /// The content.
    pub content_id: ContentId,
    /// Payment currency.
    pub currency: Currency,
    /// Price copied from the content.
    pub price_cents: i64,
    /// Payment destination.
    pub destination: Destination,
}
