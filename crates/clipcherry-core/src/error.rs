//! Error types for CLIPcherry domain logic.

use crate::ids::IdError;

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by domain types, independent of storage or transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Invalid identifier.
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] IdError),

    /// Currency other than the supported ones.
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// Unknown order status string read back from storage.
    #[error("unknown order status: {0}")]
    UnknownOrderStatus(String),

    /// Unknown subscription status string read back from storage.
    #[error("unknown subscription status: {0}")]
    UnknownSubscriptionStatus(String),

    /// XRP destination tags are 32-bit; the order id outgrew them.
    #[error("order id {0} does not fit in a destination tag")]
    DestinationTagOverflow(i64),
}
