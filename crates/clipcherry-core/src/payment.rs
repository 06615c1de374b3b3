//! Deposit destinations for crypto payments.
//!
//! `PlaceholderWallet` does not derive real keys. BTC addresses are a
//! deterministic string built from the configured xpub, the user and the
//! content, so they are stable but not spendable. It must be replaced by a
//! real HD derivation or a custodial wallet before taking payments.

use crate::{ContentId, CoreError, Currency, Destination, OrderId, UserId};

/// Default xpub used when none is configured.
pub const PLACEHOLDER_BTC_XPUB: &str = "xpub-placeholder";

/// Default XRP account used when none is configured.
pub const PLACEHOLDER_XRP_ACCOUNT: &str = "YOUR_XRP_ACCOUNT_ADDRESS";

/// Produces payment destinations for new orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderWallet {
    btc_xpub: String,
    xrp_account: String,
}

impl PlaceholderWallet {
    /// Create a wallet from the configured xpub and XRP account.
    #[must_use]
    pub fn new(btc_xpub: impl Into<String>, xrp_account: impl Into<String>) -> Self {
        Self {
            btc_xpub: btc_xpub.into(),
            xrp_account: xrp_account.into(),
        }
    }

    /// Whether either half still uses the built-in placeholder values.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.btc_xpub == PLACEHOLDER_BTC_XPUB || self.xrp_account == PLACEHOLDER_XRP_ACCOUNT
    }

    /// The BTC deposit address for a user buying a piece of content.
    ///
    /// Deterministic: the same user and content always get the same address.
    #[must_use]
    pub fn btc_address(&self, user_id: UserId, content_id: ContentId) -> String {
        format!("{}-addr-{user_id}-{content_id}", self.btc_xpub)
    }

    /// The shared XRP account.
    #[must_use]
    pub fn xrp_account(&self) -> &str {
        &self.xrp_account
    }

    /// Payment destination for a new order.
    #[must_use]
    pub fn destination(
        &self,
        currency: Currency,
        user_id: UserId,
        content_id: ContentId,
    ) -> Destination {
        match currency {
            Currency::Btc => Destination::Address(self.btc_address(user_id, content_id)),
            Currency::Xrp => Destination::TaggedAccount(self.xrp_account.clone()),
        }
    }
}

impl Default for PlaceholderWallet {
    fn default() -> Self {
        Self::new(PLACEHOLDER_BTC_XPUB, PLACEHOLDER_XRP_ACCOUNT)
    }
}

/// The XRP destination tag for an order: the order id itself.
///
/// # Errors
///
/// Returns `CoreError::DestinationTagOverflow` once ids outgrow 32 bits.
pub fn destination_tag_for(order_id: OrderId) -> Result<u32, CoreError> {
    u32::try_from(order_id.get()).map_err(|_| CoreError::DestinationTagOverflow(order_id.get()))
}
