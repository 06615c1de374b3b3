//! Application state.

use std::sync::Arc;

use clipcherry_core::PlaceholderWallet;
use clipcherry_store::{SessionStore, SqliteStore};

use crate::assets::{AssetsClient, AssetsError};
use crate::config::ServiceConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Relational store for users, content, subscriptions and orders.
    pub store: Arc<SqliteStore>,

    /// Login sessions.
    pub sessions: Arc<dyn SessionStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Deposit destinations for purchases.
    pub wallet: PlaceholderWallet,

    /// Upstream for the static front-end.
    pub assets: AssetsClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the static asset client cannot be built.
    pub fn new(
        store: Arc<SqliteStore>,
        sessions: Arc<dyn SessionStore>,
        config: ServiceConfig,
    ) -> Result<Self, AssetsError> {
        let wallet = config.wallet();
        if wallet.is_placeholder() {
            tracing::warn!(
                "Wallet not configured - purchases will hand out placeholder deposit destinations"
            );
        }

        let assets = AssetsClient::new(&config.assets_base_url)?;
        tracing::info!(assets_base_url = %assets.base_url(), "Static assets proxied");

        Ok(Self {
            store,
            sessions,
            config,
            wallet,
            assets,
        })
    }
}
