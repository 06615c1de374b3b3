//! Background purge of expired sessions.
//!
//! Lookups already drop expired sessions, but tokens that are never presented
//! again would otherwise stay in the store forever.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use clipcherry_store::SessionStore;

/// Purge expired sessions once. Returns how many were removed.
pub async fn sweep_once(sessions: &dyn SessionStore) -> usize {
    match sessions.purge_expired(Utc::now()).await {
        Ok(0) => 0,
        Ok(removed) => {
            tracing::debug!(removed, "Purged expired sessions");
            removed
        }
        Err(e) => {
            tracing::warn!(error = %e, "Session sweep failed");
            0
        }
    }
}

/// Spawn a task that sweeps every `period` until the runtime shuts down.
pub fn spawn_session_sweeper(sessions: Arc<dyn SessionStore>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            sweep_once(sessions.as_ref()).await;
        }
    })
}
