//! In-process session storage.
//!
//! Sessions live in a `HashMap` behind a `tokio` `RwLock`. Suitable for a
//! single instance; sessions are lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use clipcherry_core::{Session, SessionToken};

use crate::error::Result;
use crate::SessionStore;

/// In-memory `SessionStore`.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionToken, Session>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included until purged.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no sessions are stored.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put_session(&self, session: &Session) -> Result<()> {
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn get_session(
        &self,
        token: &SessionToken,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return Ok(None),
                Some(session) if !session.is_expired_at(now) => return Ok(Some(session.clone())),
                Some(_) => {}
            }
        }

        // Expired: drop it, unless it was replaced in the meantime.
        let mut sessions = self.sessions.write().await;
        if sessions.get(token).is_some_and(|s| s.is_expired_at(now)) {
            sessions.remove(token);
        }
        Ok(None)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        Ok(before - sessions.len())
    }
}
