//! `RocksDB` session storage.
//!
//! Sessions are CBOR-encoded into the `sessions` column family so they
//! survive restarts. Expiry is checked on read and by `purge_expired`.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use clipcherry_core::{Session, SessionToken};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::SessionStore;

/// RocksDB-backed session storage.
pub struct RocksSessionStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksSessionStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl SessionStore for RocksSessionStore {
    async fn put_session(&self, session: &Session) -> Result<()> {
        let cf = self.cf(cf::SESSIONS)?;
        let key = keys::session_key(&session.token);
        let value = Self::serialize(session)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn get_session(
        &self,
        token: &SessionToken,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>> {
        let cf = self.cf(cf::SESSIONS)?;
        let key = keys::session_key(token);

        let Some(data) = self
            .db
            .get_cf(&cf, &key)
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let session: Session = Self::deserialize(&data)?;
        if session.is_expired_at(now) {
            self.db
                .delete_cf(&cf, &key)
                .map_err(|e| StoreError::Database(e.to_string()))?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let cf = self.cf(cf::SESSIONS)?;

        let iter = self.db.iterator_cf(
            &cf,
            IteratorMode::From(keys::SESSION_PREFIX, Direction::Forward),
        );

        let mut batch = WriteBatch::default();
        let mut removed = 0;
        for item in iter {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(keys::SESSION_PREFIX) {
                break;
            }

            let session: Session = Self::deserialize(&value)?;
            if session.is_expired_at(now) {
                batch.delete_cf(&cf, &key);
                removed += 1;
            }
        }

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use clipcherry_core::UserId;
    use tempfile::TempDir;

    fn create_test_store() -> (RocksSessionStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksSessionStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn session(token: &str, now: DateTime<Utc>, ttl_secs: i64) -> Session {
        Session::issue(
            SessionToken::new(token),
            UserId::new(7),
            now,
            Duration::seconds(ttl_secs),
        )
    }

    #[tokio::test]
    async fn session_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let now = Utc::now();
        let s = session("persist", now, 3600);

        {
            let store = RocksSessionStore::open(dir.path()).unwrap();
            store.put_session(&s).await.unwrap();
        }

        let store = RocksSessionStore::open(dir.path()).unwrap();
        let found = store.get_session(&s.token, now).await.unwrap();
        assert_eq!(found.map(|f| f.user_id), Some(UserId::new(7)));
    }

    #[tokio::test]
    async fn expired_session_is_deleted_on_lookup() {
        let (store, _dir) = create_test_store();
        let now = Utc::now();
        let s = session("old", now, 60);
        store.put_session(&s).await.unwrap();

        let later = now + Duration::seconds(120);
        assert!(store.get_session(&s.token, later).await.unwrap().is_none());
        // Gone even when asked with the original clock.
        assert!(store.get_session(&s.token, now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn purge_removes_only_expired() {
        let (store, _dir) = create_test_store();
        let now = Utc::now();
        store.put_session(&session("a", now, 10)).await.unwrap();
        store.put_session(&session("b", now, 10)).await.unwrap();
        store.put_session(&session("c", now, 1000)).await.unwrap();

        let removed = store
            .purge_expired(now + Duration::seconds(30))
            .await
            .unwrap();
        assert_eq!(removed, 2);

        let c = SessionToken::new("c");
        assert!(store.get_session(&c, now).await.unwrap().is_some());
    }
}
