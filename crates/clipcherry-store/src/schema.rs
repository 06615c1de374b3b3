//! Schema definitions: SQL migrations and `RocksDB` column families.

use sqlx::migrate::Migrator;

/// Embedded migrations for the relational store (`migrations/`).
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Column family names for the `RocksDB` session database.
#[cfg(feature = "rocksdb-backend")]
pub mod cf {
    /// Login sessions, keyed by `session:<token>`.
    pub const SESSIONS: &str = "sessions";
}

/// Returns all column family names for database initialization.
#[cfg(feature = "rocksdb-backend")]
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::SESSIONS]
}
