//! Error types for CLIPcherry storage.

use clipcherry_core::CoreError;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Schema migration failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A user with this email already exists.
    #[error("email already registered")]
    DuplicateEmail,

    /// A stored value does not map back onto a domain type.
    #[error("corrupt record: {0}")]
    Domain(#[from] CoreError),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::Migration(err.to_string())
    }
}
