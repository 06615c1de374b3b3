//! Storage layer for CLIPcherry.
//!
//! Two stores back the service:
//!
//! - A relational store ([`Store`], implemented by [`SqliteStore`]) for users,
//!   content, subscriptions and purchase orders. The schema ships as embedded
//!   `sqlx` migrations and is applied when the store is opened.
//! - A key-value session store ([`SessionStore`]) mapping bearer tokens to
//!   users with a fixed expiry. [`MemorySessionStore`] keeps sessions in
//!   process; `RocksSessionStore` (feature `rocksdb-backend`) persists them.
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> clipcherry_store::Result<()> {
//! use clipcherry_core::{normalize_email, NewUser};
//! use clipcherry_store::{SqliteStore, Store};
//!
//! let store = SqliteStore::connect("sqlite://clipcherry.db?mode=rwc").await?;
//! let user = store
//!     .create_user(&NewUser {
//!         username: "ada".into(),
//!         email: normalize_email("ada@example.com"),
//!         password_hash: "…".into(),
//!     })
//!     .await?;
//! let found = store.get_user_by_email("ada@example.com").await?;
//! assert_eq!(found.map(|u| u.id), Some(user.id));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
#[cfg(feature = "rocksdb-backend")]
pub mod keys;
pub mod memory;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
pub mod schema;
pub mod sqlite;

pub use error::{Result, StoreError};
pub use memory::MemorySessionStore;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksSessionStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use clipcherry_core::{
    Content, ContentId, NewContent, NewOrder, NewSubscription, NewUser, Order, OrderId, Session,
    SessionToken, Subscription, User, UserId,
};

/// The relational storage trait defining all record operations.
///
/// Every method issues one statement, except [`Store::create_order`] for
/// tagged destinations which needs the new row id inside the same transaction.
#[async_trait]
pub trait Store: Send + Sync {
    // =========================================================================
    // Users
    // =========================================================================

    /// Insert a user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateEmail` if the email is taken.
    async fn create_user(&self, user: &NewUser) -> Result<User>;

    /// Look up a user by normalized email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    // =========================================================================
    // Content
    // =========================================================================

    /// Insert a content record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn create_content(&self, content: &NewContent) -> Result<Content>;

    /// Get a content record by id, private or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_content(&self, content_id: ContentId) -> Result<Option<Content>>;

    /// List all content without the private flag, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_public_content(&self) -> Result<Vec<Content>>;

    /// List all content owned by a creator, private included, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_content_by_creator(&self, creator_id: UserId) -> Result<Vec<Content>>;

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Subscribe a user to a creator.
    ///
    /// Idempotent: an existing subscription for the pair is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn create_subscription(&self, subscription: &NewSubscription) -> Result<Subscription>;

    /// List a user's subscriptions with creator usernames, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_subscriptions_by_user(&self, user_id: UserId) -> Result<Vec<Subscription>>;

    // =========================================================================
    // Orders
    // =========================================================================

    /// Insert a pending order.
    ///
    /// For `Destination::TaggedAccount` the destination tag is set to the new
    /// order's id before the row becomes visible.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Domain` if the id no longer fits a destination
    /// tag; the insert is rolled back.
    async fn create_order(&self, order: &NewOrder) -> Result<Order>;

    /// Get an order by id, only if it belongs to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_order_for_user(&self, order_id: OrderId, user_id: UserId)
        -> Result<Option<Order>>;
}

/// Key-value storage for login sessions.
///
/// Sessions expire at `Session::expires_at`; implementations never return an
/// expired session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a session under its token.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn put_session(&self, session: &Session) -> Result<()>;

    /// Look up a live session. Expired sessions are removed and reported as
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    async fn get_session(&self, token: &SessionToken, now: DateTime<Utc>)
        -> Result<Option<Session>>;

    /// Remove every session expired at `now`. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the scan or a delete fails.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize>;
}
