//! `SQLite` storage implementation.
//!
//! This module provides the `SqliteStore` implementation of the `Store` trait.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use clipcherry_core::{
    destination_tag_for, Content, ContentId, NewContent, NewOrder, NewSubscription, NewUser,
    Order, OrderId, OrderStatus, Subscription, SubscriptionId, SubscriptionStatus, User, UserId,
};

use crate::error::{Result, StoreError};
use crate::schema::MIGRATOR;
use crate::Store;

/// Pool size for file-backed databases.
const DEFAULT_MAX_CONNECTIONS: u32 = 8;

macro_rules! user_columns {
    () => {
        "id, username, email, password_hash, created_at"
    };
}

macro_rules! content_columns {
    () => {
        "id, creator_id, title, description, price_cents, type AS kind, media_id, preview_id, \
         is_private, created_at"
    };
}

macro_rules! order_columns {
    () => {
        "id, user_id, content_id, currency, price_cents, address, destination_tag, status, \
         created_at"
    };
}

/// SQLite-backed record storage.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url` and apply migrations.
    ///
    /// In-memory URLs get a single long-lived connection, since every
    /// connection to `:memory:` would otherwise see its own empty database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the database cannot be opened,
    /// or a migration fails.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(DEFAULT_MAX_CONNECTIONS)
        };

        let pool = pool_options.connect_with(options).await?;
        Self::from_pool(pool).await
    }

    /// Open a fresh private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    /// Wrap an existing pool, applying migrations first.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        MIGRATOR.run(&pool).await?;
        tracing::debug!("Relational schema up to date");
        Ok(Self { pool })
    }

    /// The underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Store for SqliteStore {
    // =========================================================================
    // Users
    // =========================================================================

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let row: UserRow = sqlx::query_as(concat!(
            "INSERT INTO users (username, email, password_hash, created_at) \
             VALUES (?, ?, ?, ?) RETURNING ",
            user_columns!()
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateEmail,
            _ => StoreError::from(e),
        })?;

        Ok(row.into())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(concat!("SELECT ", user_columns!(), " FROM users WHERE email = ?"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(User::from))
    }

    // =========================================================================
    // Content
    // =========================================================================

    async fn create_content(&self, content: &NewContent) -> Result<Content> {
        let row: ContentRow = sqlx::query_as(concat!(
            "INSERT INTO content \
             (creator_id, title, description, price_cents, type, media_id, preview_id, \
              is_private, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING ",
            content_columns!()
        ))
        .bind(content.creator_id.get())
        .bind(&content.title)
        .bind(&content.description)
        .bind(content.price_cents)
        .bind(&content.kind)
        .bind(&content.media_id)
        .bind(content.preview_id.as_deref())
        .bind(content.is_private)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_content(&self, content_id: ContentId) -> Result<Option<Content>> {
        let row: Option<ContentRow> =
            sqlx::query_as(concat!("SELECT ", content_columns!(), " FROM content WHERE id = ?"))
                .bind(content_id.get())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Content::from))
    }

    async fn list_public_content(&self) -> Result<Vec<Content>> {
        let rows: Vec<ContentRow> = sqlx::query_as(concat!(
            "SELECT ",
            content_columns!(),
            " FROM content WHERE is_private = 0 ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Content::from).collect())
    }

    async fn list_content_by_creator(&self, creator_id: UserId) -> Result<Vec<Content>> {
        let rows: Vec<ContentRow> = sqlx::query_as(concat!(
            "SELECT ",
            content_columns!(),
            " FROM content WHERE creator_id = ? ORDER BY id"
        ))
        .bind(creator_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Content::from).collect())
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    async fn create_subscription(&self, subscription: &NewSubscription) -> Result<Subscription> {
        sqlx::query(
            "INSERT INTO subscriptions (user_id, creator_id, status, started_at) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT (user_id, creator_id) DO NOTHING",
        )
        .bind(subscription.user_id.get())
        .bind(subscription.creator_id.get())
        .bind(SubscriptionStatus::Active.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let row: SubscriptionRow = sqlx::query_as(
            "SELECT s.id, s.user_id, s.creator_id, s.status, s.started_at, \
                    u.username AS creator_username \
             FROM subscriptions s LEFT JOIN users u ON u.id = s.creator_id \
             WHERE s.user_id = ? AND s.creator_id = ?",
        )
        .bind(subscription.user_id.get())
        .bind(subscription.creator_id.get())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list_subscriptions_by_user(&self, user_id: UserId) -> Result<Vec<Subscription>> {
        let rows: Vec<SubscriptionRow> = sqlx::query_as(
            "SELECT s.id, s.user_id, s.creator_id, s.status, s.started_at, \
                    u.username AS creator_username \
             FROM subscriptions s LEFT JOIN users u ON u.id = s.creator_id \
             WHERE s.user_id = ? ORDER BY s.id",
        )
        .bind(user_id.get())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Subscription::try_from).collect()
    }

    // =========================================================================
    // Orders
    // =========================================================================

    async fn create_order(&self, order: &NewOrder) -> Result<Order> {
        let mut tx = self.pool.begin().await?;

        let row: OrderRow = sqlx::query_as(concat!(
            "INSERT INTO purchases \
             (user_id, content_id, currency, price_cents, address, destination_tag, status, \
              created_at) \
             VALUES (?, ?, ?, ?, ?, NULL, ?, ?) RETURNING ",
            order_columns!()
        ))
        .bind(order.user_id.get())
        .bind(order.content_id.get())
        .bind(order.currency.as_str())
        .bind(order.price_cents)
        .bind(order.destination.address())
        .bind(OrderStatus::Pending.as_str())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        // Dropping `tx` on the error path rolls the insert back.
        let row = if order.destination.needs_tag() {
            let tag = destination_tag_for(OrderId::new(row.id))?;
            sqlx::query_as(concat!(
                "UPDATE purchases SET destination_tag = ? WHERE id = ? RETURNING ",
                order_columns!()
            ))
            .bind(i64::from(tag))
            .bind(row.id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            row
        };

        tx.commit().await?;
        row.try_into()
    }

    async fn get_order_for_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(concat!(
            "SELECT ",
            order_columns!(),
            " FROM purchases WHERE id = ? AND user_id = ?"
        ))
        .bind(order_id.get())
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }
}

// =============================================================================
// Row mapping
// =============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ContentRow {
    id: i64,
    creator_id: i64,
    title: String,
    description: String,
    price_cents: i64,
    kind: String,
    media_id: String,
    preview_id: Option<String>,
    is_private: bool,
    created_at: DateTime<Utc>,
}

impl From<ContentRow> for Content {
    fn from(row: ContentRow) -> Self {
        Self {
            id: ContentId::new(row.id),
            creator_id: UserId::new(row.creator_id),
            title: row.title,
            description: row.description,
            price_cents: row.price_cents,
            kind: row.kind,
            media_id: row.media_id,
            preview_id: row.preview_id,
            is_private: row.is_private,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SubscriptionRow {
    id: i64,
    user_id: i64,
    creator_id: i64,
    status: String,
    started_at: DateTime<Utc>,
    creator_username: Option<String>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = StoreError;

    fn try_from(row: SubscriptionRow) -> Result<Self> {
        Ok(Self {
            id: SubscriptionId::new(row.id),
            user_id: UserId::new(row.user_id),
            creator_id: UserId::new(row.creator_id),
            status: row.status.parse()?,
            started_at: row.started_at,
            creator_username: row.creator_username,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    content_id: i64,
    currency: String,
    price_cents: i64,
    address: String,
    destination_tag: Option<i64>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self> {
        let destination_tag = row
            .destination_tag
            .map(|tag| {
                u32::try_from(tag).map_err(|_| {
                    StoreError::Serialization(format!("destination tag out of range: {tag}"))
                })
            })
            .transpose()?;

        Ok(Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            content_id: ContentId::new(row.content_id),
            currency: row.currency.parse()?,
            price_cents: row.price_cents,
            status: row.status.parse()?,
            address: row.address,
            destination_tag,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipcherry_core::{Currency, Destination};

    async fn create_test_store() -> SqliteStore {
        SqliteStore::in_memory().await.unwrap()
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            username: email.split('@').next().unwrap().to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    fn new_content(creator_id: UserId, title: &str, is_private: bool) -> NewContent {
        NewContent {
            creator_id,
            title: title.to_string(),
            description: "desc".to_string(),
            price_cents: 499,
            kind: "video".to_string(),
            media_id: format!("media-{title}"),
            preview_id: None,
            is_private,
        }
    }

    #[tokio::test]
    async fn user_crud_and_duplicate_email() {
        let store = create_test_store().await;

        let user = store.create_user(&new_user("ada@example.com")).await.unwrap();
        assert_eq!(user.username, "ada");

        let found = store
            .get_user_by_email("ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, user);

        let result = store.create_user(&new_user("ada@example.com")).await;
        assert!(matches!(result, Err(StoreError::DuplicateEmail)));

        assert!(store
            .get_user_by_email("nobody@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn public_listing_excludes_private_rows() {
        let store = create_test_store().await;
        let creator = UserId::new(1);

        store
            .create_content(&new_content(creator, "open", false))
            .await
            .unwrap();
        store
            .create_content(&new_content(creator, "hidden", true))
            .await
            .unwrap();
        store
            .create_content(&new_content(UserId::new(2), "other", false))
            .await
            .unwrap();

        let public = store.list_public_content().await.unwrap();
        let titles: Vec<_> = public.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["open", "other"]);
        assert!(public.iter().all(Content::is_public));

        let mine = store.list_content_by_creator(creator).await.unwrap();
        let titles: Vec<_> = mine.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, ["open", "hidden"]);
    }

    #[tokio::test]
    async fn content_round_trips_optional_fields() {
        let store = create_test_store().await;
        let mut content = new_content(UserId::new(1), "clip", true);
        content.preview_id = Some("preview-1".into());

        let created = store.create_content(&content).await.unwrap();
        let fetched = store.get_content(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.preview_id.as_deref(), Some("preview-1"));
        assert_eq!(fetched.kind, "video");
        assert!(fetched.is_private);

        assert!(store.get_content(ContentId::new(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn subscriptions_are_deduplicated_and_joined() {
        let store = create_test_store().await;
        let fan = store.create_user(&new_user("fan@example.com")).await.unwrap();
        let creator = store
            .create_user(&new_user("creator@example.com"))
            .await
            .unwrap();

        let request = NewSubscription {
            user_id: fan.id,
            creator_id: creator.id,
        };
        let first = store.create_subscription(&request).await.unwrap();
        let second = store.create_subscription(&request).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.status, SubscriptionStatus::Active);

        // Dangling creator ids are kept, with no username.
        store
            .create_subscription(&NewSubscription {
                user_id: fan.id,
                creator_id: UserId::new(404),
            })
            .await
            .unwrap();

        let subs = store.list_subscriptions_by_user(fan.id).await.unwrap();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[0].creator_username.as_deref(), Some("creator"));
        assert_eq!(subs[1].creator_username, None);

        assert!(store
            .list_subscriptions_by_user(creator.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn tagged_orders_use_their_id_as_tag() {
        let store = create_test_store().await;

        let order = store
            .create_order(&NewOrder {
                user_id: UserId::new(1),
                content_id: ContentId::new(2),
                currency: Currency::Xrp,
                price_cents: 500,
                destination: Destination::TaggedAccount("rAccount".into()),
            })
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.address, "rAccount");
        assert_eq!(order.destination_tag.map(i64::from), Some(order.id.get()));
    }

    #[tokio::test]
    async fn address_orders_have_no_tag_and_are_not_deduplicated() {
        let store = create_test_store().await;
        let request = NewOrder {
            user_id: UserId::new(1),
            content_id: ContentId::new(2),
            currency: Currency::Btc,
            price_cents: 500,
            destination: Destination::Address("xpub-addr-1-2".into()),
        };

        let first = store.create_order(&request).await.unwrap();
        let second = store.create_order(&request).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(first.address, second.address);
        assert_eq!(first.destination_tag, None);
    }

    #[tokio::test]
    async fn orders_are_scoped_to_their_owner() {
        let store = create_test_store().await;
        let owner = UserId::new(1);
        let order = store
            .create_order(&NewOrder {
                user_id: owner,
                content_id: ContentId::new(2),
                currency: Currency::Btc,
                price_cents: 500,
                destination: Destination::Address("addr".into()),
            })
            .await
            .unwrap();

        let found = store.get_order_for_user(order.id, owner).await.unwrap();
        assert_eq!(found, Some(order.clone()));

        let other = store
            .get_order_for_user(order.id, UserId::new(2))
            .await
            .unwrap();
        assert!(other.is_none());
    }
}
