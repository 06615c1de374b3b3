//! Core types for the CLIPcherry content platform.
//!
//! This crate provides the domain types shared by the store and the HTTP service:
//!
//! - **Identifiers**: `UserId`, `ContentId`, `SubscriptionId`, `OrderId`
//! - **Users**: `User`, `NewUser`
//! - **Content**: `Content`, `NewContent`
//! - **Subscriptions**: `Subscription`, `SubscriptionStatus`
//! - **Orders**: `Order`, `Currency`, `OrderStatus`, `Destination`
//! - **Payments**: `PlaceholderWallet` deposit destinations
//! - **Sessions**: `Session`, `SessionToken`
//!
//! # Money
//!
//! Prices are integer US cents (`i64`). Orders record the price in cents and
//! the currency the buyer chose to pay in; no exchange rate is applied.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod content;
pub mod error;
pub mod ids;
pub mod order;
pub mod payment;
pub mod session;
pub mod subscription;
pub mod user;

pub use content::{Content, NewContent};
pub use error::{CoreError, Result};
pub use ids::{ContentId, IdError, OrderId, SubscriptionId, UserId};
pub use order::{Currency, Destination, NewOrder, Order, OrderStatus};
pub use payment::{destination_tag_for, PlaceholderWallet};
pub use session::{Session, SessionToken};
pub use subscription::{NewSubscription, Subscription, SubscriptionStatus};
pub use user::{normalize_email, NewUser, User};
