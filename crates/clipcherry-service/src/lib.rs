//! CLIPcherry HTTP API service.
//!
//! This crate provides the HTTP API for the CLIPcherry content platform:
//!
//! - Registration and login
//! - Public gallery and creator content
//! - Creator subscriptions
//! - Crypto purchase orders (BTC and XRP)
//! - The static front-end, proxied from an asset upstream
//!
//! # Authentication
//!
//! Login returns an opaque session token. Authenticated endpoints expect it as
//! `Authorization: Bearer <token>` until the session expires.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers need async for the router

pub mod assets;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod sweeper;

pub use assets::AssetsClient;
pub use config::{ServiceConfig, SessionBackend};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
