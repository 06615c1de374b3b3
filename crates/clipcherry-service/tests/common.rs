//! Common test utilities for CLIPcherry integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use axum_test::{TestResponse, TestServer};
use serde_json::json;

use clipcherry_core::UserId;
use clipcherry_service::{create_router, AppState, ServiceConfig};
use clipcherry_store::{MemorySessionStore, SqliteStore, Store};

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The relational store behind the server.
    pub store: Arc<SqliteStore>,
    /// The session store behind the server.
    pub sessions: Arc<MemorySessionStore>,
}

impl TestHarness {
    /// Create a new test harness with a fresh in-memory database.
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Create a harness with a custom configuration.
    pub async fn with_config(config: ServiceConfig) -> Self {
        let store = Arc::new(
            SqliteStore::in_memory()
                .await
                .expect("Failed to open in-memory store"),
        );
        let sessions = Arc::new(MemorySessionStore::new());

        let router = build_router(store.clone(), sessions.clone(), config);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            sessions,
        }
    }

    /// POST /api/register.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> TestResponse {
        self.server
            .post("/api/register")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .await
    }

    /// POST /api/login.
    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.server
            .post("/api/login")
            .json(&json!({ "email": email, "password": password }))
            .await
    }

    /// Register `username` and log in, returning the session token.
    pub async fn sign_up(&self, username: &str) -> String {
        let email = format!("{username}@example.com");
        self.register(username, &email, "correct horse")
            .await
            .assert_status_ok();

        let response = self.login(&email, "correct horse").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["session"]
            .as_str()
            .expect("login returns a session token")
            .to_string()
    }

    /// The id of the user registered under `username`.
    pub async fn user_id(&self, username: &str) -> UserId {
        self.store
            .get_user_by_email(&format!("{username}@example.com"))
            .await
            .expect("store lookup")
            .expect("user exists")
            .id
    }

    /// Create content as the session owner, returning the new id.
    pub async fn create_content(&self, token: &str, title: &str, is_private: bool) -> i64 {
        let response = self
            .server
            .post("/api/content")
            .add_header(auth_header(), bearer(token))
            .json(&json!({
                "title": title,
                "description": format!("{title} description"),
                "price_cents": 500,
                "type": "video",
                "media_id": format!("media-{title}"),
                "is_private": is_private,
            }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["id"].as_i64().expect("content id")
    }
}

/// The service router over the given stores, without a test server.
pub fn build_router(
    store: Arc<SqliteStore>,
    sessions: Arc<MemorySessionStore>,
    config: ServiceConfig,
) -> Router {
    let state = AppState::new(store, sessions, config).expect("Failed to build app state");
    create_router(state)
}

/// A router over fresh in-memory stores, for sending raw requests.
pub async fn raw_router(config: ServiceConfig) -> Router {
    let store = Arc::new(
        SqliteStore::in_memory()
            .await
            .expect("Failed to open in-memory store"),
    );
    build_router(store, Arc::new(MemorySessionStore::new()), config)
}

/// A config that never reaches the real asset upstream.
pub fn test_config() -> ServiceConfig {
    ServiceConfig {
        listen_addr: "127.0.0.1:0".into(),
        database_url: "sqlite::memory:".into(),
        assets_base_url: "http://127.0.0.1:9".into(),
        ..ServiceConfig::default()
    }
}

/// The authorization header name.
pub fn auth_header() -> HeaderName {
    AUTHORIZATION
}

/// `Bearer <token>` header value.
pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header value")
}
