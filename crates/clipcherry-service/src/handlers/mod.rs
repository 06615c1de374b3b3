//! API handlers.

pub mod accounts;
pub mod assets;
pub mod content;
pub mod health;
pub mod purchases;
pub mod subscriptions;

use crate::error::ApiError;

/// Answer for a known path hit with a method it does not serve.
pub async fn method_not_found() -> ApiError {
    ApiError::NotFound("Not Found".into())
}
