//! Request body extraction.
//!
//! Bodies are parsed into wire structs whose fields are all optional and then
//! validated into the handler's input type. Malformed JSON and unknown fields
//! are rejected with 400 instead of being treated as an empty body.

use std::str::FromStr;

use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ApiError;

/// A wire body that checks itself into a validated input.
pub trait Validate {
    /// The checked input handed to the handler.
    type Validated;

    /// Check required fields and value ranges.
    fn validate(self) -> Result<Self::Validated, ApiError>;
}

/// JSON body extractor that runs [`Validate`] after parsing.
pub struct ValidatedJson<T: Validate>(pub T::Validated);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Validate + DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
            })?;

        body.validate().map(ValidatedJson)
    }
}

/// An id sent either as a JSON number or as a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdInput {
    /// `42`
    Number(i64),
    /// `"42"`
    Text(String),
}

impl IdInput {
    /// Parse into a positive id, or fail with `message`.
    pub fn parse<I>(&self, message: &str) -> Result<I, ApiError>
    where
        I: FromStr + TryFrom<i64>,
    {
        let parsed = match self {
            Self::Number(n) => I::try_from(*n).ok(),
            Self::Text(s) => s.trim().parse().ok(),
        };
        parsed.ok_or_else(|| ApiError::BadRequest(message.to_string()))
    }
}

/// A present, non-blank string field.
pub fn required(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipcherry_core::UserId;

    #[test]
    fn required_rejects_blank() {
        assert_eq!(required(Some("x".into())), Some("x".into()));
        assert_eq!(required(Some("   ".into())), None);
        assert_eq!(required(None), None);
    }

    #[test]
    fn id_input_accepts_numbers_and_strings() {
        let n: IdInput = serde_json::from_str("7").unwrap();
        let s: IdInput = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(n.parse::<UserId>("bad").unwrap(), UserId::new(7));
        assert_eq!(s.parse::<UserId>("bad").unwrap(), UserId::new(7));
    }

    #[test]
    fn id_input_rejects_non_positive() {
        let zero: IdInput = serde_json::from_str("0").unwrap();
        let text: IdInput = serde_json::from_str("\"abc\"").unwrap();
        assert!(zero.parse::<UserId>("bad").is_err());
        assert!(text.parse::<UserId>("bad").is_err());
    }
}
