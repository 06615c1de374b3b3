//! Purchase order handlers.
//!
//! A purchase records a pending order and hands back where to send the coins.
//! BTC orders get a deposit address derived from `(user, content)`. XRP orders
//! share one account and are told apart by a destination tag equal to the
//! order id. Nothing here watches the chain; orders stay `pending`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use clipcherry_core::{ContentId, Currency, NewOrder, Order, OrderId, OrderStatus};
use clipcherry_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{IdInput, Validate, ValidatedJson};
use crate::state::AppState;

/// Purchase request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PurchaseRequest {
    content_id: Option<IdInput>,
    currency: Option<String>,
}

/// Checked purchase input. The currency is parsed once the content exists.
#[derive(Debug, Clone)]
pub struct PurchaseInput {
    content_id: Option<ContentId>,
    currency: String,
}

impl Validate for PurchaseRequest {
    type Validated = PurchaseInput;

    fn validate(self) -> Result<PurchaseInput, ApiError> {
        let (Some(content_id), Some(currency)) = (self.content_id, self.currency) else {
            return Err(ApiError::BadRequest("Missing fields".into()));
        };

        // An id that is not a positive integer names no content.
        Ok(PurchaseInput {
            content_id: content_id.parse::<ContentId>("Content not found").ok(),
            currency,
        })
    }
}

/// Purchase response.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    /// The new order.
    pub order_id: OrderId,
    /// Where to send payment.
    pub address: String,
    /// XRP destination tag; `null` for BTC.
    pub destination_tag: Option<u32>,
    /// Price in US cents at order time.
    pub amount_cents: i64,
    /// Payment currency.
    pub currency: Currency,
}

impl From<Order> for PurchaseResponse {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id,
            address: order.address,
            destination_tag: order.destination_tag,
            amount_cents: order.price_cents,
            currency: order.currency,
        }
    }
}

/// Create a pending order for a piece of content.
pub async fn create_purchase(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, ApiError> {
    let content_not_found = || ApiError::NotFound("Content not found".into());

    let content_id = input.content_id.ok_or_else(content_not_found)?;
    let content = state
        .store
        .get_content(content_id)
        .await?
        .ok_or_else(content_not_found)?;

    let currency = input
        .currency
        .parse::<Currency>()
        .map_err(|_| ApiError::BadRequest("Unsupported currency".into()))?;

    let destination = state.wallet.destination(currency, auth.user_id, content.id);

    let order = state
        .store
        .create_order(&NewOrder {
            user_id: auth.user_id,
            content_id: content.id,
            currency,
            price_cents: content.price_cents,
            destination,
        })
        .await?;

    tracing::info!(
        order_id = %order.id,
        user_id = %auth.user_id,
        content_id = %content.id,
        currency = %order.currency,
        destination_tag = ?order.destination_tag,
        "Purchase order created"
    );

    Ok(Json(order.into()))
}

/// Purchase status response.
#[derive(Debug, Serialize)]
pub struct PurchaseStatusResponse {
    /// Order status.
    pub status: OrderStatus,
    /// Where to send payment.
    pub address: String,
    /// XRP destination tag; `null` for BTC.
    pub destination_tag: Option<u32>,
    /// Price in US cents at order time.
    pub amount_cents: i64,
    /// Payment currency.
    pub currency: Currency,
}

/// Look up one of the caller's orders.
pub async fn get_purchase_status(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(order_id): Path<String>,
) -> Result<Json<PurchaseStatusResponse>, ApiError> {
    let order_id: OrderId = order_id
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid order id".into()))?;

    let order = state
        .store
        .get_order_for_user(order_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Purchase not found".into()))?;

    Ok(Json(PurchaseStatusResponse {
        status: order.status,
        address: order.address,
        destination_tag: order.destination_tag,
        amount_cents: order.price_cents,
        currency: order.currency,
    }))
}
