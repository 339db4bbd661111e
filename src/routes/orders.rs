//! Order endpoints.
//!
//! Checkout snapshots name and price from the catalog at this instant
//! and recomputes the total server-side; a client-sent total is only
//! compared and logged, never stored. The order insert and the cart
//! clear commit together.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::Payload;
use crate::domain::cart::CartItem;
use crate::domain::order::{Buyer, Order, OrderLineItem};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Cart to materialize and clear. Optional when `items` is given
    /// explicitly.
    pub owner_id: Option<String>,
    pub buyer: Buyer,
    /// Explicit line items; defaults to the owner's server-side cart.
    pub items: Option<Vec<CartItem>>,
    /// Accepted for wire compatibility; the persisted total is always
    /// recomputed from the snapshots.
    pub total_price: Option<Decimal>,
}

pub async fn create(
    State(state): State<AppState>,
    Payload(req): Payload<CheckoutRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    // Reject bad buyers before touching storage.
    req.buyer.validate()?;

    let cart_items = match req.items {
        Some(items) if !items.is_empty() => items,
        _ => match req.owner_id.as_deref() {
            Some(owner_id) => state
                .store
                .fetch_cart(owner_id)
                .await?
                .map(|c| c.items)
                .unwrap_or_default(),
            None => vec![],
        },
    };
    if cart_items.is_empty() {
        return Err(AppError::Validation("order has no line items".into()));
    }

    let ids: Vec<Uuid> = cart_items.iter().map(|i| i.product_id).collect();
    let catalog = state.store.products_by_ids(&ids).await?;
    let mut line_items = Vec::with_capacity(cart_items.len());
    for item in &cart_items {
        let product = catalog.get(&item.product_id).ok_or(AppError::NotFound("product"))?;
        line_items.push(OrderLineItem::snapshot(product, item.quantity));
    }

    let order = Order::materialize(req.buyer, line_items)?;
    if let Some(client_total) = req.total_price {
        if client_total != order.total_price {
            tracing::warn!(
                order_id = %order.id,
                %client_total,
                server_total = %order.total_price,
                "client-supplied total disagrees with recomputed total"
            );
        }
    }

    state.store.place_order(&order, req.owner_id.as_deref()).await?;
    tracing::info!(order_id = %order.id, total = %order.total_price, "order placed");
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.store.list_orders().await?))
}
