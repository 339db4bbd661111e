//! Cart endpoints. Every mutation loads the owner's cart document,
//! applies the aggregate operation in memory, and writes the document
//! back whole; the response is always the freshly joined view.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::Payload;
use crate::domain::cart::{Cart, CartView};
use crate::error::AppError;
use crate::state::AppState;
use crate::store::Store;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: i64,
}

/// An absent cart document reads as an empty cart.
async fn load_or_empty(store: &Store, owner_id: &str) -> Result<Cart, AppError> {
    Ok(store.fetch_cart(owner_id).await?.unwrap_or_else(|| Cart::new(owner_id)))
}

async fn priced_view(store: &Store, cart: &Cart) -> Result<CartView, AppError> {
    let ids: Vec<Uuid> = cart.items.iter().map(|i| i.product_id).collect();
    let catalog = store.products_by_ids(&ids).await?;
    Ok(CartView::assemble(cart, &catalog))
}

pub async fn fetch(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<CartView>, AppError> {
    let cart = load_or_empty(&state.store, &owner_id).await?;
    Ok(Json(priced_view(&state.store, &cart).await?))
}

pub async fn add_item(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
    Payload(req): Payload<AddItemRequest>,
) -> Result<Json<CartView>, AppError> {
    let mut cart = load_or_empty(&state.store, &owner_id).await?;
    cart.add_item(req.product_id, req.quantity);
    state.store.upsert_cart(&cart).await?;
    Ok(Json(priced_view(&state.store, &cart).await?))
}

pub async fn set_quantity(
    State(state): State<AppState>,
    Path((owner_id, product_id)): Path<(String, Uuid)>,
    Payload(req): Payload<SetQuantityRequest>,
) -> Result<Json<CartView>, AppError> {
    let mut cart = load_or_empty(&state.store, &owner_id).await?;
    cart.set_quantity(product_id, req.quantity);
    state.store.upsert_cart(&cart).await?;
    Ok(Json(priced_view(&state.store, &cart).await?))
}

pub async fn remove_item(
    State(state): State<AppState>,
    Path((owner_id, product_id)): Path<(String, Uuid)>,
) -> Result<Json<CartView>, AppError> {
    let mut cart = load_or_empty(&state.store, &owner_id).await?;
    cart.remove_item(product_id);
    state.store.upsert_cart(&cart).await?;
    Ok(Json(priced_view(&state.store, &cart).await?))
}

pub async fn clear(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.delete_cart(&owner_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
