//! Catalog endpoints: pass-through CRUD, except that creation reserves
//! the next per-category sequence number before the insert.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::Payload;
use crate::domain::product::{NewProduct, Product, Specification};
use crate::error::AppError;
use crate::state::AppState;
use crate::store::ProductChanges;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.store.list_products().await?))
}

pub async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    state
        .store
        .get_product(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("product"))
}

pub async fn create(
    State(state): State<AppState>,
    Payload(req): Payload<NewProduct>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    req.validate()?;
    let sequence = state.store.next_category_sequence(&req.category).await?;
    let product = Product::create(req, sequence);
    state.store.insert_product(&product).await?;
    tracing::info!(product_id = %product.id, handle = %product.category_sequence_id, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub image_url: Option<String>,
    pub brand: Option<String>,
    pub tags: Option<Vec<String>>,
    pub specifications: Option<Vec<Specification>>,
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Payload(req): Payload<UpdateProductRequest>,
) -> Result<Json<Product>, AppError> {
    let changes = ProductChanges {
        name: req.name,
        description: req.description,
        category: req.category,
        price: req.price,
        quantity: req.quantity,
        image_url: req.image_url,
        brand: req.brand,
        tags: req.tags,
        specifications: req.specifications,
    };
    state
        .store
        .update_product(id, changes)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("product"))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
