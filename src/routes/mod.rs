//! HTTP boundary: route table plus the payload extractor that maps
//! malformed JSON to the service's parse error.

pub mod cart;
pub mod orders;
pub mod products;

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::routing::{get, put};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:id",
            get(products::fetch).put(products::update).delete(products::remove),
        )
        .route("/orders", get(orders::list).post(orders::create))
        .route("/cart/:owner", get(cart::fetch).post(cart::add_item).delete(cart::clear))
        .route(
            "/cart/:owner/items/:product_id",
            put(cart::set_quantity).delete(cart::remove_item),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy", "service": "storefront" }))
}

/// JSON body extractor that surfaces deserialization failures as
/// [`AppError::Parse`] so they come back as the same structured error
/// shape as everything else.
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Parse(rejection.body_text()))?;
        Ok(Payload(value))
    }
}
