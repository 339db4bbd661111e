//! Storefront service
//!
//! A small self-hosted storefront: product catalog, per-owner shopping
//! carts, and order placement over Postgres-backed document storage.
//!
//! ## Layout
//! - [`domain`]: cart aggregate, order materializer, catalog entity
//! - [`store`]: persistence collaborator (find-by-key, upsert, delete)
//! - [`routes`]: axum handlers and the route table
//! - [`error`]: the service-wide error taxonomy

pub mod config;
pub mod domain;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
