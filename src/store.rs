//! Postgres-backed document store.
//!
//! Carts live as one JSONB document per owner and are replaced whole on
//! every mutation; per-document atomicity is the only guarantee, so two
//! concurrent writers for the same owner are last-write-wins. Orders are
//! written together with the originating cart's deletion in a single
//! transaction, and the category counter is an atomic upsert-increment,
//! so neither of those can race.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::cart::{Cart, CartItem};
use crate::domain::order::{Buyer, Order, OrderLineItem};
use crate::domain::product::{Product, Specification};

#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    category: String,
    price: Decimal,
    quantity: i32,
    image_url: Option<String>,
    brand: Option<String>,
    tags: Vec<String>,
    specifications: Json<Vec<Specification>>,
    category_sequence_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            name: r.name,
            description: r.description,
            category: r.category,
            price: r.price,
            quantity: r.quantity,
            image_url: r.image_url,
            brand: r.brand,
            tags: r.tags,
            specifications: r.specifications.0,
            category_sequence_id: r.category_sequence_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartRow {
    owner_id: String,
    items: Json<Vec<CartItem>>,
}

impl From<CartRow> for Cart {
    fn from(r: CartRow) -> Self {
        Cart { owner_id: r.owner_id, items: r.items.0 }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    items: Json<Vec<OrderLineItem>>,
    total_price: Decimal,
    buyer_name: String,
    buyer_email: String,
    buyer_address: String,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(r: OrderRow) -> Self {
        Order {
            id: r.id,
            items: r.items.0,
            total_price: r.total_price,
            buyer: Buyer { name: r.buyer_name, email: r.buyer_email, address: r.buyer_address },
            created_at: r.created_at,
        }
    }
}

/// Updatable product fields; `None` keeps the stored value. The category
/// sequence id is deliberately never touched here.
#[derive(Debug, Default)]
pub struct ProductChanges {
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

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---- catalog ----

    pub async fn list_products(&self) -> Result<Vec<Product>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProductRow>("SELECT * FROM products ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Option<Product>, sqlx::Error> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Product::from))
    }

    pub async fn products_by_ids(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Product>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| (r.id, Product::from(r))).collect())
    }

    pub async fn insert_product(&self, p: &Product) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO products (id, name, description, category, price, quantity, image_url, \
             brand, tags, specifications, category_sequence_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(p.id)
        .bind(&p.name)
        .bind(&p.description)
        .bind(&p.category)
        .bind(p.price)
        .bind(p.quantity)
        .bind(&p.image_url)
        .bind(&p.brand)
        .bind(&p.tags)
        .bind(Json(&p.specifications))
        .bind(&p.category_sequence_id)
        .bind(p.created_at)
        .bind(p.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        changes: ProductChanges,
    ) -> Result<Option<Product>, sqlx::Error> {
        let row = sqlx::query_as::<_, ProductRow>(
            "UPDATE products SET \
               name = COALESCE($2, name), \
               description = COALESCE($3, description), \
               category = COALESCE($4, category), \
               price = COALESCE($5, price), \
               quantity = COALESCE($6, quantity), \
               image_url = COALESCE($7, image_url), \
               brand = COALESCE($8, brand), \
               tags = COALESCE($9, tags), \
               specifications = COALESCE($10, specifications), \
               updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.category)
        .bind(changes.price)
        .bind(changes.quantity)
        .bind(changes.image_url)
        .bind(changes.brand)
        .bind(changes.tags)
        .bind(changes.specifications.map(Json))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Product::from))
    }

    /// Idempotent: deleting an absent product succeeds.
    pub async fn delete_product(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Atomically reserves the next sequence number for a category. The
    /// upsert-increment keeps concurrent creations in the same category
    /// from ever observing the same number.
    pub async fn next_category_sequence(&self, category: &str) -> Result<i64, sqlx::Error> {
        let (n,): (i64,) = sqlx::query_as(
            "INSERT INTO category_counters (category, n) VALUES ($1, 1) \
             ON CONFLICT (category) DO UPDATE SET n = category_counters.n + 1 \
             RETURNING n",
        )
        .bind(category)
        .fetch_one(&self.pool)
        .await?;
        Ok(n)
    }

    // ---- carts ----

    pub async fn fetch_cart(&self, owner_id: &str) -> Result<Option<Cart>, sqlx::Error> {
        let row = sqlx::query_as::<_, CartRow>(
            "SELECT owner_id, items FROM carts WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Cart::from))
    }

    /// Replaces the whole cart document. Last writer wins for the same
    /// owner; there is no atomic per-item increment here.
    pub async fn upsert_cart(&self, cart: &Cart) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO carts (owner_id, items, updated_at) VALUES ($1, $2, NOW()) \
             ON CONFLICT (owner_id) DO UPDATE SET items = $2, updated_at = NOW()",
        )
        .bind(&cart.owner_id)
        .bind(Json(&cart.items))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_cart(&self, owner_id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM carts WHERE owner_id = $1")
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ---- orders ----

    /// Writes the order and clears the originating cart in one
    /// transaction: either both land or neither does.
    pub async fn place_order(&self, order: &Order, clear_owner: Option<&str>) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO orders (id, items, total_price, buyer_name, buyer_email, buyer_address, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(order.id)
        .bind(Json(&order.items))
        .bind(order.total_price)
        .bind(&order.buyer.name)
        .bind(&order.buyer.email)
        .bind(&order.buyer.address)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;
        if let Some(owner_id) = clear_owner {
            sqlx::query("DELETE FROM carts WHERE owner_id = $1")
                .bind(owner_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, sqlx::Error> {
        let rows = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Order::from).collect())
    }
}
