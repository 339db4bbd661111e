//! Order materializer
//!
//! An order is an immutable snapshot: each line item copies the product's
//! name and price by value at placement time, so later catalog edits can
//! never retroactively change what the buyer agreed to pay. The total is
//! recomputed here from the snapshots; a client-supplied total is never
//! trusted for anything persisted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::domain::product::Product;

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct Buyer {
    #[validate(length(min = 1, message = "buyer name must not be empty"))]
    pub name: String,
    #[validate(email(message = "buyer email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "buyer address must not be empty"))]
    pub address: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl OrderLineItem {
    /// Copies name and price out of the catalog entry. Quantity keeps the
    /// cart's floor of 1.
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity: quantity.max(1),
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub items: Vec<OrderLineItem>,
    pub total_price: Decimal,
    pub buyer: Buyer,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Validates the buyer, totals the snapshots, and stamps a fresh id
    /// and timestamp. Nothing is persisted here; the store writes the
    /// result atomically.
    pub fn materialize(buyer: Buyer, items: Vec<OrderLineItem>) -> Result<Self, OrderError> {
        buyer.validate().map_err(OrderError::InvalidBuyer)?;
        if items.is_empty() {
            return Err(OrderError::NoItems);
        }
        let total_price = items.iter().map(OrderLineItem::line_total).sum();
        Ok(Self {
            id: Uuid::new_v4(),
            items,
            total_price,
            buyer,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("invalid buyer: {0}")]
    InvalidBuyer(validator::ValidationErrors),
    #[error("order has no line items")]
    NoItems,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::Cart;
    use crate::domain::product::test_product;

    fn buyer() -> Buyer {
        Buyer {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            address: "1 Engine Row".into(),
        }
    }

    #[test]
    fn snapshot_is_immune_to_later_catalog_edits() {
        let mut product = test_product(Uuid::new_v4(), "Widget", Decimal::new(10, 0));
        let order = Order::materialize(buyer(), vec![OrderLineItem::snapshot(&product, 2)]).unwrap();

        product.price = Decimal::new(99, 0);
        product.name = "Renamed Widget".into();

        assert_eq!(order.items[0].price, Decimal::new(10, 0));
        assert_eq!(order.items[0].name, "Widget");
        assert_eq!(order.total_price, Decimal::new(20, 0));
    }

    #[test]
    fn total_is_recomputed_from_snapshots() {
        let a = test_product(Uuid::new_v4(), "A", Decimal::new(10, 0));
        let b = test_product(Uuid::new_v4(), "B", Decimal::new(5, 0));
        let order = Order::materialize(
            buyer(),
            vec![OrderLineItem::snapshot(&a, 2), OrderLineItem::snapshot(&b, 3)],
        )
        .unwrap();
        assert_eq!(order.total_price, Decimal::new(35, 0));
    }

    #[test]
    fn empty_buyer_email_is_rejected() {
        let mut bad = buyer();
        bad.email = "".into();
        let p = test_product(Uuid::new_v4(), "A", Decimal::ONE);
        let err = Order::materialize(bad, vec![OrderLineItem::snapshot(&p, 1)]).unwrap_err();
        assert!(matches!(err, OrderError::InvalidBuyer(_)));
    }

    #[test]
    fn empty_buyer_name_and_address_are_rejected() {
        let p = test_product(Uuid::new_v4(), "A", Decimal::ONE);
        for field in ["name", "address"] {
            let mut bad = buyer();
            match field {
                "name" => bad.name = "".into(),
                _ => bad.address = "".into(),
            }
            let err = Order::materialize(bad, vec![OrderLineItem::snapshot(&p, 1)]).unwrap_err();
            assert!(matches!(err, OrderError::InvalidBuyer(_)));
        }
    }

    #[test]
    fn orders_without_items_are_rejected() {
        assert!(matches!(Order::materialize(buyer(), vec![]).unwrap_err(), OrderError::NoItems));
    }

    #[test]
    fn checkout_clears_the_source_cart_and_keeps_the_order() {
        let product = test_product(Uuid::new_v4(), "Widget", Decimal::new(10, 0));
        let mut cart = Cart::new("alice");
        cart.add_item(product.id, 2);

        let items: Vec<OrderLineItem> = cart
            .items
            .iter()
            .map(|i| OrderLineItem::snapshot(&product, i.quantity))
            .collect();
        let order = Order::materialize(buyer(), items).unwrap();
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 2);
    }
}
