//! Cart aggregate
//!
//! One cart per owner, items unique by product id. Repeated adds of the
//! same product merge into a quantity increment instead of a duplicate
//! entry. Quantities never drop below 1; removing the item is the only
//! way to get rid of it.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product::Product;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub owner_id: String,
    pub items: Vec<CartItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: Uuid,
    pub quantity: u32,
}

impl Cart {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self { owner_id: owner_id.into(), items: vec![] }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Merges by product id: an existing line gets its quantity bumped,
    /// anything else is appended. Never fails; a zero quantity is stored
    /// as 1 to keep the per-item floor.
    pub fn add_item(&mut self, product_id: Uuid, quantity: u32) {
        let quantity = quantity.max(1);
        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem { product_id, quantity });
        }
    }

    /// Idempotent: removing an absent product leaves the cart unchanged.
    pub fn remove_item(&mut self, product_id: Uuid) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// Clamps to a floor of 1. Silently no-ops when the product is not in
    /// the cart (matching the storefront's historical behavior).
    pub fn set_quantity(&mut self, product_id: Uuid, quantity: i64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

/// A cart line joined with catalog data at read time. The price here is
/// denormalized for display and totalling; it is not a snapshot and moves
/// with the catalog until checkout.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedCartItem {
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl PricedCartItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// What `GET /cart` returns: the cart joined against the catalog, with
/// totals computed server-side.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub owner_id: String,
    pub items: Vec<PricedCartItem>,
    pub total_items: u64,
    pub total_price: Decimal,
}

impl CartView {
    /// Items whose product has vanished from the catalog are dropped from
    /// the view; the underlying cart document is left as-is.
    pub fn assemble(cart: &Cart, catalog: &HashMap<Uuid, Product>) -> Self {
        let items: Vec<PricedCartItem> = cart
            .items
            .iter()
            .filter_map(|i| {
                catalog.get(&i.product_id).map(|p| PricedCartItem {
                    product_id: i.product_id,
                    name: p.name.clone(),
                    price: p.price,
                    quantity: i.quantity,
                })
            })
            .collect();
        let total_items = items.iter().map(|i| u64::from(i.quantity)).sum();
        let total_price = items.iter().map(PricedCartItem::line_total).sum();
        Self { owner_id: cart.owner_id.clone(), items, total_items, total_price }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(price: i64, quantity: u32) -> PricedCartItem {
        PricedCartItem {
            product_id: Uuid::new_v4(),
            name: "item".into(),
            price: Decimal::new(price, 0),
            quantity,
        }
    }

    #[test]
    fn add_merges_repeated_products() {
        let p = Uuid::new_v4();
        let mut cart = Cart::new("alice");
        cart.add_item(p, 2);
        cart.add_item(p, 3);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
    }

    #[test]
    fn add_appends_distinct_products() {
        let mut cart = Cart::new("alice");
        cart.add_item(Uuid::new_v4(), 1);
        cart.add_item(Uuid::new_v4(), 1);
        assert_eq!(cart.items.len(), 2);
    }

    #[test]
    fn add_with_zero_quantity_stores_one() {
        let p = Uuid::new_v4();
        let mut cart = Cart::new("alice");
        cart.add_item(p, 0);
        assert_eq!(cart.items[0].quantity, 1);
    }

    #[test]
    fn removal_is_idempotent() {
        let p = Uuid::new_v4();
        let mut cart = Cart::new("alice");
        cart.add_item(p, 2);
        cart.remove_item(p);
        let after_once = cart.items.clone();
        cart.remove_item(p);
        assert!(after_once.is_empty());
        assert!(cart.items.is_empty());
    }

    #[test]
    fn remove_absent_product_is_a_noop() {
        let mut cart = Cart::new("alice");
        cart.add_item(Uuid::new_v4(), 1);
        cart.remove_item(Uuid::new_v4());
        assert_eq!(cart.items.len(), 1);
    }

    #[test]
    fn set_quantity_clamps_to_floor_of_one() {
        let p = Uuid::new_v4();
        let mut cart = Cart::new("alice");
        cart.add_item(p, 4);
        cart.set_quantity(p, 0);
        assert_eq!(cart.items[0].quantity, 1);
        cart.set_quantity(p, -7);
        assert_eq!(cart.items[0].quantity, 1);
        cart.set_quantity(p, 9);
        assert_eq!(cart.items[0].quantity, 9);
    }

    #[test]
    fn set_quantity_on_missing_product_is_a_noop() {
        let mut cart = Cart::new("alice");
        cart.add_item(Uuid::new_v4(), 2);
        let before = cart.items.clone();
        cart.set_quantity(Uuid::new_v4(), 5);
        assert_eq!(cart.items.len(), before.len());
        assert_eq!(cart.items[0].quantity, before[0].quantity);
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = Cart::new("alice");
        cart.add_item(Uuid::new_v4(), 3);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn view_totals() {
        let items = vec![priced(10, 2), priced(5, 3)];
        let total_price: Decimal = items.iter().map(PricedCartItem::line_total).sum();
        let total_items: u64 = items.iter().map(|i| u64::from(i.quantity)).sum();
        assert_eq!(total_price, Decimal::new(35, 0));
        assert_eq!(total_items, 5);
    }

    #[test]
    fn view_drops_items_missing_from_catalog() {
        let known = Uuid::new_v4();
        let gone = Uuid::new_v4();
        let mut cart = Cart::new("alice");
        cart.add_item(known, 2);
        cart.add_item(gone, 1);

        let mut catalog = HashMap::new();
        catalog.insert(known, crate::domain::product::test_product(known, "Widget", Decimal::new(10, 0)));

        let view = CartView::assemble(&cart, &catalog);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.total_items, 2);
        assert_eq!(view.total_price, Decimal::new(20, 0));
    }
}
