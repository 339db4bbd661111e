//! Catalog entity
//!
//! Products are plain catalog documents; the only derived piece is the
//! category sequence id, a human-readable `"{CATEGORY}-{n}"` handle
//! assigned at creation from a per-category counter. It is never
//! recomputed on update, so editing a product's category leaves the
//! original handle in place.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image_url: Option<String>,
    pub brand: Option<String>,
    pub tags: Vec<String>,
    pub specifications: Vec<Specification>,
    pub category_sequence_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Specification {
    pub key: String,
    pub value: String,
}

/// Fields the catalog requires on creation. Mirrors the persisted shape
/// minus everything the service derives (id, sequence id, timestamps).
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = 1, message = "product name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "product description must not be empty"))]
    pub description: String,
    #[validate(length(min = 1, message = "product category must not be empty"))]
    pub category: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image_url: Option<String>,
    pub brand: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub specifications: Vec<Specification>,
}

impl Product {
    /// `sequence` comes from the store's atomic per-category counter.
    pub fn create(new: NewProduct, sequence: i64) -> Self {
        let now = Utc::now();
        let category_sequence_id = category_sequence_id(&new.category, sequence);
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            category: new.category,
            price: new.price,
            quantity: new.quantity,
            image_url: new.image_url,
            brand: new.brand,
            tags: new.tags,
            specifications: new.specifications,
            category_sequence_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Formats the human-readable catalog handle for the nth product in a
/// category.
pub fn category_sequence_id(category: &str, sequence: i64) -> String {
    format!("{}-{}", category.to_uppercase(), sequence)
}

#[cfg(test)]
pub(crate) fn test_product(id: Uuid, name: &str, price: Decimal) -> Product {
    let now = Utc::now();
    Product {
        id,
        name: name.into(),
        description: "test".into(),
        category: "misc".into(),
        price,
        quantity: 0,
        image_url: None,
        brand: None,
        tags: vec![],
        specifications: vec![],
        category_sequence_id: "MISC-1".into(),
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_id_uppercases_and_numbers() {
        assert_eq!(category_sequence_id("shoes", 1), "SHOES-1");
        assert_eq!(category_sequence_id("shoes", 2), "SHOES-2");
        assert_eq!(category_sequence_id("Home Decor", 14), "HOME DECOR-14");
    }

    #[test]
    fn create_assigns_sequence_id_and_timestamps() {
        let new = NewProduct {
            name: "Runner".into(),
            description: "A shoe".into(),
            category: "shoes".into(),
            price: Decimal::new(5999, 2),
            quantity: 10,
            image_url: None,
            brand: Some("Acme".into()),
            tags: vec!["sport".into()],
            specifications: vec![Specification { key: "size".into(), value: "42".into() }],
        };
        let p = Product::create(new, 3);
        assert_eq!(p.category_sequence_id, "SHOES-3");
        assert_eq!(p.created_at, p.updated_at);
    }

    #[test]
    fn required_fields_are_validated() {
        let new = NewProduct {
            name: "".into(),
            description: "d".into(),
            category: "c".into(),
            price: Decimal::ZERO,
            quantity: 0,
            image_url: None,
            brand: None,
            tags: vec![],
            specifications: vec![],
        };
        assert!(new.validate().is_err());
    }
}
