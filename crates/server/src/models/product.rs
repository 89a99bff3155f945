//! Product domain types.

use chicken_direct_core::{ProductId, ProductStatus};
use rust_decimal::Decimal;

/// A catalog product (domain type).
///
/// `status` is a declared classification, not derived from
/// `quantity_on_hand`; the two may disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price, non-negative.
    pub price: Decimal,
    pub status: ProductStatus,
    /// Units on hand, non-negative.
    pub quantity_on_hand: i64,
}

/// Field values for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub status: ProductStatus,
    pub quantity_on_hand: i64,
}

/// A partial-merge update for a product: `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub status: Option<ProductStatus>,
    pub quantity_on_hand: Option<i64>,
}

impl Product {
    /// Apply a partial update, overwriting only the supplied fields.
    pub fn merge(&mut self, changes: ProductChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(quantity_on_hand) = changes.quantity_on_hand {
            self.quantity_on_hand = quantity_on_hand;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Whole chicken".to_owned(),
            description: "Free range".to_owned(),
            price: "120.00".parse().unwrap(),
            status: ProductStatus::InStock,
            quantity_on_hand: 40,
        }
    }

    #[test]
    fn test_merge_applies_only_supplied_fields() {
        let mut product = sample_product();
        product.merge(ProductChanges {
            price: Some("45".parse().unwrap()),
            ..ProductChanges::default()
        });

        assert_eq!(product.price, "45".parse().unwrap());
        assert_eq!(product.name, "Whole chicken");
        assert_eq!(product.description, "Free range");
        assert_eq!(product.status, ProductStatus::InStock);
        assert_eq!(product.quantity_on_hand, 40);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let changes = ProductChanges {
            price: Some("45".parse().unwrap()),
            ..ProductChanges::default()
        };

        let mut once = sample_product();
        once.merge(changes.clone());

        let mut twice = sample_product();
        twice.merge(changes.clone());
        twice.merge(changes);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_status_independent_of_quantity() {
        // Status is declared, not derived: zero stock with IN_STOCK sticks.
        let mut product = sample_product();
        product.merge(ProductChanges {
            quantity_on_hand: Some(0),
            ..ProductChanges::default()
        });

        assert_eq!(product.quantity_on_hand, 0);
        assert_eq!(product.status, ProductStatus::InStock);
    }
}
