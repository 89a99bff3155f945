//! Order item domain types.

use chicken_direct_core::{OrderId, OrderItemId, ProductId};
use rust_decimal::Decimal;

use super::Product;

/// A line item (domain type).
///
/// Owned by one order (deleted with it); the product is shared and
/// outlives the item.
#[derive(Debug, Clone)]
pub struct OrderItem {
    /// Unique order item ID.
    pub id: OrderItemId,
    /// Positive quantity.
    pub quantity: i64,
    pub product_id: ProductId,
    /// Owning order.
    pub order_id: OrderId,
}

/// An order item joined with its product, with the line total computed
/// from the product's current price at read time.
#[derive(Debug, Clone)]
pub struct OrderItemDetails {
    pub item: OrderItem,
    pub product: Product,
    /// `product.price * item.quantity`, freshly computed and never stored.
    pub line_total: Decimal,
}
