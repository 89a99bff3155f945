//! Order domain types, including the creation-time snapshot.

use chicken_direct_core::{CustomerId, Email, OrderId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{Address, Customer, OrderItemDetails};

/// Shipping address fields copied into an order at creation time.
///
/// Never resynchronized from the live address row; the order stays fully
/// readable after the address is edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingSnapshot {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Customer fields copied into an order at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSnapshot {
    pub name: String,
    pub email: Email,
    pub phone: String,
}

/// An order (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Set once at creation, immutable afterwards.
    pub creation_date: DateTime<Utc>,
    /// Stored value supplied at create/update time; never recomputed from
    /// the order's items.
    pub total_price: Decimal,
    pub shipping_charge: Decimal,
    pub is_shipped: bool,
    pub shipping: ShippingSnapshot,
    pub customer: CustomerSnapshot,
    /// Weak reference to the originating customer. The only field allowed
    /// to go stale: it becomes `None` when the customer is deleted.
    pub customer_id: Option<CustomerId>,
}

/// Field values for creating an order, with the snapshot already taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub total_price: Decimal,
    pub shipping_charge: Decimal,
    pub is_shipped: bool,
    pub shipping: ShippingSnapshot,
    pub customer: CustomerSnapshot,
    pub customer_id: CustomerId,
}

impl NewOrder {
    /// Snapshot the customer and shipping address into a new order value.
    ///
    /// This is the only place snapshot fields are populated; nothing
    /// refreshes them afterwards.
    #[must_use]
    pub fn snapshot(
        customer: &Customer,
        shipping_address: &Address,
        total_price: Decimal,
        shipping_charge: Decimal,
        is_shipped: bool,
    ) -> Self {
        Self {
            total_price,
            shipping_charge,
            is_shipped,
            shipping: ShippingSnapshot {
                street: shipping_address.street.clone(),
                city: shipping_address.city.clone(),
                postal_code: shipping_address.postal_code.clone(),
                country: shipping_address.country.clone(),
            },
            customer: CustomerSnapshot {
                name: customer.name.clone(),
                email: customer.email.clone(),
                phone: customer.phone.clone(),
            },
            customer_id: customer.id,
        }
    }
}

/// A partial-merge update for an order.
///
/// `total_price` and `shipping_charge` are optional; `is_shipped` is
/// required by the update contract and always applied.
#[derive(Debug, Clone)]
pub struct OrderChanges {
    pub total_price: Option<Decimal>,
    pub shipping_charge: Option<Decimal>,
    pub is_shipped: bool,
}

impl Order {
    /// Apply a partial update. Snapshot fields and the creation date are
    /// not reachable from here.
    pub fn merge(&mut self, changes: OrderChanges) {
        if let Some(total_price) = changes.total_price {
            self.total_price = total_price;
        }
        if let Some(shipping_charge) = changes.shipping_charge {
            self.shipping_charge = shipping_charge;
        }
        self.is_shipped = changes.is_shipped;
    }
}

/// An order together with its line items.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItemDetails>,
}
