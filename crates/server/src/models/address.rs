//! Address domain types.

use chicken_direct_core::{AddressId, CustomerId};

/// A shipping address (domain type).
///
/// Exclusively owned by one customer and deleted with it. The stored
/// `customer_id` is what the ownership guard compares against the customer
/// id in the request path.
#[derive(Debug, Clone)]
pub struct Address {
    /// Unique address ID.
    pub id: AddressId,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    /// Owning customer.
    pub customer_id: CustomerId,
}

/// Field values for creating an address, also used for full-replace
/// updates (the address update contract has no optional fields).
#[derive(Debug, Clone)]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}
