//! Customer domain types.

use chicken_direct_core::{CustomerId, Email};

use super::{Address, Order};

/// A customer (domain type).
#[derive(Debug, Clone)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone: String,
    /// Email address, globally unique across customers.
    pub email: Email,
}

/// Field values for creating a customer, also used for full-replace
/// updates (the customer update contract has no optional fields).
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub email: Email,
}

/// A customer together with its owned addresses and the orders that
/// reference it.
#[derive(Debug, Clone)]
pub struct CustomerDetails {
    pub customer: Customer,
    /// Addresses owned by the customer (deleted with it).
    pub addresses: Vec<Address>,
    /// Orders weakly referencing the customer (survive its deletion).
    pub orders: Vec<Order>,
}
