//! Domain types.
//!
//! These are validated, immutable value types separate from database rows
//! and from the request/response shapes in [`crate::routes`]. Mutation goes
//! through the narrowly-scoped change types (`ProductChanges`,
//! `OrderChanges`) or full-replace values (`NewCustomer`, `NewAddress`)
//! rather than field setters.

pub mod address;
pub mod customer;
pub mod order;
pub mod order_item;
pub mod product;

pub use address::{Address, NewAddress};
pub use customer::{Customer, CustomerDetails, NewCustomer};
pub use order::{
    CustomerSnapshot, NewOrder, Order, OrderChanges, OrderDetails, ShippingSnapshot,
};
pub use order_item::{OrderItem, OrderItemDetails};
pub use product::{NewProduct, Product, ProductChanges};
