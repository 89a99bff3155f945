//! Business services for the ChickenDirect domain.
//!
//! One service per aggregate. Each mutating operation acquires its own
//! connection or transaction from the pool, so a multi-step operation
//! (order creation, customer deletion) commits or rolls back as a unit and
//! there is no cross-request coordination beyond that.

mod error;

pub mod addresses;
pub mod customers;
pub mod order_items;
pub mod orders;
pub mod pricing;
pub mod products;

pub use addresses::AddressService;
pub use customers::CustomerService;
pub use error::ServiceError;
pub use order_items::OrderItemService;
pub use orders::OrderService;
pub use products::ProductService;
