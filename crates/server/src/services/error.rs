//! Service-level error type.

use chicken_direct_core::{AddressId, CustomerId, OrderId, OrderItemId, ProductId};

use crate::db::RepositoryError;

/// Errors surfaced by the business services.
///
/// Every not-found variant carries the identity that failed to resolve.
/// An ownership mismatch produces the same variant as a missing record,
/// so callers cannot distinguish "exists under another owner" from
/// "does not exist".
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Customer with id {0} not found")]
    CustomerNotFound(CustomerId),

    #[error("Address with id {0} not found")]
    AddressNotFound(AddressId),

    #[error("Product with id {0} not found")]
    ProductNotFound(ProductId),

    #[error("Order with id {0} not found")]
    OrderNotFound(OrderId),

    #[error("Order Item with id {0} not found")]
    OrderItemNotFound(OrderItemId),

    /// Repository failure (database error, constraint violation, corrupt
    /// stored data).
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
