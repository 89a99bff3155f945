//! Order item service.

use chicken_direct_core::{OrderId, OrderItemId, ProductId};
use sqlx::{SqliteConnection, SqlitePool};

use super::{ServiceError, pricing};
use crate::db::{self, RepositoryError};
use crate::models::{OrderItem, OrderItemDetails};

/// Operations on order line items.
pub struct OrderItemService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderItemService<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a line item, resolving product and order first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::ProductNotFound` or
    /// `ServiceError::OrderNotFound` if a referenced entity is missing.
    pub async fn create(
        &self,
        order_id: OrderId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<OrderItemDetails, ServiceError> {
        tracing::info!(order_id = %order_id, product_id = %product_id, "creating order item");

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let product = db::products::get(&mut tx, product_id)
            .await?
            .ok_or(ServiceError::ProductNotFound(product_id))?;
        db::orders::get(&mut tx, order_id)
            .await?
            .ok_or(ServiceError::OrderNotFound(order_id))?;

        let item = db::order_items::insert(&mut tx, order_id, product_id, quantity).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        let line_total = pricing::line_total(product.price, item.quantity);
        Ok(OrderItemDetails {
            item,
            product,
            line_total,
        })
    }

    /// Get a line item with its product and a freshly computed line
    /// total.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::OrderItemNotFound` if the item does not
    /// exist.
    pub async fn get(&self, id: OrderItemId) -> Result<OrderItemDetails, ServiceError> {
        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;

        let item = db::order_items::get(&mut conn, id)
            .await?
            .ok_or(ServiceError::OrderItemNotFound(id))?;

        Self::details(&mut conn, item).await
    }

    /// List all line items.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if a query fails.
    pub async fn list(&self) -> Result<Vec<OrderItemDetails>, ServiceError> {
        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;

        let items = db::order_items::list(&mut conn).await?;
        let mut details = Vec::with_capacity(items.len());
        for item in items {
            details.push(Self::details(&mut conn, item).await?);
        }

        Ok(details)
    }

    /// Delete a line item.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::OrderItemNotFound` if the item does not
    /// exist.
    pub async fn delete(&self, id: OrderItemId) -> Result<(), ServiceError> {
        tracing::info!(order_item_id = %id, "deleting order item");

        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;

        let deleted = db::order_items::delete(&mut conn, id).await?;
        if !deleted {
            return Err(ServiceError::OrderItemNotFound(id));
        }

        Ok(())
    }

    async fn details(
        conn: &mut SqliteConnection,
        item: OrderItem,
    ) -> Result<OrderItemDetails, ServiceError> {
        // The foreign key keeps the product alive while items reference
        // it; a missing product here means the stored data is broken.
        let product = db::products::get(&mut *conn, item.product_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "order item {} references missing product {}",
                    item.id, item.product_id
                ))
            })?;

        let line_total = pricing::line_total(product.price, item.quantity);
        Ok(OrderItemDetails {
            item,
            product,
            line_total,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chicken_direct_core::{CustomerId, Email, ProductStatus};
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::memory_pool;
    use crate::models::{NewAddress, NewCustomer, NewProduct};
    use crate::services::{AddressService, CustomerService, OrderService, ProductService};

    async fn order_and_product(pool: &SqlitePool) -> (OrderId, ProductId) {
        let customer = CustomerService::new(pool)
            .create(&NewCustomer {
                name: "Bob".to_owned(),
                phone: "12345678".to_owned(),
                email: Email::parse("bob@x.com").unwrap(),
            })
            .await
            .unwrap();
        let address = AddressService::new(pool)
            .create(
                customer.customer.id,
                &NewAddress {
                    street: "Main 1".to_owned(),
                    city: "Oslo".to_owned(),
                    postal_code: "0150".to_owned(),
                    country: "Norway".to_owned(),
                },
            )
            .await
            .unwrap();
        let order = OrderService::new(pool)
            .create(
                customer.customer.id,
                address.id,
                Decimal::ZERO,
                Decimal::ZERO,
                false,
            )
            .await
            .unwrap();
        let product = ProductService::new(pool)
            .create(&NewProduct {
                name: "Whole chicken".to_owned(),
                description: "Free range".to_owned(),
                price: Decimal::new(5000, 2),
                status: ProductStatus::InStock,
                quantity_on_hand: 10,
            })
            .await
            .unwrap();

        (order.order.id, product.id)
    }

    #[tokio::test]
    async fn test_create_computes_line_total() {
        let pool = memory_pool().await.unwrap();
        let service = OrderItemService::new(&pool);
        let (order_id, product_id) = order_and_product(&pool).await;

        let created = service.create(order_id, product_id, 3).await.unwrap();

        assert_eq!(created.item.quantity, 3);
        assert_eq!(created.line_total, Decimal::new(15000, 2));
        assert_eq!(created.product.id, product_id);
    }

    #[tokio::test]
    async fn test_create_for_missing_product_is_not_found() {
        let pool = memory_pool().await.unwrap();
        let service = OrderItemService::new(&pool);
        let (order_id, _) = order_and_product(&pool).await;

        let err = service
            .create(order_id, ProductId::new(404), 1)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::ProductNotFound(_)));
    }

    #[tokio::test]
    async fn test_create_for_missing_order_is_not_found() {
        let pool = memory_pool().await.unwrap();
        let service = OrderItemService::new(&pool);
        let (_, product_id) = order_and_product(&pool).await;

        let err = service
            .create(OrderId::new(404), product_id, 1)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::OrderNotFound(_)));
    }

    #[tokio::test]
    async fn test_product_survives_item_deletion() {
        let pool = memory_pool().await.unwrap();
        let service = OrderItemService::new(&pool);
        let (order_id, product_id) = order_and_product(&pool).await;

        let created = service.create(order_id, product_id, 2).await.unwrap();
        service.delete(created.item.id).await.unwrap();

        let product = ProductService::new(&pool).get(product_id).await.unwrap();
        assert_eq!(product.name, "Whole chicken");
    }

    #[tokio::test]
    async fn test_get_missing_item_is_not_found() {
        let pool = memory_pool().await.unwrap();
        let service = OrderItemService::new(&pool);

        let err = service.get(OrderItemId::new(12)).await.unwrap_err();
        assert!(matches!(err, ServiceError::OrderItemNotFound(_)));
    }

    #[tokio::test]
    async fn test_detached_order_keeps_its_items() {
        let pool = memory_pool().await.unwrap();
        let service = OrderItemService::new(&pool);
        let (order_id, product_id) = order_and_product(&pool).await;
        let created = service.create(order_id, product_id, 2).await.unwrap();

        CustomerService::new(&pool)
            .delete(CustomerId::new(1))
            .await
            .unwrap();

        let fetched = service.get(created.item.id).await.unwrap();
        assert_eq!(fetched.item.order_id, order_id);
    }
}
