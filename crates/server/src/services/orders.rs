//! Order service.
//!
//! Order creation is where the snapshot is taken: the customer's contact
//! fields and the shipping address's fields are copied into the order
//! inside one transaction, and never touched again. From then on the
//! order depends on the live customer row only through a nullable weak
//! reference.

use chicken_direct_core::{AddressId, CustomerId, OrderId};
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{SqliteConnection, SqlitePool};

use super::{ServiceError, pricing};
use crate::db::{self, RepositoryError};
use crate::models::{NewOrder, Order, OrderChanges, OrderDetails, OrderItemDetails};

/// Operations on the order aggregate.
pub struct OrderService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an order for a customer, snapshotting the customer and
    /// shipping address fields.
    ///
    /// The shipping address is resolved by its raw id; it is not checked
    /// against the customer's address list.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::CustomerNotFound` or
    /// `ServiceError::AddressNotFound` if a referenced entity is missing.
    pub async fn create(
        &self,
        customer_id: CustomerId,
        shipping_address_id: AddressId,
        total_price: Decimal,
        shipping_charge: Decimal,
        is_shipped: bool,
    ) -> Result<OrderDetails, ServiceError> {
        tracing::info!(customer_id = %customer_id, "creating order");

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let customer = db::customers::get(&mut tx, customer_id)
            .await?
            .ok_or(ServiceError::CustomerNotFound(customer_id))?;
        let shipping_address = db::addresses::get(&mut tx, shipping_address_id)
            .await?
            .ok_or(ServiceError::AddressNotFound(shipping_address_id))?;

        let new = NewOrder::snapshot(
            &customer,
            &shipping_address,
            total_price,
            shipping_charge,
            is_shipped,
        );
        let order = db::orders::insert(&mut tx, &new, Utc::now()).await?;

        tx.commit().await.map_err(RepositoryError::from)?;

        Ok(OrderDetails {
            order,
            items: Vec::new(),
        })
    }

    /// Get an order with its items, line totals computed from current
    /// product prices.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::OrderNotFound` if the order does not exist.
    pub async fn get(&self, id: OrderId) -> Result<OrderDetails, ServiceError> {
        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;

        let order = db::orders::get(&mut conn, id)
            .await?
            .ok_or(ServiceError::OrderNotFound(id))?;

        Self::details(&mut conn, order).await
    }

    /// List all orders with their items.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if a query fails.
    pub async fn list(&self) -> Result<Vec<OrderDetails>, ServiceError> {
        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;

        let orders = db::orders::list(&mut conn).await?;
        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            details.push(Self::details(&mut conn, order).await?);
        }

        Ok(details)
    }

    /// Partial-merge update of the mutable fields. Snapshot fields and
    /// the creation date cannot be changed through this path.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::OrderNotFound` if the order does not exist.
    pub async fn update(
        &self,
        id: OrderId,
        changes: OrderChanges,
    ) -> Result<OrderDetails, ServiceError> {
        tracing::info!(order_id = %id, "updating order");

        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;

        let mut order = db::orders::get(&mut conn, id)
            .await?
            .ok_or(ServiceError::OrderNotFound(id))?;

        order.merge(changes);
        db::orders::update(&mut conn, &order).await?;

        Self::details(&mut conn, order).await
    }

    /// Delete an order and its items in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::OrderNotFound` if the order does not
    /// exist; nothing is deleted in that case.
    pub async fn delete(&self, id: OrderId) -> Result<(), ServiceError> {
        tracing::info!(order_id = %id, "deleting order");

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let items = db::order_items::delete_for_order(&mut tx, id).await?;

        let deleted = db::orders::delete(&mut tx, id).await?;
        if !deleted {
            return Err(ServiceError::OrderNotFound(id));
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(order_id = %id, items_deleted = items, "order deleted");

        Ok(())
    }

    async fn details(
        conn: &mut SqliteConnection,
        order: Order,
    ) -> Result<OrderDetails, ServiceError> {
        let items = db::order_items::list_for_order_with_products(&mut *conn, order.id)
            .await?
            .into_iter()
            .map(|(item, product)| {
                let line_total = pricing::line_total(product.price, item.quantity);
                OrderItemDetails {
                    item,
                    product,
                    line_total,
                }
            })
            .collect();

        Ok(OrderDetails { order, items })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chicken_direct_core::{Email, ProductStatus};

    use super::*;
    use crate::db::memory_pool;
    use crate::models::{NewAddress, NewCustomer, NewProduct, ProductChanges};
    use crate::services::{AddressService, CustomerService, OrderItemService, ProductService};

    struct Fixture {
        customer_id: CustomerId,
        address_id: AddressId,
    }

    async fn fixture(pool: &SqlitePool) -> Fixture {
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

        Fixture {
            customer_id: customer.customer.id,
            address_id: address.id,
        }
    }

    #[tokio::test]
    async fn test_create_snapshots_customer_and_address() {
        let pool = memory_pool().await.unwrap();
        let service = OrderService::new(&pool);
        let fx = fixture(&pool).await;

        let created = service
            .create(
                fx.customer_id,
                fx.address_id,
                Decimal::new(10000, 2),
                Decimal::new(1000, 2),
                false,
            )
            .await
            .unwrap();

        assert_eq!(created.order.customer.name, "Bob");
        assert_eq!(created.order.shipping.city, "Oslo");
        assert_eq!(created.order.customer_id, Some(fx.customer_id));
    }

    #[tokio::test]
    async fn test_create_for_missing_customer_is_not_found() {
        let pool = memory_pool().await.unwrap();
        let service = OrderService::new(&pool);

        let err = service
            .create(
                CustomerId::new(77),
                AddressId::new(1),
                Decimal::ZERO,
                Decimal::ZERO,
                false,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::CustomerNotFound(_)));
    }

    #[tokio::test]
    async fn test_snapshot_survives_customer_deletion() {
        let pool = memory_pool().await.unwrap();
        let service = OrderService::new(&pool);
        let fx = fixture(&pool).await;

        let created = service
            .create(
                fx.customer_id,
                fx.address_id,
                Decimal::new(10000, 2),
                Decimal::new(1000, 2),
                false,
            )
            .await
            .unwrap();

        CustomerService::new(&pool)
            .delete(fx.customer_id)
            .await
            .unwrap();

        let fetched = service.get(created.order.id).await.unwrap();
        assert_eq!(fetched.order.customer.name, "Bob");
        assert_eq!(fetched.order.customer.email.as_str(), "bob@x.com");
        assert_eq!(fetched.order.shipping.street, "Main 1");
        assert_eq!(fetched.order.customer_id, None);
    }

    #[tokio::test]
    async fn test_snapshot_ignores_later_address_edits() {
        let pool = memory_pool().await.unwrap();
        let service = OrderService::new(&pool);
        let fx = fixture(&pool).await;

        let created = service
            .create(fx.customer_id, fx.address_id, Decimal::ZERO, Decimal::ZERO, false)
            .await
            .unwrap();

        AddressService::new(&pool)
            .update(
                fx.customer_id,
                fx.address_id,
                &NewAddress {
                    street: "Main 1".to_owned(),
                    city: "Bergen".to_owned(),
                    postal_code: "5003".to_owned(),
                    country: "Norway".to_owned(),
                },
            )
            .await
            .unwrap();

        let fetched = service.get(created.order.id).await.unwrap();
        assert_eq!(fetched.order.shipping.city, "Oslo");
    }

    #[tokio::test]
    async fn test_line_totals_follow_current_product_price() {
        let pool = memory_pool().await.unwrap();
        let service = OrderService::new(&pool);
        let fx = fixture(&pool).await;

        let order = service
            .create(fx.customer_id, fx.address_id, Decimal::ZERO, Decimal::ZERO, false)
            .await
            .unwrap();

        let products = ProductService::new(&pool);
        let product = products
            .create(&NewProduct {
                name: "Whole chicken".to_owned(),
                description: "Free range".to_owned(),
                price: Decimal::new(5000, 2),
                status: ProductStatus::InStock,
                quantity_on_hand: 10,
            })
            .await
            .unwrap();

        OrderItemService::new(&pool)
            .create(order.order.id, product.id, 3)
            .await
            .unwrap();

        let before = service.get(order.order.id).await.unwrap();
        assert_eq!(before.items[0].line_total, Decimal::new(15000, 2));

        products
            .update(
                product.id,
                ProductChanges {
                    price: Some(Decimal::new(6000, 2)),
                    ..ProductChanges::default()
                },
            )
            .await
            .unwrap();

        let after = service.get(order.order.id).await.unwrap();
        assert_eq!(after.items[0].line_total, Decimal::new(18000, 2));
    }

    #[tokio::test]
    async fn test_update_merges_and_persists() {
        let pool = memory_pool().await.unwrap();
        let service = OrderService::new(&pool);
        let fx = fixture(&pool).await;

        let created = service
            .create(
                fx.customer_id,
                fx.address_id,
                Decimal::new(10000, 2),
                Decimal::new(1000, 2),
                false,
            )
            .await
            .unwrap();

        service
            .update(
                created.order.id,
                OrderChanges {
                    total_price: None,
                    shipping_charge: Some(Decimal::new(2500, 2)),
                    is_shipped: true,
                },
            )
            .await
            .unwrap();

        let fetched = service.get(created.order.id).await.unwrap();
        assert_eq!(fetched.order.total_price, Decimal::new(10000, 2));
        assert_eq!(fetched.order.shipping_charge, Decimal::new(2500, 2));
        assert!(fetched.order.is_shipped);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_items() {
        let pool = memory_pool().await.unwrap();
        let service = OrderService::new(&pool);
        let fx = fixture(&pool).await;

        let order = service
            .create(fx.customer_id, fx.address_id, Decimal::ZERO, Decimal::ZERO, false)
            .await
            .unwrap();
        let product = ProductService::new(&pool)
            .create(&NewProduct {
                name: "Whole chicken".to_owned(),
                description: "Free range".to_owned(),
                price: Decimal::new(5000, 2),
                status: ProductStatus::InStock,
                quantity_on_hand: 10,
            })
            .await
            .unwrap();
        let items = OrderItemService::new(&pool);
        let item = items.create(order.order.id, product.id, 2).await.unwrap();

        service.delete(order.order.id).await.unwrap();

        let err = items.get(item.item.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::OrderItemNotFound(_)));
    }
}
