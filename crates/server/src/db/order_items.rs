//! Order item repository.

use chicken_direct_core::{OrderId, OrderItemId, ProductId, ProductStatus};
use sqlx::SqliteConnection;

use super::{RepositoryError, parse_decimal};
use crate::models::{OrderItem, Product};

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    quantity: i64,
    product_id: i64,
    order_id: i64,
}

impl OrderItemRow {
    fn into_order_item(self) -> OrderItem {
        OrderItem {
            id: OrderItemId::new(self.id),
            quantity: self.quantity,
            product_id: ProductId::new(self.product_id),
            order_id: OrderId::new(self.order_id),
        }
    }
}

/// An order item joined with its product's current row.
#[derive(sqlx::FromRow)]
struct ItemWithProductRow {
    id: i64,
    quantity: i64,
    product_id: i64,
    order_id: i64,
    product_name: String,
    product_description: String,
    product_price: String,
    product_status: String,
    product_quantity_on_hand: i64,
}

impl ItemWithProductRow {
    fn into_pair(self) -> Result<(OrderItem, Product), RepositoryError> {
        let price = parse_decimal("product.price", &self.product_price)?;
        let status: ProductStatus = self
            .product_status
            .parse()
            .map_err(RepositoryError::DataCorruption)?;

        let item = OrderItem {
            id: OrderItemId::new(self.id),
            quantity: self.quantity,
            product_id: ProductId::new(self.product_id),
            order_id: OrderId::new(self.order_id),
        };
        let product = Product {
            id: ProductId::new(self.product_id),
            name: self.product_name,
            description: self.product_description,
            price,
            status,
            quantity_on_hand: self.product_quantity_on_hand,
        };

        Ok((item, product))
    }
}

/// Insert a new order item.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    product_id: ProductId,
    quantity: i64,
) -> Result<OrderItem, RepositoryError> {
    let row = sqlx::query_as::<_, OrderItemRow>(
        r"
        INSERT INTO order_item (quantity, product_id, order_id)
        VALUES ($1, $2, $3)
        RETURNING id, quantity, product_id, order_id
        ",
    )
    .bind(quantity)
    .bind(product_id.as_i64())
    .bind(order_id.as_i64())
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.into_order_item())
}

/// Get an order item by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get(
    conn: &mut SqliteConnection,
    id: OrderItemId,
) -> Result<Option<OrderItem>, RepositoryError> {
    let row = sqlx::query_as::<_, OrderItemRow>(
        r"
        SELECT id, quantity, product_id, order_id
        FROM order_item
        WHERE id = $1
        ",
    )
    .bind(id.as_i64())
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(OrderItemRow::into_order_item))
}

/// List all order items, oldest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, RepositoryError> {
    let rows = sqlx::query_as::<_, OrderItemRow>(
        r"
        SELECT id, quantity, product_id, order_id
        FROM order_item
        ORDER BY id ASC
        ",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(OrderItemRow::into_order_item).collect())
}

/// List an order's items joined with their products, oldest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
/// Returns `RepositoryError::DataCorruption` if a product row is invalid.
pub async fn list_for_order_with_products(
    conn: &mut SqliteConnection,
    order_id: OrderId,
) -> Result<Vec<(OrderItem, Product)>, RepositoryError> {
    let rows = sqlx::query_as::<_, ItemWithProductRow>(
        r"
        SELECT oi.id, oi.quantity, oi.product_id, oi.order_id,
               p.name AS product_name,
               p.description AS product_description,
               p.price AS product_price,
               p.status AS product_status,
               p.quantity_on_hand AS product_quantity_on_hand
        FROM order_item oi
        JOIN product p ON p.id = oi.product_id
        WHERE oi.order_id = $1
        ORDER BY oi.id ASC
        ",
    )
    .bind(order_id.as_i64())
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(ItemWithProductRow::into_pair).collect()
}

/// Delete an order item. Returns `false` if it does not exist.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn delete(
    conn: &mut SqliteConnection,
    id: OrderItemId,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        DELETE FROM order_item
        WHERE id = $1
        ",
    )
    .bind(id.as_i64())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete every item owned by an order (cascade step of order deletion).
/// Returns the number of items removed.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn delete_for_order(
    conn: &mut SqliteConnection,
    order_id: OrderId,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query(
        r"
        DELETE FROM order_item
        WHERE order_id = $1
        ",
    )
    .bind(order_id.as_i64())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
