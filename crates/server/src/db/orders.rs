//! Order repository.
//!
//! Snapshot columns are written exactly once at insert time; [`update`]
//! only touches the mutable fields.

use chicken_direct_core::{CustomerId, Email, OrderId};
use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use super::{RepositoryError, parse_decimal};
use crate::models::{CustomerSnapshot, NewOrder, Order, ShippingSnapshot};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    creation_date: DateTime<Utc>,
    total_price: String,
    shipping_charge: String,
    is_shipped: bool,
    shipping_street: String,
    shipping_city: String,
    shipping_postal_code: String,
    shipping_country: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    customer_id: Option<i64>,
}

const ORDER_COLUMNS: &str = r"
    id, creation_date, total_price, shipping_charge, is_shipped,
    shipping_street, shipping_city, shipping_postal_code, shipping_country,
    customer_name, customer_email, customer_phone, customer_id
";

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        let total_price = parse_decimal("orders.total_price", &self.total_price)?;
        let shipping_charge = parse_decimal("orders.shipping_charge", &self.shipping_charge)?;
        let customer_email = Email::parse(&self.customer_email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            creation_date: self.creation_date,
            total_price,
            shipping_charge,
            is_shipped: self.is_shipped,
            shipping: ShippingSnapshot {
                street: self.shipping_street,
                city: self.shipping_city,
                postal_code: self.shipping_postal_code,
                country: self.shipping_country,
            },
            customer: CustomerSnapshot {
                name: self.customer_name,
                email: customer_email,
                phone: self.customer_phone,
            },
            customer_id: self.customer_id.map(CustomerId::new),
        })
    }
}

/// Insert a new order with its snapshot fields and creation timestamp.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(
    conn: &mut SqliteConnection,
    new: &NewOrder,
    creation_date: DateTime<Utc>,
) -> Result<Order, RepositoryError> {
    let sql = format!(
        r"
        INSERT INTO orders (
            creation_date, total_price, shipping_charge, is_shipped,
            shipping_street, shipping_city, shipping_postal_code, shipping_country,
            customer_name, customer_email, customer_phone, customer_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {ORDER_COLUMNS}
        "
    );

    let row = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(creation_date)
        .bind(new.total_price.to_string())
        .bind(new.shipping_charge.to_string())
        .bind(new.is_shipped)
        .bind(&new.shipping.street)
        .bind(&new.shipping.city)
        .bind(&new.shipping.postal_code)
        .bind(&new.shipping.country)
        .bind(&new.customer.name)
        .bind(new.customer.email.as_str())
        .bind(&new.customer.phone)
        .bind(new.customer_id.as_i64())
        .fetch_one(&mut *conn)
        .await?;

    row.into_order()
}

/// Get an order by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get(
    conn: &mut SqliteConnection,
    id: OrderId,
) -> Result<Option<Order>, RepositoryError> {
    let sql = format!(
        r"
        SELECT {ORDER_COLUMNS}
        FROM orders
        WHERE id = $1
        "
    );

    let row = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(id.as_i64())
        .fetch_optional(&mut *conn)
        .await?;

    row.map(OrderRow::into_order).transpose()
}

/// List all orders, oldest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Order>, RepositoryError> {
    let sql = format!(
        r"
        SELECT {ORDER_COLUMNS}
        FROM orders
        ORDER BY id ASC
        "
    );

    let rows = sqlx::query_as::<_, OrderRow>(&sql)
        .fetch_all(&mut *conn)
        .await?;

    rows.into_iter().map(OrderRow::into_order).collect()
}

/// List the orders weakly referencing a customer, oldest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_for_customer(
    conn: &mut SqliteConnection,
    customer_id: CustomerId,
) -> Result<Vec<Order>, RepositoryError> {
    let sql = format!(
        r"
        SELECT {ORDER_COLUMNS}
        FROM orders
        WHERE customer_id = $1
        ORDER BY id ASC
        "
    );

    let rows = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(customer_id.as_i64())
        .fetch_all(&mut *conn)
        .await?;

    rows.into_iter().map(OrderRow::into_order).collect()
}

/// Write an order's mutable fields back after a merge.
///
/// Snapshot columns and the creation date are deliberately not part of
/// this statement. Returns `false` if no order with that ID exists.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn update(conn: &mut SqliteConnection, order: &Order) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE orders
        SET total_price = $1, shipping_charge = $2, is_shipped = $3
        WHERE id = $4
        ",
    )
    .bind(order.total_price.to_string())
    .bind(order.shipping_charge.to_string())
    .bind(order.is_shipped)
    .bind(order.id.as_i64())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete an order. Returns `false` if it does not exist. Owned items are
/// deleted by the caller in the same transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn delete(conn: &mut SqliteConnection, id: OrderId) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        DELETE FROM orders
        WHERE id = $1
        ",
    )
    .bind(id.as_i64())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Null out the weak customer reference on every order pointing at the
/// given customer (part of customer deletion). The snapshot columns are
/// untouched. Returns the number of orders detached.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn detach_customer(
    conn: &mut SqliteConnection,
    customer_id: CustomerId,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE orders
        SET customer_id = NULL
        WHERE customer_id = $1
        ",
    )
    .bind(customer_id.as_i64())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
