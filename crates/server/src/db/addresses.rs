//! Address repository.

use chicken_direct_core::{AddressId, CustomerId};
use sqlx::SqliteConnection;

use super::RepositoryError;
use crate::models::{Address, NewAddress};

#[derive(sqlx::FromRow)]
struct AddressRow {
    id: i64,
    street: String,
    city: String,
    postal_code: String,
    country: String,
    customer_id: i64,
}

impl AddressRow {
    fn into_address(self) -> Address {
        Address {
            id: AddressId::new(self.id),
            street: self.street,
            city: self.city,
            postal_code: self.postal_code,
            country: self.country,
            customer_id: CustomerId::new(self.customer_id),
        }
    }
}

/// Insert a new address owned by the given customer.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(
    conn: &mut SqliteConnection,
    customer_id: CustomerId,
    new: &NewAddress,
) -> Result<Address, RepositoryError> {
    let row = sqlx::query_as::<_, AddressRow>(
        r"
        INSERT INTO address (street, city, postal_code, country, customer_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, street, city, postal_code, country, customer_id
        ",
    )
    .bind(&new.street)
    .bind(&new.city)
    .bind(&new.postal_code)
    .bind(&new.country)
    .bind(customer_id.as_i64())
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.into_address())
}

/// Get an address by its own ID, regardless of owner.
///
/// The ownership comparison against the request path happens in the
/// service layer.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get(
    conn: &mut SqliteConnection,
    id: AddressId,
) -> Result<Option<Address>, RepositoryError> {
    let row = sqlx::query_as::<_, AddressRow>(
        r"
        SELECT id, street, city, postal_code, country, customer_id
        FROM address
        WHERE id = $1
        ",
    )
    .bind(id.as_i64())
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(AddressRow::into_address))
}

/// List the addresses owned by a customer, oldest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_for_customer(
    conn: &mut SqliteConnection,
    customer_id: CustomerId,
) -> Result<Vec<Address>, RepositoryError> {
    let rows = sqlx::query_as::<_, AddressRow>(
        r"
        SELECT id, street, city, postal_code, country, customer_id
        FROM address
        WHERE customer_id = $1
        ORDER BY id ASC
        ",
    )
    .bind(customer_id.as_i64())
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(AddressRow::into_address).collect())
}

/// Full-replace update of an address's fields.
///
/// Returns `false` if no address with that ID exists.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn update(
    conn: &mut SqliteConnection,
    id: AddressId,
    new: &NewAddress,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE address
        SET street = $1, city = $2, postal_code = $3, country = $4
        WHERE id = $5
        ",
    )
    .bind(&new.street)
    .bind(&new.city)
    .bind(&new.postal_code)
    .bind(&new.country)
    .bind(id.as_i64())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete an address. Returns `false` if it does not exist.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn delete(conn: &mut SqliteConnection, id: AddressId) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        DELETE FROM address
        WHERE id = $1
        ",
    )
    .bind(id.as_i64())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete every address owned by a customer (cascade step of customer
/// deletion). Returns the number of addresses removed.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn delete_for_customer(
    conn: &mut SqliteConnection,
    customer_id: CustomerId,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query(
        r"
        DELETE FROM address
        WHERE customer_id = $1
        ",
    )
    .bind(customer_id.as_i64())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
