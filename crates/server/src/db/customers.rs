//! Customer repository.

use chicken_direct_core::{CustomerId, Email};
use sqlx::SqliteConnection;

use super::{RepositoryError, conflict_on_unique};
use crate::models::{Customer, NewCustomer};

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    name: String,
    phone: String,
    email: String,
}

impl CustomerRow {
    fn into_customer(self) -> Result<Customer, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Customer {
            id: CustomerId::new(self.id),
            name: self.name,
            phone: self.phone,
            email,
        })
    }
}

/// Insert a new customer.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the email already exists.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn insert(
    conn: &mut SqliteConnection,
    new: &NewCustomer,
) -> Result<Customer, RepositoryError> {
    let row = sqlx::query_as::<_, CustomerRow>(
        r"
        INSERT INTO customer (name, phone, email)
        VALUES ($1, $2, $3)
        RETURNING id, name, phone, email
        ",
    )
    .bind(&new.name)
    .bind(&new.phone)
    .bind(new.email.as_str())
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| conflict_on_unique(e, "email already exists"))?;

    row.into_customer()
}

/// Get a customer by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get(
    conn: &mut SqliteConnection,
    id: CustomerId,
) -> Result<Option<Customer>, RepositoryError> {
    let row = sqlx::query_as::<_, CustomerRow>(
        r"
        SELECT id, name, phone, email
        FROM customer
        WHERE id = $1
        ",
    )
    .bind(id.as_i64())
    .fetch_optional(&mut *conn)
    .await?;

    row.map(CustomerRow::into_customer).transpose()
}

/// List all customers, oldest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Customer>, RepositoryError> {
    let rows = sqlx::query_as::<_, CustomerRow>(
        r"
        SELECT id, name, phone, email
        FROM customer
        ORDER BY id ASC
        ",
    )
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(CustomerRow::into_customer).collect()
}

/// Full-replace update of a customer's fields.
///
/// Returns `false` if no customer with that ID exists.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the new email belongs to another
/// customer. Returns `RepositoryError::Database` for other database errors.
pub async fn update(
    conn: &mut SqliteConnection,
    id: CustomerId,
    new: &NewCustomer,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE customer
        SET name = $1, phone = $2, email = $3
        WHERE id = $4
        ",
    )
    .bind(&new.name)
    .bind(&new.phone)
    .bind(new.email.as_str())
    .bind(id.as_i64())
    .execute(&mut *conn)
    .await
    .map_err(|e| conflict_on_unique(e, "email already exists"))?;

    Ok(result.rows_affected() > 0)
}

/// Delete a customer.
///
/// Returns `false` if no customer with that ID exists. Owned addresses and
/// weak order references are handled by the caller in the same transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn delete(
    conn: &mut SqliteConnection,
    id: CustomerId,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        DELETE FROM customer
        WHERE id = $1
        ",
    )
    .bind(id.as_i64())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}
