//! Product repository.

use chicken_direct_core::{ProductId, ProductStatus};
use sqlx::SqliteConnection;

use super::{RepositoryError, parse_decimal};
use crate::models::{NewProduct, Product};

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: String,
    status: String,
    quantity_on_hand: i64,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, RepositoryError> {
        let price = parse_decimal("product.price", &self.price)?;
        let status: ProductStatus = self
            .status
            .parse()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Product {
            id: ProductId::new(self.id),
            name: self.name,
            description: self.description,
            price,
            status,
            quantity_on_hand: self.quantity_on_hand,
        })
    }
}

/// Insert a new product.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(
    conn: &mut SqliteConnection,
    new: &NewProduct,
) -> Result<Product, RepositoryError> {
    let row = sqlx::query_as::<_, ProductRow>(
        r"
        INSERT INTO product (name, description, price, status, quantity_on_hand)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, description, price, status, quantity_on_hand
        ",
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.price.to_string())
    .bind(new.status.as_str())
    .bind(new.quantity_on_hand)
    .fetch_one(&mut *conn)
    .await?;

    row.into_product()
}

/// Get a product by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get(
    conn: &mut SqliteConnection,
    id: ProductId,
) -> Result<Option<Product>, RepositoryError> {
    let row = sqlx::query_as::<_, ProductRow>(
        r"
        SELECT id, name, description, price, status, quantity_on_hand
        FROM product
        WHERE id = $1
        ",
    )
    .bind(id.as_i64())
    .fetch_optional(&mut *conn)
    .await?;

    row.map(ProductRow::into_product).transpose()
}

/// List all products, oldest first.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list(conn: &mut SqliteConnection) -> Result<Vec<Product>, RepositoryError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        r"
        SELECT id, name, description, price, status, quantity_on_hand
        FROM product
        ORDER BY id ASC
        ",
    )
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(ProductRow::into_product).collect()
}

/// Write a product's mutable fields back after a merge.
///
/// Returns `false` if no product with that ID exists.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn update(conn: &mut SqliteConnection, product: &Product) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE product
        SET name = $1, description = $2, price = $3, status = $4, quantity_on_hand = $5
        WHERE id = $6
        ",
    )
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price.to_string())
    .bind(product.status.as_str())
    .bind(product.quantity_on_hand)
    .bind(product.id.as_i64())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a product. Returns `false` if it does not exist.
///
/// A product still referenced by order items cannot be deleted; the
/// foreign key constraint surfaces as a database error.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn delete(conn: &mut SqliteConnection, id: ProductId) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        DELETE FROM product
        WHERE id = $1
        ",
    )
    .bind(id.as_i64())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}
