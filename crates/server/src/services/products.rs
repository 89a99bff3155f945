//! Product service.
//!
//! Product updates are partial merges: the stored product is loaded, the
//! supplied fields overwrite it in memory, and the result is written back.

use chicken_direct_core::ProductId;
use sqlx::SqlitePool;

use super::ServiceError;
use crate::db::{self, RepositoryError};
use crate::models::{NewProduct, Product, ProductChanges};

/// Operations on the product catalog.
pub struct ProductService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductService<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the insert fails.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, ServiceError> {
        tracing::info!(name = %new.name, "creating product");

        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;
        Ok(db::products::insert(&mut conn, new).await?)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::ProductNotFound` if the product does not
    /// exist.
    pub async fn get(&self, id: ProductId) -> Result<Product, ServiceError> {
        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;

        db::products::get(&mut conn, id)
            .await?
            .ok_or(ServiceError::ProductNotFound(id))
    }

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;
        Ok(db::products::list(&mut conn).await?)
    }

    /// Partial-merge update: load, overwrite the supplied fields, write
    /// back.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::ProductNotFound` if the product does not
    /// exist.
    pub async fn update(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, ServiceError> {
        tracing::info!(product_id = %id, "updating product");

        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;

        let mut product = db::products::get(&mut conn, id)
            .await?
            .ok_or(ServiceError::ProductNotFound(id))?;

        product.merge(changes);
        db::products::update(&mut conn, &product).await?;

        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::ProductNotFound` if the product does not
    /// exist, and `ServiceError::Repository` if order items still
    /// reference it.
    pub async fn delete(&self, id: ProductId) -> Result<(), ServiceError> {
        tracing::info!(product_id = %id, "deleting product");

        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;

        let deleted = db::products::delete(&mut conn, id).await?;
        if !deleted {
            return Err(ServiceError::ProductNotFound(id));
        }

        Ok(())
    }
}
