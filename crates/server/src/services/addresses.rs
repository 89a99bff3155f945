//! Address service.
//!
//! Addresses are only ever reached through their owning customer. Update
//! and delete run an ownership check first: an address that exists but
//! belongs to a different customer is reported as missing, so the
//! responses never reveal that the id is taken.

use chicken_direct_core::{AddressId, CustomerId};
use sqlx::{SqliteConnection, SqlitePool};

use super::ServiceError;
use crate::db::{self, RepositoryError};
use crate::models::{Address, NewAddress};

/// Operations on a customer's addresses.
pub struct AddressService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AddressService<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an address owned by the given customer.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::CustomerNotFound` if the customer does not
    /// exist.
    pub async fn create(
        &self,
        customer_id: CustomerId,
        new: &NewAddress,
    ) -> Result<Address, ServiceError> {
        tracing::info!(customer_id = %customer_id, "creating address");

        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;

        db::customers::get(&mut conn, customer_id)
            .await?
            .ok_or(ServiceError::CustomerNotFound(customer_id))?;

        Ok(db::addresses::insert(&mut conn, customer_id, new).await?)
    }

    /// List the addresses owned by a customer.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::CustomerNotFound` if the customer does not
    /// exist.
    pub async fn list(&self, customer_id: CustomerId) -> Result<Vec<Address>, ServiceError> {
        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;

        db::customers::get(&mut conn, customer_id)
            .await?
            .ok_or(ServiceError::CustomerNotFound(customer_id))?;

        Ok(db::addresses::list_for_customer(&mut conn, customer_id).await?)
    }

    /// Full-replace update, ownership-checked.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::AddressNotFound` if the address does not
    /// exist or belongs to another customer.
    pub async fn update(
        &self,
        customer_id: CustomerId,
        address_id: AddressId,
        new: &NewAddress,
    ) -> Result<Address, ServiceError> {
        tracing::info!(customer_id = %customer_id, address_id = %address_id, "updating address");

        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;

        Self::owned(&mut conn, customer_id, address_id).await?;
        db::addresses::update(&mut conn, address_id, new).await?;

        db::addresses::get(&mut conn, address_id)
            .await?
            .ok_or(ServiceError::AddressNotFound(address_id))
    }

    /// Delete an address, ownership-checked.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::AddressNotFound` if the address does not
    /// exist or belongs to another customer.
    pub async fn delete(
        &self,
        customer_id: CustomerId,
        address_id: AddressId,
    ) -> Result<(), ServiceError> {
        tracing::info!(customer_id = %customer_id, address_id = %address_id, "deleting address");

        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;

        Self::owned(&mut conn, customer_id, address_id).await?;
        db::addresses::delete(&mut conn, address_id).await?;

        Ok(())
    }

    /// Load an address and verify the stored owner matches the path's
    /// customer. A mismatch surfaces exactly like a missing address.
    async fn owned(
        conn: &mut SqliteConnection,
        customer_id: CustomerId,
        address_id: AddressId,
    ) -> Result<Address, ServiceError> {
        let address = db::addresses::get(&mut *conn, address_id)
            .await?
            .ok_or(ServiceError::AddressNotFound(address_id))?;

        if address.customer_id != customer_id {
            return Err(ServiceError::AddressNotFound(address_id));
        }

        Ok(address)
    }
}
