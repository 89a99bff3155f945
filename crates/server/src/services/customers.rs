//! Customer service.
//!
//! Customer deletion is the interesting operation: owned addresses are
//! removed and order references are nulled out in one transaction, while
//! the orders themselves (and their snapshot fields) are left alone.

use chicken_direct_core::CustomerId;
use sqlx::SqlitePool;

use super::ServiceError;
use crate::db::{self, RepositoryError};
use crate::models::{Customer, CustomerDetails, NewCustomer};

/// Operations on the customer aggregate.
pub struct CustomerService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CustomerService<'a> {
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a customer. A brand-new customer owns no addresses and has
    /// no orders yet.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` on a duplicate email or other
    /// repository failure.
    pub async fn create(&self, new: &NewCustomer) -> Result<CustomerDetails, ServiceError> {
        tracing::info!(email = %new.email, "creating customer");

        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;
        let customer = db::customers::insert(&mut conn, new).await?;

        Ok(CustomerDetails {
            customer,
            addresses: Vec::new(),
            orders: Vec::new(),
        })
    }

    /// Get a customer with its addresses and orders.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::CustomerNotFound` if the customer does not
    /// exist.
    pub async fn get(&self, id: CustomerId) -> Result<CustomerDetails, ServiceError> {
        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;

        let customer = db::customers::get(&mut conn, id)
            .await?
            .ok_or(ServiceError::CustomerNotFound(id))?;

        Self::details(&mut conn, customer).await
    }

    /// List all customers, each with its addresses and orders.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if a query fails.
    pub async fn list(&self) -> Result<Vec<CustomerDetails>, ServiceError> {
        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;

        let customers = db::customers::list(&mut conn).await?;
        let mut details = Vec::with_capacity(customers.len());
        for customer in customers {
            details.push(Self::details(&mut conn, customer).await?);
        }

        Ok(details)
    }

    /// Full-replace update. Every field is overwritten with the supplied
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::CustomerNotFound` if the customer does not
    /// exist.
    pub async fn update(
        &self,
        id: CustomerId,
        new: &NewCustomer,
    ) -> Result<CustomerDetails, ServiceError> {
        tracing::info!(customer_id = %id, "updating customer");

        let mut conn = self.pool.acquire().await.map_err(RepositoryError::from)?;

        let updated = db::customers::update(&mut conn, id, new).await?;
        if !updated {
            return Err(ServiceError::CustomerNotFound(id));
        }

        let customer = db::customers::get(&mut conn, id)
            .await?
            .ok_or(ServiceError::CustomerNotFound(id))?;

        Self::details(&mut conn, customer).await
    }

    /// Delete a customer, its addresses, and the customer reference on its
    /// orders, all in one transaction.
    ///
    /// Orders survive: their snapshot fields keep serving reads, only the
    /// weak reference goes null.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::CustomerNotFound` if the customer does not
    /// exist; nothing is deleted in that case.
    pub async fn delete(&self, id: CustomerId) -> Result<(), ServiceError> {
        tracing::info!(customer_id = %id, "deleting customer");

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        let addresses = db::addresses::delete_for_customer(&mut tx, id).await?;
        let detached = db::orders::detach_customer(&mut tx, id).await?;

        let deleted = db::customers::delete(&mut tx, id).await?;
        if !deleted {
            // Rolls back the cascade steps on drop.
            return Err(ServiceError::CustomerNotFound(id));
        }

        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(
            customer_id = %id,
            addresses_deleted = addresses,
            orders_detached = detached,
            "customer deleted"
        );

        Ok(())
    }

    async fn details(
        conn: &mut sqlx::SqliteConnection,
        customer: Customer,
    ) -> Result<CustomerDetails, ServiceError> {
        let addresses = db::addresses::list_for_customer(&mut *conn, customer.id).await?;
        let orders = db::orders::list_for_customer(&mut *conn, customer.id).await?;

        Ok(CustomerDetails {
            customer,
            addresses,
            orders,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chicken_direct_core::Email;

    use super::*;
    use crate::db::memory_pool;
    use crate::models::NewAddress;
    use crate::services::AddressService;

    fn bob() -> NewCustomer {
        NewCustomer {
            name: "Bob".to_owned(),
            phone: "12345678".to_owned(),
            email: Email::parse("bob@x.com").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let pool = memory_pool().await.unwrap();
        let service = CustomerService::new(&pool);

        let created = service.create(&bob()).await.unwrap();
        let fetched = service.get(created.customer.id).await.unwrap();

        assert_eq!(fetched.customer.name, "Bob");
        assert_eq!(fetched.customer.email.as_str(), "bob@x.com");
        assert!(fetched.addresses.is_empty());
        assert!(fetched.orders.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let pool = memory_pool().await.unwrap();
        let service = CustomerService::new(&pool);

        service.create(&bob()).await.unwrap();
        let err = service.create(&bob()).await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::Repository(RepositoryError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_get_missing_customer_is_not_found() {
        let pool = memory_pool().await.unwrap();
        let service = CustomerService::new(&pool);

        let err = service.get(CustomerId::new(9999)).await.unwrap_err();

        assert!(matches!(err, ServiceError::CustomerNotFound(id) if id.as_i64() == 9999));
    }

    #[tokio::test]
    async fn test_update_replaces_every_field() {
        let pool = memory_pool().await.unwrap();
        let service = CustomerService::new(&pool);

        let created = service.create(&bob()).await.unwrap();
        let replacement = NewCustomer {
            name: "Bobby".to_owned(),
            phone: "87654321".to_owned(),
            email: Email::parse("bobby@x.com").unwrap(),
        };
        let updated = service.update(created.customer.id, &replacement).await.unwrap();

        assert_eq!(updated.customer.name, "Bobby");
        assert_eq!(updated.customer.phone, "87654321");
        assert_eq!(updated.customer.email.as_str(), "bobby@x.com");
    }

    #[tokio::test]
    async fn test_delete_removes_owned_addresses() {
        let pool = memory_pool().await.unwrap();
        let customers = CustomerService::new(&pool);
        let addresses = AddressService::new(&pool);

        let created = customers.create(&bob()).await.unwrap();
        let address = addresses
            .create(
                created.customer.id,
                &NewAddress {
                    street: "Main 1".to_owned(),
                    city: "Oslo".to_owned(),
                    postal_code: "0150".to_owned(),
                    country: "Norway".to_owned(),
                },
            )
            .await
            .unwrap();

        customers.delete(created.customer.id).await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let gone = db::addresses::get(&mut conn, address.id).await.unwrap();
        assert!(gone.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_customer_is_not_found() {
        let pool = memory_pool().await.unwrap();
        let service = CustomerService::new(&pool);

        let err = service.delete(CustomerId::new(42)).await.unwrap_err();

        assert!(matches!(err, ServiceError::CustomerNotFound(_)));
    }
}
