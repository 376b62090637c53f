//! Customer repository.
//!
//! Customers are anonymous guests created on a session's first visit.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use techshop_core::CustomerId;

use super::RepositoryError;
use crate::models::Customer;

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: CustomerId,
    phone: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a guest customer with no contact details.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self))]
    pub async fn create_guest(&self) -> Result<CustomerId, RepositoryError> {
        let (id,): (CustomerId,) =
            sqlx::query_as("INSERT INTO shop.customer DEFAULT VALUES RETURNING id")
                .fetch_one(self.pool)
                .await?;

        tracing::debug!(customer_id = %id, "Created guest customer");
        Ok(id)
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, phone, address, created_at FROM shop.customer WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| Customer {
            id: r.id,
            phone: r.phone,
            address: r.address,
            created_at: r.created_at,
        }))
    }
}
