//! Database operations for storefront `PostgreSQL`.
//!
//! # Schema: `shop`
//!
//! ## Tables
//!
//! - `category` - Product categories
//! - `product` - Products of every kind (`kind` column)
//! - `notebook_spec` / `smartphone_spec` - Per-kind technical specifications
//! - `customer` - Guest customers, one per session
//! - `cart` / `cart_product` - Carts and their lines
//! - `orders` - Placed orders
//!
//! Sessions live in `tower_sessions.session`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p techshop-cli -- migrate
//! ```
//!
//! Queries are built at runtime with `sqlx::query_as` so the workspace builds
//! without a live database or an offline query cache.

pub mod carts;
pub mod catalog;
pub mod customers;
pub mod orders;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::{CartOperationError, CartRepository};
pub use catalog::CatalogRepository;
pub use customers::CustomerRepository;
pub use orders::OrderRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Convert a database count or quantity to `u32`.
pub(crate) fn to_u32(value: i32, what: &str) -> Result<u32, RepositoryError> {
    u32::try_from(value)
        .map_err(|_| RepositoryError::DataCorruption(format!("negative {what}: {value}")))
}

/// Convert a quantity to the `INTEGER` column type.
pub(crate) fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Whether an error is a foreign key violation.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_u32() {
        assert_eq!(to_u32(3, "qty").ok(), Some(3));
        assert!(matches!(
            to_u32(-1, "qty"),
            Err(RepositoryError::DataCorruption(msg)) if msg == "negative qty: -1"
        ));
    }

    #[test]
    fn test_to_i32_saturates() {
        assert_eq!(to_i32(42), 42);
        assert_eq!(to_i32(u32::MAX), i32::MAX);
    }
}
