//! Database migration command.
//!
//! Migrations are embedded from `crates/storefront/migrations/` at compile
//! time and applied in order. Already-applied migrations are skipped.

use techshop_storefront::db;
use tracing::info;

use super::{CommandError, database_url};

/// Run storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails, or
/// a migration fails to apply.
pub async fn storefront() -> Result<(), CommandError> {
    let database_url = database_url()?;

    info!("Connecting to storefront database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    info!("Storefront migrations complete!");
    Ok(())
}
