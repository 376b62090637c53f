//! Seed the catalog from a YAML file.
//!
//! The file is parsed and validated before connecting to the database. See
//! `techshop_storefront::seed` for the format.

use std::path::Path;

use tracing::{error, info};

use techshop_storefront::db;
use techshop_storefront::seed::{CatalogSeed, seed_catalog, validate_seed};

use super::{CommandError, database_url};

/// Seed categories and products from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, validation fails,
/// or database operations fail.
pub async fn catalog(path: &Path) -> Result<(), CommandError> {
    info!(path = %path.display(), "Loading catalog from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Io {
            path: path.display().to_string(),
            source,
        })?;
    let seed: CatalogSeed = serde_yaml::from_str(&content)?;

    info!(
        categories = seed.categories.len(),
        notebooks = seed.notebooks.len(),
        smartphones = seed.smartphones.len(),
        "Parsed catalog"
    );

    let errors = validate_seed(&seed);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(CommandError::Validation(errors.len()));
    }

    let pool = db::create_pool(&database_url()?).await?;
    info!("Connected to database");

    let report = seed_catalog(&pool, &seed).await?;

    info!("Seeding complete!");
    info!("  Categories created: {}", report.categories_created);
    info!("  Products inserted: {}", report.products_inserted);
    info!("  Products skipped (already exist): {}", report.products_skipped);

    Ok(())
}
