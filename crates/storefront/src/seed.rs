//! Seed the catalog from a declarative description.
//!
//! ## YAML Format
//!
//! ```yaml
//! categories:
//!   - name: Notebooks
//!     slug: notebooks
//!
//! notebooks:
//!   - category: notebooks
//!     title: Aero 14
//!     slug: aero-14
//!     image: /static/img/aero-14.png
//!     price: "1299.00"
//!     diagonal: 14"
//!     display_type: IPS
//!     processor_freq: 3.2 GHz
//!     ram: 16 GB
//!     video: Integrated
//!     time_without_charge: 10 h
//!
//! smartphones:
//!   - category: smartphones
//!     title: Pixel Nine
//!     slug: pixel-nine
//!     price: "799.00"
//!     diagonal: 6.3"
//!     display_type: OLED
//!     resolution: 2424x1080
//!     accum_volume: 4700 mAh
//!     ram: 12 GB
//!     sd: false
//!     main_cam_mp: 50 MP
//!     frontal_cam_mp: 10.5 MP
//! ```
//!
//! Parsing is left to the caller (the CLI reads YAML); this module validates
//! and inserts. Existing categories are reused and existing products (same
//! kind and slug) are skipped, so seeding is idempotent.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

use techshop_core::{CategoryId, Price, ProductKind};

use crate::db::RepositoryError;
use crate::db::catalog::{insert_product, product_exists, upsert_category};
use crate::models::catalog::MAX_PRODUCT_PRICE_CENTS;
use crate::models::{NewProduct, NotebookSpecs, ProductSpecs, SmartphoneSpecs};

/// Full catalog seed file.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub categories: Vec<CategorySeed>,
    #[serde(default)]
    pub notebooks: Vec<ProductSeed<NotebookSpecs>>,
    #[serde(default)]
    pub smartphones: Vec<ProductSeed<SmartphoneSpecs>>,
}

#[derive(Debug, Deserialize)]
pub struct CategorySeed {
    pub name: String,
    pub slug: String,
}

/// One product with its kind-specific specifications inlined.
#[derive(Debug, Deserialize)]
pub struct ProductSeed<S> {
    /// Slug of a category declared in the same file.
    pub category: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(flatten)]
    pub specs: S,
}

/// Outcome of a seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    /// Categories that did not exist before.
    pub categories_created: usize,
    pub products_inserted: usize,
    /// Products skipped because their kind and slug already exist.
    pub products_skipped: usize,
}

/// Lowercase ASCII letters, digits and inner hyphens.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Validate a catalog seed before touching the database.
///
/// Returns one message per problem; an empty list means the seed is valid.
#[must_use]
pub fn validate_seed(seed: &CatalogSeed) -> Vec<String> {
    let mut errors = Vec::new();
    let mut category_slugs = HashSet::new();

    for category in &seed.categories {
        if category.name.trim().is_empty() {
            errors.push(format!("Category '{}' has an empty name", category.slug));
        }
        if !is_valid_slug(&category.slug) {
            errors.push(format!("Invalid category slug: '{}'", category.slug));
        }
        if !category_slugs.insert(category.slug.as_str()) {
            errors.push(format!("Duplicate category slug: '{}'", category.slug));
        }
    }

    let mut check_product = |kind: ProductKind,
                             seen: &mut HashSet<String>,
                             category: &str,
                             title: &str,
                             slug: &str,
                             price: Decimal| {
        if !category_slugs.contains(category) {
            errors.push(format!("{kind} '{slug}' references unknown category '{category}'"));
        }
        if title.trim().is_empty() {
            errors.push(format!("{kind} '{slug}' has an empty title"));
        }
        if !is_valid_slug(slug) {
            errors.push(format!("Invalid {kind} slug: '{slug}'"));
        }
        if !seen.insert(slug.to_owned()) {
            errors.push(format!("Duplicate {kind} slug: '{slug}'"));
        }
        if price.is_sign_negative() {
            errors.push(format!("{kind} '{slug}' has a negative price"));
        }
        if price.scale() > 2 {
            errors.push(format!("{kind} '{slug}' price has more than 2 decimal places"));
        }
        if price > Decimal::new(MAX_PRODUCT_PRICE_CENTS, 2) {
            errors.push(format!(
                "{kind} '{slug}' price is above {}",
                Price::from_cents(MAX_PRODUCT_PRICE_CENTS)
            ));
        }
    };

    let mut seen = HashSet::new();
    for product in &seed.notebooks {
        check_product(
            ProductKind::Notebook,
            &mut seen,
            &product.category,
            &product.title,
            &product.slug,
            product.price,
        );
    }

    let mut seen = HashSet::new();
    for product in &seed.smartphones {
        check_product(
            ProductKind::Smartphone,
            &mut seen,
            &product.category,
            &product.title,
            &product.slug,
            product.price,
        );
    }

    for phone in &seed.smartphones {
        if !phone.specs.sd && phone.specs.sd_volume_max.is_some() {
            errors.push(format!(
                "smartphone '{}' has an SD capacity but no SD slot",
                phone.slug
            ));
        }
    }

    errors
}

impl<S> ProductSeed<S> {
    fn to_new_product(
        &self,
        category_id: CategoryId,
        specs: impl FnOnce(&S) -> ProductSpecs,
    ) -> NewProduct {
        NewProduct {
            category_id,
            title: self.title.trim().to_owned(),
            slug: self.slug.clone(),
            image: self.image.clone(),
            description: self
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_owned),
            price: Price::new(self.price),
            specs: specs(&self.specs),
        }
    }
}

/// Insert a validated catalog seed in one transaction.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if a product references a category not
/// declared in the seed, or a database error. Nothing is written on error.
#[instrument(skip(pool, seed), fields(
    categories = seed.categories.len(),
    notebooks = seed.notebooks.len(),
    smartphones = seed.smartphones.len(),
))]
pub async fn seed_catalog(pool: &PgPool, seed: &CatalogSeed) -> Result<SeedReport, RepositoryError> {
    let mut tx = pool.begin().await?;
    let mut report = SeedReport::default();
    let mut category_ids: HashMap<&str, CategoryId> = HashMap::new();

    for category in &seed.categories {
        let (id, inserted) = upsert_category(&mut tx, category.name.trim(), &category.slug).await?;
        if inserted {
            report.categories_created += 1;
        }
        category_ids.insert(category.slug.as_str(), id);
    }

    let mut products = Vec::with_capacity(seed.notebooks.len() + seed.smartphones.len());
    for notebook in &seed.notebooks {
        let category_id = *category_ids
            .get(notebook.category.as_str())
            .ok_or(RepositoryError::NotFound)?;
        products.push(notebook.to_new_product(category_id, |s| ProductSpecs::Notebook(s.clone())));
    }
    for phone in &seed.smartphones {
        let category_id = *category_ids
            .get(phone.category.as_str())
            .ok_or(RepositoryError::NotFound)?;
        products.push(phone.to_new_product(category_id, |s| ProductSpecs::Smartphone(s.clone())));
    }

    for product in &products {
        if product_exists(&mut tx, product.kind(), &product.slug).await? {
            report.products_skipped += 1;
            debug!(kind = %product.kind(), slug = %product.slug, "Skipping existing product");
        } else {
            insert_product(&mut tx, product).await?;
            report.products_inserted += 1;
            debug!(kind = %product.kind(), slug = %product.slug, "Inserted product");
        }
    }

    tx.commit().await?;

    info!(
        categories_created = report.categories_created,
        products_inserted = report.products_inserted,
        products_skipped = report.products_skipped,
        "Catalog seeded"
    );

    Ok(report)
}
