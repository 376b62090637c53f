//! Catalog repository: categories, products and their specifications.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use techshop_core::{CategoryId, Price, ProductId, ProductKind};

use super::RepositoryError;
use crate::models::{
    Category, CategoryWithCount, NewProduct, NotebookSpecs, Product, ProductSpecs,
    ProductSummary, SmartphoneSpecs,
};

pub(crate) const SUMMARY_COLUMNS: &str =
    "p.id, p.kind, p.category_id, p.title, p.slug, p.image, p.price, p.created_at";

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    slug: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            slug: row.slug,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryCountRow {
    #[sqlx(flatten)]
    category: CategoryRow,
    product_count: i64,
}

#[derive(sqlx::FromRow)]
pub(crate) struct ProductSummaryRow {
    id: ProductId,
    kind: ProductKind,
    category_id: CategoryId,
    title: String,
    slug: String,
    image: String,
    price: Price,
    created_at: DateTime<Utc>,
}

impl From<ProductSummaryRow> for ProductSummary {
    fn from(row: ProductSummaryRow) -> Self {
        Self {
            id: row.id,
            kind: row.kind,
            category_id: row.category_id,
            title: row.title,
            slug: row.slug,
            image: row.image,
            price: row.price,
            created_at: row.created_at,
        }
    }
}

/// A product joined with both spec tables; only the columns of its own
/// kind are populated.
#[derive(sqlx::FromRow)]
struct ProductDetailRow {
    #[sqlx(flatten)]
    summary: ProductSummaryRow,
    description: Option<String>,
    nb_diagonal: Option<String>,
    nb_display_type: Option<String>,
    nb_processor_freq: Option<String>,
    nb_ram: Option<String>,
    nb_video: Option<String>,
    nb_time_without_charge: Option<String>,
    sp_diagonal: Option<String>,
    sp_display_type: Option<String>,
    sp_resolution: Option<String>,
    sp_accum_volume: Option<String>,
    sp_ram: Option<String>,
    sp_sd: Option<bool>,
    sp_sd_volume_max: Option<String>,
    sp_main_cam_mp: Option<String>,
    sp_frontal_cam_mp: Option<String>,
}

impl TryFrom<ProductDetailRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductDetailRow) -> Result<Self, Self::Error> {
        let summary = ProductSummary::from(row.summary);
        let missing = || {
            RepositoryError::DataCorruption(format!(
                "{} {} has no specification row",
                summary.kind, summary.slug
            ))
        };

        let specs = match summary.kind {
            ProductKind::Notebook => ProductSpecs::Notebook(NotebookSpecs {
                diagonal: row.nb_diagonal.ok_or_else(missing)?,
                display_type: row.nb_display_type.ok_or_else(missing)?,
                processor_freq: row.nb_processor_freq.ok_or_else(missing)?,
                ram: row.nb_ram.ok_or_else(missing)?,
                video: row.nb_video.ok_or_else(missing)?,
                time_without_charge: row.nb_time_without_charge.ok_or_else(missing)?,
            }),
            ProductKind::Smartphone => ProductSpecs::Smartphone(SmartphoneSpecs {
                diagonal: row.sp_diagonal.ok_or_else(missing)?,
                display_type: row.sp_display_type.ok_or_else(missing)?,
                resolution: row.sp_resolution.ok_or_else(missing)?,
                accum_volume: row.sp_accum_volume.ok_or_else(missing)?,
                ram: row.sp_ram.ok_or_else(missing)?,
                sd: row.sp_sd.ok_or_else(missing)?,
                sd_volume_max: row.sp_sd_volume_max,
                main_cam_mp: row.sp_main_cam_mp.ok_or_else(missing)?,
                frontal_cam_mp: row.sp_frontal_cam_mp.ok_or_else(missing)?,
            }),
        };

        Ok(Self {
            summary,
            description: row.description,
            specs,
        })
    }
}

/// Order latest products: `first` kind before the others, then newest first.
///
/// Ties on `created_at` are broken by the higher ID.
#[must_use]
pub fn order_latest(
    mut products: Vec<ProductSummary>,
    first: Option<ProductKind>,
) -> Vec<ProductSummary> {
    products.sort_by_key(|p| {
        (
            first.is_some_and(|kind| p.kind != kind),
            Reverse(p.created_at),
            Reverse(p.id.as_i32()),
        )
    });
    products
}

/// Repository for catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories with the number of products in each, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn categories_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryCountRow>(
            r"
            SELECT c.id, c.name, c.slug, COUNT(p.id) AS product_count
            FROM shop.category c
            LEFT JOIN shop.product p ON p.category_id = c.id
            GROUP BY c.id, c.name, c.slug
            ORDER BY c.name
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CategoryWithCount {
                category: r.category.into(),
                product_count: r.product_count,
            })
            .collect())
    }

    /// Get a category by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, slug FROM shop.category WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    /// Products in a category, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn products_in_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductSummaryRow>(&format!(
            r"
            SELECT {SUMMARY_COLUMNS}
            FROM shop.product p
            WHERE p.category_id = $1
            ORDER BY p.created_at DESC, p.id DESC
            "
        ))
        .bind(category_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductSummary::from).collect())
    }

    /// The newest `limit` products of each kind, with `first` kind listed
    /// before the others.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    #[instrument(skip(self))]
    pub async fn latest_products(
        &self,
        limit: u32,
        first: Option<ProductKind>,
    ) -> Result<Vec<ProductSummary>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {SUMMARY_COLUMNS}
            FROM shop.product p
            WHERE p.kind = $1
            ORDER BY p.created_at DESC, p.id DESC
            LIMIT $2
            "
        );

        let mut products = Vec::new();
        for kind in ProductKind::ALL {
            let rows = sqlx::query_as::<_, ProductSummaryRow>(&sql)
                .bind(kind)
                .bind(i64::from(limit))
                .fetch_all(self.pool)
                .await?;
            products.extend(rows.into_iter().map(ProductSummary::from));
        }

        Ok(order_latest(products, first))
    }

    /// Get a product with its specifications by kind and slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the product has no
    /// specification row for its kind.
    #[instrument(skip(self))]
    pub async fn product_by_kind_slug(
        &self,
        kind: ProductKind,
        slug: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductDetailRow>(&format!(
            r"
            SELECT {SUMMARY_COLUMNS}, p.description,
                   n.diagonal AS nb_diagonal, n.display_type AS nb_display_type,
                   n.processor_freq AS nb_processor_freq, n.ram AS nb_ram,
                   n.video AS nb_video, n.time_without_charge AS nb_time_without_charge,
                   s.diagonal AS sp_diagonal, s.display_type AS sp_display_type,
                   s.resolution AS sp_resolution, s.accum_volume AS sp_accum_volume,
                   s.ram AS sp_ram, s.sd AS sp_sd, s.sd_volume_max AS sp_sd_volume_max,
                   s.main_cam_mp AS sp_main_cam_mp, s.frontal_cam_mp AS sp_frontal_cam_mp
            FROM shop.product p
            LEFT JOIN shop.notebook_spec n ON n.product_id = p.id
            LEFT JOIN shop.smartphone_spec s ON s.product_id = p.id
            WHERE p.kind = $1 AND p.slug = $2
            "
        ))
        .bind(kind)
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Get the listing fields of a product by kind and slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn product_summary_by_kind_slug(
        &self,
        kind: ProductKind,
        slug: &str,
    ) -> Result<Option<ProductSummary>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductSummaryRow>(&format!(
            "SELECT {SUMMARY_COLUMNS} FROM shop.product p WHERE p.kind = $1 AND p.slug = $2"
        ))
        .bind(kind)
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ProductSummary::from))
    }
}

// =============================================================================
// Catalog writes (used by the seeding command)
// =============================================================================

/// Insert a category, or return the existing one with the same slug.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn upsert_category(
    conn: &mut PgConnection,
    name: &str,
    slug: &str,
) -> Result<(CategoryId, bool), RepositoryError> {
    let inserted: Option<(CategoryId,)> = sqlx::query_as(
        r"
        INSERT INTO shop.category (name, slug)
        VALUES ($1, $2)
        ON CONFLICT (slug) DO NOTHING
        RETURNING id
        ",
    )
    .bind(name)
    .bind(slug)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some((id,)) = inserted {
        return Ok((id, true));
    }

    let (id,): (CategoryId,) = sqlx::query_as("SELECT id FROM shop.category WHERE slug = $1")
        .bind(slug)
        .fetch_one(&mut *conn)
        .await?;
    Ok((id, false))
}

/// Whether a product with this kind and slug already exists.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn product_exists(
    conn: &mut PgConnection,
    kind: ProductKind,
    slug: &str,
) -> Result<bool, RepositoryError> {
    let (exists,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM shop.product WHERE kind = $1 AND slug = $2)",
    )
    .bind(kind)
    .bind(slug)
    .fetch_one(&mut *conn)
    .await?;
    Ok(exists)
}

/// Insert a product and its specification row.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if a product with the same kind and
/// slug exists, `RepositoryError::Database` for other database errors.
pub async fn insert_product(
    conn: &mut PgConnection,
    product: &NewProduct,
) -> Result<ProductId, RepositoryError> {
    let (id,): (ProductId,) = sqlx::query_as(
        r"
        INSERT INTO shop.product (kind, category_id, title, slug, image, description, price)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        ",
    )
    .bind(product.kind())
    .bind(product.category_id)
    .bind(&product.title)
    .bind(&product.slug)
    .bind(&product.image)
    .bind(product.description.as_deref())
    .bind(product.price)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict(format!(
                "{} {} already exists",
                product.kind(),
                product.slug
            ));
        }
        RepositoryError::Database(e)
    })?;

    match &product.specs {
        ProductSpecs::Notebook(specs) => {
            sqlx::query(
                r"
                INSERT INTO shop.notebook_spec
                    (product_id, diagonal, display_type, processor_freq, ram, video,
                     time_without_charge)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(id)
            .bind(&specs.diagonal)
            .bind(&specs.display_type)
            .bind(&specs.processor_freq)
            .bind(&specs.ram)
            .bind(&specs.video)
            .bind(&specs.time_without_charge)
            .execute(&mut *conn)
            .await?;
        }
        ProductSpecs::Smartphone(specs) => {
            sqlx::query(
                r"
                INSERT INTO shop.smartphone_spec
                    (product_id, diagonal, display_type, resolution, accum_volume, ram, sd,
                     sd_volume_max, main_cam_mp, frontal_cam_mp)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ",
            )
            .bind(id)
            .bind(&specs.diagonal)
            .bind(&specs.display_type)
            .bind(&specs.resolution)
            .bind(&specs.accum_volume)
            .bind(&specs.ram)
            .bind(specs.sd)
            .bind(specs.sd_volume_max.as_deref())
            .bind(&specs.main_cam_mp)
            .bind(&specs.frontal_cam_mp)
            .execute(&mut *conn)
            .await?;
        }
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::fixtures::summary;

    fn slugs(products: &[ProductSummary]) -> Vec<&str> {
        products.iter().map(|p| p.slug.as_str()).collect()
    }

    #[test]
    fn test_order_latest_smartphones_first() {
        let products = vec![
            summary(1, ProductKind::Notebook, "old-notebook", 100_000),
            summary(2, ProductKind::Notebook, "new-notebook", 120_000),
            summary(3, ProductKind::Smartphone, "old-phone", 50_000),
            summary(4, ProductKind::Smartphone, "new-phone", 70_000),
        ];

        let ordered = order_latest(products, Some(ProductKind::Smartphone));
        assert_eq!(
            slugs(&ordered),
            ["new-phone", "old-phone", "new-notebook", "old-notebook"]
        );
    }

    #[test]
    fn test_order_latest_without_preference_is_newest_first() {
        let products = vec![
            summary(1, ProductKind::Smartphone, "phone", 50_000),
            summary(2, ProductKind::Notebook, "notebook", 120_000),
        ];

        let ordered = order_latest(products, None);
        assert_eq!(slugs(&ordered), ["notebook", "phone"]);
    }

    #[test]
    fn test_order_latest_ties_broken_by_id() {
        let a = summary(1, ProductKind::Smartphone, "a", 100);
        let mut b = summary(2, ProductKind::Smartphone, "b", 100);
        b.created_at = a.created_at;

        let ordered = order_latest(vec![a, b], Some(ProductKind::Smartphone));
        assert_eq!(slugs(&ordered), ["b", "a"]);
    }

    #[test]
    fn test_missing_spec_row_is_corruption() {
        let row = ProductDetailRow {
            summary: ProductSummaryRow {
                id: ProductId::new(1),
                kind: ProductKind::Notebook,
                category_id: CategoryId::new(1),
                title: "Broken".to_owned(),
                slug: "broken".to_owned(),
                image: String::new(),
                price: Price::from_cents(100),
                created_at: Utc::now(),
            },
            description: None,
            nb_diagonal: None,
            nb_display_type: None,
            nb_processor_freq: None,
            nb_ram: None,
            nb_video: None,
            nb_time_without_charge: None,
            sp_diagonal: None,
            sp_display_type: None,
            sp_resolution: None,
            sp_accum_volume: None,
            sp_ram: None,
            sp_sd: None,
            sp_sd_volume_max: None,
            sp_main_cam_mp: None,
            sp_frontal_cam_mp: None,
        };

        assert!(matches!(
            Product::try_from(row),
            Err(RepositoryError::DataCorruption(msg)) if msg.contains("notebook broken")
        ));
    }
}
