//! Catalog domain types: categories and products.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use techshop_core::{CategoryId, Price, ProductId, ProductKind};

/// Largest product price in cents; `shop.product.price` is `NUMERIC(10, 2)`.
pub const MAX_PRODUCT_PRICE_CENTS: i64 = 9_999_999_999;

/// A product category (e.g. "Notebooks").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

impl Category {
    /// URL of the category detail page.
    #[must_use]
    pub fn url(&self) -> String {
        format!("/category/{}/", self.slug)
    }
}

/// A category with the number of products in it (navigation menu entry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryWithCount {
    pub category: Category,
    pub product_count: i64,
}

/// The fields of a product shown in listings and cart lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    pub id: ProductId,
    pub kind: ProductKind,
    pub category_id: CategoryId,
    pub title: String,
    pub slug: String,
    /// Image path or URL (may be empty)
    pub image: String,
    pub price: Price,
    pub created_at: DateTime<Utc>,
}

impl ProductSummary {
    /// URL of the product detail page.
    #[must_use]
    pub fn url(&self) -> String {
        format!("/products/{}/{}/", self.kind, self.slug)
    }

    /// URL that adds one unit of this product to the cart.
    #[must_use]
    pub fn add_to_cart_url(&self) -> String {
        format!("/add-to-cart/{}/{}/", self.kind, self.slug)
    }

    /// URL that removes this product's line from the cart.
    #[must_use]
    pub fn remove_from_cart_url(&self) -> String {
        format!("/remove-from-cart/{}/{}/", self.kind, self.slug)
    }

    /// URL the quantity form posts to.
    #[must_use]
    pub fn change_qty_url(&self) -> String {
        format!("/change-qty/{}/{}/", self.kind, self.slug)
    }
}

/// A product with its description and technical specifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub summary: ProductSummary,
    pub description: Option<String>,
    pub specs: ProductSpecs,
}

/// A product to be inserted into the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub category_id: CategoryId,
    pub title: String,
    pub slug: String,
    pub image: String,
    pub description: Option<String>,
    pub price: Price,
    pub specs: ProductSpecs,
}

impl NewProduct {
    /// The product kind, derived from its specifications.
    #[must_use]
    pub const fn kind(&self) -> ProductKind {
        self.specs.kind()
    }
}

/// Kind-specific technical specifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductSpecs {
    Notebook(NotebookSpecs),
    Smartphone(SmartphoneSpecs),
}

impl ProductSpecs {
    /// The product kind these specifications belong to.
    #[must_use]
    pub const fn kind(&self) -> ProductKind {
        match self {
            Self::Notebook(_) => ProductKind::Notebook,
            Self::Smartphone(_) => ProductKind::Smartphone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NotebookSpecs {
    pub diagonal: String,
    pub display_type: String,
    pub processor_freq: String,
    pub ram: String,
    pub video: String,
    pub time_without_charge: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SmartphoneSpecs {
    pub diagonal: String,
    pub display_type: String,
    pub resolution: String,
    pub accum_volume: String,
    pub ram: String,
    /// Whether the phone has an SD card slot.
    pub sd: bool,
    /// Maximum supported SD card capacity (only meaningful with an SD slot).
    #[serde(default)]
    pub sd_volume_max: Option<String>,
    pub main_cam_mp: String,
    pub frontal_cam_mp: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Product fixtures shared by unit tests.

    use chrono::TimeZone;

    use super::*;

    pub(crate) fn summary(id: i32, kind: ProductKind, slug: &str, cents: i64) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(id),
            kind,
            category_id: CategoryId::new(1),
            title: slug.replace('-', " "),
            slug: slug.to_owned(),
            image: String::new(),
            price: Price::from_cents(cents),
            created_at: Utc
                .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
                .single()
                .unwrap_or_default()
                + chrono::Duration::minutes(i64::from(id)),
        }
    }

    pub(crate) fn smartphone_specs(sd: bool) -> SmartphoneSpecs {
        SmartphoneSpecs {
            diagonal: "6.1\"".to_owned(),
            display_type: "OLED".to_owned(),
            resolution: "2532x1170".to_owned(),
            accum_volume: "3240 mAh".to_owned(),
            ram: "6 GB".to_owned(),
            sd,
            sd_volume_max: sd.then(|| "512 GB".to_owned()),
            main_cam_mp: "48 MP".to_owned(),
            frontal_cam_mp: "12 MP".to_owned(),
        }
    }

    pub(crate) fn notebook_specs() -> NotebookSpecs {
        NotebookSpecs {
            diagonal: "15.6\"".to_owned(),
            display_type: "IPS".to_owned(),
            processor_freq: "3.4 GHz".to_owned(),
            ram: "16 GB".to_owned(),
            video: "GeForce RTX 4060".to_owned(),
            time_without_charge: "8 h".to_owned(),
        }
    }
}
