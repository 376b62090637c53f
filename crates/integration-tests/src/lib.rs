//! Integration tests for Techshop.
//!
//! # Running Tests
//!
//! ```bash
//! # Repository tests: sqlx creates a throwaway database per test
//! DATABASE_URL=postgres://localhost/techshop cargo test -p techshop-integration-tests -- --ignored
//!
//! # HTTP tests: need a migrated, seeded storefront on STOREFRONT_BASE_URL
//! shop-cli migrate && shop-cli seed catalog crates/cli/data/catalog.yaml
//! cargo run -p techshop-storefront
//! ```
//!
//! # Test Categories
//!
//! - `repositories` - catalog, cart and order repositories against `PostgreSQL`
//! - `storefront_http` - page flows through a running server

use chrono::{Days, NaiveDate, Utc};
use sqlx::PgPool;

use techshop_core::{BuyingType, PhoneNumber, ProductKind};
use techshop_storefront::db::CatalogRepository;
use techshop_storefront::models::{NewOrder, ProductSummary};
use techshop_storefront::seed::{CatalogSeed, SeedReport, seed_catalog, validate_seed};

/// The demo catalog shipped with the CLI.
pub const DEMO_CATALOG: &str = include_str!("../../cli/data/catalog.yaml");

/// Base URL of a running storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Parse the demo catalog.
///
/// # Panics
///
/// Panics if the bundled file is not valid.
#[must_use]
pub fn demo_catalog() -> CatalogSeed {
    let seed: CatalogSeed = serde_yaml::from_str(DEMO_CATALOG).expect("demo catalog parses");
    assert!(validate_seed(&seed).is_empty(), "demo catalog is valid");
    seed
}

/// Seed the demo catalog into `pool`.
///
/// # Panics
///
/// Panics if seeding fails.
pub async fn seed_demo_catalog(pool: &PgPool) -> SeedReport {
    seed_catalog(pool, &demo_catalog())
        .await
        .expect("Failed to seed demo catalog")
}

/// Look up a seeded product.
///
/// # Panics
///
/// Panics if the product does not exist.
pub async fn product(pool: &PgPool, kind: ProductKind, slug: &str) -> ProductSummary {
    CatalogRepository::new(pool)
        .product_summary_by_kind_slug(kind, slug)
        .await
        .expect("Failed to load product")
        .unwrap_or_else(|| panic!("{kind} {slug} is not seeded"))
}

/// Tomorrow in UTC, always a valid order date.
///
/// # Panics
///
/// Panics at the end of the calendar.
#[must_use]
pub fn tomorrow() -> NaiveDate {
    Utc::now()
        .date_naive()
        .checked_add_days(Days::new(1))
        .expect("tomorrow exists")
}

/// A valid pickup order.
///
/// # Panics
///
/// Panics if the fixed phone number stops parsing.
#[must_use]
pub fn pickup_order() -> NewOrder {
    NewOrder {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        phone: PhoneNumber::parse("+1 (555) 010-2030").expect("valid phone"),
        address: None,
        buying_type: BuyingType::SelfPickup,
        comment: Some("Call before noon".to_string()),
        order_date: tomorrow(),
    }
}
