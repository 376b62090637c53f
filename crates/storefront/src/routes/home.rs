//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use techshop_core::ProductKind;

use super::PageContext;
use crate::db::CatalogRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::{CurrentCart, Flashes};
use crate::models::ProductSummary;
use crate::state::AppState;

/// Kind listed first among the latest products.
const FEATURED_KIND: ProductKind = ProductKind::Smartphone;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    /// Newest products of every kind, smartphones first.
    pub products: Vec<ProductSummary>,
}

/// Display the home page.
#[instrument(skip_all)]
pub async fn home(
    State(state): State<AppState>,
    current: CurrentCart,
    flashes: Flashes,
) -> Result<HomeTemplate> {
    let products = CatalogRepository::new(state.pool())
        .latest_products(
            state.config().latest_products_per_kind,
            Some(FEATURED_KIND),
        )
        .await?;

    Ok(HomeTemplate {
        page: PageContext::load(&state, current, flashes).await?,
        products,
    })
}
