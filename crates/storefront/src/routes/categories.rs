//! Category detail route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use super::PageContext;
use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CurrentCart, Flashes};
use crate::models::{Category, ProductSummary};
use crate::state::AppState;

/// Category detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub page: PageContext,
    pub category: Category,
    pub products: Vec<ProductSummary>,
}

/// Display a category and its products.
#[instrument(skip_all, fields(slug = %slug))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    current: CurrentCart,
    flashes: Flashes,
) -> Result<CategoryShowTemplate> {
    let catalog = CatalogRepository::new(state.pool());
    let category = catalog
        .category_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {slug}")))?;
    let products = catalog.products_in_category(category.id).await?;

    Ok(CategoryShowTemplate {
        page: PageContext::load(&state, current, flashes).await?,
        category,
        products,
    })
}
