//! Product detail route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use super::{PageContext, parse_kind};
use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CurrentCart, Flashes};
use crate::models::Product;
use crate::specs::render_spec_table;
use crate::state::AppState;

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: Product,
    /// Pre-rendered, escaped specification table.
    pub spec_table: String,
}

/// Display a product by kind and slug.
#[instrument(skip_all, fields(kind = %kind, slug = %slug))]
pub async fn show(
    State(state): State<AppState>,
    Path((kind, slug)): Path<(String, String)>,
    current: CurrentCart,
    flashes: Flashes,
) -> Result<ProductShowTemplate> {
    let kind = parse_kind(&kind)?;
    let product = CatalogRepository::new(state.pool())
        .product_by_kind_slug(kind, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{kind} {slug}")))?;

    let spec_table = render_spec_table(&product.specs)?;

    Ok(ProductShowTemplate {
        page: PageContext::load(&state, current, flashes).await?,
        product,
        spec_table,
    })
}
