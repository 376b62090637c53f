//! Cart route handlers.
//!
//! Mutations run through [`CartRepository::update`], queue a flash message
//! and redirect back to the cart page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{PageContext, find_product};
use crate::db::{CartOperationError, CartRepository};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{CurrentCart, Flashes, push_flash};
use crate::models::cart::MAX_LINE_QTY;
use crate::models::{CartError, FlashMessage};
use crate::state::AppState;

/// Where every cart mutation redirects to.
const CART_URL: &str = "/cart/";

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub max_qty: u32,
}

/// Change quantity form data.
#[derive(Debug, Deserialize)]
pub struct ChangeQtyForm {
    #[serde(default)]
    pub qty: String,
}

/// Parse a submitted quantity. Only whole numbers in `1..=MAX_LINE_QTY` pass.
fn parse_qty(raw: &str) -> Option<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|qty| (1..=MAX_LINE_QTY).contains(qty))
}

fn invalid_qty_message() -> String {
    format!("Quantity must be a whole number between 1 and {MAX_LINE_QTY}")
}

/// Flash the outcome of a cart mutation and redirect to the cart.
///
/// Rejections other than a missing line become error flashes; a missing line
/// and database failures are returned as errors.
async fn finish(
    session: &Session,
    result: std::result::Result<(), CartOperationError>,
    success: &str,
) -> Result<Redirect> {
    match result {
        Ok(()) => push_flash(session, FlashMessage::info(success)).await?,
        Err(CartOperationError::Cart(err @ CartError::LineNotFound(_))) => return Err(err.into()),
        Err(CartOperationError::Cart(CartError::InvalidQuantity(_))) => {
            push_flash(session, FlashMessage::error(invalid_qty_message())).await?;
        }
        Err(CartOperationError::Cart(err)) => {
            push_flash(session, FlashMessage::error(err.to_string())).await?;
        }
        Err(err) => return Err(err.into()),
    }
    Ok(Redirect::to(CART_URL))
}

/// Display the cart page.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    current: CurrentCart,
    flashes: Flashes,
) -> Result<CartShowTemplate> {
    Ok(CartShowTemplate {
        page: PageContext::load(&state, current, flashes).await?,
        max_qty: MAX_LINE_QTY,
    })
}

/// Add one unit of a product to the cart.
#[instrument(skip_all, fields(kind = %kind, slug = %slug))]
pub async fn add(
    State(state): State<AppState>,
    Path((kind, slug)): Path<(String, String)>,
    current: CurrentCart,
    session: Session,
) -> Result<Redirect> {
    let product = find_product(&state, &kind, &slug).await?;
    add_breadcrumb(
        "cart",
        "Add to cart",
        Some(&[("kind", kind.as_str()), ("slug", slug.as_str())]),
    );

    let result = CartRepository::new(state.pool())
        .update(current.cart.id, |cart| cart.add_product(product))
        .await
        .map(|_| ());

    finish(&session, result, "Product added to cart").await
}

/// Remove a product's line from the cart.
#[instrument(skip_all, fields(kind = %kind, slug = %slug))]
pub async fn remove(
    State(state): State<AppState>,
    Path((kind, slug)): Path<(String, String)>,
    current: CurrentCart,
    session: Session,
) -> Result<Redirect> {
    let product = find_product(&state, &kind, &slug).await?;
    add_breadcrumb(
        "cart",
        "Remove from cart",
        Some(&[("kind", kind.as_str()), ("slug", slug.as_str())]),
    );

    let result = CartRepository::new(state.pool())
        .update(current.cart.id, |cart| cart.remove_product(&product))
        .await
        .map(|_| ());

    finish(&session, result, "Product removed from cart").await
}

/// Set the quantity of a cart line.
#[instrument(skip_all, fields(kind = %kind, slug = %slug, qty = %form.qty))]
pub async fn change_qty(
    State(state): State<AppState>,
    Path((kind, slug)): Path<(String, String)>,
    current: CurrentCart,
    session: Session,
    Form(form): Form<ChangeQtyForm>,
) -> Result<Redirect> {
    let product = find_product(&state, &kind, &slug).await?;

    let Some(qty) = parse_qty(&form.qty) else {
        push_flash(&session, FlashMessage::error(invalid_qty_message())).await?;
        return Ok(Redirect::to(CART_URL));
    };

    let result = CartRepository::new(state.pool())
        .update(current.cart.id, |cart| cart.set_quantity(&product, qty))
        .await
        .map(|_| ());

    finish(&session, result, "Quantity updated").await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qty_accepts_range() {
        assert_eq!(parse_qty("1"), Some(1));
        assert_eq!(parse_qty(" 12 "), Some(12));
        assert_eq!(parse_qty("999"), Some(MAX_LINE_QTY));
    }

    #[test]
    fn test_parse_qty_rejects_invalid() {
        assert_eq!(parse_qty(""), None);
        assert_eq!(parse_qty("0"), None);
        assert_eq!(parse_qty("-3"), None);
        assert_eq!(parse_qty("2.5"), None);
        assert_eq!(parse_qty("many"), None);
        assert_eq!(parse_qty("1000"), None);
    }

    #[test]
    fn test_invalid_qty_message_names_limit() {
        assert!(invalid_qty_message().contains("999"));
    }
}
