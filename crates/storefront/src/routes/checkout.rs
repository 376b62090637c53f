//! Checkout route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use chrono::Utc;
use tower_sessions::Session;
use tracing::instrument;

use super::PageContext;
use crate::db::{CartOperationError, OrderRepository};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{CurrentCart, Flashes, push_flash};
use crate::models::{FlashMessage, OrderForm};
use crate::state::AppState;

const ORDER_PLACED_MESSAGE: &str = "Thank you for your order! A manager will contact you.";

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    /// Earliest selectable order date, `YYYY-MM-DD`.
    pub today: String,
}

/// Display the order form.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    current: CurrentCart,
    flashes: Flashes,
) -> Result<CheckoutTemplate> {
    Ok(CheckoutTemplate {
        page: PageContext::load(&state, current, flashes).await?,
        today: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
    })
}

/// Validate the order form and place the order for the current cart.
///
/// Invalid input goes back to the form and cart rejections go back to the
/// cart, both with an error flash.
#[instrument(skip_all, fields(customer_id = %current.customer_id, cart_id = %current.cart.id))]
pub async fn make_order(
    State(state): State<AppState>,
    current: CurrentCart,
    session: Session,
    Form(form): Form<OrderForm>,
) -> Result<Redirect> {
    let new_order = match form.validate(Utc::now().date_naive()) {
        Ok(order) => order,
        Err(e) => {
            tracing::debug!(error = %e, "Order form rejected");
            push_flash(&session, FlashMessage::error(e.to_string())).await?;
            return Ok(Redirect::to("/checkout/"));
        }
    };

    match OrderRepository::new(state.pool())
        .place_order(current.cart.id, &new_order)
        .await
    {
        Ok(order) => {
            let order_id = order.id.to_string();
            add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order_id.as_str())]));
            push_flash(&session, FlashMessage::info(ORDER_PLACED_MESSAGE)).await?;
            Ok(Redirect::to("/"))
        }
        Err(CartOperationError::Cart(e)) => {
            push_flash(&session, FlashMessage::error(e.to_string())).await?;
            Ok(Redirect::to("/cart/"))
        }
        Err(e) => Err(e.into()),
    }
}
