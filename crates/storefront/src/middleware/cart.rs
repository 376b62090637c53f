//! Current cart extractor.
//!
//! Resolves the session's guest customer and that customer's open cart,
//! creating either one when it is missing. Every storefront page shows the
//! cart, so every handler extracts it.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use techshop_core::CustomerId;

use crate::db::{CartRepository, CustomerRepository, RepositoryError};
use crate::error::{AppError, set_sentry_customer};
use crate::models::{Cart, session_keys};
use crate::state::AppState;

/// The session's customer and open cart.
#[derive(Debug, Clone)]
pub struct CurrentCart {
    pub customer_id: CustomerId,
    pub cart: Cart,
}

impl FromRequestParts<AppState> for CurrentCart {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer is not installed".to_owned()))?;

        let carts = CartRepository::new(state.pool());

        if let Some(customer_id) = session
            .get::<CustomerId>(session_keys::CUSTOMER_ID)
            .await?
        {
            match carts.open_cart(customer_id).await {
                Ok(cart) => {
                    set_sentry_customer(customer_id);
                    return Ok(Self { customer_id, cart });
                }
                Err(RepositoryError::NotFound) => {
                    tracing::warn!(
                        customer_id = %customer_id,
                        "Session customer no longer exists, starting a new guest"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        let customer_id = CustomerRepository::new(state.pool()).create_guest().await?;
        session
            .insert(session_keys::CUSTOMER_ID, customer_id)
            .await?;
        let cart = carts.open_cart(customer_id).await?;

        set_sentry_customer(customer_id);
        Ok(Self { customer_id, cart })
    }
}
