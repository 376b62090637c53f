//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                 - Home page (latest products)
//! GET  /health                           - Liveness check
//! GET  /health/ready                     - Readiness check (database)
//!
//! # Catalog
//! GET  /products/{kind}/{slug}/          - Product detail
//! GET  /category/{slug}/                 - Category detail
//!
//! # Cart (redirect to /cart/ with a flash message)
//! GET  /cart/                            - Cart page
//! GET  /add-to-cart/{kind}/{slug}/       - Add one unit
//! GET  /remove-from-cart/{kind}/{slug}/  - Remove the line
//! POST /change-qty/{kind}/{slug}/        - Set the line quantity
//!
//! # Checkout
//! GET  /checkout/                        - Order form
//! POST /make-order/                      - Place the order
//!
//! GET  /static/*                         - Static assets
//! ```

pub mod cart;
pub mod categories;
pub mod checkout;
pub mod health;
pub mod home;
pub mod products;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::{
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use techshop_core::ProductKind;

use crate::db::CatalogRepository;
use crate::error::{AppError, Result};
use crate::middleware::{CurrentCart, Flashes, create_session_layer, request_id_middleware};
use crate::models::{Cart, CategoryWithCount, FlashMessage, ProductSummary};
use crate::state::AppState;

/// Directory static assets are served from, relative to the working directory.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Data every page needs: the navigation menu, the cart badge and pending
/// flash messages.
pub struct PageContext {
    pub categories: Vec<CategoryWithCount>,
    pub cart: Cart,
    pub messages: Vec<FlashMessage>,
}

impl PageContext {
    /// Load the navigation categories and combine them with the cart and
    /// drained flash messages.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the categories cannot be loaded.
    pub async fn load(
        state: &AppState,
        current: CurrentCart,
        Flashes(messages): Flashes,
    ) -> Result<Self> {
        let categories = CatalogRepository::new(state.pool())
            .categories_with_counts()
            .await?;

        Ok(Self {
            categories,
            cart: current.cart,
            messages,
        })
    }
}

/// Parse the `{kind}` path segment. Unknown kinds are not found.
pub(crate) fn parse_kind(raw: &str) -> Result<ProductKind> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("product kind {raw}")))
}

/// Look up a product by its `{kind}/{slug}` path, or 404.
pub(crate) async fn find_product(
    state: &AppState,
    kind: &str,
    slug: &str,
) -> Result<ProductSummary> {
    let kind = parse_kind(kind)?;
    CatalogRepository::new(state.pool())
        .product_summary_by_kind_slug(kind, slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{kind} {slug}")))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/products/{kind}/{slug}/", get(products::show))
        .route("/category/{slug}/", get(categories::show))
        .route("/cart/", get(cart::show))
        .route("/add-to-cart/{kind}/{slug}/", get(cart::add))
        .route("/remove-from-cart/{kind}/{slug}/", get(cart::remove))
        .route("/change-qty/{kind}/{slug}/", post(cart::change_qty))
        .route("/checkout/", get(checkout::show))
        .route("/make-order/", post(checkout::make_order))
}

/// Build the full application: pages, health checks, static files and the
/// middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.pool(), state.config());

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::tests::test_config;

    /// An app whose pool never connects unless a handler touches the database.
    fn lazy_app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/techshop_test")
            .unwrap();
        app(AppState::new(test_config(), pool))
    }

    #[tokio::test]
    async fn test_health_ok() {
        let response = lazy_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = lazy_app()
            .oneshot(
                Request::get("/health")
                    .header("x-request-id", "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-42");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let response = lazy_app()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("notebook").unwrap(), ProductKind::Notebook);
        assert!(matches!(parse_kind("tablet"), Err(AppError::NotFound(_))));
    }
}
