//! HTTP middleware stack and request extractors for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing, `request_id` span field)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! # Extractors
//!
//! - [`CurrentCart`] - the session's guest customer and open cart
//! - [`Flashes`] - pending flash messages, drained on extraction

pub mod cart;
pub mod flash;
pub mod request_id;
pub mod session;

pub use cart::CurrentCart;
pub use flash::{Flashes, push_flash};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use session::create_session_layer;
