//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Cart (JSON)
//! GET  /cart                   - Cart contents and total quantity
//! POST /cart/add               - Add one unit   { "product_id": 1 }
//! POST /cart/update            - Set quantity   { "product_id": 1, "amount": 3 }
//! POST /cart/remove            - Remove line    { "product_id": 1 }
//! GET  /cart/count             - Total quantity
//! ```
//!
//! Rejections answer `409` (stock) or `404` (not in cart / unknown product),
//! inventory failures `502`, storage failures `500`.

pub mod cart;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/cart", cart_routes())
}

/// Build the application router with state and request tracing.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
