//! HTTP route definitions.
//!
//! ## Surface
//! ```text
//! GET  /health                       liveness + db health
//! POST /api/pricing/resolve          quantity-discount resolution
//! POST /api/bookings                 create draft booking
//! GET  /api/bookings                 list bookings
//! GET  /api/bookings/{id}            booking with line items
//! POST /api/bookings/{id}/submit     submit (invoice + email side effects)
//! POST /api/bookings/{id}/cancel     cancel
//! ```

pub mod bookings;
pub mod health;
pub mod pricing;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/pricing/resolve", post(pricing::resolve))
        .route("/api/bookings", post(bookings::create).get(bookings::list))
        .route("/api/bookings/{id}", get(bookings::get))
        .route("/api/bookings/{id}/submit", post(bookings::submit))
        .route("/api/bookings/{id}/cancel", post(bookings::cancel))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
