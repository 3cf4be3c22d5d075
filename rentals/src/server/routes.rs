//! Router configuration for the rentals service.

use super::state::AppState;
use crate::api::{properties, reservations};
use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use staybook_web::{correlation_id_layer, handlers::health_check, handlers::readiness};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// ```text
/// GET  /health                              liveness
/// GET  /ready                               store health
/// POST /api/properties                      owner lists a property
/// GET  /api/properties/:id                  property page
/// POST /api/properties/:id/reservations     guest requests a stay
/// GET  /api/reservations/:id                reservation card
/// POST /api/reservations/:id/accept         owner accepts
/// POST /api/reservations/:id/cancel         owner cancels
/// GET  /api/owner/properties                owner's listings
/// GET  /api/owner/reservations              owner's reservations
/// GET  /api/guest/reservations              guest's reservations
/// ```
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/properties", post(properties::create_property))
        .route("/properties/:id", get(properties::get_property))
        .route(
            "/properties/:id/reservations",
            post(reservations::create_reservation),
        )
        .route("/reservations/:id", get(reservations::get_reservation))
        .route(
            "/reservations/:id/accept",
            post(reservations::accept_reservation),
        )
        .route(
            "/reservations/:id/cancel",
            post(reservations::cancel_reservation),
        )
        .route("/owner/properties", get(properties::list_owner_properties))
        .route(
            "/owner/reservations",
            get(reservations::list_owner_reservations),
        )
        .route(
            "/guest/reservations",
            get(reservations::list_guest_reservations),
        );

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/ready",
            get(|State(state): State<AppState>| async move { readiness(state.service.health()) }),
        )
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .with_state(state)
}
