//! Reservation API endpoints.
//!
//! - POST /api/properties/:id/reservations - Request a stay (guest)
//! - GET /api/reservations/:id - Reservation card (property owner or requesting guest)
//! - POST /api/reservations/:id/accept - Accept (property owner)
//! - POST /api/reservations/:id/cancel - Cancel (property owner)
//! - GET /api/owner/reservations - Reservations across the caller's properties
//! - GET /api/guest/reservations - Reservations the caller made

use super::auth::{Authenticated, GuestPrincipal, OwnerPrincipal};
use crate::server::state::AppState;
use crate::service::{Affordances, ReservationRequest};
use crate::types::{Principal, PropertyId, ReservationId};
use crate::views::ReservationView;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;
use staybook_web::AppError;
use uuid::Uuid;

/// Request body for a new reservation.
#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    /// First night (`YYYY-MM-DD`)
    pub start_date: NaiveDate,
    /// Departure day (`YYYY-MM-DD`)
    pub end_date: NaiveDate,
    /// Number of people
    pub guests: u32,
}

/// Request a stay at a property.
///
/// The reservation starts `pending`; the owner is notified in the background.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/properties/<property_id>/reservations \
///   -H "Authorization: Bearer <guest_token>" \
///   -H "Content-Type: application/json" \
///   -d '{"start_date": "2025-01-08", "end_date": "2025-01-15", "guests": 6}'
/// ```
///
/// # Errors
///
/// - 403 for owners
/// - 404 if the property does not exist
/// - 422 for unordered dates or zero guests
pub async fn create_reservation(
    guest: GuestPrincipal,
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ReservationView>), AppError> {
    let reservation = state
        .service
        .create(
            guest.id,
            &guest.email,
            ReservationRequest {
                property_id: PropertyId::from_uuid(property_id),
                start_date: request.start_date,
                end_date: request.end_date,
                guests: request.guests,
            },
        )
        .await?;

    let principal = Principal::Guest {
        id: guest.id,
        email: guest.email,
    };
    let view = ReservationView::new(&reservation, state.service.affordances(&reservation, &principal));
    Ok((StatusCode::CREATED, Json(view)))
}

/// A single reservation card.
///
/// # Errors
///
/// - 404 if it does not exist
/// - 403 unless the caller owns the property or made the request
pub async fn get_reservation(
    Authenticated(principal): Authenticated,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservationView>, AppError> {
    let reservation = state.service.get(ReservationId::from_uuid(id)).await?;

    let visible = principal.owner_id() == Some(reservation.owner_id)
        || principal.guest_id() == Some(reservation.guest_id);
    if !visible {
        return Err(AppError::forbidden("You may not view this reservation"));
    }

    let affordances = state.service.affordances(&reservation, &principal);
    Ok(Json(ReservationView::new(&reservation, affordances)))
}

/// Accept a pending reservation.
///
/// # Errors
///
/// - 403 if the caller does not own the property
/// - 404 if it does not exist
/// - 409 unless it is pending
pub async fn accept_reservation(
    owner: OwnerPrincipal,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservationView>, AppError> {
    let reservation = state
        .service
        .accept(ReservationId::from_uuid(id), owner.id)
        .await?;

    let affordances = state.service.affordances(&reservation, &owner.principal());
    Ok(Json(ReservationView::new(&reservation, affordances)))
}

/// Cancel a pending or accepted reservation.
///
/// # Errors
///
/// - 403 if the caller does not own the property, or from the start date on
/// - 404 if it does not exist
/// - 409 if already canceled
pub async fn cancel_reservation(
    owner: OwnerPrincipal,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservationView>, AppError> {
    let reservation = state
        .service
        .cancel(ReservationId::from_uuid(id), owner.id)
        .await?;

    let affordances = state.service.affordances(&reservation, &owner.principal());
    Ok(Json(ReservationView::new(&reservation, affordances)))
}

/// Every reservation across the caller's properties, newest first.
pub async fn list_owner_reservations(
    owner: OwnerPrincipal,
    State(state): State<AppState>,
) -> Json<Vec<ReservationView>> {
    let principal = owner.principal();
    let views = state
        .service
        .reservations_for_owner(owner.id)
        .await
        .iter()
        .map(|r| ReservationView::new(r, state.service.affordances(r, &principal)))
        .collect();

    Json(views)
}

/// Every reservation the caller made, newest first.
pub async fn list_guest_reservations(
    guest: GuestPrincipal,
    State(state): State<AppState>,
) -> Json<Vec<ReservationView>> {
    let views = state
        .service
        .reservations_for_guest(guest.id)
        .await
        .iter()
        .map(|r| ReservationView::new(r, Affordances::default()))
        .collect();

    Json(views)
}
