//! Property API endpoints.
//!
//! - POST /api/properties - List a new property (owner)
//! - GET /api/owner/properties - The caller's listings, oldest first (owner)
//! - GET /api/properties/:id - Property page (any principal)

use super::auth::{Authenticated, OwnerPrincipal};
use crate::server::state::AppState;
use crate::types::{Principal, Property, PropertyId};
use crate::views::{PropertyView, ReservationView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use staybook_core::environment::Clock;
use staybook_web::AppError;
use uuid::Uuid;

// ============================================================================
// Request Types
// ============================================================================

/// Request to list a new property.
#[derive(Debug, Deserialize)]
pub struct CreatePropertyRequest {
    /// Listing title
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Number of rooms
    pub rooms: u32,
    /// Number of bathrooms
    pub bathrooms: u32,
    /// Whether pets are welcome
    #[serde(default)]
    pub pets_allowed: bool,
    /// Price per night in cents
    pub daily_rate_cents: u64,
    /// Category name
    pub property_type: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// List a new property owned by the caller.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/properties \
///   -H "Authorization: Bearer <owner_token>" \
///   -H "Content-Type: application/json" \
///   -d '{"title": "Apartamento Novo", "rooms": 3, "bathrooms": 2,
///        "daily_rate_cents": 10000, "property_type": "Apartamento"}'
/// ```
///
/// # Errors
///
/// - 401/403 unless the caller is an owner
/// - 422 for a blank title
pub async fn create_property(
    owner: OwnerPrincipal,
    State(state): State<AppState>,
    Json(request): Json<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<PropertyView>), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::validation("Property title must not be blank"));
    }

    let property = Property {
        id: PropertyId::new(),
        owner_id: owner.id,
        owner_email: owner.email.clone(),
        title: request.title.trim().to_string(),
        description: request.description,
        rooms: request.rooms,
        bathrooms: request.bathrooms,
        pets_allowed: request.pets_allowed,
        daily_rate_cents: request.daily_rate_cents,
        property_type: request.property_type,
        created_at: state.service.clock().now(),
    };

    state
        .service
        .properties()
        .insert(property.clone())
        .await
        .map_err(crate::service::ServiceError::from)?;

    tracing::info!(property_id = %property.id, owner_id = %owner.id, "Property listed");
    Ok((StatusCode::CREATED, Json(PropertyView::new(property, false, Vec::new()))))
}

/// The caller's own listings, oldest first, without their reservations.
///
/// # Errors
///
/// - 401/403 unless the caller is an owner
/// - 500 if the property store fails
pub async fn list_owner_properties(
    owner: OwnerPrincipal,
    State(state): State<AppState>,
) -> Result<Json<Vec<PropertyView>>, AppError> {
    let properties = state
        .service
        .properties()
        .list_by_owner(owner.id)
        .await
        .map_err(crate::service::ServiceError::from)?;

    Ok(Json(
        properties
            .into_iter()
            .map(|property| PropertyView::new(property, false, Vec::new()))
            .collect(),
    ))
}

/// Property page.
///
/// Guests get `can_reserve`; the owner also sees every reservation of the
/// property with the actions currently available on each.
///
/// # Errors
///
/// - 401 without a valid token
/// - 404 if the property does not exist
pub async fn get_property(
    Authenticated(principal): Authenticated,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PropertyView>, AppError> {
    let property_id = PropertyId::from_uuid(id);

    let property = state
        .service
        .properties()
        .find(property_id)
        .await
        .map_err(crate::service::ServiceError::from)?
        .ok_or_else(|| AppError::not_found("Property", property_id))?;

    let reservations = state
        .service
        .reservations_for_property(property_id, &principal)
        .await?
        .iter()
        .map(|r| ReservationView::new(r, state.service.affordances(r, &principal)))
        .collect();

    let can_reserve = matches!(principal, Principal::Guest { .. });
    Ok(Json(PropertyView::new(property, can_reserve, reservations)))
}
