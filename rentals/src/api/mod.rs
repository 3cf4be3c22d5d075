//! HTTP API for the rentals service.
//!
//! - Auth: bearer token extractors resolving [`crate::types::Principal`]s
//! - Properties: listing, the owner's listings and the property page
//! - Reservations: request, view, accept, cancel, listings

pub mod auth;
pub mod properties;
pub mod reservations;

use crate::lifecycle::LifecycleError;
use crate::properties::PropertyStoreError;
use crate::repository::RepositoryError;
use crate::service::ServiceError;
use staybook_web::AppError;

pub use auth::{Authenticated, BearerToken, GuestPrincipal, OwnerPrincipal};
pub use properties::{create_property, get_property, list_owner_properties};
pub use reservations::{
    accept_reservation, cancel_reservation, create_reservation, get_reservation,
    list_guest_reservations, list_owner_reservations,
};

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match &err {
            LifecycleError::NotFound { resource, id } => Self::not_found(resource, id),
            LifecycleError::Denied(_) => Self::denied(err.to_string()),
            LifecycleError::InvalidTransition { .. } => Self::conflict(err.to_string()),
            LifecycleError::InvalidRequest(message) => Self::validation(message.clone()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Lifecycle(err) => err.into(),
            ServiceError::Store(err) => err.into(),
            ServiceError::Properties(PropertyStoreError::Duplicate(id)) => {
                Self::conflict(format!("Property {id} already exists"))
            },
            ServiceError::Properties(err) => {
                Self::internal("Property store unavailable").with_source(err.into())
            },
            ServiceError::Repository(err) => {
                Self::internal("Reservation storage unavailable").with_source(err.into())
            },
            ServiceError::UnexpectedOutcome(command_id) => {
                Self::internal(format!("Unexpected outcome for command {command_id}"))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::DenialReason;
    use crate::types::ReservationStatus;
    use axum::http::StatusCode;
    use staybook_runtime::StoreError;

    #[test]
    fn lifecycle_errors_map_to_status_codes() {
        let cases = [
            (
                LifecycleError::NotFound {
                    resource: "Reservation",
                    id: "42".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                LifecycleError::Denied(DenialReason::NotPropertyOwner),
                StatusCode::FORBIDDEN,
            ),
            (
                LifecycleError::InvalidTransition {
                    from: ReservationStatus::Accepted,
                    to: ReservationStatus::Accepted,
                },
                StatusCode::CONFLICT,
            ),
            (
                LifecycleError::InvalidRequest("guests must be positive".to_string()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(ServiceError::from(err)).status(), status);
        }
    }

    #[test]
    fn runtime_errors_map_to_server_statuses() {
        assert_eq!(
            AppError::from(ServiceError::Store(StoreError::Timeout)).status(),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            AppError::from(ServiceError::Properties(PropertyStoreError::Storage(
                "connection refused".to_string()
            )))
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(ServiceError::Repository(RepositoryError::Storage(
                "connection refused".to_string()
            )))
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
