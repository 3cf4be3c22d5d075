//! Application state for the rentals HTTP server.

use crate::identity::IdentityProvider;
use crate::service::ReservationService;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; every field is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Reservation lifecycle (also reaches the property store and clock)
    pub service: Arc<ReservationService>,

    /// Resolves bearer tokens into principals
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(service: Arc<ReservationService>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { service, identity }
    }
}
