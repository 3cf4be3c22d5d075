//! Authentication extractors.
//!
//! - [`BearerToken`]: raw token from `Authorization: Bearer <token>`
//! - [`Authenticated`]: any resolved principal
//! - [`OwnerPrincipal`] / [`GuestPrincipal`]: a principal of one kind
//!
//! A missing, malformed or unknown token is rejected with 401. A known
//! principal of the wrong kind is rejected with 403.
//!
//! ```rust,ignore
//! async fn accept_reservation(owner: OwnerPrincipal, ...) -> Result<Json<ReservationView>, AppError> {
//!     // owner.id is a resolved owner
//! }
//! ```

use crate::server::state::AppState;
use crate::types::{GuestId, OwnerId, Principal};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use staybook_web::AppError;

/// Bearer token extracted from `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| {
                AppError::unauthorized("Invalid authorization format. Expected 'Bearer <token>'")
            })?
            .trim();

        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer token"));
        }

        Ok(Self(token.to_string()))
    }
}

/// Any authenticated principal.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = BearerToken::from_request_parts(parts, state).await?;

        let principal = state
            .identity
            .resolve(&bearer.0)
            .await
            .ok_or_else(|| AppError::unauthorized("Unknown or expired token"))?;

        tracing::debug!(email = principal.email(), "Request authenticated");
        Ok(Self(principal))
    }
}

/// An authenticated property owner.
#[derive(Debug, Clone)]
pub struct OwnerPrincipal {
    /// Owner id
    pub id: OwnerId,
    /// Login email
    pub email: String,
}

impl OwnerPrincipal {
    /// The principal this owner was resolved from
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal::Owner {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OwnerPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Authenticated::from_request_parts(parts, state).await?.0 {
            Principal::Owner { id, email } => Ok(Self { id, email }),
            Principal::Guest { .. } => Err(AppError::forbidden("Only property owners may do this")),
        }
    }
}

/// An authenticated guest.
#[derive(Debug, Clone)]
pub struct GuestPrincipal {
    /// Guest id
    pub id: GuestId,
    /// Login email
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for GuestPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Authenticated::from_request_parts(parts, state).await?.0 {
            Principal::Guest { id, email } => Ok(Self { id, email }),
            Principal::Owner { .. } => Err(AppError::forbidden("Only guests may do this")),
        }
    }
}
