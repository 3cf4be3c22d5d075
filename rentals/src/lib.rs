//! Property rental reservations.
//!
//! Guests request stays at properties; the owner of the property accepts or
//! cancels them. Every reservation moves through a small lifecycle:
//!
//! ```text
//! Pending ──accept──▶ Accepted ──cancel──▶ Canceled
//!    └───────────────cancel──────────────────▲
//! ```
//!
//! # Architecture
//!
//! ```text
//!   HTTP (axum)          api::*  ──▶  ReservationService ──save──▶ ReservationRepository
//!                                        │  send_and_wait_for(command_id)
//!                                        ▼
//!                        Store<ReservationState, ReservationAction, ..>
//!                                        │
//!                                        ▼
//!                        ReservationReducer ──Effect::future──▶ ReservationNotifier
//! ```
//!
//! - **Lifecycle rules** ([`lifecycle`]) are pure functions shared by the
//!   reducer and by the views that decide which actions to offer.
//! - **Collaborators** (property store, identity provider, notifier, clock)
//!   are traits injected at startup, so tests swap them for in-memory doubles.
//! - **Persistence**: each change is written through to the
//!   [`repository::ReservationRepository`] before the caller hears about it,
//!   and saved reservations are reloaded at startup.
//! - **Owner notices** run as effects after the reservation is saved; a
//!   failed delivery is recorded and never undoes a reservation.

pub mod aggregates;
pub mod api;
pub mod bootstrap;
pub mod config;
pub mod identity;
pub mod lifecycle;
pub mod metrics;
pub mod mocks;
pub mod notifications;
pub mod properties;
pub mod repository;
pub mod server;
pub mod service;
pub mod types;
pub mod views;

pub use aggregates::{ReservationAction, ReservationEnvironment, ReservationReducer};
pub use config::Config;
pub use identity::{IdentityProvider, InMemoryIdentityProvider};
pub use lifecycle::{CancellationPolicy, DenialReason, LifecycleError};
pub use notifications::{ConsoleNotifier, ReservationNotifier};
pub use properties::{InMemoryPropertyStore, PostgresPropertyStore, PropertyStore};
pub use repository::{
    InMemoryReservationRepository, PostgresReservationRepository, ReservationRepository,
};
pub use server::{AppState, build_router};
pub use service::{Affordances, ReservationRequest, ReservationService, ServiceError, ServiceSettings};
pub use types::{
    GuestId, OwnerId, Principal, Property, PropertyId, Reservation, ReservationId,
    ReservationStatus,
};
pub use views::{PropertyView, ReservationView};
