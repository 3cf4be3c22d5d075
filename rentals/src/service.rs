//! Reservation service.
//!
//! Front door to the lifecycle: resolves properties, sends commands through
//! the [`Store`], waits for the outcome carrying the command's id and turns
//! it into a `Result`. Reads go straight to the store's state.
//!
//! Changes are written one at a time. Each is applied in memory, saved to
//! the [`ReservationRepository`], and rolled back if the save fails, so the
//! caller's answer always matches what was persisted. Command ids are minted
//! here for every command and never taken from the request.

use crate::aggregates::{ReservationAction, ReservationEnvironment, ReservationReducer};
use crate::lifecycle::{self, CancellationPolicy, LifecycleError};
use crate::notifications::ReservationNotifier;
use crate::properties::{PropertyStore, PropertyStoreError};
use crate::repository::{RepositoryError, ReservationRepository};
use crate::types::{
    GuestId, OwnerId, Principal, PropertyId, Reservation, ReservationId, ReservationState,
};
use chrono::NaiveDate;
use staybook_core::environment::Clock;
use staybook_runtime::{HealthCheck, Store, StoreError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

/// The store type running the reservation reducer
pub type ReservationStore =
    Store<ReservationState, ReservationAction, ReservationEnvironment, ReservationReducer>;

/// Errors returned by [`ReservationService`]
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A lifecycle rule refused the operation
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// The property store failed
    #[error(transparent)]
    Properties(#[from] PropertyStoreError),

    /// Saving or loading reservations failed
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The store runtime failed (timeout, shutdown)
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The reducer answered with something other than an outcome
    #[error("Unexpected outcome for command {0}")]
    UnexpectedOutcome(Uuid),
}

/// What a guest asks for
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservationRequest {
    /// Property to stay at
    pub property_id: PropertyId,
    /// First night
    pub start_date: NaiveDate,
    /// Departure day
    pub end_date: NaiveDate,
    /// Number of people
    pub guests: u32,
}

/// Which lifecycle actions a principal may take on a reservation right now
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Affordances {
    /// Accept is allowed
    pub can_accept: bool,
    /// Cancel is allowed
    pub can_cancel: bool,
}

/// Tunables for the service
#[derive(Clone, Copy, Debug)]
pub struct ServiceSettings {
    /// Cancellation cutoff
    pub policy: CancellationPolicy,
    /// How long to wait for a command's outcome
    pub command_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            policy: CancellationPolicy::default(),
            command_timeout: Duration::from_secs(5),
        }
    }
}

/// Reservation lifecycle manager
pub struct ReservationService {
    store: ReservationStore,
    properties: Arc<dyn PropertyStore>,
    repository: Arc<dyn ReservationRepository>,
    clock: Arc<dyn Clock>,
    settings: ServiceSettings,
    /// Held from a command's dispatch until its save settles
    writes: Mutex<()>,
}

impl ReservationService {
    /// Wire a service around the reservations already saved in `repository`.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Repository`] if the saved reservations cannot be read.
    pub async fn start(
        properties: Arc<dyn PropertyStore>,
        repository: Arc<dyn ReservationRepository>,
        notifier: Arc<dyn ReservationNotifier>,
        clock: Arc<dyn Clock>,
        settings: ServiceSettings,
    ) -> Result<Self, ServiceError> {
        let saved = repository.load_all().await?;
        tracing::info!(reservations = saved.len(), "Loaded saved reservations");

        let environment =
            ReservationEnvironment::new(Arc::clone(&clock), notifier, settings.policy);
        let store = Store::new(
            ReservationState::from_reservations(saved),
            ReservationReducer::new(),
            environment,
        );

        Ok(Self {
            store,
            properties,
            repository,
            clock,
            settings,
            writes: Mutex::new(()),
        })
    }

    /// Request a reservation as a guest.
    ///
    /// Resolves the property, records a `pending` reservation and, once it is
    /// saved, starts the owner notice. Delivery of the notice never affects
    /// the result.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the property does not exist
    /// - `InvalidRequest` if the dates are not ordered or `guests` is zero
    /// - `Repository` if the reservation could not be saved
    #[tracing::instrument(skip(self, guest_email, request), fields(property_id = %request.property_id))]
    pub async fn create(
        &self,
        guest_id: GuestId,
        guest_email: &str,
        request: ReservationRequest,
    ) -> Result<Reservation, ServiceError> {
        let property = self
            .properties
            .find(request.property_id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound {
                resource: "Property",
                id: request.property_id.to_string(),
            })?;

        let reservation_id = ReservationId::new();
        let command_id = Uuid::new_v4();
        let reservation = self
            .execute(
                reservation_id,
                command_id,
                ReservationAction::RequestReservation {
                    command_id,
                    reservation_id,
                    property_id: property.id,
                    property_title: property.title,
                    owner_id: property.owner_id,
                    owner_email: property.owner_email,
                    guest_id,
                    guest_email: guest_email.to_string(),
                    start_date: request.start_date,
                    end_date: request.end_date,
                    guests: request.guests,
                },
            )
            .await?;

        if let Err(error) = self
            .store
            .send(ReservationAction::NotifyOwner { reservation_id })
            .await
        {
            tracing::warn!(%reservation_id, %error, "Owner notice not started");
        }

        tracing::info!(%reservation_id, "Reservation requested");
        crate::metrics::record_reservation(reservation.status);
        Ok(reservation)
    }

    /// Accept a pending reservation as the property owner.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Denied(NotPropertyOwner)`, or `InvalidTransition` when the
    /// reservation is not pending.
    #[tracing::instrument(skip(self))]
    pub async fn accept(
        &self,
        reservation_id: ReservationId,
        owner_id: OwnerId,
    ) -> Result<Reservation, ServiceError> {
        let command_id = Uuid::new_v4();
        let reservation = self
            .execute(
                reservation_id,
                command_id,
                ReservationAction::AcceptReservation {
                    command_id,
                    reservation_id,
                    requested_by: owner_id,
                },
            )
            .await?;

        tracing::info!("Reservation accepted");
        crate::metrics::record_reservation(reservation.status);
        Ok(reservation)
    }

    /// Cancel a pending or accepted reservation as the property owner.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Denied(NotPropertyOwner)`, `InvalidTransition` when already
    /// canceled, or `Denied(CancellationWindowClosed)` from the start date on.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(
        &self,
        reservation_id: ReservationId,
        owner_id: OwnerId,
    ) -> Result<Reservation, ServiceError> {
        let command_id = Uuid::new_v4();
        let reservation = self
            .execute(
                reservation_id,
                command_id,
                ReservationAction::CancelReservation {
                    command_id,
                    reservation_id,
                    requested_by: owner_id,
                },
            )
            .await?;

        tracing::info!("Reservation canceled");
        crate::metrics::record_reservation(reservation.status);
        Ok(reservation)
    }

    /// Apply a command in memory, then save the result or roll it back
    async fn execute(
        &self,
        reservation_id: ReservationId,
        command_id: Uuid,
        command: ReservationAction,
    ) -> Result<Reservation, ServiceError> {
        let _writes = self.writes.lock().await;

        let previous = self.store.state(|s| s.get(&reservation_id).cloned()).await;
        let reservation = self.dispatch(command_id, command).await?;

        if let Err(error) = self.repository.save(&reservation).await {
            tracing::error!(%reservation_id, %error, "Failed to save reservation");
            crate::metrics::record_save_failure();
            self.store
                .send(ReservationAction::RestoreReservation {
                    reservation_id,
                    previous,
                })
                .await?;
            return Err(error.into());
        }

        Ok(reservation)
    }

    /// Send a command and wait for its outcome
    async fn dispatch(
        &self,
        command_id: Uuid,
        command: ReservationAction,
    ) -> Result<Reservation, ServiceError> {
        let outcome = self
            .store
            .send_and_wait_for(
                command,
                move |action| action.outcome_command_id() == Some(command_id),
                self.settings.command_timeout,
            )
            .await?;

        match outcome {
            ReservationAction::ReservationRequested { reservation, .. }
            | ReservationAction::ReservationAccepted { reservation, .. }
            | ReservationAction::ReservationCanceled { reservation, .. } => Ok(reservation),
            ReservationAction::ReservationRejected { error, .. } => {
                if let LifecycleError::Denied(reason) = &error {
                    crate::metrics::record_denied(*reason);
                }
                Err(error.into())
            },
            _ => Err(ServiceError::UnexpectedOutcome(command_id)),
        }
    }

    /// A reservation by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if it does not exist.
    pub async fn get(&self, reservation_id: ReservationId) -> Result<Reservation, ServiceError> {
        self.store
            .state(|s| s.get(&reservation_id).cloned())
            .await
            .ok_or_else(|| {
                LifecycleError::NotFound {
                    resource: "Reservation",
                    id: reservation_id.to_string(),
                }
                .into()
            })
    }

    /// The reservations of a property as `principal` may see them.
    ///
    /// The owner sees every reservation; anyone else sees none.
    ///
    /// # Errors
    ///
    /// `NotFound` if the property does not exist.
    pub async fn reservations_for_property(
        &self,
        property_id: PropertyId,
        principal: &Principal,
    ) -> Result<Vec<Reservation>, ServiceError> {
        let property = self
            .properties
            .find(property_id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound {
                resource: "Property",
                id: property_id.to_string(),
            })?;

        if principal.owner_id() != Some(property.owner_id) {
            return Ok(Vec::new());
        }

        Ok(self.store.state(|s| s.for_property(property_id)).await)
    }

    /// Every reservation across an owner's properties, newest first
    pub async fn reservations_for_owner(&self, owner_id: OwnerId) -> Vec<Reservation> {
        self.store.state(|s| s.for_owner(owner_id)).await
    }

    /// Every reservation a guest has made, newest first
    pub async fn reservations_for_guest(&self, guest_id: GuestId) -> Vec<Reservation> {
        self.store.state(|s| s.for_guest(guest_id)).await
    }

    /// Which actions `principal` may take on `reservation` today.
    ///
    /// Runs the same checks as `accept` and `cancel`, so the answer matches
    /// what those calls would do.
    #[must_use]
    pub fn affordances(&self, reservation: &Reservation, principal: &Principal) -> Affordances {
        let Some(owner_id) = principal.owner_id() else {
            return Affordances::default();
        };

        Affordances {
            can_accept: lifecycle::check_accept(reservation, owner_id).is_ok(),
            can_cancel: lifecycle::check_cancel(
                reservation,
                owner_id,
                self.clock.today(),
                self.settings.policy,
            )
            .is_ok(),
        }
    }

    /// Property store used to resolve reservations
    #[must_use]
    pub fn properties(&self) -> &Arc<dyn PropertyStore> {
        &self.properties
    }

    /// Clock used for timestamps and the date rule
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Store health, for readiness probes
    #[must_use]
    pub fn health(&self) -> HealthCheck {
        self.store.health()
    }

    /// Stop accepting commands and wait for in-flight notices.
    ///
    /// # Errors
    ///
    /// [`StoreError::ShutdownTimeout`] if effects are still running after
    /// `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.store.shutdown(timeout).await
    }
}
