//! Reservation lifecycle reducer.
//!
//! Commands are validated and applied under the store's write lock, so a
//! status check and the change it guards happen atomically. Every lifecycle
//! command answers with exactly one outcome event carrying its `command_id`,
//! an id minted by the service for that one command:
//!
//! - `RequestReservation` → `ReservationRequested` | `ReservationRejected`
//! - `AcceptReservation` → `ReservationAccepted` | `ReservationRejected`
//! - `CancelReservation` → `ReservationCanceled` | `ReservationRejected`
//!
//! Two housekeeping commands follow a change once the service has tried to
//! save it. `NotifyOwner` starts the owner notice, which runs on its own task
//! and reports back as `OwnerNotified` or `OwnerNotificationFailed`.
//! `RestoreReservation` puts back what a change replaced when the save failed.

use crate::lifecycle::{self, CancellationPolicy, LifecycleError};
use crate::notifications::ReservationNotifier;
use crate::types::{
    GuestId, OwnerId, PropertyId, Reservation, ReservationId, ReservationState, ReservationStatus,
};
use chrono::NaiveDate;
use staybook_core::{SmallVec, effect::Effect, environment::Clock, reducer::Reducer, smallvec};
use std::sync::Arc;
use uuid::Uuid;

// ============================================================================
// Actions (Commands + Events)
// ============================================================================

/// Actions for the reservation lifecycle
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReservationAction {
    // Commands
    /// A guest asks to stay at a property
    RequestReservation {
        /// Server-issued id that matches the outcome to the caller
        command_id: Uuid,
        /// New reservation ID
        reservation_id: ReservationId,
        /// Target property
        property_id: PropertyId,
        /// Property title (snapshot)
        property_title: String,
        /// Property owner (snapshot)
        owner_id: OwnerId,
        /// Owner contact address (snapshot)
        owner_email: String,
        /// Requesting guest
        guest_id: GuestId,
        /// Guest email (snapshot)
        guest_email: String,
        /// First night
        start_date: NaiveDate,
        /// Departure day
        end_date: NaiveDate,
        /// Number of people
        guests: u32,
    },

    /// The property owner confirms a pending reservation
    AcceptReservation {
        /// Server-issued id that matches the outcome to the caller
        command_id: Uuid,
        /// Reservation ID
        reservation_id: ReservationId,
        /// Owner making the request
        requested_by: OwnerId,
    },

    /// The property owner withdraws a reservation
    CancelReservation {
        /// Server-issued id that matches the outcome to the caller
        command_id: Uuid,
        /// Reservation ID
        reservation_id: ReservationId,
        /// Owner making the request
        requested_by: OwnerId,
    },

    /// Send the new-reservation notice to the owner of a saved reservation
    NotifyOwner {
        /// Reservation ID
        reservation_id: ReservationId,
    },

    /// Undo a change that could not be saved
    RestoreReservation {
        /// Reservation ID
        reservation_id: ReservationId,
        /// What the reservation looked like before; `None` if it was new
        previous: Option<Reservation>,
    },

    // Events
    /// A reservation was recorded as pending
    ReservationRequested {
        /// Id of the command that produced this outcome
        command_id: Uuid,
        /// The stored reservation
        reservation: Reservation,
    },

    /// A reservation moved to accepted
    ReservationAccepted {
        /// Id of the command that produced this outcome
        command_id: Uuid,
        /// The reservation after the change
        reservation: Reservation,
    },

    /// A reservation moved to canceled
    ReservationCanceled {
        /// Id of the command that produced this outcome
        command_id: Uuid,
        /// The reservation after the change
        reservation: Reservation,
    },

    /// A command was refused; state is unchanged
    ReservationRejected {
        /// Id of the command that produced this outcome
        command_id: Uuid,
        /// Why
        error: LifecycleError,
    },

    /// The owner notice for a reservation was delivered
    OwnerNotified {
        /// Reservation ID
        reservation_id: ReservationId,
    },

    /// The owner notice for a reservation could not be delivered
    OwnerNotificationFailed {
        /// Reservation ID
        reservation_id: ReservationId,
        /// Failure description
        error: String,
    },
}

impl ReservationAction {
    /// Command id of an outcome event, `None` for anything else
    #[must_use]
    pub const fn outcome_command_id(&self) -> Option<Uuid> {
        match self {
            Self::ReservationRequested { command_id, .. }
            | Self::ReservationAccepted { command_id, .. }
            | Self::ReservationCanceled { command_id, .. }
            | Self::ReservationRejected { command_id, .. } => Some(*command_id),
            _ => None,
        }
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Environment dependencies for the reservation reducer
#[derive(Clone)]
pub struct ReservationEnvironment {
    /// Clock for timestamps and the cancellation date rule
    pub clock: Arc<dyn Clock>,
    /// Owner notification transport
    pub notifier: Arc<dyn ReservationNotifier>,
    /// Cancellation cutoff
    pub policy: CancellationPolicy,
}

impl ReservationEnvironment {
    /// Creates a new `ReservationEnvironment`
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn ReservationNotifier>,
        policy: CancellationPolicy,
    ) -> Self {
        Self {
            clock,
            notifier,
            policy,
        }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the reservation lifecycle
#[derive(Clone, Debug, Default)]
pub struct ReservationReducer;

impl ReservationReducer {
    /// Creates a new `ReservationReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Look up a reservation, or fail with `NotFound`
    fn existing(
        state: &ReservationState,
        reservation_id: ReservationId,
    ) -> Result<&Reservation, LifecycleError> {
        state
            .get(&reservation_id)
            .ok_or_else(|| LifecycleError::NotFound {
                resource: "Reservation",
                id: reservation_id.to_string(),
            })
    }

    /// Applies an outcome event to state. Only `commit` calls this; the copy
    /// of the event fed back through the store changes nothing.
    fn apply_event(state: &mut ReservationState, action: &ReservationAction) {
        match action {
            ReservationAction::ReservationRequested { reservation, .. } => {
                state
                    .reservations
                    .entry(reservation.id)
                    .or_insert_with(|| reservation.clone());
            },

            ReservationAction::ReservationAccepted { reservation, .. }
            | ReservationAction::ReservationCanceled { reservation, .. } => {
                if let Some(current) = state.reservations.get_mut(&reservation.id) {
                    if current.status.can_transition_to(reservation.status) {
                        current.status = reservation.status;
                        current.updated_at = reservation.updated_at;
                    }
                }
            },

            ReservationAction::ReservationRejected { .. }
            | ReservationAction::OwnerNotified { .. }
            | ReservationAction::OwnerNotificationFailed { .. }
            | ReservationAction::RequestReservation { .. }
            | ReservationAction::AcceptReservation { .. }
            | ReservationAction::CancelReservation { .. }
            | ReservationAction::NotifyOwner { .. }
            | ReservationAction::RestoreReservation { .. } => {},
        }
    }

    /// Apply `event` and announce it to whoever waits on its command id
    fn commit(
        state: &mut ReservationState,
        event: ReservationAction,
    ) -> SmallVec<[Effect<ReservationAction>; 4]> {
        Self::apply_event(state, &event);
        smallvec![Effect::emit(event)]
    }

    fn reject(
        command_id: Uuid,
        error: LifecycleError,
    ) -> SmallVec<[Effect<ReservationAction>; 4]> {
        tracing::debug!(%command_id, %error, "Reservation command rejected");
        smallvec![Effect::emit(ReservationAction::ReservationRejected {
            command_id,
            error,
        })]
    }

    /// Effect that delivers the owner notice and reports the outcome
    fn notify_owner(
        env: &ReservationEnvironment,
        reservation: Reservation,
    ) -> Effect<ReservationAction> {
        let notifier = Arc::clone(&env.notifier);

        Effect::future(async move {
            let reservation_id = reservation.id;
            match notifier.notify_new_reservation(&reservation).await {
                Ok(()) => {
                    tracing::info!(%reservation_id, owner = %reservation.owner_email, "Owner notified");
                    crate::metrics::record_notification("sent");
                    Some(ReservationAction::OwnerNotified { reservation_id })
                },
                Err(error) => {
                    tracing::warn!(%reservation_id, %error, "Owner notification failed");
                    crate::metrics::record_notification("failed");
                    Some(ReservationAction::OwnerNotificationFailed {
                        reservation_id,
                        error: error.to_string(),
                    })
                },
            }
        })
    }
}

impl Reducer for ReservationReducer {
    type State = ReservationState;
    type Action = ReservationAction;
    type Environment = ReservationEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per command
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Request ==========
            ReservationAction::RequestReservation {
                command_id,
                reservation_id,
                property_id,
                property_title,
                owner_id,
                owner_email,
                guest_id,
                guest_email,
                start_date,
                end_date,
                guests,
            } => {
                if let Err(error) = lifecycle::validate_request(start_date, end_date, guests) {
                    return Self::reject(command_id, error);
                }
                if state.exists(&reservation_id) {
                    return Self::reject(
                        command_id,
                        LifecycleError::InvalidRequest(format!(
                            "reservation {reservation_id} already exists"
                        )),
                    );
                }

                let now = env.clock.now();
                let reservation = Reservation {
                    id: reservation_id,
                    property_id,
                    property_title,
                    owner_id,
                    owner_email,
                    guest_id,
                    guest_email,
                    start_date,
                    end_date,
                    guests,
                    status: ReservationStatus::Pending,
                    created_at: now,
                    updated_at: now,
                };

                Self::commit(
                    state,
                    ReservationAction::ReservationRequested {
                        command_id,
                        reservation,
                    },
                )
            },

            // ========== Accept ==========
            ReservationAction::AcceptReservation {
                command_id,
                reservation_id,
                requested_by,
            } => {
                let checked = Self::existing(state, reservation_id).and_then(|reservation| {
                    lifecycle::check_accept(reservation, requested_by).map(|()| reservation.clone())
                });

                match checked {
                    Ok(mut reservation) => {
                        reservation.status = ReservationStatus::Accepted;
                        reservation.updated_at = env.clock.now();
                        Self::commit(
                            state,
                            ReservationAction::ReservationAccepted {
                                command_id,
                                reservation,
                            },
                        )
                    },
                    Err(error) => Self::reject(command_id, error),
                }
            },

            // ========== Cancel ==========
            ReservationAction::CancelReservation {
                command_id,
                reservation_id,
                requested_by,
            } => {
                let today = env.clock.today();
                let checked = Self::existing(state, reservation_id).and_then(|reservation| {
                    lifecycle::check_cancel(reservation, requested_by, today, env.policy)
                        .map(|()| reservation.clone())
                });

                match checked {
                    Ok(mut reservation) => {
                        reservation.status = ReservationStatus::Canceled;
                        reservation.updated_at = env.clock.now();
                        Self::commit(
                            state,
                            ReservationAction::ReservationCanceled {
                                command_id,
                                reservation,
                            },
                        )
                    },
                    Err(error) => Self::reject(command_id, error),
                }
            },

            // ========== Housekeeping ==========
            ReservationAction::NotifyOwner { reservation_id } => match state.get(&reservation_id) {
                Some(reservation) => smallvec![Self::notify_owner(env, reservation.clone())],
                None => {
                    tracing::warn!(%reservation_id, "No reservation to notify about");
                    SmallVec::new()
                },
            },

            ReservationAction::RestoreReservation {
                reservation_id,
                previous,
            } => {
                match previous {
                    Some(previous) => {
                        state.reservations.insert(reservation_id, previous);
                    },
                    None => {
                        state.reservations.remove(&reservation_id);
                    },
                }
                tracing::warn!(%reservation_id, "Reservation change rolled back");
                SmallVec::new()
            },

            // ========== Events (fed back from effects) ==========
            // Applied by their command already. Re-applying here could undo a
            // rollback that ran between the outcome and its feedback.
            ReservationAction::ReservationRequested { .. }
            | ReservationAction::ReservationAccepted { .. }
            | ReservationAction::ReservationCanceled { .. }
            | ReservationAction::ReservationRejected { .. }
            | ReservationAction::OwnerNotified { .. }
            | ReservationAction::OwnerNotificationFailed { .. } => SmallVec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::lifecycle::DenialReason;
    use crate::mocks::RecordingNotifier;
    use chrono::{Duration, Utc};
    use proptest::prelude::*;
    use staybook_testing::{FixedClock, ReducerTest, assertions, test_clock};

    fn test_env() -> ReservationEnvironment {
        ReservationEnvironment::new(
            Arc::new(test_clock()),
            Arc::new(RecordingNotifier::new()),
            CancellationPolicy::default(),
        )
    }

    fn today() -> NaiveDate {
        test_clock().today()
    }

    fn reservation(owner_id: OwnerId, status: ReservationStatus) -> Reservation {
        Reservation {
            id: ReservationId::new(),
            property_id: PropertyId::new(),
            property_title: "Apartamento Novo".to_string(),
            owner_id,
            owner_email: "john@doe.com.br".to_string(),
            guest_id: GuestId::new(),
            guest_email: "andrew@doe.com.br".to_string(),
            start_date: today() + Duration::weeks(1),
            end_date: today() + Duration::weeks(2),
            guests: 6,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn state_with(reservation: &Reservation) -> ReservationState {
        let mut state = ReservationState::new();
        state
            .reservations
            .insert(reservation.id, reservation.clone());
        state
    }

    fn request(reservation_id: ReservationId, guests: u32) -> ReservationAction {
        ReservationAction::RequestReservation {
            command_id: Uuid::new_v4(),
            reservation_id,
            property_id: PropertyId::new(),
            property_title: "Apartamento Novo".to_string(),
            owner_id: OwnerId::new(),
            owner_email: "john@doe.com.br".to_string(),
            guest_id: GuestId::new(),
            guest_email: "andrew@doe.com.br".to_string(),
            start_date: today() + Duration::weeks(1),
            end_date: today() + Duration::weeks(2),
            guests,
        }
    }

    #[test]
    fn request_creates_pending() {
        let reservation_id = ReservationId::new();

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(ReservationState::new())
            .when_action(request(reservation_id, 6))
            .then_state(move |state| {
                assert_eq!(state.count(), 1);
                let reservation = state.get(&reservation_id).unwrap();
                assert_eq!(reservation.status, ReservationStatus::Pending);
                assert_eq!(reservation.guests, 6);
                assert_eq!(reservation.created_at, test_clock().now());
            })
            .then_effects(|effects| {
                // Outcome announcement only; the notice waits for the save
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn request_with_zero_guests_is_rejected() {
        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(ReservationState::new())
            .when_action(request(ReservationId::new(), 0))
            .then_state(|state| assert_eq!(state.count(), 0))
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn duplicate_request_is_rejected() {
        let existing = reservation(OwnerId::new(), ReservationStatus::Pending);
        let reservation_id = existing.id;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state_with(&existing))
            .when_action(request(reservation_id, 2))
            .then_state(move |state| {
                assert_eq!(state.count(), 1);
                assert_eq!(state.get(&reservation_id).unwrap().guests, 6);
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn owner_accepts_pending() {
        let owner = OwnerId::new();
        let pending = reservation(owner, ReservationStatus::Pending);
        let id = pending.id;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state_with(&pending))
            .when_action(ReservationAction::AcceptReservation {
                command_id: Uuid::new_v4(),
                reservation_id: id,
                requested_by: owner,
            })
            .then_state(move |state| {
                assert_eq!(state.get(&id).unwrap().status, ReservationStatus::Accepted);
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 1))
            .run();
    }

    #[test]
    fn non_owner_cannot_accept() {
        let pending = reservation(OwnerId::new(), ReservationStatus::Pending);
        let id = pending.id;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state_with(&pending))
            .when_action(ReservationAction::AcceptReservation {
                command_id: Uuid::new_v4(),
                reservation_id: id,
                requested_by: OwnerId::new(),
            })
            .then_state(move |state| {
                assert_eq!(state.get(&id).unwrap().status, ReservationStatus::Pending);
            })
            .run();
    }

    #[test]
    fn second_accept_leaves_state_alone() {
        let owner = OwnerId::new();
        let pending = reservation(owner, ReservationStatus::Pending);
        let id = pending.id;
        let accept = || ReservationAction::AcceptReservation {
            command_id: Uuid::new_v4(),
            reservation_id: id,
            requested_by: owner,
        };

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state_with(&pending))
            .when_action(accept())
            .when_action(accept())
            .then_state(move |state| {
                assert_eq!(state.get(&id).unwrap().status, ReservationStatus::Accepted);
            })
            .then_effects(|effects| assertions::assert_effects_count(effects, 2))
            .run();
    }

    #[test]
    fn cancel_on_start_date_is_denied() {
        let owner = OwnerId::new();
        let mut accepted = reservation(owner, ReservationStatus::Accepted);
        accepted.start_date = today();
        accepted.end_date = today() + Duration::weeks(1);
        let id = accepted.id;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state_with(&accepted))
            .when_action(ReservationAction::CancelReservation {
                command_id: Uuid::new_v4(),
                reservation_id: id,
                requested_by: owner,
            })
            .then_state(move |state| {
                assert_eq!(state.get(&id).unwrap().status, ReservationStatus::Accepted);
            })
            .run();
    }

    #[test]
    fn cancel_before_start_date_succeeds() {
        let owner = OwnerId::new();
        let accepted = reservation(owner, ReservationStatus::Accepted);
        let id = accepted.id;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state_with(&accepted))
            .when_action(ReservationAction::CancelReservation {
                command_id: Uuid::new_v4(),
                reservation_id: id,
                requested_by: owner,
            })
            .then_state(move |state| {
                let reservation = state.get(&id).unwrap();
                assert_eq!(reservation.status, ReservationStatus::Canceled);
                assert_eq!(reservation.updated_at, test_clock().now());
            })
            .run();
    }

    #[test]
    fn fed_back_events_leave_state_alone() {
        let owner = OwnerId::new();
        let accepted = reservation(owner, ReservationStatus::Accepted);
        let id = accepted.id;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state_with(&accepted))
            .when_action(ReservationAction::ReservationAccepted {
                command_id: Uuid::new_v4(),
                reservation: accepted,
            })
            .when_action(ReservationAction::OwnerNotified { reservation_id: id })
            .then_state(move |state| {
                assert_eq!(state.count(), 1);
                assert_eq!(state.get(&id).unwrap().status, ReservationStatus::Accepted);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn late_feedback_does_not_undo_a_rollback() {
        let pending = reservation(OwnerId::new(), ReservationStatus::Pending);
        let id = pending.id;
        let mut accepted = pending.clone();
        accepted.status = ReservationStatus::Accepted;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state_with(&pending))
            .when_action(ReservationAction::ReservationAccepted {
                command_id: Uuid::new_v4(),
                reservation: accepted,
            })
            .when_action(ReservationAction::ReservationRequested {
                command_id: Uuid::new_v4(),
                reservation: reservation(OwnerId::new(), ReservationStatus::Pending),
            })
            .then_state(move |state| {
                assert_eq!(state.count(), 1);
                assert_eq!(state.get(&id).unwrap().status, ReservationStatus::Pending);
            })
            .run();
    }

    #[test]
    fn notify_owner_starts_one_notice() {
        let pending = reservation(OwnerId::new(), ReservationStatus::Pending);
        let id = pending.id;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state_with(&pending))
            .when_action(ReservationAction::NotifyOwner { reservation_id: id })
            .when_action(ReservationAction::NotifyOwner {
                reservation_id: ReservationId::new(),
            })
            .then_state(|state| assert_eq!(state.count(), 1))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn restore_puts_back_previous_version() {
        let owner = OwnerId::new();
        let pending = reservation(owner, ReservationStatus::Pending);
        let id = pending.id;
        let mut accepted = pending.clone();
        accepted.status = ReservationStatus::Accepted;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state_with(&accepted))
            .when_action(ReservationAction::RestoreReservation {
                reservation_id: id,
                previous: Some(pending),
            })
            .then_state(move |state| {
                assert_eq!(state.get(&id).unwrap().status, ReservationStatus::Pending);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn restore_drops_unsaved_new_reservation() {
        let pending = reservation(OwnerId::new(), ReservationStatus::Pending);
        let id = pending.id;

        ReducerTest::new(ReservationReducer::new())
            .with_env(test_env())
            .given_state(state_with(&pending))
            .when_action(ReservationAction::RestoreReservation {
                reservation_id: id,
                previous: None,
            })
            .then_state(|state| assert_eq!(state.count(), 0))
            .run();
    }

    #[test]
    fn outcome_command_id_only_for_outcomes() {
        let command_id = Uuid::new_v4();
        let rejected = ReservationAction::ReservationRejected {
            command_id,
            error: LifecycleError::Denied(DenialReason::NotPropertyOwner),
        };
        assert_eq!(rejected.outcome_command_id(), Some(command_id));
        assert_eq!(
            ReservationAction::OwnerNotified {
                reservation_id: ReservationId::new()
            }
            .outcome_command_id(),
            None
        );
    }

    fn any_status() -> impl Strategy<Value = ReservationStatus> {
        prop_oneof![
            Just(ReservationStatus::Pending),
            Just(ReservationStatus::Accepted),
            Just(ReservationStatus::Canceled),
        ]
    }

    proptest! {
        /// Whatever the starting status and whoever asks, a reduced command
        /// either follows the transition table or leaves state untouched.
        #[test]
        fn commands_follow_transition_table(
            status in any_status(),
            is_owner in any::<bool>(),
            accept in any::<bool>(),
            days_until_start in -10_i64..10,
        ) {
            let owner = OwnerId::new();
            let mut current = reservation(owner, status);
            current.start_date = today() + Duration::days(days_until_start);
            current.end_date = current.start_date + Duration::days(3);
            let id = current.id;
            let mut state = state_with(&current);
            let requested_by = if is_owner { owner } else { OwnerId::new() };
            let env = ReservationEnvironment::new(
                Arc::new(FixedClock::new(test_clock().now())),
                Arc::new(RecordingNotifier::new()),
                CancellationPolicy::default(),
            );

            let (action, target) = if accept {
                (ReservationAction::AcceptReservation { command_id: Uuid::new_v4(), reservation_id: id, requested_by }, ReservationStatus::Accepted)
            } else {
                (ReservationAction::CancelReservation { command_id: Uuid::new_v4(), reservation_id: id, requested_by }, ReservationStatus::Canceled)
            };

            let effects = ReservationReducer::new().reduce(&mut state, action, &env);
            let after = state.get(&id).unwrap().status;

            let date_ok = accept || days_until_start > 0;
            let allowed = is_owner && status.can_transition_to(target) && date_ok;

            prop_assert_eq!(effects.len(), 1);
            if allowed {
                prop_assert_eq!(after, target);
            } else {
                prop_assert_eq!(after, status);
            }
        }
    }
}
