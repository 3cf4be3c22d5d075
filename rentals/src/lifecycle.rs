//! Reservation lifecycle rules.
//!
//! The reducer enforces these checks before any state change, and the views
//! call the same functions to decide which actions to offer. Checks run in a
//! fixed order: existence, authorization, transition, then the date rule.

use crate::types::{OwnerId, Reservation, ReservationStatus};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a lifecycle operation was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// The requester does not own the reservation's property
    NotPropertyOwner,
    /// Cancellation is only allowed before the start date
    CancellationWindowClosed,
}

impl DenialReason {
    /// Stable name, used as a metrics label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotPropertyOwner => "not_property_owner",
            Self::CancellationWindowClosed => "cancellation_window_closed",
        }
    }
}

impl std::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotPropertyOwner => f.write_str("only the property owner may change this reservation"),
            Self::CancellationWindowClosed => {
                f.write_str("reservations can only be canceled before their start date")
            },
        }
    }
}

/// Errors raised by the reservation lifecycle.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum LifecycleError {
    /// A referenced reservation or property does not exist
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// Kind of record ("Reservation", "Property")
        resource: &'static str,
        /// The id that failed to resolve
        id: String,
    },

    /// The requester may not perform the operation
    #[error("Denied: {0}")]
    Denied(DenialReason),

    /// The status machine does not allow this move
    #[error("Cannot move reservation from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: ReservationStatus,
        /// Requested status
        to: ReservationStatus,
    },

    /// The request itself is malformed (dates, guest count)
    #[error("Invalid reservation request: {0}")]
    InvalidRequest(String),
}

/// How close to the start date an owner may still cancel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CancellationPolicy {
    /// Days before the start date when cancellation closes. `0` means
    /// cancellation is allowed up to the day before the start date.
    pub notice_days: u32,
}

impl CancellationPolicy {
    /// Build a policy with the given notice period
    #[must_use]
    pub const fn new(notice_days: u32) -> Self {
        Self { notice_days }
    }

    /// `today < start_date - notice_days`
    #[must_use]
    pub fn allows(self, start_date: NaiveDate, today: NaiveDate) -> bool {
        start_date
            .checked_sub_days(Days::new(u64::from(self.notice_days)))
            .is_some_and(|cutoff| today < cutoff)
    }
}

/// Shared authorization predicate for every mutating operation.
///
/// # Errors
///
/// [`LifecycleError::Denied`] with [`DenialReason::NotPropertyOwner`] when
/// `requester` does not own the reservation's property.
pub fn authorize(reservation: &Reservation, requester: OwnerId) -> Result<(), LifecycleError> {
    if reservation.owner_id == requester {
        Ok(())
    } else {
        Err(LifecycleError::Denied(DenialReason::NotPropertyOwner))
    }
}

/// Ensure `from -> to` is a permitted transition.
///
/// # Errors
///
/// [`LifecycleError::InvalidTransition`] otherwise.
pub const fn check_transition(
    from: ReservationStatus,
    to: ReservationStatus,
) -> Result<(), LifecycleError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(LifecycleError::InvalidTransition { from, to })
    }
}

/// Every check `accept` performs on an existing reservation.
///
/// # Errors
///
/// `Denied` for non-owners, `InvalidTransition` unless pending.
pub fn check_accept(reservation: &Reservation, requester: OwnerId) -> Result<(), LifecycleError> {
    authorize(reservation, requester)?;
    check_transition(reservation.status, ReservationStatus::Accepted)
}

/// Every check `cancel` performs on an existing reservation.
///
/// # Errors
///
/// `Denied(NotPropertyOwner)` for non-owners, `InvalidTransition` when
/// already canceled, `Denied(CancellationWindowClosed)` once `today` reaches
/// the policy cutoff.
pub fn check_cancel(
    reservation: &Reservation,
    requester: OwnerId,
    today: NaiveDate,
    policy: CancellationPolicy,
) -> Result<(), LifecycleError> {
    authorize(reservation, requester)?;
    check_transition(reservation.status, ReservationStatus::Canceled)?;
    if policy.allows(reservation.start_date, today) {
        Ok(())
    } else {
        Err(LifecycleError::Denied(DenialReason::CancellationWindowClosed))
    }
}

/// Validate the shape of a new reservation request.
///
/// # Errors
///
/// [`LifecycleError::InvalidRequest`] unless `start_date < end_date` and
/// `guests > 0`.
pub fn validate_request(
    start_date: NaiveDate,
    end_date: NaiveDate,
    guests: u32,
) -> Result<(), LifecycleError> {
    if start_date >= end_date {
        return Err(LifecycleError::InvalidRequest(format!(
            "start date {start_date} must be before end date {end_date}"
        )));
    }
    if guests == 0 {
        return Err(LifecycleError::InvalidRequest(
            "guest count must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
