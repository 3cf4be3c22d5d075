//! Domain types for property rentals.
//!
//! Identifiers, the property and reservation entities, the principals that
//! act on them, and the in-memory state the lifecycle reducer owns.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a reservation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(Uuid);

impl ReservationId {
    /// Creates a new random `ReservationId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ReservationId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyId(Uuid);

impl PropertyId {
    /// Creates a new random `PropertyId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `PropertyId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PropertyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a guest (a user who books properties)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuestId(Uuid);

impl GuestId {
    /// Creates a new random `GuestId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `GuestId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for GuestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a property owner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(Uuid);

impl OwnerId {
    /// Creates a new random `OwnerId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `OwnerId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Principals
// ============================================================================

/// An authenticated actor, as resolved by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Principal {
    /// A user who requests reservations
    Guest {
        /// Guest id
        id: GuestId,
        /// Login email
        email: String,
    },
    /// A user who lists properties and manages their reservations
    Owner {
        /// Owner id
        id: OwnerId,
        /// Login email
        email: String,
    },
}

impl Principal {
    /// Login email of either kind of principal
    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Self::Guest { email, .. } | Self::Owner { email, .. } => email,
        }
    }

    /// The owner id, if this principal is an owner
    #[must_use]
    pub const fn owner_id(&self) -> Option<OwnerId> {
        match self {
            Self::Owner { id, .. } => Some(*id),
            Self::Guest { .. } => None,
        }
    }

    /// The guest id, if this principal is a guest
    #[must_use]
    pub const fn guest_id(&self) -> Option<GuestId> {
        match self {
            Self::Guest { id, .. } => Some(*id),
            Self::Owner { .. } => None,
        }
    }
}

// ============================================================================
// Property
// ============================================================================

/// A rentable property. Exactly one owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Property ID
    pub id: PropertyId,
    /// Owning principal
    pub owner_id: OwnerId,
    /// Owner's contact address, used for reservation notices
    pub owner_email: String,
    /// Listing title, e.g. "Apartamento Novo"
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Number of rooms
    pub rooms: u32,
    /// Number of bathrooms
    pub bathrooms: u32,
    /// Whether pets are welcome
    pub pets_allowed: bool,
    /// Price per night in cents
    pub daily_rate_cents: u64,
    /// Category name, e.g. "Apartamento"
    pub property_type: String,
    /// When the listing was created
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Reservation
// ============================================================================

/// Reservation lifecycle status
///
/// ```text
/// Pending ──accept──▶ Accepted ──cancel──▶ Canceled
///    └───────────────cancel──────────────────▲
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Requested by a guest, awaiting the owner
    Pending,
    /// Confirmed by the owner
    Accepted,
    /// Withdrawn by the owner (terminal)
    Canceled,
}

impl ReservationStatus {
    /// Whether the lifecycle permits moving from `self` to `next`
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted | Self::Canceled) | (Self::Accepted, Self::Canceled)
        )
    }

    /// Stable lowercase name, used in logs, metrics and storage
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Canceled => "canceled",
        }
    }

    /// Localized (pt-BR) label shown to users
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Accepted => "Aceita",
            Self::Canceled => "Cancelada",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A guest's request to stay at a property.
///
/// Carries snapshots of the property owner and title so that lifecycle rules
/// can be checked without another round trip to the property store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Reservation ID
    pub id: ReservationId,
    /// Target property
    pub property_id: PropertyId,
    /// Title of the property when the reservation was made
    pub property_title: String,
    /// Owner of the target property
    pub owner_id: OwnerId,
    /// Owner contact address, for the new-reservation notice
    pub owner_email: String,
    /// Requesting guest
    pub guest_id: GuestId,
    /// Guest email, shown to the owner
    pub guest_email: String,
    /// First night
    pub start_date: NaiveDate,
    /// Departure day
    pub end_date: NaiveDate,
    /// Number of people staying
    pub guests: u32,
    /// Current status
    pub status: ReservationStatus,
    /// When the guest made the request
    pub created_at: DateTime<Utc>,
    /// Last status change
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Number of nights between start and end dates
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

// ============================================================================
// State
// ============================================================================

/// State owned by the reservation reducer
#[derive(Clone, Debug, Default)]
pub struct ReservationState {
    /// All reservations indexed by ID
    pub reservations: HashMap<ReservationId, Reservation>,
}

impl ReservationState {
    /// Creates a new empty `ReservationState`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State holding previously saved reservations
    #[must_use]
    pub fn from_reservations(reservations: impl IntoIterator<Item = Reservation>) -> Self {
        Self {
            reservations: reservations.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    /// Gets a reservation by ID
    #[must_use]
    pub fn get(&self, id: &ReservationId) -> Option<&Reservation> {
        self.reservations.get(id)
    }

    /// Checks if a reservation exists
    #[must_use]
    pub fn exists(&self, id: &ReservationId) -> bool {
        self.reservations.contains_key(id)
    }

    /// Returns the number of reservations
    #[must_use]
    pub fn count(&self) -> usize {
        self.reservations.len()
    }

    /// Reservations for one property, oldest first
    #[must_use]
    pub fn for_property(&self, property_id: PropertyId) -> Vec<Reservation> {
        self.collect_sorted(|r| r.property_id == property_id, false)
    }

    /// Reservations across every property of an owner, newest first
    #[must_use]
    pub fn for_owner(&self, owner_id: OwnerId) -> Vec<Reservation> {
        self.collect_sorted(|r| r.owner_id == owner_id, true)
    }

    /// Reservations made by a guest, newest first
    #[must_use]
    pub fn for_guest(&self, guest_id: GuestId) -> Vec<Reservation> {
        self.collect_sorted(|r| r.guest_id == guest_id, true)
    }

    fn collect_sorted<F>(&self, keep: F, newest_first: bool) -> Vec<Reservation>
    where
        F: Fn(&Reservation) -> bool,
    {
        let mut found: Vec<Reservation> = self
            .reservations
            .values()
            .filter(|r| keep(r))
            .cloned()
            .collect();
        found.sort_by_key(|r| (r.created_at, *r.id.as_uuid()));
        if newest_first {
            found.reverse();
        }
        found
    }
}
