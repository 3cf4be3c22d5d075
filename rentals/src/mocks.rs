//! In-process test doubles for the rentals collaborators.

use crate::notifications::{NotificationError, ReservationNotifier};
use crate::repository::{
    InMemoryReservationRepository, RepositoryError, ReservationRepository,
};
use crate::types::Reservation;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Records every notice instead of sending it.
///
/// Clones share the same log, so a test can keep one handle and give the
/// other to the environment.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Reservation>>>,
}

impl RecordingNotifier {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reservations notified so far, in delivery order
    #[must_use]
    pub fn sent(&self) -> Vec<Reservation> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    /// Number of notices delivered
    #[must_use]
    pub fn count(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or_default()
    }
}

#[async_trait]
impl ReservationNotifier for RecordingNotifier {
    async fn notify_new_reservation(&self, reservation: &Reservation) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .map_err(|_| NotificationError::Delivery("recorder lock poisoned".to_string()))?
            .push(reservation.clone());
        Ok(())
    }
}

/// Fails every delivery, for exercising the best-effort path.
#[derive(Debug, Clone, Default)]
pub struct FailingNotifier;

#[async_trait]
impl ReservationNotifier for FailingNotifier {
    async fn notify_new_reservation(&self, _reservation: &Reservation) -> Result<(), NotificationError> {
        Err(NotificationError::Delivery("mail server unavailable".to_string()))
    }
}

/// In-memory repository whose saves can be switched to fail.
///
/// Clones share storage and the switch.
#[derive(Debug, Clone, Default)]
pub struct SwitchableRepository {
    inner: Arc<InMemoryReservationRepository>,
    failing: Arc<AtomicBool>,
}

impl SwitchableRepository {
    /// Create an empty repository that accepts saves
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following save fail (`true`) or succeed (`false`)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReservationRepository for SwitchableRepository {
    async fn save(&self, reservation: &Reservation) -> Result<(), RepositoryError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage("database unavailable".to_string()));
        }
        self.inner.save(reservation).await
    }

    async fn load_all(&self) -> Result<Vec<Reservation>, RepositoryError> {
        self.inner.load_all().await
    }
}
