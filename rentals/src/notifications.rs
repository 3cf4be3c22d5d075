//! Owner notifications.
//!
//! When a guest requests a reservation the property owner gets a notice.
//! Delivery is best effort: the reducer dispatches it on a spawned effect and
//! only records the outcome.

use crate::types::Reservation;
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// Notification delivery failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// The transport rejected or dropped the message
    #[error("Failed to deliver notification: {0}")]
    Delivery(String),
}

/// Sends reservation notices to property owners.
#[async_trait]
pub trait ReservationNotifier: Send + Sync {
    /// Tell the property owner about a new reservation request.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] if the notice could not be delivered.
    async fn notify_new_reservation(&self, reservation: &Reservation) -> Result<(), NotificationError>;
}

/// A rendered notice, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerNotice {
    /// Sender address
    pub from: String,
    /// Owner address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
}

impl OwnerNotice {
    /// Render the new-reservation notice for `reservation`.
    #[must_use]
    pub fn new_reservation(reservation: &Reservation, from: &str, base_url: &str) -> Self {
        let link = format!(
            "{}/api/reservations/{}",
            base_url.trim_end_matches('/'),
            reservation.id
        );
        let body = format!(
            "Reserva de {guest}\n\
             Imóvel: {title}\n\
             Data de Início: {start}\n\
             Data de Saída: {end}\n\
             Total de Pessoas: {guests}\n\
             \n\
             Aceite ou cancele em {link}",
            guest = reservation.guest_email,
            title = reservation.property_title,
            start = crate::views::format_date(reservation.start_date),
            end = crate::views::format_date(reservation.end_date),
            guests = reservation.guests,
        );

        Self {
            from: from.to_string(),
            to: reservation.owner_email.clone(),
            subject: format!("Nova reserva para {}", reservation.property_title),
            body,
        }
    }
}

/// Console notifier (writes notices to the log for development)
///
/// In production, replace with an SMTP or provider-backed notifier.
#[derive(Debug, Clone)]
pub struct ConsoleNotifier {
    from_address: String,
    base_url: String,
}

impl ConsoleNotifier {
    /// Create a console notifier
    ///
    /// # Arguments
    /// * `from_address` - Sender shown on the notice
    /// * `base_url` - Public base URL for links (e.g., `http://localhost:8080`)
    #[must_use]
    pub fn new(from_address: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            from_address: from_address.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ReservationNotifier for ConsoleNotifier {
    async fn notify_new_reservation(&self, reservation: &Reservation) -> Result<(), NotificationError> {
        let notice = OwnerNotice::new_reservation(reservation, &self.from_address, &self.base_url);

        info!(
            "\n\n\
            ┌────────────────────────────────────────────────────────────────┐\n\
            │                    New Reservation Notice                      │\n\
            ├────────────────────────────────────────────────────────────────┤\n\
            │ From: {:<56} │\n\
            │ To: {:<58} │\n\
            │ Subject: {:<53} │\n\
            └────────────────────────────────────────────────────────────────┘\n\
            {}\n",
            notice.from, notice.to, notice.subject, notice.body
        );

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{GuestId, OwnerId, PropertyId, ReservationId, ReservationStatus};
    use chrono::{NaiveDate, Utc};

    fn reservation() -> Reservation {
        Reservation {
            id: ReservationId::new(),
            property_id: PropertyId::new(),
            property_title: "Apartamento Novo".to_string(),
            owner_id: OwnerId::new(),
            owner_email: "john@doe.com.br".to_string(),
            guest_id: GuestId::new(),
            guest_email: "andrew@doe.com.br".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 8).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            guests: 6,
            status: ReservationStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn notice_is_addressed_to_owner() {
        let reservation = reservation();
        let notice =
            OwnerNotice::new_reservation(&reservation, "reservas@staybook.local", "http://localhost:8080/");

        assert_eq!(notice.to, "john@doe.com.br");
        assert_eq!(notice.subject, "Nova reserva para Apartamento Novo");
        assert!(notice.body.contains("Reserva de andrew@doe.com.br"));
        assert!(notice.body.contains("Data de Início: 08/01/2025"));
        assert!(notice.body.contains("Total de Pessoas: 6"));
        assert!(notice.body.contains(&format!(
            "http://localhost:8080/api/reservations/{}",
            reservation.id
        )));
    }

    #[tokio::test]
    async fn console_notifier_always_succeeds() {
        let notifier = ConsoleNotifier::new("reservas@staybook.local", "http://localhost:8080");
        assert!(notifier.notify_new_reservation(&reservation()).await.is_ok());
    }
}
