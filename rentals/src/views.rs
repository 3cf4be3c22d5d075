//! Presentation models.
//!
//! Dates are rendered both as supplied (ISO 8601) and as pt-BR labels
//! (`dd/mm/yyyy`). The `can_*` flags come from [`Affordances`], which runs the
//! lifecycle's own checks; they only decide what to offer, never what is
//! allowed.

use crate::service::Affordances;
use crate::types::{Property, PropertyId, Reservation, ReservationId, ReservationStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

/// Format a date the way pt-BR users read it (`dd/mm/yyyy`)
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// A reservation as shown to a principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationView {
    /// Reservation ID
    pub id: ReservationId,
    /// Target property
    pub property_id: PropertyId,
    /// Property title
    pub property_title: String,
    /// "Reserva de <guest email>"
    pub heading: String,
    /// Guest email
    pub guest_email: String,
    /// Start date as supplied
    pub start_date: NaiveDate,
    /// Start date, `dd/mm/yyyy`
    pub start_date_label: String,
    /// End date as supplied
    pub end_date: NaiveDate,
    /// End date, `dd/mm/yyyy`
    pub end_date_label: String,
    /// Nights between start and end
    pub nights: i64,
    /// Number of people
    pub guests: u32,
    /// Machine status
    pub status: ReservationStatus,
    /// Localized status
    pub status_label: &'static str,
    /// Whether to offer "Aceitar Reserva"
    pub can_accept: bool,
    /// Whether to offer "Cancelar Reserva"
    pub can_cancel: bool,
    /// When the guest made the request
    pub created_at: DateTime<Utc>,
}

impl ReservationView {
    /// Build the view of `reservation` with the given affordances
    #[must_use]
    pub fn new(reservation: &Reservation, affordances: Affordances) -> Self {
        Self {
            id: reservation.id,
            property_id: reservation.property_id,
            property_title: reservation.property_title.clone(),
            heading: format!("Reserva de {}", reservation.guest_email),
            guest_email: reservation.guest_email.clone(),
            start_date: reservation.start_date,
            start_date_label: format_date(reservation.start_date),
            end_date: reservation.end_date,
            end_date_label: format_date(reservation.end_date),
            nights: reservation.nights(),
            guests: reservation.guests,
            status: reservation.status,
            status_label: reservation.status.label(),
            can_accept: affordances.can_accept,
            can_cancel: affordances.can_cancel,
            created_at: reservation.created_at,
        }
    }
}

/// Plain-text rendering of the reservation card
impl fmt::Display for ReservationView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        writeln!(f, "Data de Início: {}", self.start_date_label)?;
        writeln!(f, "Data de Saída: {}", self.end_date_label)?;
        writeln!(f, "Total de Pessoas: {}", self.guests)?;
        write!(f, "Status: {}", self.status_label)?;
        if self.can_accept {
            write!(f, "\n[Aceitar Reserva]")?;
        }
        if self.can_cancel {
            write!(f, "\n[Cancelar Reserva]")?;
        }
        Ok(())
    }
}

/// A property page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyView {
    /// Property ID
    pub id: PropertyId,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Rooms
    pub rooms: u32,
    /// Bathrooms
    pub bathrooms: u32,
    /// Pets welcome
    pub pets_allowed: bool,
    /// Nightly rate in cents
    pub daily_rate_cents: u64,
    /// Category
    pub property_type: String,
    /// Whether to offer "Reserve Agora" (guests only)
    pub can_reserve: bool,
    /// Reservations the viewer may see
    pub reservations: Vec<ReservationView>,
}

impl PropertyView {
    /// Build a property page
    #[must_use]
    pub fn new(property: Property, can_reserve: bool, reservations: Vec<ReservationView>) -> Self {
        Self {
            id: property.id,
            title: property.title,
            description: property.description,
            rooms: property.rooms,
            bathrooms: property.bathrooms,
            pets_allowed: property.pets_allowed,
            daily_rate_cents: property.daily_rate_cents,
            property_type: property.property_type,
            can_reserve,
            reservations,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{GuestId, OwnerId};

    fn reservation(status: ReservationStatus) -> Reservation {
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
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn formats_dates_day_first() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        assert_eq!(format_date(date), "04/03/2025");
    }

    #[test]
    fn card_shows_localized_fields() {
        let view = ReservationView::new(
            &reservation(ReservationStatus::Pending),
            Affordances {
                can_accept: true,
                can_cancel: true,
            },
        );

        assert_eq!(
            view.to_string(),
            "Reserva de andrew@doe.com.br\n\
             Data de Início: 08/01/2025\n\
             Data de Saída: 15/01/2025\n\
             Total de Pessoas: 6\n\
             Status: Pendente\n\
             [Aceitar Reserva]\n\
             [Cancelar Reserva]"
        );
    }

    #[test]
    fn serializes_dates_as_supplied() {
        let view = ReservationView::new(
            &reservation(ReservationStatus::Accepted),
            Affordances::default(),
        );
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["start_date"], "2025-01-08");
        assert_eq!(json["start_date_label"], "08/01/2025");
        assert_eq!(json["nights"], 7);
        assert_eq!(json["status"], "accepted");
        assert_eq!(json["status_label"], "Aceita");
        assert_eq!(json["can_cancel"], false);
    }
}
