//! Reducers for the rentals domain.

pub mod reservation;

pub use reservation::{ReservationAction, ReservationEnvironment, ReservationReducer};
