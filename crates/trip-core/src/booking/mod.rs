//! Booking domain module.
//!
//! Contains the reservation/payment domain model and the booking state
//! machine that drives it.
//!
//! # Module Structure
//!
//! - `model`: Reservation, payment and booking types
//! - `engine`: The `BookingEngine` state machine and payment policies

mod engine;
mod model;

// Re-export public API
pub use engine::{BookingEngine, PaymentPolicy, SimulatedGateway};
pub use model::{
    Booking, BookingStatus, PaymentMethod, PaymentOutcome, PaymentTransaction, Reservation,
    ReservationStatus,
};
