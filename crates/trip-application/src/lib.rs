//! Application layer: the trip planner use case.
//!
//! Composes the session store, intent router, capability handlers and
//! booking engine into the operations a transport layer exposes.

pub mod planner_usecase;

pub use planner_usecase::{BookingResult, LiveStatus, PaymentInfo, TripPlanner, TurnOutput};
