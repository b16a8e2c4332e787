//! Core domain for the trip planner: sessions, intent routing, and the
//! booking state machine.
//!
//! This crate holds everything with real control flow and state. Natural
//! language understanding, data gathering and itinerary authoring are
//! external capability handlers (see the interaction crate); transport and
//! endpoint wiring live outside the workspace entirely.

pub mod booking;
pub mod config;
pub mod error;
pub mod intent;
pub mod itinerary;
pub mod session;

// Re-export common error type
pub use error::{Result, TripError};
