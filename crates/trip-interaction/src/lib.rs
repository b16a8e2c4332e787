//! Interaction layer: the boundary between the trip-planning core and the
//! external capability handlers.
//!
//! Everything natural-language lives on the far side of
//! [`handler::CapabilityHandler`]; this crate owns the contract, the
//! fragment aggregation, and the strict parsers that turn handler prose
//! into typed domain values.

pub mod aggregator;
pub mod destination;
pub mod handler;
pub mod itinerary_format;
pub mod prompts;
pub mod suggestions;

pub use aggregator::{aggregate, Aggregated};
pub use destination::{parse_destination_list, request_destinations, DestinationOutcome};
pub use handler::{CapabilityHandler, FragmentStream, HandlerContext, HandlerError, HandlerRegistry};
pub use itinerary_format::parse_itinerary;
pub use suggestions::suggest_next_actions;
