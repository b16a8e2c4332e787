//! Itinerary domain model.
//!
//! An itinerary is produced by the planning capability handler. Its prose
//! content is opaque to the core; the bookable items attached to it are the
//! typed part the booking state machine consumes. Itineraries are replaced
//! wholesale on replanning, never partially mutated.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Category of a bookable item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Hotels, homestays, resorts
    Lodging,
    /// Flights, trains, buses, transfers
    Transport,
    /// Tours, experiences, events
    Activity,
    /// Restaurant reservations
    Dining,
}

/// One schedulable entry of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookableItem {
    /// Display name of the item
    pub name: String,
    /// Item category
    pub item_type: ItemType,
    /// Date of the activity (free-form, as planned)
    pub date: String,
    /// Start time
    pub time: String,
    /// Duration of the activity
    pub duration: String,
    /// Cost in the trip currency; must be non-negative to be reservable
    pub cost: f64,
    /// Whether this item requires an actual reservation
    pub booking_required: bool,
}

/// A day-by-day plan for a chosen destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    /// Unique itinerary identifier (UUID format)
    pub id: String,
    /// The destination this plan covers
    pub destination: String,
    /// Day-by-day plan text as produced by the planning handler
    pub content: String,
    /// Ordered list of schedulable items extracted from the plan
    pub items: Vec<BookableItem>,
}

impl Itinerary {
    /// Creates a new itinerary with a fresh id.
    pub fn new(
        destination: impl Into<String>,
        content: impl Into<String>,
        items: Vec<BookableItem>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            destination: destination.into(),
            content: content.into(),
            items,
        }
    }

    /// Returns the items that require an actual reservation.
    pub fn bookable(&self) -> impl Iterator<Item = &BookableItem> {
        self.items.iter().filter(|item| item.booking_required)
    }
}
