//! Session domain model.

use crate::booking::Booking;
use crate::itinerary::Itinerary;
use crate::session::message::ConversationMessage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The per-user conversational context spanning messages, itinerary and
/// booking state across turns.
///
/// A session is created on a user's first turn, mutated only by the turn
/// currently being processed, and destroyed on explicit close. Message
/// history is append-only; the itinerary is replaced wholesale on
/// replanning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// The user this session belongs to
    pub user_id: String,
    /// Conversation history in append order
    pub messages: Vec<ConversationMessage>,
    /// Current itinerary, if planning has produced one
    pub itinerary: Option<Itinerary>,
    /// Current booking, if checkout has started
    pub booking: Option<Booking>,
    /// Destination candidates from the last suggestion turn
    #[serde(default)]
    pub candidate_destinations: Vec<String>,
    /// The destination the user settled on, once they pick a candidate
    #[serde(default)]
    pub selected_destination: Option<String>,
    /// Opaque handle to the external handler-side session, if any
    pub handler_session_id: Option<String>,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format)
    pub updated_at: String,
}

impl Session {
    /// Creates an empty session for a user with a fresh id.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            messages: Vec::new(),
            itinerary: None,
            booking: None,
            candidate_destinations: Vec::new(),
            selected_destination: None,
            handler_session_id: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Returns the destination this session has settled on, if any.
    ///
    /// An itinerary's destination takes precedence over a bare selection
    /// since the itinerary is the later, more concrete artifact.
    pub fn destination(&self) -> Option<&str> {
        self.itinerary
            .as_ref()
            .map(|itinerary| itinerary.destination.as_str())
            .or(self.selected_destination.as_deref())
    }
}
