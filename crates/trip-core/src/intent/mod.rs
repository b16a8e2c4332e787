//! Intent routing.
//!
//! Classifies each incoming user turn against the session state and picks
//! exactly one routing target. The classification is a deterministic,
//! priority-ordered rule table: the first matching rule wins, and a turn
//! that matches nothing produces no route at all; the caller answers with
//! a clarifying question instead of guessing.

use crate::session::Session;
use serde::{Deserialize, Serialize};

/// The classified purpose of one user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Suggest candidate destinations when the user has none
    SuggestDestination,
    /// Draft a day-by-day itinerary for a known destination
    PlanItinerary,
    /// Start the booking flow for the current itinerary
    Book,
    /// Gather travel data (weather, events, local conditions)
    AggregateData,
    /// Improve an existing itinerary against constraints
    Optimize,
    /// Tailor recommendations to the user's profile
    Personalize,
    /// Report live trip conditions
    Monitor,
}

/// The minimal context payload forwarded to the selected handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteContext {
    /// The user's constraints, i.e. the turn text itself
    pub constraints: String,
    /// Prior itinerary content, if any
    pub itinerary: Option<String>,
    /// Prior candidate destinations, if any
    pub candidate_destinations: Vec<String>,
}

/// One selected routing target plus its forwarded context.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub intent: Intent,
    pub context: RouteContext,
}

/// Trigger-phrase tables driving the rule evaluation.
///
/// All matching is case-insensitive substring containment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Explicit booking intent; overrides every other signal in the turn
    pub booking_triggers: Vec<String>,
    /// Openness/uncertainty about the destination
    pub openness_markers: Vec<String>,
    /// Requests for a concrete plan
    pub plan_markers: Vec<String>,
    /// Data-gathering requests
    pub aggregate_markers: Vec<String>,
    /// Itinerary improvement requests
    pub optimize_markers: Vec<String>,
    /// Personalization requests
    pub personalize_markers: Vec<String>,
    /// Live-status requests
    pub monitor_markers: Vec<String>,
}

fn phrases(list: &[&str]) -> Vec<String> {
    list.iter().map(|phrase| phrase.to_string()).collect()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            booking_triggers: phrases(&[
                "proceed to booking",
                "confirm this itinerary",
                "book this",
                "let's book this",
                "book it",
                "complete the booking",
            ]),
            openness_markers: phrases(&[
                "no destination",
                "not sure where",
                "don't know where",
                "anywhere",
                "somewhere",
                "suggest",
                "recommend",
                "ideas",
                "where should",
                "open to",
            ]),
            plan_markers: phrases(&["itinerary", "plan", "day-by-day", "schedule"]),
            aggregate_markers: phrases(&[
                "weather",
                "events",
                "local information",
                "transport options",
                "current conditions",
            ]),
            optimize_markers: phrases(&[
                "optimize",
                "cheaper",
                "rearrange",
                "too rushed",
                "improve the",
            ]),
            personalize_markers: phrases(&[
                "personalize",
                "my interests",
                "my style",
                "tailor",
                "based on my profile",
            ]),
            monitor_markers: phrases(&[
                "live status",
                "any delays",
                "track my",
                "real-time update",
                "monitor",
            ]),
        }
    }
}

/// Deterministic, priority-ordered intent classifier.
#[derive(Debug, Clone, Default)]
pub struct IntentRouter {
    config: RouterConfig,
}

impl IntentRouter {
    /// Creates a router with the given trigger tables.
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    /// Returns the candidate destination named in the message, if any.
    ///
    /// Used both by rule 3 (a destination becomes "known" the moment the
    /// user names a candidate) and by the caller to record the selection
    /// after the turn commits.
    pub fn match_candidate(&self, message: &str, session: &Session) -> Option<String> {
        let lowered = message.to_lowercase();
        session
            .candidate_destinations
            .iter()
            .find(|candidate| lowered.contains(&candidate.to_lowercase()))
            .cloned()
    }

    /// Classifies one user turn against the session state.
    ///
    /// Rules, in strict priority order (first match wins):
    /// 1. any booking trigger → `Book`, regardless of other signals
    /// 2. no destination known and the turn expresses openness → `SuggestDestination`
    /// 3. a destination is known (or named in this turn) and a plan is requested → `PlanItinerary`
    /// 4. capability keywords → `AggregateData` / `Optimize` / `Personalize` / `Monitor`
    /// 5. otherwise `None`; the router never guesses
    pub fn classify(&self, message: &str, session: &Session) -> Option<Route> {
        let lowered = message.to_lowercase();
        let contains_any =
            |markers: &[String]| markers.iter().any(|marker| lowered.contains(marker.as_str()));

        let context = RouteContext {
            constraints: message.to_string(),
            itinerary: session
                .itinerary
                .as_ref()
                .map(|itinerary| itinerary.content.clone()),
            candidate_destinations: session.candidate_destinations.clone(),
        };
        let route = |intent| Some(Route { intent, context });

        if contains_any(&self.config.booking_triggers) {
            return route(Intent::Book);
        }

        let destination_known =
            session.destination().is_some() || self.match_candidate(message, session).is_some();

        if !destination_known && contains_any(&self.config.openness_markers) {
            return route(Intent::SuggestDestination);
        }

        if destination_known && contains_any(&self.config.plan_markers) {
            return route(Intent::PlanItinerary);
        }

        if contains_any(&self.config.aggregate_markers) {
            return route(Intent::AggregateData);
        }
        if contains_any(&self.config.optimize_markers) {
            return route(Intent::Optimize);
        }
        if contains_any(&self.config.personalize_markers) {
            return route(Intent::Personalize);
        }
        if contains_any(&self.config.monitor_markers) {
            return route(Intent::Monitor);
        }

        None
    }
}
