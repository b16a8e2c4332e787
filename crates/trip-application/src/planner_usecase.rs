//! Trip planner use case.
//!
//! `TripPlanner` wires the session store, the intent router, the capability
//! handlers and the booking engine into the operations a transport layer
//! would expose. Each turn follows the same shape: snapshot the session,
//! classify, dispatch to at most one handler, aggregate its reply, and only
//! then commit the whole turn to the session under its lock. A cancelled
//! turn commits nothing.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use trip_core::booking::{
    Booking, BookingEngine, BookingStatus, PaymentMethod, PaymentTransaction, Reservation,
};
use trip_core::config::PlannerConfig;
use trip_core::intent::{Intent, IntentRouter, Route};
use trip_core::itinerary::Itinerary;
use trip_core::session::{ConversationMessage, Session, SessionStore};
use trip_core::{Result, TripError};
use trip_interaction::handler::{HandlerContext, HandlerError};
use trip_interaction::{
    aggregate, parse_itinerary, prompts, request_destinations, suggest_next_actions, Aggregated,
    DestinationOutcome, HandlerRegistry,
};

/// What a completed turn hands back to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutput {
    /// The full aggregated reply for this turn
    pub response_text: String,
    /// Canned follow-up suggestions derived from the reply
    pub suggestions: Vec<String>,
}

/// Payment details supplied at checkout.
#[derive(Debug, Clone, Copy)]
pub struct PaymentInfo {
    pub method: PaymentMethod,
}

/// Outcome of a checkout or payment retry.
#[derive(Debug, Clone)]
pub struct BookingResult {
    /// The booking, with its aggregate status
    pub booking: Booking,
    /// Per-reservation snapshots after processing
    pub reservations: Vec<Reservation>,
    /// Every payment attempt made so far, across all reservations
    pub transactions: Vec<PaymentTransaction>,
    /// Human-readable outcome summary
    pub message: String,
}

/// Current itinerary and booking state of a session.
#[derive(Debug, Clone)]
pub struct LiveStatus {
    pub itinerary: Option<Itinerary>,
    pub booking: Option<Booking>,
}

/// State committed alongside the turn's messages.
enum TurnEffect {
    None,
    Candidates(Vec<String>),
    Itinerary(Itinerary),
}

/// Orchestrates sessions, routing, capability handlers and bookings.
pub struct TripPlanner {
    sessions: Arc<SessionStore>,
    bookings: Arc<BookingEngine>,
    handlers: HandlerRegistry,
    router: IntentRouter,
    config: PlannerConfig,
}

impl TripPlanner {
    /// Creates a planner with the default router and the simulated payment
    /// gateway.
    pub fn new(handlers: HandlerRegistry, config: PlannerConfig) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new()),
            bookings: Arc::new(BookingEngine::simulated()),
            handlers,
            router: IntentRouter::default(),
            config,
        }
    }

    /// Replaces the intent router, e.g. with customized trigger tables.
    pub fn with_router(mut self, router: IntentRouter) -> Self {
        self.router = router;
        self
    }

    /// Starts a new session for a user.
    pub async fn create_session(&self, user_id: &str) -> Session {
        tracing::info!("[TripPlanner] Creating session for user {}", user_id);
        self.sessions.create_session(user_id).await
    }

    /// Returns a session's full conversation history in append order.
    pub async fn get_history(&self, session_id: &str) -> Result<Vec<ConversationMessage>> {
        Ok(self.sessions.snapshot(session_id).await?.messages)
    }

    /// Returns the session's current itinerary and booking state.
    pub async fn get_live_status(&self, session_id: &str) -> Result<LiveStatus> {
        let session = self.sessions.snapshot(session_id).await?;
        Ok(LiveStatus {
            itinerary: session.itinerary,
            booking: session.booking,
        })
    }

    /// Closes a session, dropping all of its state.
    pub async fn close_session(&self, session_id: &str) -> Result<()> {
        self.sessions.close_session(session_id).await
    }

    /// Evicts sessions idle beyond the configured timeout, returning the
    /// evicted ids. A no-op unless the configuration sets one.
    pub async fn evict_idle_sessions(&self) -> Vec<String> {
        self.sessions
            .evict_idle(&self.config.lifecycle_policy())
            .await
    }

    /// Processes one user turn end to end.
    ///
    /// The turn is classified, dispatched to at most one capability handler
    /// (guarded by the configured timeout), and committed atomically: user
    /// message, reply and any routing side effects land in one locked
    /// write. Turns on the same session are strictly serialized; a
    /// concurrent call queues until the in-flight turn commits. If `cancel`
    /// fires mid-stream nothing is committed and the call fails with
    /// [`TripError::Cancelled`].
    pub async fn send_message(
        &self,
        session_id: &str,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<TurnOutput> {
        let _turn = self.sessions.turn_guard(session_id).await?;
        let session = self.sessions.snapshot(session_id).await?;
        let route = self.router.classify(text, &session);
        let selected = self.router.match_candidate(text, &session);
        tracing::info!(
            "[TripPlanner] Turn on session {} routed to {:?}",
            session_id,
            route.as_ref().map(|route| route.intent)
        );

        let (reply, effect) = match route {
            None => (
                ConversationMessage::system(prompts::CLARIFICATION),
                TurnEffect::None,
            ),
            Some(route) => self.dispatch(&session, text, route, cancel).await?,
        };

        let response_text = reply.content.clone();
        let user_message = ConversationMessage::user(text);
        self.sessions
            .update(session_id, move |session| {
                session.messages.push(user_message);
                session.messages.push(reply);
                if let Some(destination) = selected {
                    session.selected_destination = Some(destination);
                }
                match effect {
                    TurnEffect::None => {}
                    TurnEffect::Candidates(names) => session.candidate_destinations = names,
                    TurnEffect::Itinerary(itinerary) => session.itinerary = Some(itinerary),
                }
            })
            .await?;

        let suggestions = suggest_next_actions(&response_text);
        Ok(TurnOutput {
            response_text,
            suggestions,
        })
    }

    async fn dispatch(
        &self,
        session: &Session,
        text: &str,
        route: Route,
        cancel: &CancellationToken,
    ) -> Result<(ConversationMessage, TurnEffect)> {
        let context = HandlerContext::from(route.context);
        match route.intent {
            Intent::Book => {
                let itinerary = session
                    .itinerary
                    .as_ref()
                    .ok_or_else(|| TripError::validation("no itinerary to book"))?;
                Ok((
                    ConversationMessage::system(booking_summary(itinerary)),
                    TurnEffect::None,
                ))
            }
            Intent::SuggestDestination => {
                let handler = self.handlers.resolve(Intent::SuggestDestination)?;
                let prompt = format!(
                    "{}\n\nUser request: {}",
                    prompts::DESTINATION_SUGGESTER,
                    text
                );
                let outcome = self
                    .with_deadline(request_destinations(
                        handler.as_ref(),
                        &prompt,
                        &context,
                        cancel,
                    ))
                    .await??;
                match outcome {
                    DestinationOutcome::Cancelled => Err(TripError::Cancelled),
                    DestinationOutcome::Names { raw, names } => Ok((
                        ConversationMessage::handler(raw),
                        TurnEffect::Candidates(names),
                    )),
                }
            }
            Intent::PlanItinerary => {
                // classify() only picks this route when a destination is
                // known or named in the turn
                let destination = session
                    .destination()
                    .map(str::to_string)
                    .or_else(|| self.router.match_candidate(text, session))
                    .ok_or_else(|| TripError::validation("no destination selected"))?;
                let itinerary = self
                    .plan_itinerary(&destination, text, &context, cancel)
                    .await?;
                Ok((
                    ConversationMessage::handler(itinerary.content.clone()),
                    TurnEffect::Itinerary(itinerary),
                ))
            }
            intent => {
                let prompt = format!("{}\n\nUser request: {}", base_prompt(intent), text);
                let reply = self.invoke(intent, &prompt, &context, cancel).await?;
                Ok((ConversationMessage::handler(reply), TurnEffect::None))
            }
        }
    }

    /// Invokes one capability handler and aggregates its reply under the
    /// configured deadline.
    async fn invoke(
        &self,
        intent: Intent,
        prompt: &str,
        context: &HandlerContext,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let handler = self.handlers.resolve(intent)?;
        let aggregated = self
            .with_deadline(async {
                let stream = handler.invoke(prompt, context).await?;
                Ok::<_, TripError>(aggregate(stream, cancel).await)
            })
            .await??;
        match aggregated {
            Aggregated::Cancelled => Err(TripError::Cancelled),
            Aggregated::Complete(text) => Ok(text),
        }
    }

    async fn with_deadline<T>(
        &self,
        fut: impl std::future::Future<Output = T>,
    ) -> Result<T> {
        let deadline = self.config.handler_timeout();
        tokio::time::timeout(deadline, fut)
            .await
            .map_err(|_| HandlerError::Timeout(deadline).into())
    }

    async fn plan_itinerary(
        &self,
        destination: &str,
        constraints: &str,
        context: &HandlerContext,
        cancel: &CancellationToken,
    ) -> Result<Itinerary> {
        let prompt = format!(
            "{}\n\nDestination: {}\nUser request: {}",
            prompts::PLANNER,
            destination,
            constraints
        );
        let text = self
            .invoke(Intent::PlanItinerary, &prompt, context, cancel)
            .await?;
        parse_itinerary(destination, &text)
    }

    /// Generates a fresh itinerary from explicit preferences, replacing the
    /// session's current one wholesale.
    pub async fn generate_itinerary(
        &self,
        session_id: &str,
        preferences: &str,
    ) -> Result<Itinerary> {
        let _turn = self.sessions.turn_guard(session_id).await?;
        let session = self.sessions.snapshot(session_id).await?;
        let destination = session
            .destination()
            .map(str::to_string)
            .ok_or_else(|| TripError::validation("no destination selected"))?;
        tracing::info!(
            "[TripPlanner] Generating itinerary for session {} ({})",
            session_id,
            destination
        );

        let context = HandlerContext {
            constraints: preferences.to_string(),
            itinerary: session.itinerary.map(|itinerary| itinerary.content),
            candidate_destinations: session.candidate_destinations,
        };
        let itinerary = self
            .plan_itinerary(&destination, preferences, &context, &CancellationToken::new())
            .await?;
        self.sessions
            .set_itinerary(session_id, itinerary.clone())
            .await?;
        Ok(itinerary)
    }

    /// Books the session's itinerary: one reservation per booking-required
    /// item, each paid with the supplied method.
    ///
    /// The booking is confirmed only if every payment is approved; declined
    /// reservations stay retryable via [`TripPlanner::retry_payment`]. A
    /// session carries at most one booking; checking out again is rejected
    /// so paid reservations are never orphaned.
    pub async fn checkout(&self, session_id: &str, payment: &PaymentInfo) -> Result<BookingResult> {
        let _turn = self.sessions.turn_guard(session_id).await?;
        let session = self.sessions.snapshot(session_id).await?;
        if session.booking.is_some() {
            return Err(TripError::validation(
                "itinerary is already booked; retry payment for declined reservations instead",
            ));
        }
        let itinerary = session
            .itinerary
            .ok_or_else(|| TripError::validation("no itinerary to book"))?;
        let items: Vec<_> = itinerary.bookable().cloned().collect();
        if items.is_empty() {
            return Err(TripError::validation("itinerary has no bookable items"));
        }
        tracing::info!(
            "[TripPlanner] Checkout on session {}: {} item(s) via {}",
            session_id,
            items.len(),
            payment.method
        );

        let mut reservation_ids = Vec::new();
        for item in items {
            let reservation = self.bookings.create_reservation(vec![item]).await?;
            self.bookings
                .choose_payment_method(&reservation.id, payment.method)
                .await?;
            self.bookings
                .process_payment(&reservation.id, payment.method, reservation.total_cost)
                .await?;
            reservation_ids.push(reservation.id);
        }

        let status = self.bookings.booking_status(&reservation_ids).await?;
        let booking = Booking::new(itinerary.id.clone(), reservation_ids, status);
        self.sessions.set_booking(session_id, booking.clone()).await?;
        self.booking_result(booking).await
    }

    /// Retries payment for one declined reservation with another method.
    ///
    /// The reservation keeps its id; the session's booking status is
    /// recomputed after the attempt.
    pub async fn retry_payment(
        &self,
        session_id: &str,
        reservation_id: &str,
        method: PaymentMethod,
    ) -> Result<BookingResult> {
        let _turn = self.sessions.turn_guard(session_id).await?;
        let session = self.sessions.snapshot(session_id).await?;
        let booking = session
            .booking
            .ok_or_else(|| TripError::validation("session has no booking"))?;
        if !booking
            .reservation_ids
            .iter()
            .any(|id| id == reservation_id)
        {
            return Err(TripError::validation(format!(
                "reservation {} does not belong to this booking",
                reservation_id
            )));
        }

        let reservation = self
            .bookings
            .choose_payment_method(reservation_id, method)
            .await?;
        self.bookings
            .process_payment(reservation_id, method, reservation.total_cost)
            .await?;

        let status = self.bookings.booking_status(&booking.reservation_ids).await?;
        let booking = Booking { status, ..booking };
        self.sessions.set_booking(session_id, booking.clone()).await?;
        self.booking_result(booking).await
    }

    async fn booking_result(&self, booking: Booking) -> Result<BookingResult> {
        let mut reservations = Vec::new();
        let mut transactions = Vec::new();
        for id in &booking.reservation_ids {
            reservations.push(self.bookings.reservation(id).await?);
            transactions.extend(self.bookings.transactions(id).await?);
        }

        let message = match booking.status {
            BookingStatus::Confirmed => {
                let total: f64 = reservations
                    .iter()
                    .map(|reservation| reservation.total_cost)
                    .sum();
                format!(
                    "Booking confirmed: {} reservation(s), total {:.2}.",
                    reservations.len(),
                    total
                )
            }
            BookingStatus::Pending => {
                let unresolved = reservations
                    .iter()
                    .filter(|reservation| {
                        reservation.status
                            != trip_core::booking::ReservationStatus::Confirmed
                    })
                    .count();
                format!(
                    "{} reservation(s) await payment; retry with a different payment method.",
                    unresolved
                )
            }
        };

        Ok(BookingResult {
            booking,
            reservations,
            transactions,
            message,
        })
    }
}

fn base_prompt(intent: Intent) -> &'static str {
    match intent {
        Intent::SuggestDestination => prompts::DESTINATION_SUGGESTER,
        Intent::PlanItinerary => prompts::PLANNER,
        Intent::Book => prompts::CLARIFICATION,
        Intent::AggregateData => prompts::DATA_AGGREGATOR,
        Intent::Optimize => prompts::OPTIMIZER,
        Intent::Personalize => prompts::PERSONALIZER,
        Intent::Monitor => prompts::MONITOR,
    }
}

fn booking_summary(itinerary: &Itinerary) -> String {
    let bookable: Vec<_> = itinerary.bookable().collect();
    let total: f64 = bookable.iter().map(|item| item.cost).sum();
    let mut lines = vec![format!(
        "Ready to book your {} itinerary: {} item(s), total {:.2}.",
        itinerary.destination,
        bookable.len(),
        total
    )];
    for item in &bookable {
        lines.push(format!(
            "- {} ({}, {} {}): {:.2}",
            item.name, item.item_type, item.date, item.time, item.cost
        ));
    }
    lines.push("Choose a payment method to complete the booking.".to_string());
    lines.join("\n")
}
