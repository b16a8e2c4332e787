//! End-to-end flow: suggestion, planning, booking, payment retry.

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use trip_application::{PaymentInfo, TripPlanner};
use trip_core::booking::{BookingStatus, PaymentMethod, PaymentOutcome, ReservationStatus};
use trip_core::config::PlannerConfig;
use trip_core::intent::Intent;
use trip_core::session::MessageRole;
use trip_interaction::handler::{CapabilityHandler, HandlerContext, HandlerError};
use trip_interaction::{FragmentStream, HandlerRegistry};

const DESTINATION_REPLY: &str = "['Hampi', 'Mysore', 'Coorg', 'Pondicherry']";

const PLAN_REPLY: &str = "\
Day 1: Arrive in Hampi, check in, explore the Virupaksha temple complex.
Day 2: Coracle ride on the Tungabhadra, sunset from Matanga Hill.
Day 3: Cycle through the royal enclosure, local market.
Day 4: Anegundi village walk, depart.

BOOKINGS:
Heritage Hotel | lodging | 2026-09-01 | 14:00 | 3 nights | 4500 | book
Coracle Ride | activity | 2026-09-02 | 10:00 | 2h | 600 | book
Matanga Hill Sunset | activity | 2026-09-02 | 17:30 | 1h | 0 | info
";

/// Streams a fixed reply, word by word.
struct Scripted {
    reply: &'static str,
}

#[async_trait]
impl CapabilityHandler for Scripted {
    fn capability(&self) -> &str {
        "scripted reply"
    }

    async fn invoke(
        &self,
        _prompt: &str,
        _context: &HandlerContext,
    ) -> Result<FragmentStream, HandlerError> {
        // Split on spaces only, so the line structure survives rejoining
        let words: Vec<String> = self.reply.split(' ').map(str::to_string).collect();
        Ok(futures::stream::iter(words).boxed())
    }
}

fn planner() -> TripPlanner {
    let handlers = HandlerRegistry::new()
        .register(
            Intent::SuggestDestination,
            Arc::new(Scripted {
                reply: DESTINATION_REPLY,
            }),
        )
        .register(Intent::PlanItinerary, Arc::new(Scripted { reply: PLAN_REPLY }));
    TripPlanner::new(handlers, PlannerConfig::default())
}

#[tokio::test]
async fn suggestion_planning_booking_and_payment_retry() {
    let planner = planner();
    let cancel = CancellationToken::new();
    let session = planner.create_session("traveler-1").await;

    // Booking before any itinerary exists is rejected outright
    let err = planner
        .send_message(&session.id, "book this", &cancel)
        .await
        .unwrap_err();
    assert!(err.is_validation());

    // Open-ended turn: the suggester replies with the strict list
    let output = planner
        .send_message(
            &session.id,
            "adventure trip, 4 days, budget 15000, no destination yet",
            &cancel,
        )
        .await
        .unwrap();
    assert_eq!(output.response_text, DESTINATION_REPLY);
    // The bare list carries no suggestion keywords
    assert!(output.suggestions.is_empty());

    // Picking a candidate and asking for a plan yields a typed itinerary
    let output = planner
        .send_message(&session.id, "Hampi sounds great, plan a 4-day itinerary", &cancel)
        .await
        .unwrap();
    assert!(output.response_text.starts_with("Day 1:"));
    assert!(!output.response_text.contains("BOOKINGS:"));

    let status = planner.get_live_status(&session.id).await.unwrap();
    let itinerary = status.itinerary.expect("itinerary should be set");
    assert_eq!(itinerary.destination, "Hampi");
    assert_eq!(itinerary.items.len(), 3);
    assert_eq!(itinerary.bookable().count(), 2);

    // Booking turn now produces the deterministic summary
    let output = planner
        .send_message(&session.id, "book this", &cancel)
        .await
        .unwrap();
    assert!(output.response_text.contains("Hampi"));
    assert!(output.response_text.contains("5100.00"));
    // The summary mentions the itinerary, so canned follow-ups fire
    assert!(output.suggestions.contains(&"Book this trip".to_string()));

    // Apple Pay declines every reservation in the simulated gateway
    let result = planner
        .checkout(
            &session.id,
            &PaymentInfo {
                method: PaymentMethod::ApplePay,
            },
        )
        .await
        .unwrap();
    assert_eq!(result.booking.status, BookingStatus::Pending);
    assert_eq!(result.reservations.len(), 2);
    assert!(result
        .reservations
        .iter()
        .all(|reservation| reservation.status == ReservationStatus::Declined));
    assert!(result
        .transactions
        .iter()
        .all(|txn| txn.outcome == PaymentOutcome::Declined && txn.order_id.is_none()));

    // Retrying each declined reservation with a credit card confirms the
    // booking without minting new reservation ids
    let ids: Vec<String> = result.booking.reservation_ids.clone();
    let mut last = result;
    for id in &ids {
        last = planner
            .retry_payment(&session.id, id, PaymentMethod::CreditCard)
            .await
            .unwrap();
    }
    assert_eq!(last.booking.status, BookingStatus::Confirmed);
    assert_eq!(last.booking.reservation_ids, ids);
    assert!(last
        .reservations
        .iter()
        .all(|reservation| reservation.status == ReservationStatus::Confirmed));
    // Two attempts per reservation: the decline and the approval
    assert_eq!(last.transactions.len(), 4);
    let approved: Vec<_> = last
        .transactions
        .iter()
        .filter(|txn| txn.outcome == PaymentOutcome::Approved)
        .collect();
    assert_eq!(approved.len(), 2);
    assert!(approved
        .iter()
        .all(|txn| txn.order_id.as_deref().unwrap().starts_with("ORD")));

    let status = planner.get_live_status(&session.id).await.unwrap();
    assert_eq!(status.booking.unwrap().status, BookingStatus::Confirmed);

    // History holds every committed turn, in append order
    let history = planner.get_history(&session.id).await.unwrap();
    let roles: Vec<MessageRole> = history.iter().map(|message| message.role).collect();
    assert_eq!(
        roles,
        vec![
            MessageRole::User,
            MessageRole::Handler,
            MessageRole::User,
            MessageRole::Handler,
            MessageRole::User,
            MessageRole::System,
        ]
    );

    planner.close_session(&session.id).await.unwrap();
    assert!(planner.get_history(&session.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn google_pay_confirms_in_one_pass() {
    let planner = planner();
    let cancel = CancellationToken::new();
    let session = planner.create_session("traveler-2").await;

    planner
        .send_message(&session.id, "somewhere quiet, please suggest", &cancel)
        .await
        .unwrap();
    planner
        .send_message(&session.id, "Coorg it is, plan a short itinerary", &cancel)
        .await
        .unwrap();

    let result = planner
        .checkout(
            &session.id,
            &PaymentInfo {
                method: PaymentMethod::GooglePay,
            },
        )
        .await
        .unwrap();
    assert_eq!(result.booking.status, BookingStatus::Confirmed);
    assert!(result.message.starts_with("Booking confirmed"));
}
