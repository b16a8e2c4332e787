//! Booking state machine.
//!
//! `BookingEngine` owns every reservation and drives each through
//! `Reserved → PaymentPending → {Confirmed | Declined | Failed}`. Declined
//! reservations stay retryable: choosing another payment method moves them
//! back into `PaymentPending` without minting a new reservation id.
//!
//! Reservations are keyed and locked individually, independent of any
//! session locking, so a payment retry never blocks unrelated activity.

use super::model::{
    new_reservation_id, new_transaction_id, BookingStatus, PaymentMethod, PaymentOutcome,
    PaymentTransaction, Reservation, ReservationStatus,
};
use crate::error::{Result, TripError};
use crate::itinerary::BookableItem;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// Decides the outcome of a payment attempt.
///
/// The state machine never hardcodes gateway behavior; a real gateway can be
/// substituted without touching any transition logic.
pub trait PaymentPolicy: Send + Sync {
    /// Returns the outcome for an attempt with the given method.
    fn outcome(&self, method: PaymentMethod) -> PaymentOutcome;
}

/// Deterministic simulated gateway: Apple Pay declines, Google Pay and
/// credit card approve.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedGateway;

impl PaymentPolicy for SimulatedGateway {
    fn outcome(&self, method: PaymentMethod) -> PaymentOutcome {
        match method {
            PaymentMethod::ApplePay => PaymentOutcome::Declined,
            PaymentMethod::GooglePay => PaymentOutcome::Approved,
            PaymentMethod::CreditCard => PaymentOutcome::Approved,
        }
    }
}

struct ReservationEntry {
    reservation: Reservation,
    pending_method: Option<PaymentMethod>,
    transactions: Vec<PaymentTransaction>,
}

/// Manages reservation lifecycle and simulated payment processing.
pub struct BookingEngine {
    /// Reservation entries, each behind its own lock
    reservations: RwLock<HashMap<String, Arc<Mutex<ReservationEntry>>>>,
    /// Pluggable method → outcome policy
    policy: Arc<dyn PaymentPolicy>,
}

impl BookingEngine {
    /// Creates an engine with the given payment policy.
    pub fn new(policy: Arc<dyn PaymentPolicy>) -> Self {
        Self {
            reservations: RwLock::new(HashMap::new()),
            policy,
        }
    }

    /// Creates an engine backed by the deterministic simulated gateway.
    pub fn simulated() -> Self {
        Self::new(Arc::new(SimulatedGateway))
    }

    async fn entry(&self, reservation_id: &str) -> Result<Arc<Mutex<ReservationEntry>>> {
        let reservations = self.reservations.read().await;
        reservations
            .get(reservation_id)
            .cloned()
            .ok_or_else(|| TripError::not_found("reservation", reservation_id))
    }

    /// Creates a reservation covering the given items.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error if `items` is empty or any item has a
    /// negative cost.
    pub async fn create_reservation(&self, items: Vec<BookableItem>) -> Result<Reservation> {
        if items.is_empty() {
            return Err(TripError::validation(
                "reservation requires at least one item",
            ));
        }
        if let Some(item) = items.iter().find(|item| item.cost < 0.0) {
            return Err(TripError::validation(format!(
                "item '{}' has a negative cost",
                item.name
            )));
        }

        let total_cost = items.iter().map(|item| item.cost).sum();
        let reservation = Reservation {
            id: new_reservation_id(),
            items,
            total_cost,
            status: ReservationStatus::Reserved,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        tracing::info!(
            "[BookingEngine] Created reservation {} ({} item(s), total {})",
            reservation.id,
            reservation.items.len(),
            reservation.total_cost
        );

        let entry = Arc::new(Mutex::new(ReservationEntry {
            reservation: reservation.clone(),
            pending_method: None,
            transactions: Vec::new(),
        }));
        let mut reservations = self.reservations.write().await;
        reservations.insert(reservation.id.clone(), entry);

        Ok(reservation)
    }

    /// Chooses a payment method, moving the reservation into
    /// `PaymentPending`.
    ///
    /// Allowed from `Reserved` (first attempt) and `Declined` (retry with a
    /// different method).
    ///
    /// # Errors
    ///
    /// Returns an `InvariantViolation` error if the reservation is in any
    /// other state; the reservation is left unchanged.
    pub async fn choose_payment_method(
        &self,
        reservation_id: &str,
        method: PaymentMethod,
    ) -> Result<Reservation> {
        let entry = self.entry(reservation_id).await?;
        let mut entry = entry.lock().await;

        match entry.reservation.status {
            ReservationStatus::Reserved | ReservationStatus::Declined => {}
            other => {
                tracing::error!(
                    "[BookingEngine] choose_payment_method on reservation {} in state {:?}",
                    reservation_id,
                    other
                );
                return Err(TripError::invariant(format!(
                    "cannot choose a payment method for reservation {} in state {:?}",
                    reservation_id, other
                )));
            }
        }

        entry.reservation.status = ReservationStatus::PaymentPending;
        entry.pending_method = Some(method);

        tracing::info!(
            "[BookingEngine] Reservation {} awaiting payment via {}",
            reservation_id,
            method
        );

        Ok(entry.reservation.clone())
    }

    /// Processes a payment attempt for a pending reservation.
    ///
    /// The amount must equal the reservation's total cost exactly; a
    /// mismatch is a `Validation` error and changes nothing. The outcome is
    /// decided by the configured policy: on approval the reservation is
    /// confirmed and the transaction carries an order id; on decline the
    /// transaction is recorded without one and the reservation stays
    /// retryable.
    ///
    /// # Errors
    ///
    /// Returns an `InvariantViolation` error if the reservation is not in
    /// `PaymentPending` (e.g. payment attempted before choosing a method).
    pub async fn process_payment(
        &self,
        reservation_id: &str,
        method: PaymentMethod,
        amount: f64,
    ) -> Result<PaymentTransaction> {
        let entry = self.entry(reservation_id).await?;
        let mut entry = entry.lock().await;

        if entry.reservation.status != ReservationStatus::PaymentPending {
            tracing::error!(
                "[BookingEngine] process_payment on reservation {} in state {:?}",
                reservation_id,
                entry.reservation.status
            );
            return Err(TripError::invariant(format!(
                "cannot process payment for reservation {} in state {:?}",
                reservation_id, entry.reservation.status
            )));
        }

        if amount != entry.reservation.total_cost {
            return Err(TripError::validation(format!(
                "payment amount {} does not match reservation total {}",
                amount, entry.reservation.total_cost
            )));
        }

        let outcome = self.policy.outcome(method);
        let transaction_id = new_transaction_id();
        let order_id = match outcome {
            PaymentOutcome::Approved => Some(format!("ORD{}", transaction_id)),
            _ => None,
        };

        entry.reservation.status = match outcome {
            PaymentOutcome::Approved => ReservationStatus::Confirmed,
            PaymentOutcome::Declined => ReservationStatus::Declined,
            PaymentOutcome::Failed => ReservationStatus::Failed,
        };
        entry.pending_method = None;

        let transaction = PaymentTransaction {
            id: transaction_id,
            reservation_id: reservation_id.to_string(),
            method,
            amount,
            outcome,
            order_id,
            processed_at: chrono::Utc::now().to_rfc3339(),
        };
        entry.transactions.push(transaction.clone());

        tracing::info!(
            "[BookingEngine] Payment via {} for reservation {}: {:?}",
            method,
            reservation_id,
            outcome
        );

        Ok(transaction)
    }

    /// Returns a snapshot of a reservation.
    pub async fn reservation(&self, reservation_id: &str) -> Result<Reservation> {
        let entry = self.entry(reservation_id).await?;
        let entry = entry.lock().await;
        Ok(entry.reservation.clone())
    }

    /// Returns all payment attempts recorded against a reservation.
    pub async fn transactions(&self, reservation_id: &str) -> Result<Vec<PaymentTransaction>> {
        let entry = self.entry(reservation_id).await?;
        let entry = entry.lock().await;
        Ok(entry.transactions.clone())
    }

    /// Computes the aggregate status across a set of reservations.
    ///
    /// Confirmed only when every reservation is confirmed; any declined or
    /// failed reservation holds the booking at `Pending` until resolved.
    pub async fn booking_status(&self, reservation_ids: &[String]) -> Result<BookingStatus> {
        for id in reservation_ids {
            let reservation = self.reservation(id).await?;
            if reservation.status != ReservationStatus::Confirmed {
                return Ok(BookingStatus::Pending);
            }
        }
        Ok(BookingStatus::Confirmed)
    }
}
