//! Booking domain model.
//!
//! Types for the reservation → payment → confirmation lifecycle. The status
//! enum moves only forward along the state machine, with the single
//! exception that a declined reservation may re-enter payment with a
//! different method.

use crate::itinerary::BookableItem;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Items reserved, payment not yet started
    Reserved,
    /// A payment method was chosen; awaiting the payment attempt
    PaymentPending,
    /// Payment approved; terminal
    Confirmed,
    /// Payment declined; the reservation may retry with another method
    Declined,
    /// Unrecoverable gateway failure; terminal
    Failed,
}

/// Supported payment methods.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    ApplePay,
    GooglePay,
    CreditCard,
}

/// Result of one payment attempt as reported by the gateway policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    Approved,
    Declined,
    Failed,
}

/// Record of a single payment attempt against a reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    /// Unique transaction identifier
    pub id: String,
    /// The reservation this attempt was made against
    pub reservation_id: String,
    /// Payment method used for this attempt
    pub method: PaymentMethod,
    /// Amount charged; always equals the reservation's total cost
    pub amount: f64,
    /// Gateway outcome
    pub outcome: PaymentOutcome,
    /// Order id, present only when the payment was approved
    pub order_id: Option<String>,
    /// Timestamp of the attempt (ISO 8601 format)
    pub processed_at: String,
}

/// An intent to purchase one or more bookable items, prior to payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Unique reservation identifier (short uppercase reference)
    pub id: String,
    /// The items covered by this reservation
    pub items: Vec<BookableItem>,
    /// Sum of the item costs
    pub total_cost: f64,
    /// Current lifecycle state
    pub status: ReservationStatus,
    /// Timestamp when the reservation was created (ISO 8601 format)
    pub created_at: String,
}

/// Overall state of a booking spanning one or more reservations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// At least one reservation is not yet confirmed
    Pending,
    /// Every constituent reservation reached Confirmed
    Confirmed,
}

/// One or more reservations drawn from a single itinerary.
///
/// A booking is confirmed only when all of its reservations are confirmed;
/// any declined or failed reservation blocks overall confirmation until
/// resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking identifier (UUID format)
    pub id: String,
    /// The itinerary this booking was drawn from
    pub itinerary_id: String,
    /// Ids of the constituent reservations
    pub reservation_ids: Vec<String>,
    /// Aggregate status across all reservations
    pub status: BookingStatus,
    /// Timestamp when the booking was created (ISO 8601 format)
    pub created_at: String,
}

impl Booking {
    /// Creates a new booking covering the given reservations.
    pub fn new(
        itinerary_id: impl Into<String>,
        reservation_ids: Vec<String>,
        status: BookingStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            itinerary_id: itinerary_id.into(),
            reservation_ids,
            status,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Generates a short uppercase reservation reference, e.g. `BK1A2B3C4D`.
pub(crate) fn new_reservation_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("BK{}", hex[..8].to_uppercase())
}

/// Generates a transaction id, e.g. `5E6F7A8B9C0D`.
pub(crate) fn new_transaction_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..12].to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn payment_method_uses_snake_case_names() {
        assert_eq!(PaymentMethod::ApplePay.to_string(), "apple_pay");
        assert_eq!(
            PaymentMethod::from_str("google_pay").unwrap(),
            PaymentMethod::GooglePay
        );
        assert!(PaymentMethod::from_str("paypal").is_err());
    }

    #[test]
    fn reservation_ids_are_short_uppercase_references() {
        let id = new_reservation_id();
        assert!(id.starts_with("BK"));
        assert_eq!(id.len(), 10);
        assert_eq!(id, id.to_uppercase());
    }
}
