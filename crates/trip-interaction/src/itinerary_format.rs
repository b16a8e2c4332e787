//! Itinerary output contract.
//!
//! The planning handler's day-by-day prose stays opaque, but the bookable
//! items must reach the booking engine in typed form. The planning prompt
//! therefore asks for a `BOOKINGS:` trailer of `|`-separated rows after the
//! prose:
//!
//! ```text
//! BOOKINGS:
//! Heritage Hotel | lodging | 2026-09-01 | 14:00 | 2 nights | 4500 | book
//! Sunset Point | activity | 2026-09-01 | 17:30 | 1h | 0 | info
//! ```
//!
//! A missing trailer yields an itinerary with no items; a malformed row is
//! a hard validation error, same strictness as the destination-list
//! contract.

use std::str::FromStr;
use trip_core::itinerary::{BookableItem, ItemType, Itinerary};
use trip_core::{Result, TripError};

const TRAILER_MARKER: &str = "BOOKINGS:";
const ROW_FIELDS: usize = 7;

/// Splits planning output into prose and typed items.
pub fn parse_itinerary(destination: &str, text: &str) -> Result<Itinerary> {
    let mut lines = text.lines();
    let mut prose_lines: Vec<&str> = Vec::new();
    let mut found_trailer = false;
    // The marker must stand on its own line
    for line in lines.by_ref() {
        if line.trim() == TRAILER_MARKER {
            found_trailer = true;
            break;
        }
        prose_lines.push(line);
    }
    if !found_trailer {
        return Ok(Itinerary::new(destination, text.trim(), Vec::new()));
    }

    let mut items = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        items.push(parse_row(line)?);
    }
    Ok(Itinerary::new(destination, prose_lines.join("\n").trim(), items))
}

fn parse_row(line: &str) -> Result<BookableItem> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if fields.len() != ROW_FIELDS {
        return Err(TripError::validation(format!(
            "booking row has {} field(s), expected {ROW_FIELDS}: {line:?}",
            fields.len()
        )));
    }
    let &[name, item_type, date, time, duration, cost, flag] = fields.as_slice() else {
        unreachable!("length checked above");
    };

    if name.is_empty() {
        return Err(TripError::validation(format!("booking row has no name: {line:?}")));
    }
    let item_type = ItemType::from_str(item_type)
        .map_err(|_| TripError::validation(format!("unknown item type {item_type:?}")))?;
    let cost: f64 = cost
        .parse()
        .map_err(|_| TripError::validation(format!("unparseable cost {cost:?}")))?;
    if cost < 0.0 {
        return Err(TripError::validation(format!("negative cost {cost}")));
    }
    let booking_required = match flag.to_ascii_lowercase().as_str() {
        "book" => true,
        "info" => false,
        other => {
            return Err(TripError::validation(format!(
                "booking flag must be 'book' or 'info', found {other:?}"
            )));
        }
    };

    Ok(BookableItem {
        name: name.to_string(),
        item_type,
        date: date.to_string(),
        time: time.to_string(),
        duration: duration.to_string(),
        cost,
        booking_required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = "\
Day 1: Explore the Hampi ruins and the riverside.
Day 2: Coracle ride and sunset at Matanga Hill.

BOOKINGS:
Heritage Hotel | lodging | 2026-09-01 | 14:00 | 2 nights | 4500 | book
Coracle Ride | activity | 2026-09-02 | 10:00 | 2h | 600 | book
Sunset Point | activity | 2026-09-02 | 17:30 | 1h | 0 | info
";

    #[test]
    fn splits_prose_from_typed_items() {
        let itinerary = parse_itinerary("Hampi", PLAN).unwrap();
        assert_eq!(itinerary.destination, "Hampi");
        assert!(itinerary.content.starts_with("Day 1:"));
        assert!(!itinerary.content.contains("BOOKINGS:"));
        assert_eq!(itinerary.items.len(), 3);

        let hotel = &itinerary.items[0];
        assert_eq!(hotel.name, "Heritage Hotel");
        assert_eq!(hotel.item_type, ItemType::Lodging);
        assert_eq!(hotel.cost, 4500.0);
        assert!(hotel.booking_required);

        assert_eq!(itinerary.bookable().count(), 2);
    }

    #[test]
    fn missing_trailer_yields_no_items() {
        let itinerary = parse_itinerary("Mysore", "Day 1: palace visit").unwrap();
        assert_eq!(itinerary.content, "Day 1: palace visit");
        assert!(itinerary.items.is_empty());
    }

    #[test]
    fn malformed_row_is_a_validation_error() {
        let text = "plan\n\nBOOKINGS:\nHotel | lodging | 2026-09-01\n";
        let err = parse_itinerary("Hampi", text).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn unknown_item_type_is_rejected() {
        let text = "plan\n\nBOOKINGS:\nHotel | castle | d | t | 1h | 10 | book\n";
        assert!(parse_itinerary("Hampi", text).unwrap_err().is_validation());
    }

    #[test]
    fn unparseable_cost_is_rejected() {
        let text = "plan\n\nBOOKINGS:\nHotel | lodging | d | t | 1h | cheap | book\n";
        assert!(parse_itinerary("Hampi", text).unwrap_err().is_validation());
    }

    #[test]
    fn booking_flag_must_be_book_or_info() {
        let text = "plan\n\nBOOKINGS:\nHotel | lodging | d | t | 1h | 10 | maybe\n";
        assert!(parse_itinerary("Hampi", text).unwrap_err().is_validation());
    }
}
