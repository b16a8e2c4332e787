//! Canned follow-up suggestions.
//!
//! A deterministic function over a fixed keyword → suggestion table: the
//! same response text always yields the same suggestion list. Categories
//! are checked in a fixed order (destination, budget, itinerary) and the
//! combined list is truncated to three entries.

const DESTINATION_SUGGESTIONS: [&str; 3] = [
    "Show me more destinations",
    "What's the best time to visit?",
    "Tell me about the local culture",
];

const BUDGET_SUGGESTIONS: [&str; 3] = [
    "Can you make it cheaper?",
    "What's included in this price?",
    "Show me luxury options",
];

const ITINERARY_SUGGESTIONS: [&str; 3] = [
    "Generate full itinerary",
    "Book this trip",
    "Modify the schedule",
];

const MAX_SUGGESTIONS: usize = 3;

/// Generates up to three contextual follow-up suggestions for a response.
pub fn suggest_next_actions(response_text: &str) -> Vec<String> {
    let lowered = response_text.to_lowercase();
    let mut suggestions: Vec<String> = Vec::new();

    if lowered.contains("destination") || lowered.contains("place") {
        suggestions.extend(DESTINATION_SUGGESTIONS.iter().map(|s| s.to_string()));
    }
    if lowered.contains("budget") || lowered.contains("cost") {
        suggestions.extend(BUDGET_SUGGESTIONS.iter().map(|s| s.to_string()));
    }
    if lowered.contains("itinerary") || lowered.contains("plan") {
        suggestions.extend(ITINERARY_SUGGESTIONS.iter().map(|s| s.to_string()));
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_keywords_yield_destination_suggestions() {
        let suggestions = suggest_next_actions("Here are some great places to visit");
        assert_eq!(suggestions, DESTINATION_SUGGESTIONS.to_vec());
    }

    #[test]
    fn matching_categories_cap_at_three_in_fixed_order() {
        // Text hits all three categories; only the first category survives
        // the truncation
        let suggestions =
            suggest_next_actions("This destination fits your budget, here is the itinerary");
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions, DESTINATION_SUGGESTIONS.to_vec());
    }

    #[test]
    fn budget_then_itinerary_order_is_stable() {
        let suggestions = suggest_next_actions("the total cost fits your plan");
        assert_eq!(suggestions[0], BUDGET_SUGGESTIONS[0]);
        assert_eq!(suggestions.len(), 3);
    }

    #[test]
    fn unrelated_text_yields_nothing() {
        assert!(suggest_next_actions("hello").is_empty());
    }

    #[test]
    fn same_input_always_yields_same_output() {
        let text = "a plan within budget";
        assert_eq!(suggest_next_actions(text), suggest_next_actions(text));
    }
}
