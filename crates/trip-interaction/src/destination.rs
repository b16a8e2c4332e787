//! Destination-list contract.
//!
//! The destination suggester must reply with EXACTLY a bracketed list of
//! quoted names and nothing else, e.g. `['Hampi', 'Mysore', 'Coorg',
//! 'Pondicherry']`. The parser is deliberately strict: prose around the
//! list, missing commas, or an empty list are all rejected, and the driver
//! retries the invocation exactly once with a format reminder before giving
//! up.

use crate::aggregator::{aggregate, Aggregated};
use crate::handler::{CapabilityHandler, HandlerContext};
use crate::prompts::DESTINATION_FORMAT_REMINDER;
use tokio_util::sync::CancellationToken;
use trip_core::{Result, TripError};

/// Outcome of driving the destination suggester for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationOutcome {
    /// The handler produced a well-formed list.
    Names {
        /// The verbatim handler reply, for the conversation history
        raw: String,
        /// The parsed destination names, in reply order
        names: Vec<String>,
    },
    /// The caller cancelled mid-stream; nothing may be persisted.
    Cancelled,
}

/// Parses a strict bracketed destination list.
///
/// Accepts single or double quotes around each name. Anything outside the
/// brackets, a missing comma, or an empty list fails with
/// [`TripError::Parse`].
pub fn parse_destination_list(text: &str) -> Result<Vec<String>> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| {
            TripError::parse(format!(
                "destination reply is not a bare bracketed list: {trimmed:?}"
            ))
        })?;

    let mut names = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
            chars.next();
        }
        let quote = match chars.next() {
            Some(c @ ('\'' | '"')) => c,
            Some(c) => {
                return Err(TripError::parse(format!(
                    "expected a quoted destination name, found {c:?}"
                )));
            }
            None => {
                return Err(TripError::parse(
                    "expected a quoted destination name, found end of list",
                ));
            }
        };
        let mut name = String::new();
        loop {
            match chars.next() {
                Some(c) if c == quote => break,
                Some(c) => name.push(c),
                None => return Err(TripError::parse("unterminated destination name")),
            }
        }
        if name.trim().is_empty() {
            return Err(TripError::parse("empty destination name"));
        }
        names.push(name);

        while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
            chars.next();
        }
        match chars.next() {
            Some(',') => continue,
            Some(c) => {
                return Err(TripError::parse(format!(
                    "expected ',' between destination names, found {c:?}"
                )));
            }
            None => break,
        }
    }

    if names.is_empty() {
        return Err(TripError::parse("destination list is empty"));
    }
    Ok(names)
}

/// Drives the destination suggester: invoke, aggregate, parse.
///
/// A malformed reply triggers exactly one retry with
/// [`DESTINATION_FORMAT_REMINDER`] appended to the prompt; a second
/// malformed reply surfaces as [`TripError::Parse`]. Session state is never
/// touched here.
pub async fn request_destinations(
    handler: &dyn CapabilityHandler,
    prompt: &str,
    context: &HandlerContext,
    cancel: &CancellationToken,
) -> Result<DestinationOutcome> {
    let first = invoke_once(handler, prompt, context, cancel).await?;
    let raw = match first {
        Aggregated::Cancelled => return Ok(DestinationOutcome::Cancelled),
        Aggregated::Complete(raw) => raw,
    };
    match parse_destination_list(&raw) {
        Ok(names) => return Ok(DestinationOutcome::Names { raw, names }),
        Err(err) => {
            tracing::warn!(
                "[Destinations] Malformed list ({}), retrying with format reminder",
                err
            );
        }
    }

    let retry_prompt = format!("{prompt}\n\n{DESTINATION_FORMAT_REMINDER}");
    let second = invoke_once(handler, &retry_prompt, context, cancel).await?;
    let raw = match second {
        Aggregated::Cancelled => return Ok(DestinationOutcome::Cancelled),
        Aggregated::Complete(raw) => raw,
    };
    let names = parse_destination_list(&raw)?;
    Ok(DestinationOutcome::Names { raw, names })
}

async fn invoke_once(
    handler: &dyn CapabilityHandler,
    prompt: &str,
    context: &HandlerContext,
    cancel: &CancellationToken,
) -> Result<Aggregated> {
    let stream = handler.invoke(prompt, context).await?;
    Ok(aggregate(stream, cancel).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{FragmentStream, HandlerError};
    use async_trait::async_trait;
    use futures::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn accepts_the_canonical_single_quoted_list() {
        let names = parse_destination_list("['Hampi', 'Mysore', 'Coorg', 'Pondicherry']").unwrap();
        assert_eq!(names, vec!["Hampi", "Mysore", "Coorg", "Pondicherry"]);
    }

    #[test]
    fn accepts_double_quotes() {
        let names = parse_destination_list(r#"["Goa", "Kerala"]"#).unwrap();
        assert_eq!(names, vec!["Goa", "Kerala"]);
    }

    #[test]
    fn rejects_surrounding_prose() {
        let err = parse_destination_list("Here are some destinations: ['Hampi', 'Mysore']")
            .unwrap_err();
        assert!(matches!(err, TripError::Parse(_)));
    }

    #[test]
    fn rejects_missing_commas() {
        assert!(parse_destination_list("['Hampi' 'Mysore']").is_err());
    }

    #[test]
    fn rejects_empty_lists_and_empty_names() {
        assert!(parse_destination_list("[]").is_err());
        assert!(parse_destination_list("['']").is_err());
    }

    #[test]
    fn rejects_trailing_comma() {
        assert!(parse_destination_list("['Hampi',]").is_err());
    }

    /// Replies from a script, one entry per invocation.
    struct ScriptedSuggester {
        replies: Vec<&'static str>,
        calls: AtomicUsize,
    }

    impl ScriptedSuggester {
        fn new(replies: Vec<&'static str>) -> Self {
            Self {
                replies,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CapabilityHandler for ScriptedSuggester {
        fn capability(&self) -> &str {
            "suggests destinations from a script"
        }

        async fn invoke(
            &self,
            _prompt: &str,
            _context: &HandlerContext,
        ) -> std::result::Result<FragmentStream, HandlerError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.replies[n].to_string();
            Ok(futures::stream::once(async move { reply }).boxed())
        }
    }

    #[tokio::test]
    async fn well_formed_reply_needs_no_retry() {
        let handler = ScriptedSuggester::new(vec!["['Hampi', 'Mysore']"]);
        let outcome = request_destinations(
            &handler,
            "suggest",
            &HandlerContext::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(handler.call_count(), 1);
        match outcome {
            DestinationOutcome::Names { raw, names } => {
                assert_eq!(raw, "['Hampi', 'Mysore']");
                assert_eq!(names, vec!["Hampi", "Mysore"]);
            }
            DestinationOutcome::Cancelled => panic!("unexpected cancellation"),
        }
    }

    #[tokio::test]
    async fn malformed_reply_is_retried_exactly_once() {
        let handler = ScriptedSuggester::new(vec![
            "I recommend: ['Hampi', 'Mysore']",
            "['Hampi', 'Mysore']",
        ]);
        let outcome = request_destinations(
            &handler,
            "suggest",
            &HandlerContext::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(handler.call_count(), 2);
        assert!(matches!(outcome, DestinationOutcome::Names { .. }));
    }

    #[tokio::test]
    async fn two_malformed_replies_surface_a_parse_error() {
        let handler = ScriptedSuggester::new(vec![
            "Based on your interests: ['Hampi']",
            "still not a bare list",
        ]);
        let err = request_destinations(
            &handler,
            "suggest",
            &HandlerContext::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert_eq!(handler.call_count(), 2);
        assert!(matches!(err, TripError::Parse(_)));
    }

    #[tokio::test]
    async fn cancellation_short_circuits_without_parsing() {
        let handler = ScriptedSuggester::new(vec!["['Hampi']"]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = request_destinations(
            &handler,
            "suggest",
            &HandlerContext::default(),
            &cancel,
        )
        .await
        .unwrap();
        assert_eq!(outcome, DestinationOutcome::Cancelled);
    }
}
