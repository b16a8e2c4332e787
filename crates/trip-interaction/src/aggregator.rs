//! Response aggregation.
//!
//! Collapses a handler's fragment stream into one ordered string. Fragments
//! are joined with a single space in exactly the order they were emitted.
//! If the caller cancels mid-stream the partial text is discarded and a
//! distinguished result is returned; the caller must not persist it.

use crate::handler::FragmentStream;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

/// Result of draining a fragment stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aggregated {
    /// The stream completed; the full ordered text
    Complete(String),
    /// The caller cancelled mid-stream; partial text was discarded
    Cancelled,
}

impl Aggregated {
    /// Returns the full text, if the stream completed.
    pub fn into_complete(self) -> Option<String> {
        match self {
            Aggregated::Complete(text) => Some(text),
            Aggregated::Cancelled => None,
        }
    }
}

/// Drains a fragment stream to completion or cancellation.
pub async fn aggregate(mut fragments: FragmentStream, cancel: &CancellationToken) -> Aggregated {
    let mut parts: Vec<String> = Vec::new();
    loop {
        tokio::select! {
            // Checked first so a cancelled caller never commits a turn that
            // raced a completing stream
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(
                    "[Aggregator] Cancelled after {} fragment(s); discarding",
                    parts.len()
                );
                return Aggregated::Cancelled;
            }
            fragment = fragments.next() => match fragment {
                Some(fragment) => parts.push(fragment),
                None => break,
            },
        }
    }
    Aggregated::Complete(parts.join(" "))
}
