//! Capability handler boundary.
//!
//! External natural-language services (destination suggestion, itinerary
//! planning, data aggregation, optimization, personalization, monitoring)
//! are invoked through this contract and never implemented inside the core.
//! A handler receives a prompt plus a small context payload and replies
//! with a lazy, ordered stream of text fragments.

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use trip_core::intent::{Intent, RouteContext};
use trip_core::TripError;

/// Ordered lazy sequence of text fragments from a handler.
///
/// Fragment order is preserved exactly as emitted; consumers must never
/// reorder or drop fragments.
pub type FragmentStream = BoxStream<'static, String>;

/// Failure modes of a capability invocation.
#[derive(Error, Debug, Clone)]
pub enum HandlerError {
    /// The service could not be reached
    #[error("capability service unavailable: {0}")]
    ServiceUnavailable(String),
    /// The invocation exceeded its deadline
    #[error("capability invocation timed out after {0:?}")]
    Timeout(Duration),
}

impl From<HandlerError> for TripError {
    fn from(err: HandlerError) -> Self {
        // Both failure modes are transient; the caller may retry
        TripError::upstream(err.to_string(), true)
    }
}

/// The context payload forwarded alongside a prompt.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct HandlerContext {
    /// The user's constraints for this turn
    pub constraints: String,
    /// Prior itinerary content, if any
    pub itinerary: Option<String>,
    /// Prior candidate destinations, if any
    pub candidate_destinations: Vec<String>,
}

impl From<RouteContext> for HandlerContext {
    fn from(context: RouteContext) -> Self {
        Self {
            constraints: context.constraints,
            itinerary: context.itinerary,
            candidate_destinations: context.candidate_destinations,
        }
    }
}

/// Contract to an external text-generating service.
#[async_trait]
pub trait CapabilityHandler: Send + Sync {
    /// Short description of what this handler is good at.
    fn capability(&self) -> &str;

    /// Invokes the handler and returns its fragment stream.
    ///
    /// The stream is consumed until exhaustion or cancellation; the
    /// invocation itself fails only with [`HandlerError`].
    async fn invoke(
        &self,
        prompt: &str,
        context: &HandlerContext,
    ) -> Result<FragmentStream, HandlerError>;
}

impl std::fmt::Debug for dyn CapabilityHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityHandler")
            .field("capability", &self.capability())
            .finish()
    }
}

/// Maps routing targets to their capability handlers.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<Intent, Arc<dyn CapabilityHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler serving an intent, replacing any previous one.
    pub fn register(mut self, intent: Intent, handler: Arc<dyn CapabilityHandler>) -> Self {
        self.handlers.insert(intent, handler);
        self
    }

    /// Resolves the handler for an intent.
    ///
    /// A missing handler is a deployment problem, not something the caller
    /// can retry around, so the error is non-retryable.
    pub fn resolve(&self, intent: Intent) -> trip_core::Result<Arc<dyn CapabilityHandler>> {
        self.handlers.get(&intent).cloned().ok_or_else(|| {
            TripError::upstream(format!("no handler registered for {:?}", intent), false)
        })
    }
}
