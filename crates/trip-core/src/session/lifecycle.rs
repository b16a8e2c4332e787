//! Session lifecycle policy.
//!
//! The core defines no implicit session expiry. Lifecycle bounds are an
//! injectable policy: the embedding application decides whether idle
//! sessions are ever evicted, and when.

use std::time::Duration;

/// Injectable lifecycle bounds for stored sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecyclePolicy {
    /// Sessions idle longer than this are eligible for eviction.
    /// `None` (the default) means sessions live until explicitly closed.
    pub idle_timeout: Option<Duration>,
}

impl LifecyclePolicy {
    /// A policy that never evicts.
    pub fn keep_forever() -> Self {
        Self { idle_timeout: None }
    }

    /// A policy that evicts sessions idle longer than `timeout`.
    pub fn idle_for(timeout: Duration) -> Self {
        Self {
            idle_timeout: Some(timeout),
        }
    }
}
