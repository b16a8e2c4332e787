//! In-memory session store.
//!
//! All session state is process-resident, keyed by session id. Each session
//! sits behind its own `tokio::Mutex`, so mutations on one session are
//! strictly serialized while unrelated sessions proceed in parallel. The
//! outer `RwLock` only guards the id → entry map itself.

use super::lifecycle::LifecyclePolicy;
use super::message::ConversationMessage;
use super::model::Session;
use crate::booking::Booking;
use crate::error::{Result, TripError};
use crate::itinerary::Itinerary;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

struct SessionEntry {
    state: Mutex<Session>,
    /// Whole-turn serialization; held across handler awaits, so it is a
    /// separate lock from `state`
    turn: Arc<Mutex<()>>,
}

impl SessionEntry {
    fn new(session: Session) -> Self {
        Self {
            state: Mutex::new(session),
            turn: Arc::new(Mutex::new(())),
        }
    }
}

/// Owns every live session and serializes mutations per session id.
#[derive(Default)]
pub struct SessionStore {
    /// Session entries, each behind its own locks
    sessions: RwLock<HashMap<String, Arc<SessionEntry>>>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    async fn entry(&self, session_id: &str) -> Result<Arc<SessionEntry>> {
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| TripError::not_found("session", session_id))
    }

    /// Creates a new session for a user and returns a snapshot of it.
    ///
    /// Always succeeds; the generated id is unique across the store.
    pub async fn create_session(&self, user_id: &str) -> Session {
        let session = Session::new(user_id);
        tracing::info!(
            "[SessionStore] Created session {} for user {}",
            session.id,
            user_id
        );

        let mut sessions = self.sessions.write().await;
        sessions.insert(
            session.id.clone(),
            Arc::new(SessionEntry::new(session.clone())),
        );
        session
    }

    /// Acquires the session's turn lock, serializing whole turns.
    ///
    /// A turn spans snapshot, handler work and commit; everything that reads
    /// a snapshot and later writes back must hold this guard for the whole
    /// span, otherwise two concurrent turns proceed against stale snapshots.
    /// Turns on other sessions are unaffected.
    pub async fn turn_guard(&self, session_id: &str) -> Result<OwnedMutexGuard<()>> {
        let entry = self.entry(session_id).await?;
        Ok(entry.turn.clone().lock_owned().await)
    }

    /// Returns a point-in-time snapshot of a session.
    pub async fn snapshot(&self, session_id: &str) -> Result<Session> {
        let entry = self.entry(session_id).await?;
        let session = entry.state.lock().await;
        Ok(session.clone())
    }

    /// Applies a mutation to a session under its lock and returns the
    /// updated snapshot.
    ///
    /// This is the commit point for a turn: every field touched inside `f`
    /// becomes visible atomically with respect to other turns on the same
    /// session.
    pub async fn update<F>(&self, session_id: &str, f: F) -> Result<Session>
    where
        F: FnOnce(&mut Session),
    {
        let entry = self.entry(session_id).await?;
        let mut session = entry.state.lock().await;
        f(&mut session);
        session.updated_at = chrono::Utc::now().to_rfc3339();
        Ok(session.clone())
    }

    /// Appends a message to a session's history.
    pub async fn append_message(
        &self,
        session_id: &str,
        message: ConversationMessage,
    ) -> Result<()> {
        self.update(session_id, |session| session.messages.push(message))
            .await?;
        Ok(())
    }

    /// Replaces the session's itinerary wholesale.
    pub async fn set_itinerary(&self, session_id: &str, itinerary: Itinerary) -> Result<()> {
        self.update(session_id, |session| session.itinerary = Some(itinerary))
            .await?;
        Ok(())
    }

    /// Sets the session's booking.
    pub async fn set_booking(&self, session_id: &str, booking: Booking) -> Result<()> {
        self.update(session_id, |session| session.booking = Some(booking))
            .await?;
        Ok(())
    }

    /// Replaces the candidate destination list.
    pub async fn set_candidate_destinations(
        &self,
        session_id: &str,
        candidates: Vec<String>,
    ) -> Result<()> {
        self.update(session_id, |session| {
            session.candidate_destinations = candidates
        })
        .await?;
        Ok(())
    }

    /// Closes a session, dropping all of its state.
    pub async fn close_session(&self, session_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        match sessions.remove(session_id) {
            Some(_) => {
                tracing::info!("[SessionStore] Closed session {}", session_id);
                Ok(())
            }
            None => Err(TripError::not_found("session", session_id)),
        }
    }

    /// Returns the number of live sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Evicts sessions idle longer than the policy allows and returns the
    /// evicted ids.
    ///
    /// With the default policy (`idle_timeout: None`) this is a no-op; the
    /// store itself never expires sessions.
    pub async fn evict_idle(&self, policy: &LifecyclePolicy) -> Vec<String> {
        let Some(idle_timeout) = policy.idle_timeout else {
            return Vec::new();
        };
        let Ok(max_idle) = chrono::Duration::from_std(idle_timeout) else {
            return Vec::new();
        };
        let now = chrono::Utc::now();

        let mut evicted = Vec::new();
        let mut sessions = self.sessions.write().await;
        let ids: Vec<String> = sessions.keys().cloned().collect();
        for id in ids {
            let Some(entry) = sessions.get(&id) else {
                continue;
            };
            let updated_at = {
                let session = entry.state.lock().await;
                session.updated_at.clone()
            };
            let idle = match chrono::DateTime::parse_from_rfc3339(&updated_at) {
                Ok(updated) => now.signed_duration_since(updated),
                // Unparseable timestamps never expire
                Err(_) => continue,
            };
            if idle > max_idle {
                sessions.remove(&id);
                tracing::info!("[SessionStore] Evicted idle session {}", id);
                evicted.push(id);
            }
        }
        evicted
    }
}
