use dossier_engine::config::EngineSettings;
use dossier_engine::{EngineError, StorageError};
use dossier_types::ChoiceSession;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

struct Entry {
    owner_id: String,
    session: ChoiceSession,
    last_used: Instant,
    /// Registry tick of the last access, orders entries for the per-user cap.
    touched: u64,
    /// A completion request is in flight for this session.
    generating: bool,
}

#[derive(Default)]
struct Registry {
    entries: HashMap<String, Entry>,
    tick: u64,
}

impl Registry {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn purge_expired(&mut self, ttl: Duration, now: Instant) {
        let before = self.entries.len();
        self.entries
            .retain(|_, e| e.generating || now.duration_since(e.last_used) < ttl);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            tracing::info!(evicted = evicted, "Expired choice sessions dropped");
        }
    }

    fn owned_mut(&mut self, session_id: &str, caller_id: &str) -> Result<&mut Entry, EngineError> {
        let entry = self
            .entries
            .get_mut(session_id)
            .ok_or_else(|| EngineError::NotFound(format!("Choice session {} not found", session_id)))?;
        if entry.owner_id != caller_id {
            tracing::warn!(session_id = %session_id, caller_id = %caller_id, "Choice session access denied");
            return Err(EngineError::Forbidden(format!(
                "Choice session {} belongs to another user",
                session_id
            )));
        }
        Ok(entry)
    }
}

/// In-process registry of guided-choice sessions. Sessions are never
/// persisted and vanish with the server.
///
/// Handlers work on a copy and write it back with [`ChoiceSessions::store`],
/// which rejects a copy whose revision is stale. Completion requests hold a
/// [`Reservation`] so that only one runs per session; other writes to that
/// session fail with a conflict until it ends. Idle sessions expire after
/// the configured time to live.
pub struct ChoiceSessions {
    registry: Mutex<Registry>,
    ttl: Duration,
    max_per_owner: usize,
}

impl Default for ChoiceSessions {
    fn default() -> Self {
        Self::from(&EngineSettings::default())
    }
}

impl From<&EngineSettings> for ChoiceSessions {
    fn from(settings: &EngineSettings) -> Self {
        Self::with_limits(
            Duration::from_secs(settings.choice_session_ttl_secs),
            settings.max_choice_sessions_per_user,
        )
    }
}

impl ChoiceSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// `max_per_owner` of 0 disables the cap.
    pub fn with_limits(ttl: Duration, max_per_owner: usize) -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            ttl,
            max_per_owner,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Registry>, EngineError> {
        self.registry.lock().map_err(|e| {
            EngineError::Storage(StorageError::OperationFailed(format!("Lock error: {}", e)))
        })
    }

    /// Registers a new session. When the owner is at the cap, their least
    /// recently used idle session is dropped.
    pub fn insert(&self, owner_id: &str, session: ChoiceSession) -> Result<(), EngineError> {
        let now = Instant::now();
        let mut registry = self.lock()?;
        registry.purge_expired(self.ttl, now);

        if self.max_per_owner > 0 {
            let owned = registry
                .entries
                .values()
                .filter(|e| e.owner_id == owner_id)
                .count();
            if owned >= self.max_per_owner {
                let oldest = registry
                    .entries
                    .iter()
                    .filter(|(_, e)| e.owner_id == owner_id && !e.generating)
                    .min_by_key(|(_, e)| e.touched)
                    .map(|(id, _)| id.clone());
                if let Some(id) = oldest {
                    registry.entries.remove(&id);
                    tracing::info!(session_id = %id, owner_id = %owner_id, "Choice session evicted");
                }
            }
        }

        let touched = registry.next_tick();
        registry.entries.insert(
            session.id.clone(),
            Entry {
                owner_id: owner_id.to_string(),
                session,
                last_used: now,
                touched,
                generating: false,
            },
        );
        Ok(())
    }

    fn take_copy(
        &self,
        session_id: &str,
        caller_id: &str,
        reserve: bool,
    ) -> Result<ChoiceSession, EngineError> {
        let now = Instant::now();
        let mut registry = self.lock()?;
        registry.purge_expired(self.ttl, now);
        let touched = registry.next_tick();

        let entry = registry.owned_mut(session_id, caller_id)?;
        if entry.generating {
            return Err(EngineError::Conflict(format!(
                "A generation is already running for choice session {}",
                session_id
            )));
        }
        entry.last_used = now;
        entry.touched = touched;
        entry.generating = reserve;
        Ok(entry.session.clone())
    }

    /// Returns a copy of the session for the caller to work on.
    pub fn checkout(&self, session_id: &str, caller_id: &str) -> Result<ChoiceSession, EngineError> {
        self.take_copy(session_id, caller_id, false)
    }

    /// Like [`checkout`](Self::checkout), and also blocks other writes to the
    /// session until the reservation is committed or dropped.
    pub fn reserve(
        &self,
        session_id: &str,
        caller_id: &str,
    ) -> Result<(ChoiceSession, Reservation<'_>), EngineError> {
        let session = self.take_copy(session_id, caller_id, true)?;
        Ok((
            session,
            Reservation {
                sessions: self,
                session_id: session_id.to_string(),
                committed: false,
            },
        ))
    }

    /// Writes back a session previously checked out and returns the stored
    /// copy with its new revision.
    pub fn store(&self, mut session: ChoiceSession) -> Result<ChoiceSession, EngineError> {
        let mut registry = self.lock()?;
        let touched = registry.next_tick();
        let entry = registry.entries.get_mut(&session.id).ok_or_else(|| {
            EngineError::NotFound(format!("Choice session {} not found", session.id))
        })?;
        entry.generating = false;

        if entry.session.revision != session.revision {
            tracing::warn!(
                session_id = %session.id,
                expected = session.revision,
                stored = entry.session.revision,
                "Stale choice session write rejected"
            );
            return Err(EngineError::Conflict(format!(
                "Choice session {} changed since it was read",
                session.id
            )));
        }

        session.revision += 1;
        entry.session = session.clone();
        entry.last_used = Instant::now();
        entry.touched = touched;
        Ok(session)
    }

    fn release(&self, session_id: &str) {
        if let Ok(mut registry) = self.registry.lock() {
            if let Some(entry) = registry.entries.get_mut(session_id) {
                entry.generating = false;
            }
        }
    }

    pub fn remove(&self, session_id: &str) -> Result<bool, EngineError> {
        Ok(self.lock()?.entries.remove(session_id).is_some())
    }

    pub fn len(&self) -> usize {
        self.registry.lock().map(|r| r.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exclusive right to run a completion request for one session. Dropping
/// it without [`commit`](Reservation::commit) leaves the session unchanged.
pub struct Reservation<'a> {
    sessions: &'a ChoiceSessions,
    session_id: String,
    committed: bool,
}

impl Reservation<'_> {
    pub fn commit(mut self, session: ChoiceSession) -> Result<ChoiceSession, EngineError> {
        self.committed = true;
        self.sessions.store(session)
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.sessions.release(&self.session_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_session() -> ChoiceSession {
        ChoiceSession::new("p1", "contexte", "difficultes", "Difficultés ?", 3)
    }

    #[test]
    fn test_checkout_checks_owner() {
        let sessions = ChoiceSessions::new();
        let session = new_session();
        let id = session.id.clone();
        sessions.insert("user-1", session).unwrap();

        assert!(sessions.checkout(&id, "user-1").is_ok());
        assert!(matches!(
            sessions.checkout(&id, "user-2"),
            Err(EngineError::Forbidden(_))
        ));
        assert!(matches!(
            sessions.checkout("missing", "user-1"),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn test_store_writes_back_and_remove_drops() {
        let sessions = ChoiceSessions::new();
        let session = new_session();
        let id = session.id.clone();
        sessions.insert("user-1", session).unwrap();

        let mut working = sessions.checkout(&id, "user-1").unwrap();
        working.free_text = "Précisions".to_string();
        let stored = sessions.store(working).unwrap();
        assert_eq!(stored.revision, 1);

        let reread = sessions.checkout(&id, "user-1").unwrap();
        assert_eq!(reread.free_text, "Précisions");
        assert_eq!(reread.revision, 1);

        assert!(sessions.remove(&id).unwrap());
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_stale_copy_is_rejected() {
        let sessions = ChoiceSessions::new();
        let session = new_session();
        let id = session.id.clone();
        sessions.insert("user-1", session).unwrap();

        let mut first = sessions.checkout(&id, "user-1").unwrap();
        let mut second = sessions.checkout(&id, "user-1").unwrap();

        first.free_text = "Premier".to_string();
        sessions.store(first).unwrap();

        second.free_text = "Second".to_string();
        second.generations = 3;
        assert!(matches!(sessions.store(second), Err(EngineError::Conflict(_))));

        let stored = sessions.checkout(&id, "user-1").unwrap();
        assert_eq!(stored.free_text, "Premier");
        assert_eq!(stored.generations, 0);
    }

    #[test]
    fn test_reservation_blocks_other_writes_until_released() {
        let sessions = ChoiceSessions::new();
        let session = new_session();
        let id = session.id.clone();
        sessions.insert("user-1", session).unwrap();

        let (mut working, reservation) = sessions.reserve(&id, "user-1").unwrap();
        assert!(matches!(sessions.reserve(&id, "user-1"), Err(EngineError::Conflict(_))));
        assert!(matches!(sessions.checkout(&id, "user-1"), Err(EngineError::Conflict(_))));

        working.generations = 1;
        reservation.commit(working).unwrap();
        assert_eq!(sessions.checkout(&id, "user-1").unwrap().generations, 1);

        let (mut abandoned, reservation) = sessions.reserve(&id, "user-1").unwrap();
        abandoned.generations = 2;
        drop(reservation);
        let stored = sessions.checkout(&id, "user-1").unwrap();
        assert_eq!(stored.generations, 1);
    }

    #[test]
    fn test_expired_session_is_not_found() {
        let sessions = ChoiceSessions::with_limits(Duration::ZERO, 0);
        let session = new_session();
        let id = session.id.clone();
        sessions.insert("user-1", session).unwrap();

        assert!(matches!(
            sessions.checkout(&id, "user-1"),
            Err(EngineError::NotFound(_))
        ));
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_owner_cap_drops_least_recently_used() {
        let sessions = ChoiceSessions::with_limits(Duration::from_secs(3600), 2);
        let first = new_session();
        let second = new_session();
        let third = new_session();
        let other = new_session();
        let (first_id, second_id, third_id, other_id) = (
            first.id.clone(),
            second.id.clone(),
            third.id.clone(),
            other.id.clone(),
        );

        sessions.insert("user-1", first).unwrap();
        sessions.insert("user-1", second).unwrap();
        sessions.insert("user-2", other).unwrap();
        sessions.checkout(&first_id, "user-1").unwrap();
        sessions.insert("user-1", third).unwrap();

        assert_eq!(sessions.len(), 3);
        assert!(sessions.checkout(&first_id, "user-1").is_ok());
        assert!(matches!(
            sessions.checkout(&second_id, "user-1"),
            Err(EngineError::NotFound(_))
        ));
        assert!(sessions.checkout(&third_id, "user-1").is_ok());
        assert!(sessions.checkout(&other_id, "user-2").is_ok());
    }
}
