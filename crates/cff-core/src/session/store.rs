// Origin-wide session store.
//
// `SharedStorage` is the origin: one key-value backend plus a change channel.
// Every page context opens its own `SessionStore` handle on it. Writes go
// straight to the backend as whole records (last writer wins) and are then
// announced to the other contexts, never back to the writer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::model::{LeagueRecord, Session};

/// Storage key of the encoded `Session`.
pub const SESSION_KEY: &str = "cff_auth";
/// Storage key of the encoded `LeagueRecord`.
pub const LEAGUE_KEY: &str = "cff_league";

/// Key carried by a resync event: every key may have changed.
const ANY_KEY: &str = "*";

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(#[from] rusqlite::Error),

    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

/// Raw string key-value persistence shared by all page contexts.
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local backend for tests and `:memory:` runs.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Change notifications
// ---------------------------------------------------------------------------

/// Identifies one page context. `ContextId(0)` is the origin itself and is
/// never handed to a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u64);

impl ContextId {
    const ORIGIN: ContextId = ContextId(0);
}

/// A key changed in the shared store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub origin: ContextId,
}

impl StorageEvent {
    /// Event telling a context it may have missed changes and must re-read
    /// everything.
    pub fn resync() -> Self {
        StorageEvent {
            key: ANY_KEY.to_string(),
            origin: ContextId::ORIGIN,
        }
    }

    /// Whether this event can change what a page derives from
    /// `(session, league)`.
    pub fn touches_session_state(&self) -> bool {
        matches!(self.key.as_str(), SESSION_KEY | LEAGUE_KEY | ANY_KEY)
    }
}

/// The origin: one backend and one change channel shared by every context.
#[derive(Clone)]
pub struct SharedStorage {
    backend: Arc<dyn StorageBackend>,
    events: broadcast::Sender<StorageEvent>,
    next_context: Arc<AtomicU64>,
}

impl SharedStorage {
    pub fn new<B: StorageBackend + 'static>(backend: B) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        SharedStorage {
            backend: Arc::new(backend),
            events,
            next_context: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Open a new page context on this origin.
    pub fn open_context(&self) -> SessionStore {
        let id = self.next_context.fetch_add(1, Ordering::Relaxed);
        SessionStore {
            shared: self.clone(),
            context: ContextId(id),
        }
    }

    /// Raw subscription to every change, including the subscriber's own.
    /// Page contexts should prefer `SessionStore::watch`.
    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }

    /// Direct access to the backend, bypassing encoding and notifications.
    pub fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }
}

// ---------------------------------------------------------------------------
// SessionStore
// ---------------------------------------------------------------------------

/// One page context's view of the shared session and league state.
///
/// Reads never fail: an unreadable, malformed or incomplete record is the
/// same as a record that was never written. Writes replace whole records.
#[derive(Clone)]
pub struct SessionStore {
    shared: SharedStorage,
    context: ContextId,
}

impl SessionStore {
    pub fn context_id(&self) -> ContextId {
        self.context
    }

    pub fn read_session(&self) -> Option<Session> {
        self.read_raw(SESSION_KEY).and_then(|raw| Session::decode(&raw))
    }

    pub fn write_session(&self, session: &Session) -> Result<(), StorageError> {
        self.write_record(SESSION_KEY, session)
    }

    /// Sign out. Also removes the league record: a league is meaningless
    /// without the session that created it.
    pub fn clear_session(&self) -> Result<(), StorageError> {
        let session = self.remove(SESSION_KEY);
        let league = self.remove(LEAGUE_KEY);
        session.and(league)
    }

    pub fn read_league(&self) -> Option<LeagueRecord> {
        self.read_raw(LEAGUE_KEY).and_then(|raw| LeagueRecord::decode(&raw))
    }

    pub fn write_league(&self, league: &LeagueRecord) -> Result<(), StorageError> {
        self.write_record(LEAGUE_KEY, league)
    }

    /// Remove the league record only; the session is untouched.
    pub fn clear_league(&self) -> Result<(), StorageError> {
        self.remove(LEAGUE_KEY)
    }

    /// Subscribe to changes made by other contexts.
    pub fn watch(&self) -> StorageWatcher {
        StorageWatcher {
            rx: self.shared.subscribe(),
            context: self.context,
        }
    }

    /// Whether this context should react to `event`.
    pub fn is_foreign(&self, event: &StorageEvent) -> bool {
        event.origin != self.context
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.shared.backend.get(key) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("failed to read {} from storage, treating as absent: {}", key, e);
                None
            }
        }
    }

    fn write_record<T: Serialize>(&self, key: &str, record: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(record)?;
        self.shared.backend.set(key, &encoded)?;
        self.notify(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.shared.backend.remove(key)?;
        self.notify(key);
        Ok(())
    }

    fn notify(&self, key: &str) {
        // No receivers is fine: no other page is open.
        let _ = self.shared.events.send(StorageEvent {
            key: key.to_string(),
            origin: self.context,
        });
    }
}

/// Stream of changes made by contexts other than the one that created it.
pub struct StorageWatcher {
    rx: broadcast::Receiver<StorageEvent>,
    context: ContextId,
}

impl StorageWatcher {
    /// Wait for the next foreign change. Returns `None` once the origin is
    /// gone. If events were dropped because this watcher fell behind, a
    /// resync event is returned instead.
    pub async fn changed(&mut self) -> Option<StorageEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.origin == self.context => continue,
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    debug!("storage watcher lagged by {} events, resyncing", missed);
                    return Some(StorageEvent::resync());
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of `changed`.
    pub fn try_changed(&mut self) -> Option<StorageEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) if event.origin == self.context => continue,
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => {
                    return Some(StorageEvent::resync())
                }
                Err(_) => return None,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
