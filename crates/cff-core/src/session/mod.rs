// Client-held identity and league state, and the origin-wide store that keeps
// every page context in agreement about them.

pub mod model;
pub mod store;

pub use model::{LeagueRecord, Session};
pub use store::{
    ContextId, MemoryBackend, SessionStore, SharedStorage, StorageBackend, StorageError,
    StorageEvent, StorageWatcher, LEAGUE_KEY, SESSION_KEY,
};
