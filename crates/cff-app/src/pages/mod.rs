// Page controllers.
//
// Each page is an independent page context: it owns its own `SessionStore`
// handle and watcher, keeps the `(session, league)` pair it last read, and
// derives everything it renders from that pair plus its widget states. Pages
// never perform I/O beyond the store; API calls are returned as `Effect`s for
// the orchestrator to run.

pub mod home;
pub mod league;
pub mod players;
pub mod search;
pub mod signin;

use cff_core::api::{Credentials, NewLeague, PlayerQuery};
use cff_core::session::{LeagueRecord, Session, SessionStore, SharedStorage, StorageWatcher};
use cff_core::widget::{RequestId, Widget, WidgetState};
use tracing::{debug, warn};

use crate::protocol::{AuthKind, PageId, SearchTarget};
use crate::view::{KeyHint, NavView, PageView, Section, Tone};

pub use home::HomePage;
pub use league::LeaguePage;
pub use players::PlayersPage;
pub use signin::SignInPage;

/// Shown whenever the server could not be reached at all.
pub const UNREACHABLE: &str = "Unable to reach the server. Is it running?";

const SIGN_OUT_HINT: KeyHint = KeyHint::new("s", "sign out");

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// Work a page asks the orchestrator to do on its behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchScores {
        request: RequestId,
    },
    Search {
        target: SearchTarget,
        request: RequestId,
        query: PlayerQuery,
    },
    Auth {
        kind: AuthKind,
        request: RequestId,
        credentials: Credentials,
    },
    CreateLeague {
        request: RequestId,
        league: NewLeague,
        token: Option<String>,
    },
    Validate {
        request: RequestId,
        token: String,
    },
    Navigate(PageId),
}

// ---------------------------------------------------------------------------
// PageContext
// ---------------------------------------------------------------------------

/// One page's handle on the shared store and its last-read state.
pub struct PageContext {
    store: SessionStore,
    watcher: StorageWatcher,
    session: Option<Session>,
    league: Option<LeagueRecord>,
}

impl PageContext {
    pub fn open(shared: &SharedStorage) -> Self {
        let store = shared.open_context();
        let watcher = store.watch();
        let session = store.read_session();
        let league = store.read_league();
        PageContext {
            store,
            watcher,
            session,
            league,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn league(&self) -> Option<&LeagueRecord> {
        self.league.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// Re-read both records from the store.
    pub fn reload(&mut self) {
        self.session = self.store.read_session();
        self.league = self.store.read_league();
    }

    /// Apply change notifications from other page contexts. Returns whether
    /// anything was re-read.
    pub fn sync(&mut self) -> bool {
        let mut stale = false;
        while let Some(event) = self.watcher.try_changed() {
            debug!(
                "context {:?} saw change to {} from {:?}",
                self.store.context_id(),
                event.key,
                event.origin
            );
            stale |= event.touches_session_state();
        }
        if stale {
            self.reload();
        }
        stale
    }

    pub fn save_session(&mut self, session: Session) {
        if let Err(e) = self.store.write_session(&session) {
            warn!("failed to persist session: {}", e);
        }
        self.session = Some(session);
    }

    /// Sign out, which also forgets the league.
    pub fn sign_out(&mut self) {
        if let Err(e) = self.store.clear_session() {
            warn!("failed to clear session: {}", e);
        }
        self.session = None;
        self.league = None;
    }

    pub fn save_league(&mut self, league: LeagueRecord) {
        if let Err(e) = self.store.write_league(&league) {
            warn!("failed to persist league: {}", e);
        }
        self.league = Some(league);
    }

    pub fn clear_league(&mut self) {
        if let Err(e) = self.store.clear_league() {
            warn!("failed to clear league: {}", e);
        }
        self.league = None;
    }

    pub fn nav(&self) -> NavView {
        match &self.session {
            Some(session) => NavView {
                label: session.display_label().to_string(),
                signed_in: true,
            },
            None => NavView {
                label: "Sign in".to_string(),
                signed_in: false,
            },
        }
    }

    /// Assemble a page view with this context's navigation.
    pub fn page_view(&self, page: PageId, sections: Vec<Section>, mut hints: Vec<KeyHint>) -> PageView {
        if self.session.is_some() {
            hints.push(SIGN_OUT_HINT);
        }
        PageView {
            page,
            nav: self.nav(),
            sections,
            hints,
        }
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// Behaviour every page controller shares.
pub trait Page {
    fn id(&self) -> PageId;
    fn context(&self) -> &PageContext;
    fn context_mut(&mut self) -> &mut PageContext;

    /// The page became visible. `first` is true on its initial load.
    fn show(&mut self, first: bool) -> Vec<Effect>;

    /// User asked to reload the page's data.
    fn refresh(&mut self) -> Vec<Effect> {
        Vec::new()
    }

    fn sign_out(&mut self) {
        self.context_mut().sign_out();
    }

    fn view(&self) -> PageView;
}

/// Render a status-line widget (`Working...` while loading, success text,
/// error text in the error tone).
pub(crate) fn status_section(title: &str, widget: &Widget<String>, loading: &str) -> Section {
    match widget.state() {
        WidgetState::Idle => Section::message(title, "", Tone::Muted),
        WidgetState::Loading(_) => Section::message(title, loading, Tone::Muted),
        WidgetState::Rendered(text) => Section::message(title, text.clone(), Tone::Success),
        WidgetState::Errored(text) => Section::message(title, text.clone(), Tone::Error),
    }
}

/// `Some(value)` unless the server sent nothing useful.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
