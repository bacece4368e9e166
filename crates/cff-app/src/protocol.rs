// Messages exchanged between the TUI, the app orchestrator and spawned API
// tasks.

use cff_core::api::{
    ApiError, AuthResponse, CreatedLeague, LiveScore, NewLeague, Player, TokenValidation,
};
use cff_core::widget::RequestId;

use crate::view::PageView;

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Home,
    SignIn,
    League,
    Players,
}

impl PageId {
    pub const ALL: [PageId; 4] = [PageId::Home, PageId::SignIn, PageId::League, PageId::Players];

    pub fn label(self) -> &'static str {
        match self {
            PageId::Home => "Home",
            PageId::SignIn => "Sign in",
            PageId::League => "League",
            PageId::Players => "Players",
        }
    }

    pub fn index(self) -> usize {
        match self {
            PageId::Home => 0,
            PageId::SignIn => 1,
            PageId::League => 2,
            PageId::Players => 3,
        }
    }

    /// Page for a 1-based tab number key.
    pub fn from_number(n: u32) -> Option<PageId> {
        match n {
            1 => Some(PageId::Home),
            2 => Some(PageId::SignIn),
            3 => Some(PageId::League),
            4 => Some(PageId::Players),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// TUI -> app
// ---------------------------------------------------------------------------

/// Which auth endpoint a form submits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    SignUp,
    LogIn,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Show a page. Showing a page is its visibility regain: it re-reads the
    /// shared store.
    SwitchPage(PageId),
    /// The terminal regained focus: re-read the shared store for the visible
    /// page, which picks up writes made by other processes. No data refetch.
    Resync,
    /// Reload the active page's data (live scores on the home page).
    Refresh,
    /// Run a player search from the active page's search box.
    Search(String),
    /// Players page: step through the position filter.
    CyclePosition,
    Auth {
        kind: AuthKind,
        email: String,
        password: String,
    },
    /// Ask the server whether the stored token is still accepted.
    ValidateSession,
    CreateLeague(NewLeague),
    ClearLeague,
    SignOut,
    Quit,
}

// ---------------------------------------------------------------------------
// app -> TUI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Fresh render of the visible page.
    Page(Box<PageView>),
}

// ---------------------------------------------------------------------------
// API task -> app
// ---------------------------------------------------------------------------

/// Which search box a player search belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    Home,
    Players,
}

/// Completed API call, tagged with the widget request it answers.
#[derive(Debug)]
pub enum ApiEvent {
    LiveScores {
        request: RequestId,
        result: Result<Vec<LiveScore>, ApiError>,
    },
    Search {
        target: SearchTarget,
        request: RequestId,
        result: Result<Vec<Player>, ApiError>,
    },
    Auth {
        kind: AuthKind,
        request: RequestId,
        /// The email the user submitted; used when the response has none.
        email: String,
        result: Result<AuthResponse, ApiError>,
    },
    LeagueCreated {
        request: RequestId,
        result: Result<CreatedLeague, ApiError>,
    },
    Validation {
        request: RequestId,
        result: Result<TokenValidation, ApiError>,
    },
}
