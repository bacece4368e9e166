// App orchestrator: owns the four page contexts and routes user commands,
// API results and storage change notifications between them.

use std::collections::HashSet;
use std::sync::Arc;

use cff_core::api::FantasyApi;
use cff_core::config::SearchConfig;
use cff_core::session::{SharedStorage, StorageEvent};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

use crate::pages::{Effect, HomePage, LeaguePage, Page, PlayersPage, SignInPage};
use crate::protocol::{ApiEvent, AuthKind, PageId, SearchTarget, UiUpdate, UserCommand};
use crate::view::PageView;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    home: HomePage,
    sign_in: SignInPage,
    league: LeaguePage,
    players: PlayersPage,
    active: PageId,
    /// Pages that have had their initial load.
    loaded: HashSet<PageId>,
    api: Arc<dyn FantasyApi>,
    api_tx: mpsc::Sender<ApiEvent>,
}

impl AppState {
    /// Open one page context per page on `shared`. Nothing is loaded until
    /// the first page is shown.
    pub fn new(
        shared: &SharedStorage,
        api: Arc<dyn FantasyApi>,
        search: &SearchConfig,
        api_tx: mpsc::Sender<ApiEvent>,
        start: PageId,
    ) -> Self {
        AppState {
            home: HomePage::new(shared, search.home_limit),
            sign_in: SignInPage::new(shared),
            league: LeaguePage::new(shared),
            players: PlayersPage::new(shared, search.players_limit),
            active: start,
            loaded: HashSet::new(),
            api,
            api_tx,
        }
    }

    pub fn active_page(&self) -> PageId {
        self.active
    }

    pub fn page(&self, id: PageId) -> &dyn Page {
        match id {
            PageId::Home => &self.home,
            PageId::SignIn => &self.sign_in,
            PageId::League => &self.league,
            PageId::Players => &self.players,
        }
    }

    fn page_mut(&mut self, id: PageId) -> &mut dyn Page {
        match id {
            PageId::Home => &mut self.home,
            PageId::SignIn => &mut self.sign_in,
            PageId::League => &mut self.league,
            PageId::Players => &mut self.players,
        }
    }

    /// Render of the visible page.
    pub fn view(&self) -> PageView {
        self.page(self.active).view()
    }

    /// Make `id` the visible page. Becoming visible re-reads the shared
    /// store, which also covers changes made by other processes.
    pub fn show(&mut self, id: PageId) {
        info!("Showing page: {:?}", id);
        self.active = id;
        let first = self.loaded.insert(id);
        let page = self.page_mut(id);
        page.context_mut().reload();
        let effects = page.show(first);
        self.run_effects(effects);
    }

    /// Let every page apply pending changes from other page contexts.
    pub fn sync_pages(&mut self) {
        for id in PageId::ALL {
            if self.page_mut(id).context_mut().sync() {
                debug!("{:?} re-read shared session state", id);
            }
        }
    }

    pub fn handle_command(&mut self, cmd: UserCommand) {
        match cmd {
            UserCommand::SwitchPage(id) => self.show(id),
            UserCommand::Resync => {
                debug!("Re-reading shared state for {:?}", self.active);
                self.page_mut(self.active).context_mut().reload();
            }
            UserCommand::Refresh => {
                let page = self.page_mut(self.active);
                page.context_mut().reload();
                let effects = page.refresh();
                self.run_effects(effects);
            }
            UserCommand::Search(term) => {
                let effect = match self.active {
                    PageId::Home => self.home.search(&term),
                    PageId::Players => self.players.search(&term),
                    other => {
                        debug!("search ignored on {:?}", other);
                        None
                    }
                };
                self.run_effects(effect.into_iter().collect());
            }
            UserCommand::CyclePosition => {
                if self.active == PageId::Players {
                    let effect = self.players.cycle_position();
                    self.run_effects(effect.into_iter().collect());
                }
            }
            UserCommand::Auth {
                kind,
                email,
                password,
            } => {
                let effect = self.sign_in.submit(kind, &email, &password);
                self.run_effects(effect.into_iter().collect());
            }
            UserCommand::ValidateSession => {
                let effect = self.sign_in.validate();
                self.run_effects(effect.into_iter().collect());
            }
            UserCommand::CreateLeague(league) => {
                let effect = self.league.create(league);
                self.run_effects(vec![effect]);
            }
            UserCommand::ClearLeague => {
                if self.active == PageId::League {
                    self.league.clear_league();
                }
            }
            UserCommand::SignOut => {
                info!("Signing out");
                self.page_mut(self.active).sign_out();
            }
            UserCommand::Quit => {
                // Handled in the main loop
            }
        }
    }

    pub fn handle_api_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::LiveScores { request, result } => self.home.on_scores(request, result),
            ApiEvent::Search {
                target: SearchTarget::Home,
                request,
                result,
            } => self.home.on_search(request, result),
            ApiEvent::Search {
                target: SearchTarget::Players,
                request,
                result,
            } => self.players.on_search(request, result),
            ApiEvent::Auth {
                kind,
                request,
                email,
                result,
            } => {
                let effects = self.sign_in.on_auth(kind, request, &email, result);
                self.run_effects(effects);
            }
            ApiEvent::LeagueCreated { request, result } => self.league.on_created(request, result),
            ApiEvent::Validation { request, result } => {
                self.sign_in.on_validation(request, result)
            }
        }
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Navigate(id) => self.show(id),
                other => self.spawn_request(other),
            }
        }
    }

    /// Run one API call on its own task; the result comes back on `api_tx`.
    fn spawn_request(&self, effect: Effect) {
        let api = Arc::clone(&self.api);
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let event = match effect {
                Effect::FetchScores { request } => ApiEvent::LiveScores {
                    request,
                    result: api.live_scores().await,
                },
                Effect::Search {
                    target,
                    request,
                    query,
                } => ApiEvent::Search {
                    target,
                    request,
                    result: api.search_players(&query).await,
                },
                Effect::Auth {
                    kind,
                    request,
                    credentials,
                } => {
                    let result = match kind {
                        AuthKind::LogIn => api.log_in(&credentials).await,
                        AuthKind::SignUp => api.sign_up(&credentials).await,
                    };
                    ApiEvent::Auth {
                        kind,
                        request,
                        email: credentials.email,
                        result,
                    }
                }
                Effect::CreateLeague {
                    request,
                    league,
                    token,
                } => ApiEvent::LeagueCreated {
                    request,
                    result: api.create_league(&league, token.as_deref()).await,
                },
                Effect::Validate { request, token } => ApiEvent::Validation {
                    request,
                    result: api.validate_token(&token).await,
                },
                Effect::Navigate(_) => return,
            };
            // Receiver dropped means the app is shutting down.
            let _ = tx.send(event).await;
        });
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the application event loop.
///
/// Listens on three channels using `tokio::select!`:
/// 1. User commands from the TUI
/// 2. Results of spawned API calls
/// 3. Change notifications from the shared session store
///
/// After each message the visible page is re-rendered into `ui_tx`.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut api_rx: mpsc::Receiver<ApiEvent>,
    mut storage_rx: broadcast::Receiver<StorageEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    state.show(state.active_page());
    publish(&state, &ui_tx).await;

    // When the store's channel closes, stop polling it so select! never
    // spins on a finished receiver.
    let mut storage_open = true;

    loop {
        tokio::select! {
            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => state.handle_command(cmd),
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- API results ---
            event = api_rx.recv() => {
                match event {
                    Some(event) => state.handle_api_event(event),
                    None => {
                        info!("API channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Storage changes from any page context ---
            change = storage_rx.recv(), if storage_open => {
                match change {
                    Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => state.sync_pages(),
                    Err(broadcast::error::RecvError::Closed) => {
                        info!("Storage change channel closed");
                        storage_open = false;
                    }
                }
            }
        }

        publish(&state, &ui_tx).await;
    }

    info!("Application event loop exiting");
    Ok(())
}

async fn publish(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx.send(UiUpdate::Page(Box::new(state.view()))).await;
}
