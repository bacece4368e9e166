// Integration tests: page contexts, orchestrator and a scripted API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cff_app::app::{self, AppState};
use cff_app::protocol::{ApiEvent, AuthKind, PageId, UiUpdate, UserCommand};
use cff_app::view::{PageView, SectionBody};
use cff_core::api::{
    ApiError, AuthResponse, CreatedLeague, Credentials, FantasyApi, LiveScore, NewLeague, Player,
    PlayerQuery, TokenValidation,
};
use cff_core::config::SearchConfig;
use cff_core::db::Database;
use cff_core::session::{LeagueRecord, Session, SharedStorage};
use tokio::sync::{mpsc, Notify};

// ---------------------------------------------------------------------------
// Scripted API
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ScriptedApi {
    scores: Mutex<Option<Result<Vec<LiveScore>, ApiError>>>,
    league_status: Mutex<Option<u16>>,
    /// Searches for the term "slow" wait here until released.
    gate: Notify,
    seen_tokens: Mutex<Vec<Option<String>>>,
}

fn player(name: &str) -> Player {
    Player {
        id: "1".into(),
        name: name.into(),
        team: "XYZ".into(),
        position: Some("RB".into()),
        conference: None,
        class_year: None,
    }
}

#[async_trait]
impl FantasyApi for ScriptedApi {
    async fn live_scores(&self) -> Result<Vec<LiveScore>, ApiError> {
        self.scores
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn search_players(&self, query: &PlayerQuery) -> Result<Vec<Player>, ApiError> {
        if query.term == "slow" {
            self.gate.notified().await;
            return Ok(vec![player("Slow Result")]);
        }
        Ok(vec![player("A. Back")])
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        Ok(AuthResponse {
            email: Some(credentials.email.clone()),
            token: "tok-signup".into(),
            message: Some("Account created".into()),
        })
    }

    async fn log_in(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        if credentials.password != "pw" {
            return Err(ApiError::Unauthorized {
                message: Some("Invalid credentials".into()),
            });
        }
        Ok(AuthResponse {
            email: Some(credentials.email.clone()),
            token: "tok-login".into(),
            message: Some("Signed in".into()),
        })
    }

    async fn create_league(
        &self,
        league: &NewLeague,
        token: Option<&str>,
    ) -> Result<CreatedLeague, ApiError> {
        self.seen_tokens
            .lock()
            .unwrap()
            .push(token.map(str::to_string));
        match *self.league_status.lock().unwrap() {
            Some(401) => Err(ApiError::Unauthorized { message: None }),
            Some(status) => Err(ApiError::Rejected {
                status,
                message: None,
            }),
            None => Ok(CreatedLeague {
                league: LeagueRecord {
                    id: Some("lg_1".into()),
                    name: league.name.clone(),
                    teams: Some(league.teams),
                    scoring: Some(league.scoring.clone()),
                    draft_type: Some(league.draft_type.clone()),
                    notes: Some(league.notes.clone()),
                    scoring_label: None,
                    draft_type_label: None,
                },
                message: Some("League created".into()),
            }),
        }
    }

    async fn validate_token(&self, _token: &str) -> Result<TokenValidation, ApiError> {
        Ok(TokenValidation {
            valid: true,
            email: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_state(
    shared: &SharedStorage,
    api: Arc<ScriptedApi>,
    start: PageId,
) -> (AppState, mpsc::Receiver<ApiEvent>) {
    let (api_tx, api_rx) = mpsc::channel(16);
    let state = AppState::new(shared, api, &SearchConfig::default(), api_tx, start);
    (state, api_rx)
}

async fn next_event(rx: &mut mpsc::Receiver<ApiEvent>) -> ApiEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("API event should arrive")
        .expect("API channel open")
}

/// Two origins on one SQLite file, the way two `cff` processes share state.
/// Writes through one never notify the other.
fn two_processes(name: &str) -> (SharedStorage, SharedStorage, std::path::PathBuf) {
    let dir = std::env::temp_dir().join(format!("cff_{}_{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let path = dir.join("client.db");
    let path_str = path.to_str().unwrap();
    let a = SharedStorage::new(Database::open(path_str).unwrap());
    let b = SharedStorage::new(Database::open(path_str).unwrap());
    (a, b, dir)
}

fn text(view: &PageView, title: &str) -> String {
    view.section(title)
        .and_then(|s| s.text())
        .unwrap_or_default()
        .to_string()
}

async fn next_page(rx: &mut mpsc::Receiver<UiUpdate>) -> PageView {
    match tokio::time::timeout(Duration::from_secs(5), rx.recv()).await {
        Ok(Some(UiUpdate::Page(view))) => *view,
        other => panic!("expected a page update, got {other:?}"),
    }
}

fn rows(view: &PageView, title: &str) -> Vec<String> {
    match &view.section(title).expect("section exists").body {
        SectionBody::Rows(rows) => rows.iter().map(|r| r.primary.clone()).collect(),
        other => panic!("expected rows in {title}, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_in_one_page_switches_nav_in_another() {
    let shared = SharedStorage::in_memory();
    let mut storage_rx = shared.subscribe();
    let api = Arc::new(ScriptedApi::default());
    let (mut state, mut api_rx) = new_state(&shared, api, PageId::SignIn);

    state.show(PageId::SignIn);
    assert_eq!(state.page(PageId::Players).view().nav.label, "Sign in");

    state.handle_command(UserCommand::Auth {
        kind: AuthKind::LogIn,
        email: "coach@cff.test".into(),
        password: "pw".into(),
    });
    let event = next_event(&mut api_rx).await;
    state.handle_api_event(event);

    // Login moves on to the league page.
    assert_eq!(state.active_page(), PageId::League);

    // The players page has not re-read yet; the change notification does it.
    storage_rx.recv().await.unwrap();
    state.sync_pages();
    let players_nav = state.page(PageId::Players).view().nav;
    assert_eq!(players_nav.label, "coach@cff.test");
    assert!(players_nav.signed_in);
}

#[tokio::test]
async fn second_window_on_same_origin_follows_sign_out() {
    let shared = SharedStorage::in_memory();
    let api = Arc::new(ScriptedApi::default());
    shared
        .open_context()
        .write_session(&Session::new(Some("coach@cff.test".into()), "tok"))
        .unwrap();

    let (mut first, _rx1) = new_state(&shared, Arc::clone(&api), PageId::Home);
    let (mut second, _rx2) = new_state(&shared, api, PageId::League);
    assert!(second.page(PageId::League).view().nav.signed_in);

    first.handle_command(UserCommand::SignOut);
    second.sync_pages();

    let view = second.page(PageId::League).view();
    assert_eq!(view.nav.label, "Sign in");
    assert!(!view.nav.signed_in);
}

#[tokio::test]
async fn showing_a_page_rereads_writes_from_another_process() {
    let (ours, theirs, dir) = two_processes("show_reread");
    let (mut state, _api_rx) = new_state(&ours, Arc::new(ScriptedApi::default()), PageId::Players);
    state.show(PageId::Players);

    theirs
        .open_context()
        .write_session(&Session::new(Some("x@cff.test".into()), "tok-other"))
        .unwrap();

    // No notification crosses processes.
    state.sync_pages();
    assert_eq!(state.view().nav.label, "Sign in");

    state.handle_command(UserCommand::SwitchPage(PageId::League));
    let view = state.view();
    assert_eq!(view.nav.label, "x@cff.test");
    assert!(view.nav.signed_in);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn focus_resync_rereads_visible_page_without_refetching() {
    let (ours, theirs, dir) = two_processes("focus_resync");
    let (mut state, mut api_rx) =
        new_state(&ours, Arc::new(ScriptedApi::default()), PageId::Players);
    state.show(PageId::Players);

    let other = theirs.open_context();
    other
        .write_session(&Session::new(Some("x@cff.test".into()), "tok-other"))
        .unwrap();
    state.sync_pages();
    assert_eq!(state.view().nav.label, "Sign in");

    state.handle_command(UserCommand::Resync);
    assert_eq!(state.active_page(), PageId::Players);
    assert_eq!(state.view().nav.label, "x@cff.test");

    // Sign-out in the other process is picked up the same way.
    other.clear_session().unwrap();
    state.handle_command(UserCommand::Resync);
    assert_eq!(state.view().nav.label, "Sign in");

    tokio::task::yield_now().await;
    assert!(api_rx.try_recv().is_err(), "resync must not call the API");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn league_creation_401_differs_from_500() {
    let shared = SharedStorage::in_memory();
    let api = Arc::new(ScriptedApi::default());
    let (mut state, mut api_rx) = new_state(&shared, Arc::clone(&api), PageId::League);
    state.show(PageId::League);

    *api.league_status.lock().unwrap() = Some(401);
    state.handle_command(UserCommand::CreateLeague(NewLeague::default()));
    let event = next_event(&mut api_rx).await;
    state.handle_api_event(event);
    let unauthorized = text(&state.view(), "Create league");

    *api.league_status.lock().unwrap() = Some(500);
    state.handle_command(UserCommand::CreateLeague(NewLeague::default()));
    let event = next_event(&mut api_rx).await;
    state.handle_api_event(event);
    let failed = text(&state.view(), "Create league");

    assert_eq!(unauthorized, "Sign in first to create a league.");
    assert_eq!(failed, "Could not create the league right now.");
    // Both attempts went out without a session, so without a token.
    assert_eq!(*api.seen_tokens.lock().unwrap(), vec![None, None]);
}

#[tokio::test]
async fn created_league_reaches_home_teaser() {
    let shared = SharedStorage::in_memory();
    let api = Arc::new(ScriptedApi::default());
    shared
        .open_context()
        .write_session(&Session::new(Some("coach@cff.test".into()), "tok"))
        .unwrap();
    let (mut state, mut api_rx) = new_state(&shared, Arc::clone(&api), PageId::League);
    state.show(PageId::League);

    state.handle_command(UserCommand::CreateLeague(NewLeague {
        name: "Saturday Legends".into(),
        teams: 12,
        ..NewLeague::default()
    }));
    let event = next_event(&mut api_rx).await;
    state.handle_api_event(event);
    assert_eq!(text(&state.view(), "Create league"), "League created");
    assert_eq!(
        *api.seen_tokens.lock().unwrap(),
        vec![Some("tok".to_string())]
    );

    state.sync_pages();
    let home = state.page(PageId::Home).view();
    match &home.section("Your league").unwrap().body {
        SectionBody::Fields(fields) => {
            assert_eq!(fields[0].label, "Saturday Legends");
            assert_eq!(fields[0].value, "12 teams");
        }
        other => panic!("expected league teaser fields, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_live_scores_show_no_games() {
    let shared = SharedStorage::in_memory();
    let api = Arc::new(ScriptedApi::default());
    let (mut state, mut api_rx) = new_state(&shared, api, PageId::Home);

    state.show(PageId::Home);
    assert_eq!(text(&state.view(), "Live scores"), "Loading live scores...");
    let event = next_event(&mut api_rx).await;
    state.handle_api_event(event);

    assert_eq!(text(&state.view(), "Live scores"), "No games in progress.");
}

#[tokio::test]
async fn search_renders_single_row() {
    let shared = SharedStorage::in_memory();
    let api = Arc::new(ScriptedApi::default());
    let (mut state, mut api_rx) = new_state(&shared, api, PageId::Players);
    state.show(PageId::Players);

    state.handle_command(UserCommand::Search("back".into()));
    let event = next_event(&mut api_rx).await;
    state.handle_api_event(event);

    assert_eq!(rows(&state.view(), "Players"), vec!["A. Back — XYZ (RB)"]);
}

#[tokio::test]
async fn slow_search_cannot_overwrite_newer_one() {
    let shared = SharedStorage::in_memory();
    let api = Arc::new(ScriptedApi::default());
    let (mut state, mut api_rx) = new_state(&shared, Arc::clone(&api), PageId::Home);
    state.show(PageId::Home);
    let scores = next_event(&mut api_rx).await;
    state.handle_api_event(scores);

    state.handle_command(UserCommand::Search("slow".into()));
    state.handle_command(UserCommand::Search("fast".into()));

    let fast = next_event(&mut api_rx).await;
    state.handle_api_event(fast);
    assert_eq!(rows(&state.view(), "Player search"), vec!["A. Back — XYZ (RB)"]);

    api.gate.notify_one();
    let slow = next_event(&mut api_rx).await;
    state.handle_api_event(slow);
    assert_eq!(rows(&state.view(), "Player search"), vec!["A. Back — XYZ (RB)"]);
}

#[tokio::test]
async fn run_loop_renders_pages_and_quits() {
    let shared = SharedStorage::in_memory();
    let api = Arc::new(ScriptedApi::default());
    *api.scores.lock().unwrap() = Some(Err(ApiError::Timeout));
    let (api_tx, api_rx) = mpsc::channel(16);
    let state = AppState::new(
        &shared,
        api,
        &SearchConfig::default(),
        api_tx,
        PageId::Home,
    );
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (ui_tx, mut ui_rx) = mpsc::channel(64);

    let handle = tokio::spawn(app::run(cmd_rx, api_rx, shared.subscribe(), ui_tx, state));

    let initial = next_page(&mut ui_rx).await;
    assert_eq!(initial.page, PageId::Home);
    assert_eq!(text(&initial, "Live scores"), "Loading live scores...");

    let after_scores = next_page(&mut ui_rx).await;
    assert_eq!(
        text(&after_scores, "Live scores"),
        "Live scores will appear here during game time."
    );

    cmd_tx.send(UserCommand::SwitchPage(PageId::SignIn)).await.unwrap();
    let sign_in = next_page(&mut ui_rx).await;
    assert_eq!(sign_in.page, PageId::SignIn);
    assert_eq!(text(&sign_in, "Account"), "Not signed in yet.");

    cmd_tx
        .send(UserCommand::Auth {
            kind: AuthKind::SignUp,
            email: "new@cff.test".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();

    // Wait until the sign-up has landed on the sign-in page.
    let mut view = next_page(&mut ui_rx).await;
    while text(&view, "Sign up") != "Account created" {
        view = next_page(&mut ui_rx).await;
    }
    assert_eq!(view.page, PageId::SignIn);
    assert_eq!(view.nav.label, "new@cff.test");
    assert_eq!(text(&view, "Account"), "Signed in as new@cff.test.");

    cmd_tx.send(UserCommand::Quit).await.unwrap();
    handle.await.unwrap().unwrap();
}
