// League page: summary of the stored league, create form status, clear.

use cff_core::api::{ApiError, CreatedLeague, NewLeague};
use cff_core::session::{LeagueRecord, SharedStorage};
use cff_core::widget::{RequestId, Widget};
use tracing::{debug, info};

use super::{non_blank, status_section, Effect, Page, PageContext};
use crate::protocol::PageId;
use crate::view::{Field, KeyHint, PageView, Section, Tone};

pub const SUMMARY_TITLE: &str = "League";
pub const SAVE_TITLE: &str = "Create league";

const SAVING: &str = "Working...";
const SIGN_IN_FIRST: &str = "Sign in first to create a league.";
const SAVE_FAILED: &str = "Could not create the league right now.";
const NO_LEAGUE: &str = "No league yet. Press e to create one.";

const CREATE_HINT: KeyHint = KeyHint::new("e", "create league");
const CLEAR_HINT: KeyHint = KeyHint::new("c", "clear league");

pub struct LeaguePage {
    ctx: PageContext,
    save: Widget<String>,
}

impl LeaguePage {
    pub fn new(shared: &SharedStorage) -> Self {
        LeaguePage {
            ctx: PageContext::open(shared),
            save: Widget::new(),
        }
    }

    /// Submit the create form. The request goes out with the bearer token
    /// when signed in, and without it otherwise.
    pub fn create(&mut self, league: NewLeague) -> Effect {
        Effect::CreateLeague {
            request: self.save.begin(),
            league,
            token: self.ctx.token().map(str::to_string),
        }
    }

    pub fn on_created(&mut self, request: RequestId, result: Result<CreatedLeague, ApiError>) {
        if !self.save.is_current(request) {
            debug!("ignoring superseded league creation response");
            return;
        }
        let outcome = match result {
            Ok(created) => {
                info!("league created: {}", created.league.name);
                let message = non_blank(created.message.as_deref())
                    .unwrap_or("League created")
                    .to_string();
                self.ctx.save_league(created.league);
                Ok(message)
            }
            Err(ApiError::Unauthorized { .. }) => Err(SIGN_IN_FIRST.to_string()),
            Err(e) => {
                debug!("league creation failed: {}", e);
                Err(e.server_message().unwrap_or(SAVE_FAILED).to_string())
            }
        };
        self.save.complete(request, outcome);
    }

    pub fn clear_league(&mut self) {
        self.ctx.clear_league();
        self.save.reset();
    }

    fn summary_section(&self) -> Section {
        match self.ctx.league() {
            Some(league) => Section::fields(SUMMARY_TITLE, summary_fields(league)),
            None => Section::message(SUMMARY_TITLE, NO_LEAGUE, Tone::Muted),
        }
    }
}

/// Display fields of a stored league, with the fallbacks for anything the
/// server did not send.
pub fn summary_fields(league: &LeagueRecord) -> Vec<Field> {
    let name = non_blank(Some(league.name.as_str())).unwrap_or("League");
    let teams = match league.teams {
        Some(n) if n > 0 => format!("{n} teams"),
        _ => "Teams TBD".to_string(),
    };
    let scoring = non_blank(league.scoring_label.as_deref())
        .or(non_blank(league.scoring.as_deref()))
        .unwrap_or("ppr");
    let draft = non_blank(league.draft_type_label.as_deref())
        .or(non_blank(league.draft_type.as_deref()))
        .unwrap_or("snake");
    let id = match non_blank(league.id.as_deref()) {
        Some(id) => format!("ID: {id}"),
        None => "ID not assigned".to_string(),
    };
    let notes = non_blank(league.notes.as_deref()).unwrap_or("No notes yet.");

    vec![
        Field::new("Name", name),
        Field::new("Teams", teams),
        Field::new("Scoring", scoring),
        Field::new("Draft", draft),
        Field::new("League", id),
        Field::new("Notes", notes),
    ]
}

impl Page for LeaguePage {
    fn id(&self) -> PageId {
        PageId::League
    }

    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut PageContext {
        &mut self.ctx
    }

    fn show(&mut self, _first: bool) -> Vec<Effect> {
        Vec::new()
    }

    fn view(&self) -> PageView {
        let mut hints = vec![CREATE_HINT];
        if self.ctx.league().is_some() {
            hints.push(CLEAR_HINT);
        }
        self.ctx.page_view(
            self.id(),
            vec![
                self.summary_section(),
                status_section(SAVE_TITLE, &self.save, SAVING),
            ],
            hints,
        )
    }
}
