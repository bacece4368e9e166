// Home page: live scores, a quick player search and a league teaser.

use cff_core::api::{ApiError, LiveScore, Player};
use cff_core::session::SharedStorage;
use cff_core::widget::{RequestId, Widget, WidgetState};
use tracing::debug;

use super::search::PlayerSearch;
use super::{Effect, Page, PageContext};
use crate::protocol::{PageId, SearchTarget};
use crate::view::{Field, KeyHint, PageView, Row, Section, Tone};

pub const SCORES_TITLE: &str = "Live scores";
pub const SEARCH_TITLE: &str = "Player search";
pub const LEAGUE_TITLE: &str = "Your league";

const SCORES_LOADING: &str = "Loading live scores...";
const SCORES_FALLBACK: &str = "Live scores will appear here during game time.";
const NO_GAMES: &str = "No games in progress.";

const HINTS: [KeyHint; 2] = [KeyHint::new("/", "search"), KeyHint::new("r", "refresh scores")];

pub struct HomePage {
    ctx: PageContext,
    scores: Widget<Vec<LiveScore>>,
    search: PlayerSearch,
}

impl HomePage {
    pub fn new(shared: &SharedStorage, search_limit: usize) -> Self {
        HomePage {
            ctx: PageContext::open(shared),
            scores: Widget::new(),
            search: PlayerSearch::new(SearchTarget::Home, search_limit),
        }
    }

    pub fn load_scores(&mut self) -> Effect {
        Effect::FetchScores {
            request: self.scores.begin(),
        }
    }

    pub fn on_scores(&mut self, request: RequestId, result: Result<Vec<LiveScore>, ApiError>) {
        let outcome = result.map_err(|e| {
            debug!("live scores unavailable: {}", e);
            SCORES_FALLBACK.to_string()
        });
        self.scores.complete(request, outcome);
    }

    pub fn search(&mut self, term: &str) -> Option<Effect> {
        self.search.submit(term, None)
    }

    pub fn on_search(&mut self, request: RequestId, result: Result<Vec<Player>, ApiError>) {
        self.search.complete(request, result);
    }

    fn scores_section(&self) -> Section {
        match self.scores.state() {
            WidgetState::Idle => Section::message(SCORES_TITLE, SCORES_FALLBACK, Tone::Muted),
            WidgetState::Loading(_) => Section::message(SCORES_TITLE, SCORES_LOADING, Tone::Muted),
            WidgetState::Errored(text) => Section::message(SCORES_TITLE, text.clone(), Tone::Muted),
            WidgetState::Rendered(scores) if scores.is_empty() => {
                Section::message(SCORES_TITLE, NO_GAMES, Tone::Muted)
            }
            WidgetState::Rendered(scores) => {
                Section::rows(SCORES_TITLE, scores.iter().map(score_row).collect())
            }
        }
    }

    fn league_section(&self) -> Section {
        match (self.ctx.session(), self.ctx.league()) {
            (None, _) => Section::fields(
                LEAGUE_TITLE,
                vec![Field::new(
                    "League features",
                    "Create leagues, customize scoring, draft players, and manage lineups. Sign in to get started.",
                )],
            ),
            (Some(_), None) => Section::message(
                LEAGUE_TITLE,
                "No league yet. Create one on the League page.",
                Tone::Muted,
            ),
            (Some(_), Some(league)) => {
                let teams = league
                    .teams
                    .map(|n| format!("{n} teams"))
                    .unwrap_or_else(|| "Teams TBD".to_string());
                Section::fields(LEAGUE_TITLE, vec![Field::new(&league.name, teams)])
            }
        }
    }
}

pub fn score_row(score: &LiveScore) -> Row {
    let clock = super::non_blank(score.clock.as_deref()).unwrap_or("00:00");
    Row {
        primary: format!("{} @ {}", score.away, score.home),
        secondary: Some(format!("Q{} - {}", score.quarter, clock)),
        trailing: Some(format!("{} - {}", score.away_score, score.home_score)),
    }
}

impl Page for HomePage {
    fn id(&self) -> PageId {
        PageId::Home
    }

    fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut PageContext {
        &mut self.ctx
    }

    fn show(&mut self, first: bool) -> Vec<Effect> {
        if first {
            vec![self.load_scores()]
        } else {
            Vec::new()
        }
    }

    fn refresh(&mut self) -> Vec<Effect> {
        vec![self.load_scores()]
    }

    fn view(&self) -> PageView {
        self.ctx.page_view(
            self.id(),
            vec![
                self.scores_section(),
                self.search.section(SEARCH_TITLE),
                self.league_section(),
            ],
            HINTS.to_vec(),
        )
    }
}
