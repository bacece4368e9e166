// Player search box shared by the home and players pages.

use cff_core::api::{ApiError, Player, PlayerQuery};
use cff_core::widget::{RequestId, Widget, WidgetState};

use super::{non_blank, Effect};
use crate::protocol::SearchTarget;
use crate::view::{Row, Section, Tone};

const SEARCHING: &str = "Searching...";
const SEARCH_FAILED: &str = "Unable to fetch players right now.";
const NO_RESULTS: &str = "No players found.";
const SEARCH_PROMPT: &str = "Search players by name.";

pub struct PlayerSearch {
    target: SearchTarget,
    limit: usize,
    results: Widget<Vec<Player>>,
    last_term: Option<String>,
}

impl PlayerSearch {
    pub fn new(target: SearchTarget, limit: usize) -> Self {
        PlayerSearch {
            target,
            limit,
            results: Widget::new(),
            last_term: None,
        }
    }

    pub fn state(&self) -> &WidgetState<Vec<Player>> {
        self.results.state()
    }

    pub fn last_term(&self) -> Option<&str> {
        self.last_term.as_deref()
    }

    /// Start a search. A blank term does nothing.
    pub fn submit(&mut self, term: &str, position: Option<&str>) -> Option<Effect> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        self.last_term = Some(term.to_string());
        let request = self.results.begin();
        let query = PlayerQuery::new(term)
            .with_position(position.map(str::to_string))
            .with_limit(self.limit);
        Some(Effect::Search {
            target: self.target,
            request,
            query,
        })
    }

    pub fn complete(&mut self, request: RequestId, result: Result<Vec<Player>, ApiError>) -> bool {
        let outcome = result.map_err(|e| {
            tracing::debug!("player search failed: {}", e);
            SEARCH_FAILED.to_string()
        });
        self.results.complete(request, outcome)
    }

    pub fn section(&self, title: &str) -> Section {
        match self.results.state() {
            WidgetState::Idle => Section::message(title, SEARCH_PROMPT, Tone::Muted),
            WidgetState::Loading(_) => Section::message(title, SEARCHING, Tone::Muted),
            WidgetState::Errored(text) => Section::message(title, text.clone(), Tone::Error),
            WidgetState::Rendered(players) if players.is_empty() => {
                Section::message(title, NO_RESULTS, Tone::Muted)
            }
            WidgetState::Rendered(players) => Section::rows(
                title,
                players.iter().take(self.limit).map(player_row).collect(),
            ),
        }
    }
}

pub fn player_row(player: &Player) -> Row {
    let position = non_blank(player.position.as_deref()).unwrap_or("Pos TBD");
    let conference = non_blank(player.conference.as_deref()).unwrap_or("Conference TBD");
    let class_year = non_blank(player.class_year.as_deref()).unwrap_or("Class TBD");
    Row {
        primary: format!("{} — {} ({})", player.name, player.team, position),
        secondary: Some(format!("{conference} • {class_year}")),
        trailing: None,
    }
}
