// Players page: full player search with a position filter.

use cff_core::api::{ApiError, Player};
use cff_core::session::SharedStorage;
use cff_core::widget::RequestId;

use super::search::PlayerSearch;
use super::{Effect, Page, PageContext};
use crate::protocol::{PageId, SearchTarget};
use crate::view::{Field, KeyHint, PageView, Section};

pub const FILTER_TITLE: &str = "Filter";
pub const RESULTS_TITLE: &str = "Players";

/// Filter order when cycling; `None` means every position.
pub const POSITION_CYCLE: [Option<&str>; 6] =
    [None, Some("QB"), Some("RB"), Some("WR"), Some("TE"), Some("K")];

const HINTS: [KeyHint; 2] = [KeyHint::new("/", "search"), KeyHint::new("p", "position")];

pub struct PlayersPage {
    ctx: PageContext,
    search: PlayerSearch,
    position: usize,
}

impl PlayersPage {
    pub fn new(shared: &SharedStorage, search_limit: usize) -> Self {
        PlayersPage {
            ctx: PageContext::open(shared),
            search: PlayerSearch::new(SearchTarget::Players, search_limit),
            position: 0,
        }
    }

    pub fn position(&self) -> Option<&'static str> {
        POSITION_CYCLE[self.position]
    }

    pub fn search(&mut self, term: &str) -> Option<Effect> {
        let position = self.position();
        self.search.submit(term, position)
    }

    /// Step to the next position filter and re-run the last search, if any.
    pub fn cycle_position(&mut self) -> Option<Effect> {
        self.position = (self.position + 1) % POSITION_CYCLE.len();
        let term = self.search.last_term()?.to_string();
        self.search(&term)
    }

    pub fn on_search(&mut self, request: RequestId, result: Result<Vec<Player>, ApiError>) {
        self.search.complete(request, result);
    }
}

impl Page for PlayersPage {
    fn id(&self) -> PageId {
        PageId::Players
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
        let mut filter = vec![Field::new("Position", self.position().unwrap_or("All"))];
        if let Some(term) = self.search.last_term() {
            filter.push(Field::new("Search", term));
        }
        self.ctx.page_view(
            self.id(),
            vec![
                Section::fields(FILTER_TITLE, filter),
                self.search.section(RESULTS_TITLE),
            ],
            HINTS.to_vec(),
        )
    }
}
