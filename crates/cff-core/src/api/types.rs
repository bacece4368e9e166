// Wire types for the College Fantasy Football REST API.

use serde::{Deserialize, Serialize};

use crate::session::LeagueRecord;

/// One in-progress game from `GET /scores/live`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveScore {
    pub home: String,
    pub away: String,
    pub home_score: u32,
    pub away_score: u32,
    pub quarter: u32,
    #[serde(default)]
    pub clock: Option<String>,
}

/// One row from `GET /players`. The server sends empty strings for unknown
/// optional attributes, so readers should treat `Some("")` like `None`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub team: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub conference: Option<String>,
    #[serde(default, rename = "class")]
    pub class_year: Option<String>,
}

/// Parameters of a player search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlayerQuery {
    pub term: String,
    pub position: Option<String>,
    pub conference: Option<String>,
    pub limit: Option<usize>,
}

impl PlayerQuery {
    pub fn new(term: impl Into<String>) -> Self {
        PlayerQuery {
            term: term.into(),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, position: Option<String>) -> Self {
        self.position = position;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query-string pairs in the order the server documents them.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("query", self.term.clone())];
        if let Some(position) = self.position.as_deref().filter(|p| !p.is_empty()) {
            params.push(("position", position.to_string()));
        }
        if let Some(conference) = self.conference.as_deref().filter(|c| !c.is_empty()) {
            params.push(("conference", conference.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

/// Body of `POST /auth/signup` and `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Successful sign-up / sign-in response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub email: Option<String>,
    pub token: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /leagues`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeague {
    pub name: String,
    pub teams: u32,
    pub scoring: String,
    pub draft_type: String,
    pub notes: String,
}

impl Default for NewLeague {
    /// The server's own defaults for an empty request.
    fn default() -> Self {
        NewLeague {
            name: "New League".to_string(),
            teams: 10,
            scoring: "ppr".to_string(),
            draft_type: "snake".to_string(),
            notes: String::new(),
        }
    }
}

/// Successful `POST /leagues` response: the league plus an optional status
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedLeague {
    #[serde(flatten)]
    pub league: LeagueRecord,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /auth/validate` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenValidation {
    pub valid: bool,
    #[serde(default)]
    pub email: Option<String>,
}

/// Error body the server attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}
