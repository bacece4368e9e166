// Persisted record shapes: the signed-in session and the cached league.
//
// Both are stored as JSON without a schema tag. Unknown fields are ignored on
// decode so records written by a newer client still read back here.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Client-held proof of authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Display label only; never used for authorization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Opaque bearer token issued by the server.
    pub token: String,
}

impl Session {
    pub fn new(email: Option<String>, token: impl Into<String>) -> Self {
        Session {
            email: email.filter(|e| !e.trim().is_empty()),
            token: token.into(),
        }
    }

    /// A session without a usable token is no session at all.
    pub fn is_valid(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Label for the navigation affordance: the email, or `Account` when the
    /// server never told us one.
    pub fn display_label(&self) -> &str {
        match self.email.as_deref() {
            Some(email) if !email.trim().is_empty() => email,
            _ => "Account",
        }
    }

    /// Decode a stored payload. Anything malformed, or a session without a
    /// token, is `None`.
    pub fn decode(raw: &str) -> Option<Self> {
        decode::<Session>(raw).filter(Session::is_valid)
    }
}

/// The single most recently created league, as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<u32>,
    /// Server-defined scoring id (`ppr`, `half_ppr`, `standard`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<String>,
    /// Server-defined draft type (`snake`, `auction`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft_type_label: Option<String>,
}

impl LeagueRecord {
    pub fn decode(raw: &str) -> Option<Self> {
        decode(raw)
    }
}

fn decode<T: DeserializeOwned>(raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("discarding unreadable stored record: {}", e);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
