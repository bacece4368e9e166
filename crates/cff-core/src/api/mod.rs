// REST API surface of the College Fantasy Football server.
//
// Page controllers talk to the server only through the `FantasyApi` trait so
// tests can substitute a scripted implementation; `HttpApi` is the real one.

pub mod client;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use client::HttpApi;
pub use types::{
    AuthResponse, CreatedLeague, Credentials, LiveScore, NewLeague, Player, PlayerQuery,
    TokenValidation,
};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (connection refused, DNS,
    /// reset).
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    /// HTTP 401. `message` is the server's `error` field, if any.
    #[error("unauthorized")]
    Unauthorized { message: Option<String> },

    /// Any other non-2xx status.
    #[error("server rejected request with status {status}")]
    Rejected { status: u16, message: Option<String> },

    /// A 2xx response whose body did not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether the server was never reached. Timeouts count: from the user's
    /// point of view the server did not answer.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Timeout)
    }

    /// The server's own error text, when it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message } | ApiError::Rejected { message, .. } => {
                message.as_deref().filter(|m| !m.trim().is_empty())
            }
            _ => None,
        }
    }
}

#[async_trait]
pub trait FantasyApi: Send + Sync {
    /// `GET /scores/live`
    async fn live_scores(&self) -> Result<Vec<LiveScore>, ApiError>;

    /// `GET /players`
    async fn search_players(&self, query: &PlayerQuery) -> Result<Vec<Player>, ApiError>;

    /// `POST /auth/signup`
    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;

    /// `POST /auth/login`
    async fn log_in(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;

    /// `POST /leagues`. The bearer token is attached when given; the call is
    /// attempted either way and the server decides.
    async fn create_league(
        &self,
        league: &NewLeague,
        token: Option<&str>,
    ) -> Result<CreatedLeague, ApiError>;

    /// `GET /auth/validate`
    async fn validate_token(&self, token: &str) -> Result<TokenValidation, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_and_transport_are_unreachable() {
        assert!(ApiError::Timeout.is_unreachable());
        assert!(ApiError::Transport("refused".into()).is_unreachable());
        assert!(!ApiError::Unauthorized { message: None }.is_unreachable());
        assert!(!ApiError::Decode("eof".into()).is_unreachable());
    }

    #[test]
    fn server_message_ignores_blank_text() {
        let rejected = ApiError::Rejected {
            status: 409,
            message: Some("Account already exists".into()),
        };
        assert_eq!(rejected.server_message(), Some("Account already exists"));

        let blank = ApiError::Rejected {
            status: 500,
            message: Some("  ".into()),
        };
        assert_eq!(blank.server_message(), None);
        assert_eq!(ApiError::Timeout.server_message(), None);
    }
}
