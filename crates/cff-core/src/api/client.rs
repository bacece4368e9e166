// reqwest-backed implementation of `FantasyApi`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::types::ErrorBody;
use super::{
    ApiError, AuthResponse, CreatedLeague, Credentials, FantasyApi, LiveScore, NewLeague, Player,
    PlayerQuery, TokenValidation,
};
use crate::config::ApiConfig;

/// HTTP client for the fantasy API rooted at a configurable base path.
pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url, config.timeout())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(classify)?;
        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| {
                warn!("unexpected response body ({}): {}", status, e);
                ApiError::Decode(e.to_string())
            });
        }

        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error);
        debug!("request rejected with {}: {:?}", status, message);
        if status == StatusCode::UNAUTHORIZED {
            Err(ApiError::Unauthorized { message })
        } else {
            Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }
}

fn classify(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Transport(err.to_string())
    }
}

#[async_trait]
impl FantasyApi for HttpApi {
    async fn live_scores(&self) -> Result<Vec<LiveScore>, ApiError> {
        self.send(self.http.get(self.url("/scores/live"))).await
    }

    async fn search_players(&self, query: &PlayerQuery) -> Result<Vec<Player>, ApiError> {
        let request = self.http.get(self.url("/players")).query(&query.params());
        self.send(request).await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let request = self.http.post(self.url("/auth/signup")).json(credentials);
        self.send(request).await
    }

    async fn log_in(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let request = self.http.post(self.url("/auth/login")).json(credentials);
        self.send(request).await
    }

    async fn create_league(
        &self,
        league: &NewLeague,
        token: Option<&str>,
    ) -> Result<CreatedLeague, ApiError> {
        let mut request = self.http.post(self.url("/leagues")).json(league);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        self.send(request).await
    }

    async fn validate_token(&self, token: &str) -> Result<TokenValidation, ApiError> {
        let request = self.http.get(self.url("/auth/validate")).bearer_auth(token);
        self.send(request).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
