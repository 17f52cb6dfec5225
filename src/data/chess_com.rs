//! chess.com public API client
//!
//! This module fetches player statistics and monthly game archives from the
//! chess.com published-data API and decodes them into our data structures.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::{Game, PlayerStats};

/// Base URL for the chess.com published-data API
pub const CHESS_COM_BASE_URL: &str = "https://api.chess.com/pub";

/// User-Agent sent with every request; the API blocks clients without a browser-like one
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:92.0) Gecko/20100101 Firefox/92.0";

/// How long a single upstream request may take before it is abandoned
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when fetching from chess.com
#[derive(Debug, Error)]
pub enum FetchError {
    /// Upstream answered with something other than 200 OK
    #[error("upstream returned HTTP {status_code}")]
    Status { status_code: u16 },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// The upstream calls the cache is built on
#[async_trait]
pub trait ChessApi: Send + Sync {
    /// Fetches the player's per-mode statistics
    async fn fetch_stats(&self, username: &str) -> Result<PlayerStats, FetchError>;

    /// Fetches the list of monthly archive URLs for the player
    async fn fetch_archive_list(&self, username: &str) -> Result<Vec<String>, FetchError>;

    /// Fetches the games of one archive.
    ///
    /// Failures are logged and yield an empty list so that one bad month does
    /// not hide the games of the others.
    async fn fetch_archive(&self, url: &str) -> Vec<Game>;
}

/// `/games/archives` response body
#[derive(Debug, Deserialize)]
struct ArchivesResponse {
    #[serde(default)]
    archives: Vec<String>,
}

/// Monthly archive response body
#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    #[serde(default)]
    games: Vec<Game>,
}

/// Client for the chess.com published-data API
#[derive(Debug, Clone)]
pub struct ChessComClient {
    client: Client,
    base_url: String,
}

impl ChessComClient {
    /// Create a new ChessComClient against the public API
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(CHESS_COM_BASE_URL)
    }

    /// Create a new ChessComClient against a custom base URL
    ///
    /// The base URL must include the `/pub` prefix, e.g. `http://127.0.0.1:8080/pub`.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a new ChessComClient whose requests give up after `timeout`
    ///
    /// A timed out request fails with `FetchError::RequestFailed`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a new ChessComClient with a custom HTTP client
    ///
    /// The caller is responsible for configuring the User-Agent.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn stats_url(&self, username: &str) -> String {
        format!("{}/player/{}/stats", self.base_url, username)
    }

    fn archives_url(&self, username: &str) -> String {
        format!("{}/player/{}/games/archives", self.base_url, username)
    }

    /// GET a URL and decode a 200 response body as JSON
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        debug!(%url, status = status.as_u16(), "upstream responded");

        if status != StatusCode::OK {
            return Err(FetchError::Status {
                status_code: status.as_u16(),
            });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ChessApi for ChessComClient {
    async fn fetch_stats(&self, username: &str) -> Result<PlayerStats, FetchError> {
        self.get_json(&self.stats_url(username)).await
    }

    async fn fetch_archive_list(&self, username: &str) -> Result<Vec<String>, FetchError> {
        let response: ArchivesResponse = self.get_json(&self.archives_url(username)).await?;
        Ok(response.archives)
    }

    async fn fetch_archive(&self, url: &str) -> Vec<Game> {
        match self.get_json::<ArchiveResponse>(url).await {
            Ok(response) => {
                debug!(%url, games = response.games.len(), "fetched archive");
                response.games
            }
            Err(e) => {
                warn!(%url, error = %e, "skipping archive");
                Vec::new()
            }
        }
    }
}
