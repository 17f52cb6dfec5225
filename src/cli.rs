//! Command-line interface parsing for Chess Daily
//!
//! This module handles parsing of CLI arguments (with environment fallbacks)
//! using clap, and validates them into the configuration the server starts with.

use std::net::SocketAddr;

use chrono::Duration;
use clap::Parser;
use thiserror::Error;

use crate::cache::CacheConfig;
use crate::data::chess_com::{CHESS_COM_BASE_URL, DEFAULT_REQUEST_TIMEOUT};

/// Player tracked when none is configured
pub const DEFAULT_USERNAME: &str = "unique-crl6d";

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The username cannot exist on chess.com
    #[error("Invalid username: '{0}'. Usernames are 3-25 characters of letters, digits, '_' and '-'")]
    InvalidUsername(String),

    /// The API base URL is not an http(s) URL
    #[error("Invalid API base URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidBaseUrl(String),
}

/// Chess Daily - Today's chess.com results for one player
#[derive(Parser, Debug)]
#[command(name = "chess-daily")]
#[command(about = "Serve a page with a chess.com player's ratings and today's results")]
#[command(version)]
pub struct Cli {
    /// chess.com username to track
    #[arg(long, env = "CHESS_DAILY_USERNAME", default_value = DEFAULT_USERNAME)]
    pub username: String,

    /// Address to listen on
    #[arg(long, env = "CHESS_DAILY_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Minutes an upstream result is reused before it is fetched again
    #[arg(
        long,
        env = "CHESS_DAILY_CACHE_TTL_MINUTES",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub cache_ttl_minutes: u32,

    /// Base URL of the chess.com published-data API
    #[arg(long, env = "CHESS_DAILY_API_BASE_URL", default_value = CHESS_COM_BASE_URL)]
    pub api_base_url: String,

    /// Number of monthly archives fetched in parallel
    #[arg(
        long,
        env = "CHESS_DAILY_ARCHIVE_CONCURRENCY",
        default_value_t = 1,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub archive_concurrency: u16,

    /// Keep showing the last fetched data when chess.com cannot be reached
    #[arg(long, env = "CHESS_DAILY_SERVE_STALE")]
    pub serve_stale: bool,

    /// Seconds a single chess.com request may take before it is abandoned
    #[arg(
        long,
        env = "CHESS_DAILY_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub request_timeout_secs: u64,
}

/// Validated configuration the server starts with
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub username: String,
    pub bind: SocketAddr,
    pub api_base_url: String,
    pub request_timeout: std::time::Duration,
    pub cache: CacheConfig,
}

/// Checks a username against the chess.com username alphabet.
///
/// # Returns
/// * `Ok(())` if the username is 3-25 ASCII letters, digits, '_' or '-'
/// * `Err(CliError::InvalidUsername)` otherwise
pub fn validate_username(username: &str) -> Result<(), CliError> {
    let valid_len = (3..=25).contains(&username.len());
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid_len && valid_chars {
        Ok(())
    } else {
        Err(CliError::InvalidUsername(username.to_string()))
    }
}

impl ServerConfig {
    /// Creates a ServerConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(ServerConfig)` with the validated settings
    /// * `Err(CliError)` if the username or base URL is unusable
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        validate_username(&cli.username)?;

        let base_url = cli.api_base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(CliError::InvalidBaseUrl(cli.api_base_url.clone()));
        }

        Ok(ServerConfig {
            username: cli.username.clone(),
            bind: cli.bind,
            api_base_url: base_url.to_string(),
            request_timeout: std::time::Duration::from_secs(cli.request_timeout_secs),
            cache: CacheConfig {
                ttl: Duration::minutes(i64::from(cli.cache_ttl_minutes)),
                serve_stale_on_error: cli.serve_stale,
                archive_concurrency: usize::from(cli.archive_concurrency),
            },
        })
    }
}
