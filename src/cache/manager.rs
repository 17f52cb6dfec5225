//! Time-bounded cache in front of the chess.com client
//!
//! Provides a `StatsCache` that memoizes the stats and today's-games calls per
//! username for a fixed TTL, and falls back to an empty/absent value when the
//! upstream cannot be reached.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset};
use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{Clock, Snapshot, SystemClock};
use crate::data::{ChessApi, Game, PlayerStats};
use crate::summary::filter_todays_games;

/// Default time-to-live for cached snapshots in minutes
pub const DEFAULT_TTL_MINUTES: i64 = 10;

/// Tuning knobs for [`StatsCache`]
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a snapshot is reused before the next call refetches it
    pub ttl: Duration,
    /// Return the last snapshot, however old, when a refetch fails
    pub serve_stale_on_error: bool,
    /// Maximum number of archive requests in flight at once
    pub archive_concurrency: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(DEFAULT_TTL_MINUTES),
            serve_stale_on_error: false,
            archive_concurrency: 1,
        }
    }
}

type Snapshots<T> = Mutex<HashMap<String, Snapshot<Arc<T>>>>;

/// Memoizing cache for the two upstream operations, keyed by username
///
/// Each map is locked for the whole check-fetch-store sequence, so concurrent
/// requests for an expired entry wait for a single upstream fetch instead of
/// issuing their own. A stalled upstream therefore holds the lock until the
/// client's request timeout fires (see `ChessComClient::with_timeout`).
pub struct StatsCache<A, C = SystemClock> {
    api: A,
    clock: C,
    config: CacheConfig,
    stats: Snapshots<PlayerStats>,
    games: Snapshots<Vec<Game>>,
}

impl<A: ChessApi> StatsCache<A, SystemClock> {
    /// Creates a cache that reads the system clock
    pub fn new(api: A, config: CacheConfig) -> Self {
        Self::with_clock(api, SystemClock, config)
    }
}

impl<A: ChessApi, C: Clock> StatsCache<A, C> {
    /// Creates a cache with a custom clock
    pub fn with_clock(api: A, clock: C, config: CacheConfig) -> Self {
        Self {
            api,
            clock,
            config,
            stats: Mutex::new(HashMap::new()),
            games: Mutex::new(HashMap::new()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns the player's stats, fetching them if the cached copy is missing or expired
    ///
    /// # Returns
    /// * `Some(stats)` from the cache or a successful fetch
    /// * `None` if the fetch failed; an existing snapshot is kept untouched and
    ///   only returned when `serve_stale_on_error` is set
    pub async fn get_stats(&self, username: &str) -> Option<Arc<PlayerStats>> {
        let mut snapshots = self.stats.lock().await;
        let now = self.clock.now();

        if let Some(snapshot) = snapshots.get(username) {
            if snapshot.is_fresh(now, self.config.ttl) {
                debug!(%username, fetched_at = %snapshot.fetched_at, "stats served from cache");
                return Some(Arc::clone(&snapshot.data));
            }
        }

        match self.api.fetch_stats(username).await {
            Ok(stats) => {
                let stats = Arc::new(stats);
                snapshots.insert(username.to_string(), Snapshot::new(Arc::clone(&stats), now));
                info!(%username, "stats refreshed");
                Some(stats)
            }
            Err(e) => {
                warn!(%username, error = %e, "failed to fetch player stats");
                self.stale(&*snapshots, username)
            }
        }
    }

    /// Returns the games the player finished today, fetching the archives if
    /// the cached list is missing or expired
    ///
    /// Archives that fail to load are skipped; the result is built from the
    /// ones that did. If the archive index itself cannot be fetched, an empty
    /// list is returned and the cache is left untouched.
    pub async fn get_todays_games(&self, username: &str) -> Arc<Vec<Game>> {
        let mut snapshots = self.games.lock().await;
        let now = self.clock.now();

        if let Some(snapshot) = snapshots.get(username) {
            if snapshot.is_fresh(now, self.config.ttl) {
                debug!(%username, fetched_at = %snapshot.fetched_at, "games served from cache");
                return Arc::clone(&snapshot.data);
            }
        }

        let archives = match self.api.fetch_archive_list(username).await {
            Ok(archives) => archives,
            Err(e) => {
                warn!(%username, error = %e, "failed to fetch game archives");
                return self.stale(&*snapshots, username).unwrap_or_default();
            }
        };

        let api = &self.api;
        let fetched: Vec<Vec<Game>> = stream::iter(archives)
            .map(|url| async move { api.fetch_archive(&url).await })
            .buffered(self.config.archive_concurrency.max(1))
            .collect()
            .await;

        let games = Arc::new(filter_todays_games(
            fetched.into_iter().flatten(),
            now.date_naive(),
            &self.clock,
        ));
        info!(%username, games = games.len(), "today's games refreshed");
        snapshots.insert(username.to_string(), Snapshot::new(Arc::clone(&games), now));
        games
    }

    /// When the stats for `username` were last fetched
    pub async fn stats_fetched_at(&self, username: &str) -> Option<DateTime<FixedOffset>> {
        self.stats.lock().await.get(username).map(|s| s.fetched_at)
    }

    /// When today's games for `username` were last fetched
    pub async fn games_fetched_at(&self, username: &str) -> Option<DateTime<FixedOffset>> {
        self.games.lock().await.get(username).map(|s| s.fetched_at)
    }

    fn stale<T>(
        &self,
        snapshots: &HashMap<String, Snapshot<Arc<T>>>,
        username: &str,
    ) -> Option<Arc<T>> {
        if !self.config.serve_stale_on_error {
            return None;
        }
        let snapshot = snapshots.get(username)?;
        debug!(%username, fetched_at = %snapshot.fetched_at, "serving stale snapshot");
        Some(Arc::clone(&snapshot.data))
    }
}
