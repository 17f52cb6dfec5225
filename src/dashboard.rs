//! The service behind the dashboard page
//!
//! Owns the tracked username and the cache, and answers each page request
//! with a freshly computed [`Summary`].

use tracing::debug;

use crate::cache::{Clock, StatsCache, SystemClock};
use crate::data::ChessApi;
use crate::summary::{compute_summary, Summary};

/// Summary source for one tracked player
pub struct Dashboard<A, C = SystemClock> {
    username: String,
    cache: StatsCache<A, C>,
}

impl<A: ChessApi, C: Clock> Dashboard<A, C> {
    pub fn new(username: impl Into<String>, cache: StatsCache<A, C>) -> Self {
        Self {
            username: username.into(),
            cache,
        }
    }

    /// Computes the current summary, fetching upstream only for expired snapshots.
    ///
    /// Never fails: unavailable stats show as missing ratings and unavailable
    /// games as an empty day.
    pub async fn summary(&self) -> Summary {
        let stats = self.cache.get_stats(&self.username).await;
        let games = self.cache.get_todays_games(&self.username).await;

        let summary = compute_summary(&self.username, stats.as_deref(), &games);
        debug!(
            username = %self.username,
            total = summary.total,
            winrate = summary.winrate,
            "summary computed"
        );
        summary
    }
}
