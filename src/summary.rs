//! Daily summary computation
//!
//! Turns the cached stats payload and today's games into the figures shown on
//! the dashboard: last rating per mode, win/loss/draw counts and win rate.

use chrono::NaiveDate;
use serde::Serialize;

use crate::cache::Clock;
use crate::data::{Game, GameMode, Outcome, PlayerStats};

/// Placeholder shown when a rating is unavailable
pub const NOT_AVAILABLE: &str = "N/A";

/// Win rate at or above which the dashboard shows green
const GREEN_THRESHOLD: f64 = 50.0;

/// Presentation colour derived from the win rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Green,
    Red,
}

impl ColorTag {
    pub fn for_winrate(winrate: f64) -> Self {
        if winrate >= GREEN_THRESHOLD {
            ColorTag::Green
        } else {
            ColorTag::Red
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTag::Green => "green",
            ColorTag::Red => "red",
        }
    }
}

/// Everything the dashboard displays
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub username: String,
    pub rapid: Option<u32>,
    pub blitz: Option<u32>,
    pub bullet: Option<u32>,
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
    /// Number of games finished today
    pub total: usize,
    /// Percentage of today's games won, one decimal
    pub winrate: f64,
    pub color_tag: ColorTag,
}

/// Formats an optional rating, using [`NOT_AVAILABLE`] when absent
pub fn rating_label(rating: Option<u32>) -> String {
    rating.map_or_else(|| NOT_AVAILABLE.to_string(), |r| r.to_string())
}

/// Reads the most recent rating for a mode from the stats payload
pub fn last_rating(stats: Option<&PlayerStats>, mode: GameMode) -> Option<u32> {
    stats?.mode(mode)?.last.map(|point| point.rating)
}

/// The outcome of `game` for `username`, or `None` if they did not play it.
///
/// Matching is exact and case-sensitive against the username as reported by
/// the archive. Games recorded under a previous username are not matched.
pub fn player_outcome(game: &Game, username: &str) -> Option<Outcome> {
    if game.white.username == username {
        Some(game.white.outcome())
    } else if game.black.username == username {
        Some(game.black.outcome())
    } else {
        None
    }
}

/// `wins / total * 100` rounded to one decimal, or 0 without games
///
/// Ties round to the even tenth (16 games with 1 win is 6.2, not 6.3). The
/// division is done in integers so that ties are exact.
pub fn win_rate(wins: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let scaled = wins * 1000;
    let mut tenths = scaled / total;
    let remainder = scaled % total;
    if 2 * remainder > total || (2 * remainder == total && tenths % 2 == 1) {
        tenths += 1;
    }
    tenths as f64 / 10.0
}

/// Whether `game` finished on `day` in the clock's local timezone
pub fn is_played_on_day<C: Clock + ?Sized>(game: &Game, day: NaiveDate, clock: &C) -> bool {
    clock.local_date(game.end_time) == Some(day)
}

/// Keeps only the games that finished on `today`
pub fn filter_todays_games<C: Clock + ?Sized>(
    games: impl IntoIterator<Item = Game>,
    today: NaiveDate,
    clock: &C,
) -> Vec<Game> {
    games
        .into_iter()
        .filter(|game| is_played_on_day(game, today, clock))
        .collect()
}

/// Computes the dashboard summary for `username`
///
/// `total` counts every game passed in, including games in which the
/// username cannot be found; those add to neither wins, losses nor draws.
pub fn compute_summary(username: &str, stats: Option<&PlayerStats>, games: &[Game]) -> Summary {
    let (mut wins, mut losses, mut draws) = (0, 0, 0);
    for game in games {
        match player_outcome(game, username) {
            Some(Outcome::Win) => wins += 1,
            Some(Outcome::Loss) => losses += 1,
            Some(Outcome::Draw) => draws += 1,
            Some(Outcome::Other) | None => {}
        }
    }

    let total = games.len();
    let winrate = win_rate(wins, total);

    Summary {
        username: username.to_string(),
        rapid: last_rating(stats, GameMode::Rapid),
        blitz: last_rating(stats, GameMode::Blitz),
        bullet: last_rating(stats, GameMode::Bullet),
        wins,
        losses,
        draws,
        total,
        winrate,
        color_tag: ColorTag::for_winrate(winrate),
    }
}
