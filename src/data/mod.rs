//! Core data models for Chess Daily
//!
//! This module contains the types decoded from the chess.com public API:
//! per-mode player statistics and completed games from the monthly archives.

pub mod chess_com;

pub use chess_com::{ChessApi, ChessComClient, FetchError};

use serde::{Deserialize, Serialize};

/// Player statistics as returned by `/pub/player/{username}/stats`
///
/// Only the rated modes shown on the dashboard are decoded; every other key
/// in the payload (daily, puzzles, FIDE...) is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub chess_rapid: Option<ModeStats>,
    pub chess_blitz: Option<ModeStats>,
    pub chess_bullet: Option<ModeStats>,
}

impl PlayerStats {
    /// Returns the statistics block for a game mode, if the player has one
    pub fn mode(&self, mode: GameMode) -> Option<&ModeStats> {
        match mode {
            GameMode::Rapid => self.chess_rapid.as_ref(),
            GameMode::Blitz => self.chess_blitz.as_ref(),
            GameMode::Bullet => self.chess_bullet.as_ref(),
        }
    }
}

/// Statistics for a single game mode
///
/// Only the most recent rating is decoded; `best`, `record` and the other
/// keys of the block are ignored so that their shape cannot break parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeStats {
    /// Most recent rating
    pub last: Option<RatingPoint>,
}

/// A rating at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingPoint {
    pub rating: u32,
}

/// The rated time controls shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    Rapid,
    Blitz,
    Bullet,
}

/// One completed game from a monthly archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub white: GameSide,
    pub black: GameSide,
    /// Unix timestamp (seconds) at which the game finished
    pub end_time: i64,
}

/// One player's side of a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSide {
    pub username: String,
    /// Upstream result code for this side (e.g. "win", "resigned", "agreed")
    pub result: String,
}

impl GameSide {
    /// Classifies this side's result code
    pub fn outcome(&self) -> Outcome {
        Outcome::from_result_code(&self.result)
    }
}

/// Result of a game from one side's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
    Other,
}

impl Outcome {
    /// Maps an upstream result code to an outcome.
    ///
    /// chess.com reports losses and draws by their cause ("checkmated",
    /// "stalemate", ...); the generic "loss" and "draw" codes are accepted too.
    /// Unrecognised codes map to `Other` and are not counted.
    pub fn from_result_code(code: &str) -> Self {
        match code {
            "win" => Outcome::Win,
            "loss" | "checkmated" | "resigned" | "timeout" | "abandoned" | "lose"
            | "kingofthehill" | "threecheck" | "bughousepartnerlose" => Outcome::Loss,
            "draw" | "agreed" | "repetition" | "stalemate" | "insufficient" | "50move"
            | "timevsinsufficient" => Outcome::Draw,
            _ => Outcome::Other,
        }
    }
}
