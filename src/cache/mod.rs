//! Cache module for upstream API results
//!
//! This module keeps the most recent successful result of each chess.com call
//! in memory together with its fetch time, and serves it again until it is
//! older than the configured TTL. Expiry is checked against an injectable
//! [`Clock`] so that tests can move time explicitly.

mod clock;
mod manager;
mod snapshot;

pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::{CacheConfig, StatsCache};
pub use snapshot::Snapshot;
