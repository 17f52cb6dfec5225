use chrono::{DateTime, Duration, FixedOffset};

/// One cached upstream result and the time it was fetched
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    /// The cached data
    pub data: T,
    /// Clock reading taken when the fetch started
    pub fetched_at: DateTime<FixedOffset>,
}

impl<T> Snapshot<T> {
    pub fn new(data: T, fetched_at: DateTime<FixedOffset>) -> Self {
        Self { data, fetched_at }
    }

    /// Whether the snapshot may be reused at `now`: `now - fetched_at < ttl`
    pub fn is_fresh(&self, now: DateTime<FixedOffset>, ttl: Duration) -> bool {
        now.signed_duration_since(self.fetched_at) < ttl
    }
}
