//! Wall-clock source for cache expiry and the "today" boundary

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, TimeZone};

/// Source of the current time.
///
/// The date of `now()` is "today"; `local_date` places a game's end time on
/// the same local calendar so the two can be compared.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Calendar date of a Unix timestamp in this clock's timezone
    ///
    /// The default uses the offset of `now()`, which is right for clocks
    /// without DST transitions.
    fn local_date(&self, timestamp: i64) -> Option<NaiveDate> {
        self.now()
            .offset()
            .timestamp_opt(timestamp, 0)
            .single()
            .map(|t| t.date_naive())
    }
}

/// The system clock in the host's local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    /// Uses the offset in force at `timestamp`, not the current one
    fn local_date(&self, timestamp: i64) -> Option<NaiveDate> {
        Local
            .timestamp_opt(timestamp, 0)
            .single()
            .map(|t| t.date_naive())
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl ManualClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
