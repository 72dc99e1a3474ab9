//! Time source abstraction and UTC calendar helpers.
//!
//! # Responsibility
//! - Provide the single "now" seam used by every time-dependent operation.
//! - Convert epoch milliseconds to UTC date keys (`YYYY-MM-DD`).
//!
//! # Invariants
//! - All calendar arithmetic is UTC; no local timezone leaks into core.
//! - Due dates and streaks are computed lazily against `Clock::now_ms`,
//!   never by a background timer.

use chrono::{DateTime, NaiveDate, Utc};
use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
pub type EpochMs = i64;

/// One UTC day in epoch milliseconds.
pub const MS_PER_DAY: EpochMs = 86_400_000;

/// Injectable time source.
pub trait Clock {
    /// Current time in epoch milliseconds.
    fn now_ms(&self) -> EpochMs;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> EpochMs {
        (**self).now_ms()
    }
}

/// Wall-clock time source used by production callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> EpochMs {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or(0)
    }
}

/// Deterministic time source for tests.
///
/// Interior mutability lets a test advance time while a service still
/// borrows the clock.
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<EpochMs>,
}

impl FixedClock {
    pub fn new(now_ms: EpochMs) -> Self {
        Self {
            now: Cell::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: EpochMs) {
        self.now.set(now_ms);
    }

    pub fn advance_ms(&self, delta_ms: EpochMs) {
        self.now.set(self.now.get() + delta_ms);
    }

    pub fn advance_days(&self, days: i64) {
        self.advance_ms(days * MS_PER_DAY);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> EpochMs {
        self.now.get()
    }
}

/// Formats an epoch-ms timestamp as a UTC `YYYY-MM-DD` date key.
pub fn utc_date_key(epoch_ms: EpochMs) -> String {
    let moment =
        DateTime::<Utc>::from_timestamp_millis(epoch_ms).unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    moment.format("%Y-%m-%d").to_string()
}

/// Parses a `YYYY-MM-DD` date key.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// Returns whether `prev_key` names exactly the UTC day before `next_key`.
///
/// Malformed keys are never consecutive.
pub fn is_previous_day(prev_key: &str, next_key: &str) -> bool {
    match (parse_date_key(prev_key), parse_date_key(next_key)) {
        (Some(prev), Some(next)) => prev.succ_opt() == Some(next),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{is_previous_day, utc_date_key, FixedClock, MS_PER_DAY};
    use crate::clock::Clock;

    #[test]
    fn date_key_is_utc_calendar_date() {
        assert_eq!(utc_date_key(0), "1970-01-01");
        assert_eq!(utc_date_key(MS_PER_DAY - 1), "1970-01-01");
        assert_eq!(utc_date_key(MS_PER_DAY), "1970-01-02");
    }

    #[test]
    fn previous_day_handles_month_and_year_boundaries() {
        assert!(is_previous_day("2026-01-31", "2026-02-01"));
        assert!(is_previous_day("2025-12-31", "2026-01-01"));
        assert!(!is_previous_day("2026-02-01", "2026-02-01"));
        assert!(!is_previous_day("2026-02-01", "2026-02-03"));
        assert!(!is_previous_day("not-a-date", "2026-02-03"));
    }

    #[test]
    fn fixed_clock_advances_through_shared_borrow() {
        let clock = FixedClock::new(1_000);
        let borrowed = &clock;
        clock.advance_days(2);
        assert_eq!(borrowed.now_ms(), 1_000 + 2 * MS_PER_DAY);
    }
}
