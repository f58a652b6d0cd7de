//! Calendar and clock logic for the chore tracker.
//!
//! The points ledger never reads system time itself. Services receive a
//! [`Clock`] and hand the resolved local date to the pure functions, which
//! keeps every ledger operation deterministic under test.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use shared::WeekRange;

/// Date format used for ledger keys
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Source of "today" and "now" for the domain layer
pub trait Clock: Send + Sync {
    /// Current calendar date in the household's local timezone
    fn today(&self) -> NaiveDate;

    /// Current timestamp, used to stamp redemptions
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Clock backed by the operating system's local time.
///
/// Uses the local calendar date rather than UTC so that evenings in
/// timezones west of UTC don't roll over to tomorrow's ledger key.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Clock pinned to a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }

    /// Fixed clock at noon UTC on the given date
    pub fn on_date(date: NaiveDate) -> Self {
        let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
        Self::new(Utc.from_utc_datetime(&noon).fixed_offset())
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }
}

/// Parse a `YYYY-MM-DD` ledger key
pub fn parse_date_key(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT)
        .with_context(|| format!("Invalid date key '{}', expected YYYY-MM-DD", key))
}

pub fn format_date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Monday-to-Sunday week containing `date`
pub fn week_range(date: NaiveDate) -> WeekRange {
    let days_from_monday = date.weekday().num_days_from_monday() as i64;
    let start = date - Duration::days(days_from_monday);
    WeekRange {
        start,
        end: start + Duration::days(6),
    }
}
