//! Time types for calendar events.
//!
//! This module provides [`EventTime`], the normalized form of an iCalendar
//! `DTSTART`/`DTEND` value, [`parse_ics_date`] to produce one from raw feed
//! text, and [`TimeWindow`] for half-open range checks.
//!
//! Three value shapes are recognized:
//! - `20250615` (date only, anchored at local midnight, all-day)
//! - `20250615T140000Z` (UTC)
//! - `20250615T140000` (wall-clock time in the local zone)

use chrono::{
    DateTime, Days, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc,
};
use serde::{Deserialize, Serialize};

/// Length of a bare `YYYYMMDD` value.
pub const DATE_ONLY_LEN: usize = 8;

/// The point in time an event starts or ends.
///
/// Every variant carries an already-resolved instant, so comparisons never
/// depend on the zone the process happens to run in after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum EventTime {
    /// A bare calendar date, anchored at midnight in the local zone.
    Date(DateTime<FixedOffset>),
    /// A wall-clock date-time without the UTC designator.
    Floating(DateTime<FixedOffset>),
    /// A date-time that carried the trailing `Z`.
    Utc(DateTime<Utc>),
}

impl EventTime {
    /// Creates an all-day time at midnight of `date` in `tz`.
    ///
    /// Returns `None` if midnight cannot be mapped into `tz`.
    pub fn from_date_in<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<Self> {
        midnight_in(date, tz).map(Self::Date)
    }

    /// Creates a wall-clock time resolved in `tz`.
    pub fn from_local_in<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> Option<Self> {
        resolve_local(&naive, tz).map(Self::Floating)
    }

    /// Creates a UTC time.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::Utc(dt)
    }

    /// Returns `true` for date-only values.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::Date(_))
    }

    /// Returns the instant this time refers to.
    pub fn instant(&self) -> DateTime<Utc> {
        match self {
            Self::Date(dt) | Self::Floating(dt) => dt.with_timezone(&Utc),
            Self::Utc(dt) => *dt,
        }
    }

    /// Returns the calendar day this time falls on in `tz`.
    pub fn date_in<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.instant().with_timezone(tz).date_naive()
    }
}

/// Returns `true` if `value` is a bare `YYYYMMDD` date.
pub fn is_date_only(value: &str) -> bool {
    value.len() == DATE_ONLY_LEN
}

/// Parses a raw iCalendar date value, resolving local times in the process zone.
///
/// See [`parse_ics_date_in`].
pub fn parse_ics_date(value: &str) -> Option<EventTime> {
    parse_ics_date_in(value, &Local)
}

/// Parses a raw iCalendar date value, resolving local times in `tz`.
///
/// Missing time digits default to `00`. Malformed or out-of-range components
/// yield `None`.
pub fn parse_ics_date_in<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<EventTime> {
    if value.is_empty() {
        return None;
    }

    let year = i32::try_from(number(segment(value, 0, 4)?)?).ok()?;
    let month = number(segment(value, 4, 6)?)?;
    let day = number(segment(value, 6, 8)?)?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    if is_date_only(value) {
        return EventTime::from_date_in(date, tz);
    }

    let time = NaiveTime::from_hms_opt(
        time_component(value, 9, 11)?,
        time_component(value, 11, 13)?,
        time_component(value, 13, 15)?,
    )?;
    let naive = date.and_time(time);

    if value.ends_with('Z') {
        Some(EventTime::from_utc(Utc.from_utc_datetime(&naive)))
    } else {
        EventTime::from_local_in(naive, tz)
    }
}

/// Returns midnight of `date` in `tz`.
pub fn midnight_in<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<FixedOffset>> {
    resolve_local(&date.and_hms_opt(0, 0, 0)?, tz)
}

/// Maps a wall-clock time into `tz`.
///
/// Ambiguous times take the earlier mapping. Times inside a DST gap are
/// shifted forward by an hour.
fn resolve_local<Tz: TimeZone>(naive: &NaiveDateTime, tz: &Tz) -> Option<DateTime<FixedOffset>> {
    tz.from_local_datetime(naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(*naive + Duration::hours(1))).earliest())
        .map(|dt| dt.fixed_offset())
}

/// Slices `value` like a lenient substring: positions past the end are empty.
fn segment(value: &str, start: usize, end: usize) -> Option<&str> {
    let end = end.min(value.len());
    if start >= end {
        return Some("");
    }
    value.get(start..end)
}

fn number(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn time_component(value: &str, start: usize, end: usize) -> Option<u32> {
    match segment(value, start, end)? {
        "" => Some(0),
        digits => number(digits),
    }
}

/// A half-open `[start, end)` range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start <= end, "TimeWindow start must be <= end");
        Self { start, end }
    }

    /// Creates a window covering `days` calendar days starting at midnight
    /// of `first_day` in `tz`.
    ///
    /// Both ends are local midnights, so a window spanning a DST change is
    /// an hour shorter or longer than `days * 24h`.
    pub fn days_from<Tz: TimeZone>(first_day: NaiveDate, days: u64, tz: &Tz) -> Option<Self> {
        let start = midnight_in(first_day, tz)?;
        let end = midnight_in(first_day.checked_add_days(Days::new(days))?, tz)?;
        Some(Self::new(start.with_timezone(&Utc), end.with_timezone(&Utc)))
    }

    /// Checks if an instant falls within this window.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt < self.end
    }
}
