//! Merged agenda and the views derived from it.
//!
//! Everything here is a pure function of the events and a `now` value, so
//! views can be recomputed at any time without refetching feeds. The time
//! zone of `now` is the zone used for "today" and for calendar-day grouping.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::event::{Event, sort_by_start};
use crate::time::TimeWindow;

/// Number of calendar days covered by the upcoming window, today included.
pub const UPCOMING_DAYS: u64 = 7;

/// Concatenates per-feed event lists and sorts the result by start.
///
/// Equal starts keep feed order. No deduplication is done.
pub fn merge_feeds<I>(feeds: I) -> Vec<Event>
where
    I: IntoIterator<Item = Vec<Event>>,
{
    let mut merged: Vec<Event> = feeds.into_iter().flatten().collect();
    sort_by_start(&mut merged);
    merged
}

/// Events starting on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGroup<'a> {
    pub date: NaiveDate,
    pub events: Vec<&'a Event>,
}

/// Groups the events starting within the next [`UPCOMING_DAYS`] days by day.
///
/// The window runs from midnight today up to, but not including, midnight
/// seven calendar days later, both in the zone of `now`. Days come out in
/// order of first occurrence in `events`.
pub fn upcoming_window<'a, Tz: TimeZone>(
    events: &'a [Event],
    now: &DateTime<Tz>,
) -> Vec<DayGroup<'a>> {
    let tz = now.timezone();
    let Some(window) = TimeWindow::days_from(now.date_naive(), UPCOMING_DAYS, &tz) else {
        return Vec::new();
    };

    let mut groups: Vec<DayGroup<'a>> = Vec::new();
    for event in events.iter().filter(|e| window.contains(e.start_instant())) {
        let date = event.start().date_in(&tz);
        match groups.iter_mut().find(|g| g.date == date) {
            Some(group) => group.events.push(event),
            None => groups.push(DayGroup {
                date,
                events: vec![event],
            }),
        }
    }
    groups
}

/// Returns the days of `now`'s month on which at least one event starts.
///
/// Only the current month is considered, even when the upcoming window
/// reaches into the next one.
pub fn month_membership<Tz: TimeZone>(events: &[Event], now: &DateTime<Tz>) -> BTreeSet<u32> {
    let tz = now.timezone();
    let today = now.date_naive();

    events
        .iter()
        .map(|e| e.start().date_in(&tz))
        .filter(|d| d.year() == today.year() && d.month() == today.month())
        .map(|d| d.day())
        .collect()
}

/// A Sunday-first calendar page for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st.
    pub leading_blanks: u32,
    pub days_in_month: u32,
    /// Day number of today.
    pub today: u32,
    pub event_days: BTreeSet<u32>,
}

impl MonthGrid {
    /// Builds the page for the month containing `now`.
    pub fn build<Tz: TimeZone>(events: &[Event], now: &DateTime<Tz>) -> Self {
        let today = now.date_naive();
        let first = first_of_month(today);

        Self {
            year: today.year(),
            month: today.month(),
            leading_blanks: first.weekday().num_days_from_sunday(),
            days_in_month: days_in_month(first),
            today: today.day(),
            event_days: month_membership(events, now),
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn has_event(&self, day: u32) -> bool {
        self.event_days.contains(&day)
    }

    /// Grid cells in reading order: `None` for leading blanks, then each day.
    pub fn cells(&self) -> impl Iterator<Item = Option<u32>> + '_ {
        std::iter::repeat_n(None, self.leading_blanks as usize)
            .chain((1..=self.days_in_month).map(Some))
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn days_in_month(first: NaiveDate) -> u32 {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .map_or(31, |last| last.day())
}

/// Result of fetching one feed during a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedOutcome {
    pub url: String,
    pub event_count: usize,
    /// Why the feed contributed nothing, if it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FeedOutcome {
    pub fn succeeded(url: impl Into<String>, event_count: usize) -> Self {
        Self {
            url: url.into(),
            event_count,
            error: None,
        }
    }

    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            event_count: 0,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// The merged event list produced by one refresh cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Agenda {
    events: Vec<Event>,
    assembled_at: DateTime<Utc>,
    feeds: Vec<FeedOutcome>,
}

impl Agenda {
    /// Creates an agenda from already-merged events.
    pub fn new(events: Vec<Event>, assembled_at: DateTime<Utc>, feeds: Vec<FeedOutcome>) -> Self {
        Self {
            events,
            assembled_at,
            feeds,
        }
    }

    /// An agenda with no events and no feeds.
    pub fn empty(assembled_at: DateTime<Utc>) -> Self {
        Self::new(Vec::new(), assembled_at, Vec::new())
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn assembled_at(&self) -> DateTime<Utc> {
        self.assembled_at
    }

    pub fn feeds(&self) -> &[FeedOutcome] {
        &self.feeds
    }

    pub fn failed_feeds(&self) -> impl Iterator<Item = &FeedOutcome> {
        self.feeds.iter().filter(|f| !f.is_success())
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn upcoming<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<DayGroup<'_>> {
        upcoming_window(&self.events, now)
    }

    pub fn month_membership<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> BTreeSet<u32> {
        month_membership(&self.events, now)
    }

    pub fn month_grid<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> MonthGrid {
        MonthGrid::build(&self.events, now)
    }
}
