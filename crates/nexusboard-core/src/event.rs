//! Event type for calendar feed entries.
//!
//! An [`Event`] is built once by the feed parser and never mutated after
//! that; consumers only get read access through its accessors.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::time::EventTime;

/// A single occurrence parsed from a calendar feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    title: String,
    start: EventTime,
    end: Option<EventTime>,
    location: String,
    all_day: bool,
}

impl Event {
    /// Creates an event with the given title and start.
    ///
    /// The all-day flag follows the start: it is set iff the start is a bare date.
    pub fn new(title: impl Into<String>, start: EventTime) -> Self {
        Self {
            title: title.into(),
            start,
            end: None,
            location: String::new(),
            all_day: start.is_all_day(),
        }
    }

    /// Builder method to set the end time.
    pub fn with_end(mut self, end: Option<EventTime>) -> Self {
        self.end = end;
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start(&self) -> &EventTime {
        &self.start
    }

    pub fn end(&self) -> Option<&EventTime> {
        self.end.as_ref()
    }

    /// The location, empty when the feed had none.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn has_location(&self) -> bool {
        !self.location.is_empty()
    }

    pub fn is_all_day(&self) -> bool {
        self.all_day
    }

    /// The instant the event starts.
    pub fn start_instant(&self) -> DateTime<Utc> {
        self.start.instant()
    }

    /// Checks whether the event starts on `date` in `tz`.
    pub fn starts_on<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> bool {
        self.start.date_in(tz) == date
    }
}

/// Sorts events ascending by start instant.
///
/// The sort is stable: events with identical starts keep their relative order.
pub fn sort_by_start(events: &mut [Event]) {
    events.sort_by_key(Event::start_instant);
}
