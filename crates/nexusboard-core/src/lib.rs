//! Core types for the dashboard: event times, feed parsing, and agenda views.

pub mod agenda;
pub mod event;
pub mod ics;
pub mod time;
pub mod tracing;

pub use agenda::{
    Agenda, DayGroup, FeedOutcome, MonthGrid, UPCOMING_DAYS, merge_feeds, month_membership,
    upcoming_window,
};
pub use event::{Event, sort_by_start};
pub use ics::{Field, field_value, parse_calendar, parse_calendar_in};
pub use time::{EventTime, TimeWindow, parse_ics_date, parse_ics_date_in};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
