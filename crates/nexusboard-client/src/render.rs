//! Terminal and JSON rendering of agenda views.

use std::fmt::{Display, Write};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use nexusboard_core::{Agenda, DayGroup, Event, FeedOutcome, MonthGrid, UPCOMING_DAYS};

/// Shown when no feeds are configured at all.
pub const NO_FEEDS_TEXT: &str = "Add calendar URLs in settings to see your events.\n\
Supports Google Calendar, Apple iCloud, and any .ics URL";

const WEEKDAY_HEADER: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

/// Label for a day heading: "Today" or e.g. "Tue, Jun 17".
pub fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else {
        date.format("%a, %b %-d").to_string()
    }
}

/// Start time in `tz` ("9:05 AM"), or "All Day".
pub fn time_label<Tz>(event: &Event, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if event.is_all_day() {
        return "All Day".to_string();
    }
    event
        .start_instant()
        .with_timezone(tz)
        .format("%-I:%M %p")
        .to_string()
}

/// Renders the upcoming window as indented text grouped by day.
///
/// Feeds that failed during the refresh are listed at the end.
pub fn render_agenda<Tz>(agenda: &Agenda, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if agenda.feeds().is_empty() {
        return format!("{NO_FEEDS_TEXT}\n");
    }

    let tz = now.timezone();
    let today = now.date_naive();
    let groups = agenda.upcoming(now);

    let mut out = String::new();
    if groups.is_empty() {
        let _ = writeln!(out, "No events in the next {UPCOMING_DAYS} days");
    }

    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", day_label(group.date, today));
        for event in &group.events {
            let _ = writeln!(out, "  {}", event.title());
            let mut detail = time_label(event, &tz);
            if event.has_location() {
                let _ = write!(detail, " · {}", event.location());
            }
            let _ = writeln!(out, "    {detail}");
        }
    }

    let failed: Vec<&FeedOutcome> = agenda.failed_feeds().collect();
    if !failed.is_empty() {
        out.push('\n');
        for feed in failed {
            let _ = writeln!(out, "Could not reach calendar: {}", feed.url);
        }
    }
    out
}

/// Renders a month page: title, Sunday-first header, one row per week.
///
/// Today is bracketed; other days with events carry a `*`.
pub fn render_month(grid: &MonthGrid) -> String {
    let mut out = String::new();
    if let Some(first) = grid.first_day() {
        let _ = writeln!(out, "{}", first.format("%b %Y"));
    }

    let header: String = WEEKDAY_HEADER.iter().map(|d| format!(" {d:>2} ")).collect();
    let _ = writeln!(out, "{}", header.trim_end());

    let cells: Vec<Option<u32>> = grid.cells().collect();
    for week in cells.chunks(7) {
        let row: String = week.iter().map(|cell| month_cell(grid, *cell)).collect();
        let _ = writeln!(out, "{}", row.trim_end());
    }
    out
}

fn month_cell(grid: &MonthGrid, cell: Option<u32>) -> String {
    match cell {
        None => "    ".to_string(),
        Some(day) if day == grid.today => format!("[{day:>2}]"),
        Some(day) if grid.has_event(day) => format!(" {day:>2}*"),
        Some(day) => format!(" {day:>2} "),
    }
}

/// JSON shape of `agenda --json`.
#[derive(Debug, Serialize)]
pub struct AgendaView<'a> {
    pub assembled_at: DateTime<Utc>,
    pub days: Vec<DayGroup<'a>>,
    pub feeds: &'a [FeedOutcome],
}

impl<'a> AgendaView<'a> {
    pub fn new<Tz: TimeZone>(agenda: &'a Agenda, now: &DateTime<Tz>) -> Self {
        Self {
            assembled_at: agenda.assembled_at(),
            days: agenda.upcoming(now),
            feeds: agenda.feeds(),
        }
    }
}
