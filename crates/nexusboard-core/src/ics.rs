//! Calendar feed parsing.
//!
//! Turns raw iCalendar text into a start-ordered list of [`Event`]s.
//!
//! The parser is deliberately line-oriented rather than a full RFC 5545
//! reader: the text is split on `BEGIN:VEVENT`, each block is cut at its
//! first `END:VEVENT`, and fields are read with a line-anchored
//! `NAME[;params]:value` scan. Folded continuation lines are not joined;
//! only the first physical line of a value is kept.
//!
//! Nothing in here returns an error. A block without a usable `SUMMARY` or
//! `DTSTART` is skipped and the rest of the feed is still read.
//!
//! # Example
//!
//! ```
//! use nexusboard_core::ics::parse_calendar;
//!
//! let text = "BEGIN:VCALENDAR\r\n\
//!             BEGIN:VEVENT\r\n\
//!             SUMMARY:Lunch\\, team\r\n\
//!             DTSTART:20250615T120000Z\r\n\
//!             END:VEVENT\r\n\
//!             END:VCALENDAR\r\n";
//!
//! let events = parse_calendar(text);
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].title(), "Lunch, team");
//! ```

use std::sync::LazyLock;

use chrono::{Local, TimeZone};
use regex::Regex;
use tracing::debug;

use crate::event::{Event, sort_by_start};
use crate::time::parse_ics_date_in;

/// Marker opening an event block.
pub const BEGIN_EVENT: &str = "BEGIN:VEVENT";

/// Marker closing an event block.
pub const END_EVENT: &str = "END:VEVENT";

static SUMMARY_LINE: LazyLock<Regex> = LazyLock::new(|| field_regex("SUMMARY"));
static DTSTART_LINE: LazyLock<Regex> = LazyLock::new(|| field_regex("DTSTART"));
static DTEND_LINE: LazyLock<Regex> = LazyLock::new(|| field_regex("DTEND"));
static LOCATION_LINE: LazyLock<Regex> = LazyLock::new(|| field_regex("LOCATION"));

/// Builds the pattern for `NAME`, optionally followed by `;params`, then `:value`.
///
/// The parameter section may not contain a colon, so the value always starts
/// after the first colon on the line. The value never includes the line
/// terminator, and a line with an empty value does not match.
fn field_regex(name: &str) -> Regex {
    Regex::new(&format!(r"(?m)^{}(?:;[^:\r\n]*)?:([^\r\n]+)", regex::escape(name)))
        .expect("Invalid field regex")
}

/// The event properties read by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Summary,
    DtStart,
    DtEnd,
    Location,
}

impl Field {
    /// Returns the property name as it appears in the feed.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Summary => "SUMMARY",
            Self::DtStart => "DTSTART",
            Self::DtEnd => "DTEND",
            Self::Location => "LOCATION",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Self::Summary => &SUMMARY_LINE,
            Self::DtStart => &DTSTART_LINE,
            Self::DtEnd => &DTEND_LINE,
            Self::Location => &LOCATION_LINE,
        }
    }
}

/// Returns the trimmed value of the first `field` line in `block`.
///
/// Returns an empty string when the field is absent.
pub fn field_value(block: &str, field: Field) -> &str {
    field
        .pattern()
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str().trim())
}

/// Splits feed text into event blocks.
///
/// Text before the first `BEGIN:VEVENT` is dropped, and each block ends at
/// its first `END:VEVENT` (or runs to the next `BEGIN:VEVENT` if unterminated).
pub fn event_blocks(text: &str) -> impl Iterator<Item = &str> {
    text.split(BEGIN_EVENT)
        .skip(1)
        .map(|fragment| fragment.split_once(END_EVENT).map_or(fragment, |(block, _)| block))
}

/// Replaces escaped commas and newlines in a title.
///
/// `\,` becomes `,` and `\n` becomes a single space.
pub fn unescape_title(raw: &str) -> String {
    raw.replace("\\,", ",").replace("\\n", " ")
}

/// Replaces escaped commas in a location.
///
/// Escaped newlines are kept as-is.
pub fn unescape_location(raw: &str) -> String {
    raw.replace("\\,", ",")
}

/// Parses feed text, resolving local times in the process zone.
///
/// See [`parse_calendar_in`].
pub fn parse_calendar(text: &str) -> Vec<Event> {
    parse_calendar_in(text, &Local)
}

/// Parses feed text into events sorted by start, resolving local times in `tz`.
///
/// Parsing is a pure function of `text` and `tz`.
pub fn parse_calendar_in<Tz: TimeZone>(text: &str, tz: &Tz) -> Vec<Event> {
    let mut events: Vec<Event> = event_blocks(text)
        .filter_map(|block| parse_block(block, tz))
        .collect();
    sort_by_start(&mut events);
    events
}

fn parse_block<Tz: TimeZone>(block: &str, tz: &Tz) -> Option<Event> {
    let summary = field_value(block, Field::Summary);
    let dtstart = field_value(block, Field::DtStart);

    if summary.is_empty() || dtstart.is_empty() {
        debug!(
            has_summary = !summary.is_empty(),
            has_start = !dtstart.is_empty(),
            "Skipping event block without required fields"
        );
        return None;
    }

    let Some(start) = parse_ics_date_in(dtstart, tz) else {
        debug!(summary = %summary, dtstart = %dtstart, "Skipping event with unparseable start");
        return None;
    };

    let end = match field_value(block, Field::DtEnd) {
        "" => None,
        dtend => parse_ics_date_in(dtend, tz),
    };

    Some(
        Event::new(unescape_title(summary), start)
            .with_end(end)
            .with_location(unescape_location(field_value(block, Field::Location))),
    )
}
