//! One refresh cycle: fetch every feed, parse, merge.
//!
//! All feeds are fetched concurrently and the cycle waits for every attempt
//! to settle before merging. A feed that fails contributes no events; the
//! failure is logged and kept on the resulting [`Agenda`] as a
//! [`FeedOutcome`]. The cycle itself cannot fail.

use chrono::{Local, TimeZone, Utc};
use futures_util::future::join_all;
use tracing::{debug, info, warn};

use nexusboard_core::{Agenda, FeedOutcome, merge_feeds, parse_calendar_in};
use nexusboard_providers::FeedFetcher;

/// Runs a refresh cycle, resolving floating times in the process zone.
pub async fn refresh_feeds(fetcher: &dyn FeedFetcher, urls: &[String]) -> Agenda {
    refresh_feeds_in(fetcher, urls, &Local).await
}

/// Runs a refresh cycle, resolving floating times in `tz`.
pub async fn refresh_feeds_in<Tz: TimeZone>(
    fetcher: &dyn FeedFetcher,
    urls: &[String],
    tz: &Tz,
) -> Agenda {
    if urls.is_empty() {
        debug!("No calendar feeds configured");
        return Agenda::empty(Utc::now());
    }

    debug!(feeds = urls.len(), fetcher = fetcher.name(), "Refreshing calendar feeds");
    let results = join_all(urls.iter().map(|url| fetcher.fetch(url))).await;

    let mut outcomes = Vec::with_capacity(urls.len());
    let mut per_feed = Vec::with_capacity(urls.len());

    for (url, result) in urls.iter().zip(results) {
        match result {
            Ok(text) => {
                let events = parse_calendar_in(&text, tz);
                debug!(url = %url, events = events.len(), "Parsed calendar feed");
                outcomes.push(FeedOutcome::succeeded(url.as_str(), events.len()));
                per_feed.push(events);
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to fetch calendar feed");
                outcomes.push(FeedOutcome::failed(url.as_str(), e.to_string()));
            }
        }
    }

    let events = merge_feeds(per_feed);
    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    info!(
        feeds = urls.len(),
        failed = failed,
        events = events.len(),
        "Calendar refresh complete"
    );

    Agenda::new(events, Utc::now(), outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::FixedOffset;
    use nexusboard_core::Event;
    use nexusboard_providers::{FetchErrorCode, StaticFeedFetcher};

    fn utc_zone() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn feed(events: &[(&str, &str)]) -> String {
        let mut out = String::from("BEGIN:VCALENDAR\r\n");
        for (summary, start) in events {
            out.push_str(&format!(
                "BEGIN:VEVENT\r\nSUMMARY:{summary}\r\nDTSTART:{start}\r\nEND:VEVENT\r\n"
            ));
        }
        out.push_str("END:VCALENDAR\r\n");
        out
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|u| u.to_string()).collect()
    }

    fn titles(agenda: &Agenda) -> Vec<&str> {
        agenda.events().iter().map(Event::title).collect()
    }

    #[tokio::test]
    async fn merges_feeds_and_skips_failures() {
        let fetcher = StaticFeedFetcher::new()
            .with_feed(
                "https://a.example/cal.ics",
                feed(&[("a1", "20250615T090000Z"), ("a2", "20250617T090000Z")]),
            )
            .with_failure(
                "https://b.example/cal.ics",
                FetchErrorCode::ServerError,
                "HTTP 500",
            )
            .with_feed(
                "https://c.example/cal.ics",
                feed(&[("c1", "20250616T090000Z")]),
            );

        let feeds = urls(&[
            "https://a.example/cal.ics",
            "https://b.example/cal.ics",
            "https://c.example/cal.ics",
        ]);
        let agenda = refresh_feeds_in(&fetcher, &feeds, &utc_zone()).await;

        assert_eq!(titles(&agenda), vec!["a1", "c1", "a2"]);

        let outcomes = agenda.feeds();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0], FeedOutcome::succeeded("https://a.example/cal.ics", 2));
        assert!(!outcomes[1].is_success());
        assert_eq!(outcomes[1].event_count, 0);
        assert_eq!(outcomes[2].event_count, 1);
    }

    #[tokio::test]
    async fn all_feeds_failing_yields_empty_agenda() {
        let fetcher = StaticFeedFetcher::new();
        let feeds = urls(&["https://x.example/", "not a url"]);

        let agenda = refresh_feeds_in(&fetcher, &feeds, &utc_zone()).await;

        assert!(agenda.is_empty());
        assert_eq!(agenda.failed_feeds().count(), 2);
    }

    #[tokio::test]
    async fn no_feeds_configured() {
        let fetcher = StaticFeedFetcher::new();
        let agenda = refresh_feeds_in(&fetcher, &[], &utc_zone()).await;

        assert!(agenda.is_empty());
        assert!(agenda.feeds().is_empty());
        assert_eq!(fetcher.request_count(), 0);
    }

    #[tokio::test]
    async fn garbage_feed_counts_as_success_with_no_events() {
        let fetcher =
            StaticFeedFetcher::new().with_feed("https://a.example/", "<html>login</html>");
        let agenda = refresh_feeds_in(&fetcher, &urls(&["https://a.example/"]), &utc_zone()).await;

        assert!(agenda.is_empty());
        assert_eq!(agenda.feeds()[0], FeedOutcome::succeeded("https://a.example/", 0));
    }

    #[tokio::test]
    async fn same_feed_twice_is_not_deduplicated() {
        let fetcher = StaticFeedFetcher::new()
            .with_feed("https://a.example/", feed(&[("standup", "20250615T090000Z")]));
        let feeds = urls(&["https://a.example/", "webcal://a.example/"]);

        let agenda = refresh_feeds_in(&fetcher, &feeds, &utc_zone()).await;
        assert_eq!(titles(&agenda), vec!["standup", "standup"]);
    }

    #[tokio::test(start_paused = true)]
    async fn feeds_are_fetched_concurrently() {
        let fetcher = StaticFeedFetcher::new()
            .with_feed("https://a.example/", feed(&[("a", "20250615T090000Z")]))
            .with_feed("https://b.example/", feed(&[("b", "20250615T100000Z")]))
            .with_feed("https://c.example/", feed(&[("c", "20250615T110000Z")]))
            .with_delay(Duration::from_secs(10));
        let feeds = urls(&["https://a.example/", "https://b.example/", "https://c.example/"]);

        let started = tokio::time::Instant::now();
        let agenda = refresh_feeds_in(&fetcher, &feeds, &utc_zone()).await;

        assert!(started.elapsed() < Duration::from_secs(20));
        assert_eq!(fetcher.request_count(), 3);
        assert_eq!(titles(&agenda), vec!["a", "b", "c"]);
    }
}
