//! Check command: fetch and parse a single feed.

use nexusboard_core::parse_calendar;
use nexusboard_providers::FeedFetcher;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Fetches `url` and reports how many events it holds.
///
/// A feed that cannot be fetched is reported on stdout and returned as the
/// error, so the exit status reflects it.
pub async fn run(config: &ClientConfig, url: &str) -> ClientResult<()> {
    let fetcher = super::http_fetcher(config)?;
    match check_feed(&fetcher, url).await {
        Ok(count) => {
            println!("{}", found_message(count));
            Ok(())
        }
        Err(e) => {
            println!("Could not reach calendar");
            Err(e)
        }
    }
}

/// Returns the number of events parsed from the feed at `url`.
pub async fn check_feed(fetcher: &dyn FeedFetcher, url: &str) -> ClientResult<usize> {
    let text = fetcher.fetch(url).await?;
    let events = parse_calendar(&text);
    debug!(url = %url, bytes = text.len(), events = events.len(), "Checked feed");
    Ok(events.len())
}

pub fn found_message(count: usize) -> String {
    format!("Found {count} events")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use nexusboard_providers::{FetchErrorCode, StaticFeedFetcher};

    #[tokio::test]
    async fn counts_parsed_events() {
        let fetcher = StaticFeedFetcher::new().with_feed(
            "https://a.example/cal.ics",
            "BEGIN:VEVENT\nSUMMARY:a\nDTSTART:20250615\nEND:VEVENT\n\
BEGIN:VEVENT\nSUMMARY:no start\nEND:VEVENT\n\
BEGIN:VEVENT\nSUMMARY:b\nDTSTART:20250616T090000Z\nEND:VEVENT\n",
        );

        let count = check_feed(&fetcher, "webcal://a.example/cal.ics").await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(found_message(count), "Found 2 events");
    }

    #[tokio::test]
    async fn fetch_failure_is_returned() {
        let fetcher = StaticFeedFetcher::new().with_failure(
            "https://a.example/cal.ics",
            FetchErrorCode::Unauthorized,
            "Calendar fetch failed: 401 Unauthorized",
        );

        let err = check_feed(&fetcher, "https://a.example/cal.ics")
            .await
            .unwrap_err();
        match err {
            ClientError::Fetch(e) => assert_eq!(e.code(), FetchErrorCode::Unauthorized),
            other => panic!("unexpected error: {other}"),
        }
    }
}
