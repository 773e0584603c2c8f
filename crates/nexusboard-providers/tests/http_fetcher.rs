// Tests for the HTTP feed fetcher against a mock server.
use mockito::{Matcher, Server};
use nexusboard_providers::{FeedFetcher, FetchErrorCode, HttpFeedFetcher, HttpFetchConfig};

const FEED: &str = "BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:Standup\r\n\
DTSTART:20250615T090000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

fn fetcher() -> HttpFeedFetcher {
    HttpFeedFetcher::new(HttpFetchConfig::default()).unwrap()
}

#[tokio::test]
async fn fetches_body_with_expected_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/team.ics")
        .match_header("user-agent", "NexusBoard/1.0")
        .match_header("accept", "text/calendar, text/plain, */*")
        .with_status(200)
        .with_header("content-type", "text/calendar; charset=utf-8")
        .with_body(FEED)
        .create_async()
        .await;

    let url = format!("{}/team.ics", server.url());
    let body = fetcher().fetch(&url).await.unwrap();

    assert_eq!(body, FEED);
    mock.assert_async().await;
}

#[tokio::test]
async fn custom_user_agent_is_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/cal.ics")
        .match_header("user-agent", "dashboard-test/2.0")
        .with_body(FEED)
        .create_async()
        .await;

    let fetcher =
        HttpFeedFetcher::new(HttpFetchConfig::default().with_user_agent("dashboard-test/2.0"))
            .unwrap();
    fetcher
        .fetch(&format!("{}/cal.ics", server.url()))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn follows_redirects() {
    let mut server = Server::new_async().await;
    let target = format!("{}/new.ics", server.url());

    let old = server
        .mock("GET", "/old.ics")
        .with_status(301)
        .with_header("location", &target)
        .create_async()
        .await;
    let new = server
        .mock("GET", "/new.ics")
        .with_body(FEED)
        .create_async()
        .await;

    let body = fetcher()
        .fetch(&format!("{}/old.ics", server.url()))
        .await
        .unwrap();

    assert_eq!(body, FEED);
    old.assert_async().await;
    new.assert_async().await;
}

#[tokio::test]
async fn redirect_limit_is_enforced() {
    let mut server = Server::new_async().await;
    let target = format!("{}/loop.ics", server.url());
    server
        .mock("GET", "/loop.ics")
        .with_status(302)
        .with_header("location", &target)
        .expect_at_least(1)
        .create_async()
        .await;

    let fetcher = HttpFeedFetcher::new(HttpFetchConfig::default().with_max_redirects(2)).unwrap();
    let err = fetcher.fetch(&target).await.unwrap_err();

    assert_eq!(err.code(), FetchErrorCode::Network);
}

#[tokio::test]
async fn not_found_status() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/missing.ics")
        .with_status(404)
        .create_async()
        .await;

    let err = fetcher()
        .fetch(&format!("{}/missing.ics", server.url()))
        .await
        .unwrap_err();

    assert_eq!(err.code(), FetchErrorCode::NotFound);
    assert_eq!(err.status_code(), Some(404));
    assert!(!err.is_retryable());
    assert_eq!(err.message(), "Calendar fetch failed: 404 Not Found");
}

#[tokio::test]
async fn server_error_is_retryable() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let err = fetcher()
        .fetch(&format!("{}/cal.ics", server.url()))
        .await
        .unwrap_err();

    assert_eq!(err.code(), FetchErrorCode::ServerError);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn unauthorized_status() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/private.ics")
        .with_status(401)
        .create_async()
        .await;

    let err = fetcher()
        .fetch(&format!("{}/private.ics", server.url()))
        .await
        .unwrap_err();

    assert_eq!(err.code(), FetchErrorCode::Unauthorized);
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    let err = fetcher().fetch("http://127.0.0.1:1/cal.ics").await.unwrap_err();
    assert!(matches!(
        err.code(),
        FetchErrorCode::Network | FetchErrorCode::Timeout
    ));
}

#[tokio::test]
async fn invalid_url_never_hits_the_network() {
    let err = fetcher().fetch("gopher://example.com/cal").await.unwrap_err();
    assert_eq!(err.code(), FetchErrorCode::InvalidUrl);
}
