//! Month command: the current month with event days marked.

use chrono::Local;

use nexusboard_server::refresh_feeds;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::render::render_month;

pub async fn run(config: &ClientConfig, feeds: &[String], json: bool) -> ClientResult<()> {
    let fetcher = super::http_fetcher(config)?;
    let agenda = refresh_feeds(&fetcher, feeds).await;
    let grid = agenda.month_grid(&Local::now());

    if json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
    } else {
        print!("{}", render_month(&grid));
    }
    Ok(())
}
