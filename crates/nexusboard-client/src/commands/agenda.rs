//! Agenda command: one refresh, then the upcoming week.

use chrono::Local;

use nexusboard_server::refresh_feeds;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::render::{AgendaView, render_agenda};

pub async fn run(config: &ClientConfig, feeds: &[String], json: bool) -> ClientResult<()> {
    let fetcher = super::http_fetcher(config)?;
    let agenda = refresh_feeds(&fetcher, feeds).await;
    let now = Local::now();

    if json {
        let view = AgendaView::new(&agenda, &now);
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_agenda(&agenda, &now));
    }
    Ok(())
}
