//! Watch command: refresh in the background and redraw after every cycle.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tracing::{info, warn};

use nexusboard_core::Agenda;
use nexusboard_providers::FeedFetcher;
use nexusboard_server::{
    Scheduler, SchedulerConfig, SharedDashboardState, new_shared_state, refresh_feeds,
};

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::render::render_agenda;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Runs until Ctrl-C.
///
/// The configuration is validated first, so a zero refresh interval never
/// reaches the scheduler.
pub async fn run(
    config: &ClientConfig,
    feeds: Vec<String>,
    interval: Option<Duration>,
) -> ClientResult<()> {
    config.validate()?;
    let fetcher: Arc<dyn FeedFetcher> = Arc::new(super::http_fetcher(config)?);
    let feeds = Arc::new(feeds);
    let state = new_shared_state();

    let interval = interval.unwrap_or_else(|| config.refresh_interval());
    let scheduler = Scheduler::new(SchedulerConfig::new(interval));
    let handle = scheduler.handle();
    let mut cycles = handle.subscribe();

    info!(
        feeds = feeds.len(),
        interval_secs = interval.as_secs(),
        "Watching calendar feeds"
    );

    let refresh_state = state.clone();
    let scheduler_task = tokio::spawn(async move {
        scheduler
            .run(move || {
                let fetcher = fetcher.clone();
                let feeds = feeds.clone();
                let state = refresh_state.clone();
                async move { refresh_and_publish(fetcher.as_ref(), &feeds, &state).await }
            })
            .await;
    });

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = cycles.changed() => {
                if changed.is_err() {
                    break;
                }
                let guard = state.read().await;
                if let Some(agenda) = guard.agenda() {
                    draw(agenda);
                }
            }
            _ = &mut shutdown => {
                info!("Interrupted, stopping");
                break;
            }
        }
    }

    if let Err(e) = handle.stop().await {
        warn!(error = %e, "Failed to send stop command to scheduler");
    }
    let _ = tokio::time::timeout(Duration::from_secs(5), scheduler_task).await;
    Ok(())
}

/// One scheduler cycle: refresh every feed and publish the result.
///
/// The agenda is published even when every feed failed; failed feeds are
/// reported by the renderer.
pub async fn refresh_and_publish(
    fetcher: &dyn FeedFetcher,
    feeds: &[String],
    state: &SharedDashboardState,
) {
    let agenda = refresh_feeds(fetcher, feeds).await;
    let failed = agenda.failed_feeds().count();
    if failed > 0 {
        warn!(failed, total = agenda.feeds().len(), "Some calendar feeds failed");
    }
    state.write().await.publish(agenda);
}

fn draw(agenda: &Agenda) {
    let now = Local::now();
    print!("{CLEAR_SCREEN}");
    print!("{}", render_agenda(agenda, &now));
    println!();
    println!("Updated {}", now.format("%-I:%M %p"));
}
