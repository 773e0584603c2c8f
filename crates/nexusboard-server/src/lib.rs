//! Feed refresh cycle, shared dashboard state and the background scheduler.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use nexusboard_providers::{HttpFeedFetcher, HttpFetchConfig};
//! use nexusboard_server::{Scheduler, SchedulerConfig, new_shared_state, refresh_feeds};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = Arc::new(HttpFeedFetcher::new(HttpFetchConfig::default())?);
//!     let urls = Arc::new(vec!["webcal://example.com/team.ics".to_string()]);
//!     let state = new_shared_state();
//!
//!     let scheduler = Scheduler::new(SchedulerConfig::new(Duration::from_secs(300)));
//!     let handle = scheduler.handle();
//!     tokio::spawn(scheduler.run(move || {
//!         let (fetcher, urls, state) = (fetcher.clone(), urls.clone(), state.clone());
//!         async move {
//!             let agenda = refresh_feeds(fetcher.as_ref(), &urls).await;
//!             state.write().await.publish(agenda);
//!         }
//!     }));
//!
//!     handle.stop().await?;
//!     Ok(())
//! }
//! ```

mod refresh;
mod scheduler;
mod state;

pub use refresh::{refresh_feeds, refresh_feeds_in};
pub use scheduler::{
    MIN_REFRESH_INTERVAL, Scheduler, SchedulerCommand, SchedulerConfig, SchedulerHandle,
    SchedulerState, SharedSchedulerState,
};
pub use state::{DashboardState, SharedDashboardState, new_shared_state};
