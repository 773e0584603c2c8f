//! Shared dashboard state.
//!
//! Holds the most recently published [`Agenda`]. Each refresh replaces it
//! wholesale; whichever cycle publishes last wins. Readers clone what they
//! need out of the lock and render from that.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use nexusboard_core::Agenda;

/// State shared between the refresh loop and the views.
#[derive(Debug)]
pub struct DashboardState {
    agenda: Option<Agenda>,
    last_refresh: Option<DateTime<Utc>>,
    refresh_count: u64,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            agenda: None,
            last_refresh: None,
            refresh_count: 0,
        }
    }

    /// Replaces the current agenda and returns the new refresh count.
    pub fn publish(&mut self, agenda: Agenda) -> u64 {
        self.last_refresh = Some(agenda.assembled_at());
        self.agenda = Some(agenda);
        self.refresh_count += 1;
        self.refresh_count
    }

    /// The latest agenda, or `None` before the first refresh completes.
    pub fn agenda(&self) -> Option<&Agenda> {
        self.agenda.as_ref()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    pub fn has_data(&self) -> bool {
        self.agenda.is_some()
    }
}

pub type SharedDashboardState = Arc<RwLock<DashboardState>>;

pub fn new_shared_state() -> SharedDashboardState {
    Arc::new(RwLock::new(DashboardState::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use nexusboard_core::FeedOutcome;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, hour, 0, 0).unwrap()
    }

    #[test]
    fn starts_empty() {
        let state = DashboardState::new();
        assert!(!state.has_data());
        assert!(state.agenda().is_none());
        assert!(state.last_refresh().is_none());
        assert_eq!(state.refresh_count(), 0);
    }

    #[test]
    fn publish_replaces_wholesale() {
        let mut state = DashboardState::new();

        let first = Agenda::new(
            Vec::new(),
            at(8),
            vec![FeedOutcome::succeeded("https://a.example/", 0)],
        );
        assert_eq!(state.publish(first), 1);

        let second = Agenda::empty(at(9));
        assert_eq!(state.publish(second.clone()), 2);

        assert_eq!(state.agenda(), Some(&second));
        assert!(state.agenda().unwrap().feeds().is_empty());
        assert_eq!(state.last_refresh(), Some(at(9)));
    }

    #[tokio::test]
    async fn shared_state_last_writer_wins() {
        let state = new_shared_state();

        let writers: Vec<_> = (0..4u32)
            .map(|i| {
                let state = state.clone();
                tokio::spawn(async move {
                    state.write().await.publish(Agenda::empty(at(10 + i)));
                })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap();
        }

        let guard = state.read().await;
        assert_eq!(guard.refresh_count(), 4);
        assert!(guard.has_data());
    }
}
