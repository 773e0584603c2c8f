//! Background scheduler for feed refreshes.
//!
//! Runs one refresh immediately, then one per interval (with jitter so many
//! dashboards started together do not hit a feed host in lockstep).
//! Subscribers are woken after every cycle.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, mpsc, watch};
use tracing::{debug, info, warn};

/// Shortest delay the scheduler will ever wait between cycles.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Base interval between refreshes.
    pub refresh_interval: Duration,
    /// Maximum jitter as a fraction of the interval (0.0-1.0).
    pub jitter_fraction: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(300),
            jitter_fraction: 0.1,
        }
    }
}

impl SchedulerConfig {
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            refresh_interval,
            ..Default::default()
        }
    }

    pub fn with_jitter(mut self, fraction: f64) -> Self {
        self.jitter_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    /// Next regular delay, with jitter applied.
    ///
    /// Never shorter than [`MIN_REFRESH_INTERVAL`].
    pub fn next_refresh_delay(&self) -> Duration {
        let base = self.refresh_interval.as_secs_f64();
        let jitter = rand_jitter(base * self.jitter_fraction);
        Duration::from_secs_f64((base + jitter).max(0.0)).max(MIN_REFRESH_INTERVAL)
    }
}

/// Pseudo-random value in `[-range, range]` derived from the clock.
fn rand_jitter(range: f64) -> f64 {
    use std::time::SystemTime;

    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();

    let fraction = f64::from(nanos) / 1_000_000_000.0;
    (fraction * 2.0 - 1.0) * range
}

/// Commands accepted by a running scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerCommand {
    /// Refresh immediately and restart the interval.
    RefreshNow,
    Stop,
}

/// Bookkeeping about past cycles.
#[derive(Debug, Clone, Default)]
pub struct SchedulerState {
    pub last_refresh: Option<DateTime<Utc>>,
    /// Completed cycles.
    pub cycles: u64,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cycle(&mut self) {
        self.last_refresh = Some(Utc::now());
        self.cycles += 1;
    }
}

pub type SharedSchedulerState = Arc<RwLock<SchedulerState>>;

/// Periodically runs a refresh function until stopped.
pub struct Scheduler {
    config: SchedulerConfig,
    state: SharedSchedulerState,
    command_tx: mpsc::Sender<SchedulerCommand>,
    command_rx: Option<mpsc::Receiver<SchedulerCommand>>,
    cycles_tx: watch::Sender<u64>,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (cycles_tx, _) = watch::channel(0);
        Self {
            config,
            state: Arc::new(RwLock::new(SchedulerState::new())),
            command_tx,
            command_rx: Some(command_rx),
            cycles_tx,
        }
    }

    /// Returns a handle for controlling the scheduler once it runs.
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            command_tx: self.command_tx.clone(),
            cycles_rx: self.cycles_tx.subscribe(),
            state: self.state.clone(),
        }
    }

    pub fn state(&self) -> SharedSchedulerState {
        self.state.clone()
    }

    /// Runs the loop until [`SchedulerCommand::Stop`] arrives.
    pub async fn run<F, Fut>(mut self, refresh_fn: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send,
    {
        info!(
            interval_secs = self.config.refresh_interval.as_secs(),
            "Scheduler started"
        );

        let Some(mut command_rx) = self.command_rx.take() else {
            warn!("Scheduler command channel already taken");
            return;
        };

        self.do_refresh(&refresh_fn).await;

        loop {
            let delay = self.config.next_refresh_delay();
            debug!(delay_secs = delay.as_secs(), "Scheduling next refresh");

            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    self.do_refresh(&refresh_fn).await;
                }
                cmd = command_rx.recv() => {
                    match cmd {
                        Some(SchedulerCommand::RefreshNow) => {
                            debug!("Received RefreshNow command");
                            self.do_refresh(&refresh_fn).await;
                        }
                        Some(SchedulerCommand::Stop) | None => {
                            info!("Scheduler stopping");
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn do_refresh<F, Fut>(&self, refresh_fn: &F)
    where
        F: Fn() -> Fut,
        Fut: Future<Output = ()>,
    {
        debug!("Starting refresh");
        refresh_fn().await;
        let cycles = {
            let mut state = self.state.write().await;
            state.record_cycle();
            state.cycles
        };
        self.cycles_tx.send_replace(cycles);
    }
}

/// Handle for a running scheduler.
#[derive(Clone, Debug)]
pub struct SchedulerHandle {
    command_tx: mpsc::Sender<SchedulerCommand>,
    cycles_rx: watch::Receiver<u64>,
    state: SharedSchedulerState,
}

impl SchedulerHandle {
    pub async fn refresh_now(&self) -> Result<(), mpsc::error::SendError<SchedulerCommand>> {
        self.command_tx.send(SchedulerCommand::RefreshNow).await
    }

    pub async fn stop(&self) -> Result<(), mpsc::error::SendError<SchedulerCommand>> {
        self.command_tx.send(SchedulerCommand::Stop).await
    }

    /// Returns a receiver that changes after every completed cycle.
    ///
    /// The value is the number of cycles completed so far.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.cycles_rx.clone()
    }

    pub async fn state(&self) -> SchedulerState {
        self.state.read().await.clone()
    }
}
