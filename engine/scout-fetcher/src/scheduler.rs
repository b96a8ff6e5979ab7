use crate::config::FetcherConfig;
use crate::error::FetchError;
use crate::etl::{CycleReport, EtlCycle};
use crate::fetcher::MarketFeedClient;
use crate::photo::HttpPhotoLookup;
use recommendation_store::{RecommendationStore, StoreError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Lifecycle of the scheduler
///
/// `Starting -> Running -> Sleeping -> Running -> ... -> Stopped`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Starting,
    Running,
    Sleeping,
    Stopped,
}

/// Runs the ETL cycle immediately and then on a fixed interval
pub struct FetcherScheduler {
    cycle: EtlCycle,
    interval: Duration,
    run_once: bool,
    state: SchedulerState,
    cycles_run: u64,
    cycles_failed: u64,
    last_report: Option<CycleReport>,
}

impl FetcherScheduler {
    pub fn new(config: &FetcherConfig, cycle: EtlCycle) -> Self {
        Self {
            cycle,
            interval: config.interval(),
            run_once: config.scheduler.run_once,
            state: SchedulerState::Starting,
            cycles_run: 0,
            cycles_failed: 0,
            last_report: None,
        }
    }

    /// Build a scheduler wired to the real market feed and photo service
    pub fn from_config(config: &FetcherConfig) -> Result<Self, FetchError> {
        let source = Arc::new(MarketFeedClient::new(&config.feed)?);
        let lookup = Arc::new(HttpPhotoLookup::new(&config.photos, &config.feed.user_agent)?);
        Ok(Self::new(config, EtlCycle::new(config, source, lookup)))
    }

    /// Override the sleep between cycles
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn cycles_run(&self) -> u64 {
        self.cycles_run
    }

    pub fn cycles_failed(&self) -> u64 {
        self.cycles_failed
    }

    pub fn last_report(&self) -> Option<&CycleReport> {
        self.last_report.as_ref()
    }

    /// Create the store schema. The store is closed again afterwards.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        let store = RecommendationStore::open(self.cycle.store_config().clone()).await?;
        let result = store.ensure_schema().await;
        store.close().await;
        result
    }

    /// Run until `shutdown` is cancelled (or after one cycle in run-once mode).
    ///
    /// Only a schema setup failure is returned; cycle failures are logged and the
    /// loop carries on with the next interval.
    pub async fn start(&mut self, shutdown: CancellationToken) -> Result<(), StoreError> {
        self.transition(SchedulerState::Starting);
        info!("Checking recommendation store...");

        if let Err(e) = self.ensure_schema().await {
            error!("Store setup failed: {}", e);
            self.transition(SchedulerState::Stopped);
            return Err(e);
        }

        loop {
            if shutdown.is_cancelled() {
                break;
            }

            self.transition(SchedulerState::Running);
            self.run_cycle(&shutdown).await;

            if shutdown.is_cancelled() || self.run_once {
                break;
            }

            self.transition(SchedulerState::Sleeping);
            match chrono::Duration::from_std(self.interval) {
                Ok(delta) => info!(
                    "Sleeping for {:?}, next cycle at {}",
                    self.interval,
                    chrono::Utc::now() + delta
                ),
                Err(_) => info!("Sleeping for {:?}", self.interval),
            }

            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = sleep(self.interval) => {}
            }
        }

        info!("Scheduler stopping after {} cycles ({} failed)", self.cycles_run, self.cycles_failed);
        self.transition(SchedulerState::Stopped);
        Ok(())
    }

    async fn run_cycle(&mut self, shutdown: &CancellationToken) {
        self.cycles_run += 1;
        info!("Starting cycle #{}", self.cycles_run);

        match self.cycle.run(shutdown).await {
            Ok(report) => {
                info!("Cycle #{} completed: {:?}", self.cycles_run, report);
                self.last_report = Some(report);
            }
            Err(e) => {
                self.cycles_failed += 1;
                error!("Cycle #{} failed: {}", self.cycles_run, e);
            }
        }
    }

    fn transition(&mut self, next: SchedulerState) {
        if self.state != next {
            tracing::debug!("Scheduler state {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}
