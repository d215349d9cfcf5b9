//! The fetch / cache-fallback cycle and the dashboard state it maintains.

use crate::alerts::AlertMonitor;
use crate::config::{checked_poll_interval, DashboardConfig};
use crate::feed::{FeedError, FeedTransport};
use crate::freshness::{FreshnessReading, FreshnessTracker};
use crate::persistence::{SnapshotCache, SnapshotStore};
use crate::presentation::{
    ChartKind, ConnectionStatus, DataOrigin, Notice, Notifier, Presentation, Redraw,
};
use crate::store::TelemetryStore;
use crate::types::metric_snapshot::MetricSnapshot;
use crate::types::quantity::{Quantity, ViewWindow};
use crate::types::raw_sample::{parse_feeds, FeedRecord, RawSample};
use chrono::{DateTime, Local, Utc};
use log::{debug, info, warn};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Fetching,
}

/// What a completed fetch cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// New data was ingested.
    Updated { entries: usize },
    /// The source answered with no entries; the held data is unchanged.
    Empty,
    /// The fetch failed. `replayed_cache` is set when this failure switched
    /// the dashboard to offline mode and cached data was shown.
    Failed { replayed_cache: bool },
}

/// Result of switching the view window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewChange {
    /// Served from history already held in memory.
    Resliced,
    /// Not enough history held; a fetch is needed.
    FetchRequired,
}

/// Everything the dashboard currently shows, owned by the controller.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    store: TelemetryStore,
    snapshot: Option<MetricSnapshot>,
    freshness: FreshnessTracker,
    view: ViewWindow,
    offline: bool,
    status: Option<ConnectionStatus>,
    origin: Option<DataOrigin>,
    update_count: u64,
    poll_interval: Duration,
    alerts: AlertMonitor,
    notifier: Notifier,
}

impl DashboardContext {
    fn new(config: &DashboardConfig) -> Self {
        DashboardContext {
            store: TelemetryStore::new(),
            snapshot: None,
            freshness: FreshnessTracker::new(config.staleness_threshold),
            view: ViewWindow::default(),
            offline: false,
            status: None,
            origin: None,
            update_count: 0,
            poll_interval: checked_poll_interval(config.poll_interval),
            alerts: AlertMonitor::new(),
            notifier: Notifier::new(config.notifications),
        }
    }

    pub fn store(&self) -> &TelemetryStore {
        &self.store
    }

    pub fn snapshot(&self) -> Option<&MetricSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn freshness(&self) -> &FreshnessTracker {
        &self.freshness
    }

    pub fn view(&self) -> ViewWindow {
        self.view
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    pub fn status(&self) -> Option<ConnectionStatus> {
        self.status
    }

    /// Origin of the data currently held, `None` before anything was shown.
    pub fn origin(&self) -> Option<DataOrigin> {
        self.origin
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifier.enabled()
    }
}

/// Drives one dashboard: fetch results in, presentation updates out.
///
/// The controller never schedules anything itself; the event loop (or a
/// test) calls [`begin_fetch`](Self::begin_fetch) /
/// [`complete_fetch`](Self::complete_fetch) on timer ticks.
pub struct PollingController<S, P> {
    config: DashboardConfig,
    cache: SnapshotCache<S>,
    presentation: P,
    context: DashboardContext,
    state: PollState,
}

impl<S: SnapshotStore, P: Presentation> PollingController<S, P> {
    pub fn new(config: DashboardConfig, store: S, presentation: P) -> Self {
        let context = DashboardContext::new(&config);
        PollingController {
            config,
            cache: SnapshotCache::new(store),
            presentation,
            context,
            state: PollState::Idle,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn context(&self) -> &DashboardContext {
        &self.context
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    pub fn cache(&self) -> &SnapshotCache<S> {
        &self.cache
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Applies stored preferences and shows the last-good snapshot, if any.
    ///
    /// Cached data shown here does not put the dashboard in offline mode.
    pub async fn restore(&mut self) {
        let preferences = self.cache.load_preferences().await;
        if let Some(interval) = preferences.poll_interval {
            info!("Restored poll interval of {:?}", interval);
            self.context.poll_interval = checked_poll_interval(interval);
        }
        if let Some(enabled) = preferences.notifications {
            self.context.notifier.set_enabled(enabled);
        }

        if let Some(samples) = self.cache.load_last_good().await {
            self.ingest(samples, DataOrigin::Cached);
        }
    }

    /// Moves to `Fetching` and returns how many results to request, or
    /// `None` if a fetch is already in flight.
    pub fn begin_fetch(&mut self) -> Option<usize> {
        if self.state == PollState::Fetching {
            debug!("Fetch still in flight, skipping cycle");
            return None;
        }
        self.state = PollState::Fetching;
        Some(self.config.fetch_count(self.context.view))
    }

    /// How long a fetch may run before it counts as failed: the request
    /// timeout, capped at the current poll interval.
    pub fn fetch_deadline(&self) -> Duration {
        let interval = self.context.poll_interval;
        self.config
            .request_timeout
            .map_or(interval, |timeout| timeout.min(interval))
    }

    /// Finishes the cycle started by [`begin_fetch`](Self::begin_fetch).
    pub async fn complete_fetch(
        &mut self,
        result: Result<Vec<FeedRecord>, FeedError>,
    ) -> CycleOutcome {
        self.state = PollState::Idle;
        match result {
            Ok(records) => self.handle_success(records).await,
            Err(e) => self.handle_failure(e).await,
        }
    }

    /// Runs a whole cycle against `transport`.
    ///
    /// Returns `None` without fetching if a cycle is already in flight.
    pub async fn poll_once<T: FeedTransport>(&mut self, transport: &T) -> Option<CycleOutcome> {
        let count = self.begin_fetch()?;
        let result = transport.fetch_feeds(count).await;
        Some(self.complete_fetch(result).await)
    }

    async fn handle_success(&mut self, records: Vec<FeedRecord>) -> CycleOutcome {
        self.context.offline = false;
        self.set_status(ConnectionStatus::Live);

        if records.is_empty() {
            debug!("Feed returned no entries");
            return CycleOutcome::Empty;
        }

        let entries = records.len();
        let keep = self.config.windowing(self.context.view).analysis;
        let records = &records[records.len().saturating_sub(keep)..];

        self.ingest(parse_feeds(records), DataOrigin::Live);
        self.context.update_count += 1;
        self.presentation
            .update_count_changed(self.context.update_count);

        if let Err(e) = self
            .cache
            .save(records, self.context.store.analysis_window())
            .await
        {
            warn!("Failed to persist snapshot: {}", e);
        }

        CycleOutcome::Updated { entries }
    }

    async fn handle_failure(&mut self, error: FeedError) -> CycleOutcome {
        warn!("Error fetching data: {}", error);
        self.set_status(ConnectionStatus::Offline);

        if self.context.offline {
            return CycleOutcome::Failed {
                replayed_cache: false,
            };
        }

        let replayed_cache = match self.cache.load_offline().await {
            Some(samples) => {
                info!("Showing cached data while offline");
                self.ingest(samples, DataOrigin::Cached);
                true
            }
            None => false,
        };
        self.context.offline = true;

        CycleOutcome::Failed { replayed_cache }
    }

    fn ingest(&mut self, samples: Vec<RawSample>, origin: DataOrigin) {
        let windowing = self.config.windowing(self.context.view);
        self.context.store.ingest(samples, windowing);
        self.context.origin = Some(origin);

        self.context.snapshot =
            MetricSnapshot::compute(&self.context.store, self.config.missing_values);
        if let Some(latest) = self.context.store.latest() {
            self.context.freshness.record(latest.timestamp);
        }

        self.render_charts(Redraw::Immediate);
        self.push_summary();

        if let Some(snapshot) = &self.context.snapshot {
            self.presentation.snapshot_updated(snapshot, origin);
            for notice in self.context.alerts.check(snapshot) {
                self.context.notifier.show(&mut self.presentation, notice);
            }
        }
    }

    /// Makes `quantity` the charted one. Works on held data only.
    pub fn switch_quantity(&mut self, quantity: Quantity) {
        self.context.store.select_quantity(quantity);
        self.render_history(Redraw::Animated);
        self.push_summary();
    }

    /// Switches between the recent and the 24h view.
    pub fn set_view(&mut self, view: ViewWindow) -> ViewChange {
        self.context.view = view;
        if self
            .context
            .store
            .reslice(self.config.display_count(view))
        {
            self.render_charts(Redraw::Animated);
            self.push_summary();
            ViewChange::Resliced
        } else {
            info!("Not enough history held for the {} view, fetching", view);
            ViewChange::FetchRequired
        }
    }

    /// Stores the new interval. The caller reschedules its timer.
    ///
    /// Intervals below one second are raised to one second.
    pub async fn set_poll_interval(&mut self, interval: Duration) {
        let interval = checked_poll_interval(interval);
        self.context.poll_interval = interval;
        if let Err(e) = self.cache.save_poll_interval(interval).await {
            warn!("Failed to persist poll interval: {}", e);
        }
        self.notify(Notice::info(format!(
            "Update interval set to {}s",
            interval.as_secs_f64()
        )));
    }

    pub async fn set_notifications(&mut self, enabled: bool) {
        self.context.notifier.set_enabled(enabled);
        if let Err(e) = self.cache.save_notifications(enabled).await {
            warn!("Failed to persist notifications preference: {}", e);
        }
        if enabled {
            self.notify(Notice::info("Notifications enabled"));
        }
    }

    /// Goes back to the configured interval and notifications switch.
    pub async fn reset_settings(&mut self) {
        self.context.poll_interval = checked_poll_interval(self.config.poll_interval);
        self.context.notifier.set_enabled(self.config.notifications);
        if let Err(e) = self.cache.reset_preferences().await {
            warn!("Failed to clear stored preferences: {}", e);
        }
        self.notify(Notice::info("Settings reset to defaults"));
    }

    pub fn tick_freshness(&mut self, now: DateTime<Utc>) -> FreshnessReading {
        let reading = self.context.freshness.evaluate(now);
        self.presentation.freshness_updated(&reading);
        reading
    }

    pub fn tick_clock(&mut self, now: DateTime<Local>) {
        self.presentation.clock_tick(now);
    }

    fn notify(&mut self, notice: Notice) {
        self.context.notifier.show(&mut self.presentation, notice);
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        self.context.status = Some(status);
        self.presentation.connection_changed(status);
    }

    fn push_summary(&mut self) {
        let store = &self.context.store;
        self.presentation
            .summary_updated(store.active_quantity(), store.summary().as_ref());
    }

    fn render_history(&mut self, redraw: Redraw) {
        let store = &self.context.store;
        let quantity = store.active_quantity();
        let series = store.series();
        self.presentation.render(
            ChartKind::History(quantity),
            &series.labels,
            series.values(quantity),
            redraw,
        );
    }

    fn render_charts(&mut self, redraw: Redraw) {
        self.render_history(redraw);

        let points = self.config.sparkline_points;
        let store = &self.context.store;
        for (chart, quantity) in [
            (ChartKind::HumiditySparkline, Quantity::Humidity),
            (ChartKind::PressureSparkline, Quantity::Pressure),
        ] {
            let values = store.sparkline(quantity, points);
            let labels = vec![String::new(); values.len()];
            self.presentation
                .render(chart, &labels, values, Redraw::Immediate);
        }
    }
}
