//! Main entry point: wires the channel transport, the snapshot cache and a
//! presentation into a running dashboard.

use crate::config::{DashboardConfig, MissingValuePolicy};
use crate::controller::{run_event_loop, DashboardCommand, DashboardHandle, PollingController};
use crate::error::DashboardError;
use crate::feed::{FeedTransport, ThingSpeakTransport};
use crate::persistence::{FileSnapshotStore, SnapshotStore};
use crate::presentation::Presentation;
use crate::store::TelemetryStore;
use crate::types::metric_snapshot::MetricSnapshot;
use crate::types::quantity::ViewWindow;
use crate::types::raw_sample::parse_feeds;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A configured dashboard, ready to be started.
///
/// Create one with [`Dashboard::new()`] to cache in the default system cache
/// directory, or [`Dashboard::with_cache_folder()`] to pick the location.
/// [`Dashboard::from_parts()`] accepts any transport and store.
///
/// # Examples
///
/// ```rust,no_run
/// # use edgelink::{Dashboard, DashboardConfig, DashboardError};
/// # async fn run() -> Result<(), DashboardError> {
/// let config = DashboardConfig::builder().channel_id("3214903").build();
/// let dashboard = Dashboard::new(config).await?;
///
/// if let Some(snapshot) = dashboard.snapshot().call().await? {
///     println!("{:.1}°C, {}", snapshot.temperature, snapshot.weather_condition);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Dashboard<T = ThingSpeakTransport, S = FileSnapshotStore> {
    config: DashboardConfig,
    transport: Arc<T>,
    store: S,
}

impl Dashboard {
    /// Creates a dashboard that caches snapshots and preferences in
    /// `cache_folder`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::CacheDirCreation`] if the folder cannot be
    /// created, or [`DashboardError::Feed`] if the HTTP client cannot be built.
    pub async fn with_cache_folder(
        config: DashboardConfig,
        cache_folder: PathBuf,
    ) -> Result<Self, DashboardError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| DashboardError::CacheDirCreation(cache_folder.clone(), e))?;
        let transport = ThingSpeakTransport::new(
            &config.base_url,
            &config.channel_id,
            config.read_api_key.as_deref(),
            config.request_timeout,
        )?;
        info!(
            "Dashboard for channel {} caching in {}",
            config.channel_id,
            cache_folder.display()
        );
        Ok(Self::from_parts(
            config,
            transport,
            FileSnapshotStore::new(&cache_folder),
        ))
    }

    /// Creates a dashboard using the default cache directory
    /// (e.g. `~/.cache/edgelink_cache` on Linux).
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::CacheDirResolution`] if there is no system
    /// cache directory, otherwise as [`Dashboard::with_cache_folder()`].
    pub async fn new(config: DashboardConfig) -> Result<Self, DashboardError> {
        let cache_folder = get_cache_dir().map_err(DashboardError::CacheDirResolution)?;
        Self::with_cache_folder(config, cache_folder).await
    }
}

#[bon]
impl<T: FeedTransport, S: SnapshotStore> Dashboard<T, S> {
    pub fn from_parts(config: DashboardConfig, transport: T, store: S) -> Self {
        Dashboard {
            config,
            transport: Arc::new(transport),
            store,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Fetches once and computes the snapshot, without touching the cache.
    ///
    /// Returns `Ok(None)` when the channel has no entries.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Feed`] if the fetch fails.
    #[builder]
    pub async fn snapshot(
        &self,
        view: Option<ViewWindow>,
        missing_values: Option<MissingValuePolicy>,
    ) -> Result<Option<MetricSnapshot>, DashboardError> {
        let view = view.unwrap_or_default();
        let records = self
            .transport
            .fetch_feeds(self.config.fetch_count(view))
            .await?;

        let mut store = TelemetryStore::new();
        store.ingest(parse_feeds(&records), self.config.windowing(view));
        Ok(MetricSnapshot::compute(
            &store,
            missing_values.unwrap_or(self.config.missing_values),
        ))
    }

    /// Runs the dashboard on the current task until shut down through a
    /// handle from `DashboardHandle::channel()`.
    pub async fn run<P: Presentation>(
        self,
        presentation: P,
        commands: mpsc::Receiver<DashboardCommand>,
    ) -> PollingController<S, P> {
        let controller = PollingController::new(self.config, self.store, presentation);
        run_event_loop(controller, self.transport, commands).await
    }

    /// Spawns the dashboard onto the tokio runtime.
    pub fn start<P>(self, presentation: P) -> RunningDashboard<S, P>
    where
        P: Presentation + Send + 'static,
    {
        let (handle, commands) = DashboardHandle::channel();
        let task = tokio::spawn(self.run(presentation, commands));
        RunningDashboard { handle, task }
    }
}

/// A dashboard spawned with [`Dashboard::start()`].
pub struct RunningDashboard<S, P> {
    handle: DashboardHandle,
    task: JoinHandle<PollingController<S, P>>,
}

impl<S, P> RunningDashboard<S, P> {
    pub fn handle(&self) -> DashboardHandle {
        self.handle.clone()
    }

    /// Shuts the dashboard down and returns its final state.
    pub async fn stop(self) -> Result<PollingController<S, P>, DashboardError> {
        // The loop may already have stopped; joining reports how it ended.
        let _ = self.handle.shutdown().await;
        self.task.await.map_err(DashboardError::Task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::trend::TrendDirection;
    use crate::persistence::{MemorySnapshotStore, StorageKey};
    use crate::presentation::DataOrigin;
    use crate::test_support::{feed_records, MockTransport, RecordingPresentation};
    use std::time::Duration;
    use tempfile::tempdir;

    fn config() -> DashboardConfig {
        DashboardConfig::builder().channel_id("3214903").build()
    }

    #[tokio::test]
    async fn test_with_cache_folder_creates_dir() -> Result<(), DashboardError> {
        let dir = tempdir().unwrap();
        let cache = dir.path().join("dashboard");
        let dashboard = Dashboard::with_cache_folder(config(), cache.clone()).await?;
        assert!(cache.is_dir());
        assert_eq!(dashboard.config().channel_id, "3214903");
        Ok(())
    }

    #[tokio::test]
    async fn test_snapshot_builder() -> Result<(), DashboardError> {
        let transport = MockTransport::new();
        let mut records = feed_records(30);
        for (i, record) in records.iter_mut().enumerate() {
            record.field3 = Some(serde_json::json!(1000.0 + i as f64));
        }
        transport.push_records(records);
        let dashboard = Dashboard::from_parts(config(), transport.clone(), MemorySnapshotStore::new());

        let snapshot = dashboard
            .snapshot()
            .view(ViewWindow::Day)
            .call()
            .await?
            .expect("snapshot");

        assert_eq!(transport.requested(), vec![100]);
        assert_eq!(snapshot.pressure, 1029.0);
        assert_eq!(
            snapshot.pressure_trend.map(|t| t.direction),
            Some(TrendDirection::Rising)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_snapshot_propagates_feed_error() {
        let dashboard = Dashboard::from_parts(config(), MockTransport::new(), MemorySnapshotStore::new());
        let result = dashboard.snapshot().call().await;
        assert!(matches!(result, Err(DashboardError::Feed(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_and_stop() -> Result<(), DashboardError> {
        let transport = MockTransport::new();
        transport.push_records(feed_records(25));
        let store = MemorySnapshotStore::new();
        let dashboard = Dashboard::from_parts(config(), transport, store.clone());

        let running = dashboard.start(RecordingPresentation::default());
        tokio::time::sleep(Duration::from_millis(500)).await;
        let controller = running.stop().await?;

        assert_eq!(controller.context().origin(), Some(DataOrigin::Live));
        assert!(store.contains(StorageKey::LastGoodSnapshot));
        Ok(())
    }
}
