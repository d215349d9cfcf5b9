mod alerts;
mod analysis;
mod config;
mod controller;
mod dashboard;
mod error;
mod feed;
mod freshness;
mod persistence;
mod presentation;
mod store;
mod types;
mod utils;

#[cfg(test)]
mod test_support;

pub use dashboard::*;
pub use error::DashboardError;

pub use config::{
    DashboardConfig, MissingValuePolicy, DEFAULT_ANALYSIS_WINDOW, DEFAULT_BASE_URL,
    DEFAULT_POLL_INTERVAL, DEFAULT_RECENT_WINDOW, DEFAULT_SPARKLINE_POINTS,
    DEFAULT_STALENESS_MINUTES, MIN_POLL_INTERVAL,
};
pub use controller::{
    run_event_loop, CycleOutcome, DashboardCommand, DashboardContext, DashboardHandle, PollState,
    PollingController, ViewChange,
};

pub use types::metric_snapshot::MetricSnapshot;
pub use types::quantity::{Quantity, ViewWindow};
pub use types::raw_sample::{parse_feeds, FeedRecord, FeedResponse, RawSample};
pub use types::weather_condition::WeatherCondition;

pub use analysis::calculator::{dew_point, heat_index, rain_gauge_percent};
pub use analysis::forecast::{forecast, Forecast, Outlook, FORECAST_MIN_SAMPLES, FORECAST_WINDOW};
pub use analysis::trend::{
    analyze_trend, pressure_trend, Trend, TrendDirection, PRESSURE_TREND_THRESHOLD_HPA,
    PRESSURE_TREND_WINDOW,
};

pub use store::{DerivedSeries, SummaryStats, TelemetryStore, Windowing};
pub use freshness::{Freshness, FreshnessReading, FreshnessTracker};
pub use alerts::AlertMonitor;
pub use presentation::{
    ChartKind, ChartSurface, ConnectionStatus, DataOrigin, Notice, NoticeLevel, Notifier,
    Presentation, Redraw,
};

pub use feed::{FeedError, FeedTransport, ThingSpeakTransport};
pub use persistence::{
    FileSnapshotStore, MemorySnapshotStore, PersistenceError, Preferences, SnapshotCache,
    SnapshotStore, StorageKey,
};
