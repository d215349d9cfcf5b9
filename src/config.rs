//! Dashboard configuration.
//!
//! Everything has a default except the channel id. Values restored from the
//! persisted preferences (poll interval, notifications) override the
//! configured ones at startup.

use crate::store::Windowing;
use crate::types::quantity::ViewWindow;
use bon::Builder;
use chrono::TimeDelta;
use log::warn;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.thingspeak.com";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);
/// Shortest poll interval accepted; shorter ones are raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_RECENT_WINDOW: usize = 20;
pub const DEFAULT_ANALYSIS_WINDOW: usize = 100;
pub const DEFAULT_SPARKLINE_POINTS: usize = 10;
pub const DEFAULT_STALENESS_MINUTES: i64 = 30;

/// How a missing or unparsable reading is turned into a number where one is
/// required (snapshot scalars, trend and forecast input).
///
/// Charts and summary statistics never substitute: they show gaps and skip
/// the entry respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingValuePolicy {
    /// Treat the reading as `0.0`. Matches what the channel's own web view does.
    #[default]
    Zero,
    /// Leave the sample out of pressure trend and forecast input. Snapshot
    /// scalars still read `0.0`.
    Skip,
}

/// Configuration for a [`crate::Dashboard`].
///
/// # Examples
///
/// ```
/// use edgelink::DashboardConfig;
/// use std::time::Duration;
///
/// let config = DashboardConfig::builder()
///     .channel_id("3214903")
///     .read_api_key("JW9YB6D8ENYCURR0")
///     .poll_interval(Duration::from_secs(30))
///     .build();
///
/// assert_eq!(config.recent_window, 20);
/// assert_eq!(config.analysis_window, 100);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct DashboardConfig {
    /// Channel whose feed is polled.
    #[builder(into)]
    pub channel_id: String,
    /// Read key, needed for private channels only.
    #[builder(into)]
    pub read_api_key: Option<String>,
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    /// Time between scheduled fetches. Raised to [`MIN_POLL_INTERVAL`] if
    /// shorter.
    #[builder(default = DEFAULT_POLL_INTERVAL)]
    pub poll_interval: Duration,
    /// Upper bound for a single request. A fetch is always abandoned after
    /// one poll interval, whichever comes first.
    pub request_timeout: Option<Duration>,
    /// Samples shown in the "recent" view.
    #[builder(default = DEFAULT_RECENT_WINDOW)]
    pub recent_window: usize,
    /// Samples kept for trend and forecast analysis; also the "24h" view.
    #[builder(default = DEFAULT_ANALYSIS_WINDOW)]
    pub analysis_window: usize,
    /// Points shown on the humidity and pressure sparklines.
    #[builder(default = DEFAULT_SPARKLINE_POINTS)]
    pub sparkline_points: usize,
    /// Age of the newest sample after which data counts as stale.
    #[builder(default = TimeDelta::minutes(DEFAULT_STALENESS_MINUTES))]
    pub staleness_threshold: TimeDelta,
    #[builder(default)]
    pub missing_values: MissingValuePolicy,
    /// Whether info and warning notices are shown. Alerts always are.
    #[builder(default = true)]
    pub notifications: bool,
}

impl DashboardConfig {
    /// Display length for a view.
    pub fn display_count(&self, view: ViewWindow) -> usize {
        match view {
            ViewWindow::Recent => self.recent_window,
            ViewWindow::Day => self.analysis_window,
        }
    }

    /// How many results to request so both windows can be served.
    pub fn fetch_count(&self, view: ViewWindow) -> usize {
        self.analysis_window.max(self.display_count(view))
    }

    pub fn windowing(&self, view: ViewWindow) -> Windowing {
        Windowing {
            display: self.display_count(view),
            analysis: self.fetch_count(view),
        }
    }
}

/// `interval`, raised to [`MIN_POLL_INTERVAL`] when shorter.
pub(crate) fn checked_poll_interval(interval: Duration) -> Duration {
    if interval < MIN_POLL_INTERVAL {
        warn!(
            "Poll interval {:?} is below the minimum, using {:?}",
            interval, MIN_POLL_INTERVAL
        );
        return MIN_POLL_INTERVAL;
    }
    interval
}
