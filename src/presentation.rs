//! The boundary between the pipeline and whatever draws the dashboard.
//!
//! Nothing here renders anything. A UI implements [`Presentation`] (and with
//! it [`ChartSurface`]) and receives values ready to display. Every method
//! has an empty default so implementors only override what they show.

use crate::freshness::FreshnessReading;
use crate::store::SummaryStats;
use crate::types::metric_snapshot::MetricSnapshot;
use crate::types::quantity::Quantity;
use chrono::{DateTime, Local};
use std::fmt;

/// The charts the pipeline feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Main history chart, showing the active quantity.
    History(Quantity),
    HumiditySparkline,
    PressureSparkline,
}

/// How a chart should apply new data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    Animated,
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Live,
    Offline,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Live => f.write_str("Live"),
            ConnectionStatus::Offline => f.write_str("Offline"),
        }
    }
}

/// Where the currently displayed data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    /// Fetched during this cycle.
    Live,
    /// Replayed from the persisted snapshot.
    Cached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoticeLevel {
    Info,
    Warning,
    /// Shown even when notifications are disabled.
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Alert,
            message: message.into(),
        }
    }
}

/// Something that can draw a labelled series.
pub trait ChartSurface {
    /// Replaces the chart's data. `labels` and `values` have equal length;
    /// `None` values are gaps.
    fn render(&mut self, chart: ChartKind, labels: &[String], values: &[Option<f64>], redraw: Redraw) {
        let _ = (chart, labels, values, redraw);
    }
}

pub trait Presentation: ChartSurface {
    fn connection_changed(&mut self, status: ConnectionStatus) {
        let _ = status;
    }

    fn snapshot_updated(&mut self, snapshot: &MetricSnapshot, origin: DataOrigin) {
        let _ = (snapshot, origin);
    }

    /// Summary statistics of the active quantity's display series.
    fn summary_updated(&mut self, quantity: Quantity, summary: Option<&SummaryStats>) {
        let _ = (quantity, summary);
    }

    fn freshness_updated(&mut self, reading: &FreshnessReading) {
        let _ = reading;
    }

    /// Number of successful live updates so far.
    fn update_count_changed(&mut self, count: u64) {
        let _ = count;
    }

    fn notify(&mut self, notice: &Notice) {
        let _ = notice;
    }

    fn clock_tick(&mut self, now: DateTime<Local>) {
        let _ = now;
    }
}

/// Routes notices to the presentation, honouring the notifications switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notifier {
    enabled: bool,
}

impl Notifier {
    pub fn new(enabled: bool) -> Self {
        Notifier { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Delivers `notice` unless notifications are off and it is not an alert.
    /// Returns whether it was delivered.
    pub fn show<P: Presentation + ?Sized>(&self, presentation: &mut P, notice: Notice) -> bool {
        if !self.enabled && notice.level != NoticeLevel::Alert {
            return false;
        }
        presentation.notify(&notice);
        true
    }
}
