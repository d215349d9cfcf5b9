//! Holds the current feed windows and the chart series derived from them.

use crate::config::MissingValuePolicy;
use crate::store::summary::SummaryStats;
use crate::types::quantity::Quantity;
use crate::types::raw_sample::RawSample;
use chrono::{DateTime, Local, Utc};

/// Requested window sizes for one ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Windowing {
    /// Trailing samples shown on the charts.
    pub display: usize,
    /// Trailing samples retained for analysis. The display window is a suffix of it.
    pub analysis: usize,
}

/// Chart-ready series, positionally aligned with the display window.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DerivedSeries {
    /// Local time of day per sample, e.g. `03:45 PM`.
    pub labels: Vec<String>,
    pub temperature: Vec<Option<f64>>,
    pub humidity: Vec<Option<f64>>,
    pub pressure: Vec<Option<f64>>,
}

impl DerivedSeries {
    fn from_samples(samples: &[RawSample]) -> Self {
        DerivedSeries {
            labels: samples.iter().map(|s| time_label(s.timestamp)).collect(),
            temperature: column(samples, Quantity::Temperature),
            humidity: column(samples, Quantity::Humidity),
            pressure: column(samples, Quantity::Pressure),
        }
    }

    pub fn values(&self, quantity: Quantity) -> &[Option<f64>] {
        match quantity {
            Quantity::Temperature => &self.temperature,
            Quantity::Humidity => &self.humidity,
            Quantity::Pressure => &self.pressure,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

fn column(samples: &[RawSample], quantity: Quantity) -> Vec<Option<f64>> {
    samples.iter().map(|s| quantity.value_of(s)).collect()
}

pub(crate) fn time_label(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%I:%M %p").to_string()
}

/// In-memory windows of the most recent feed.
///
/// Every ingest replaces the windows and rebuilds all series; nothing is
/// patched incrementally.
#[derive(Debug, Clone, Default)]
pub struct TelemetryStore {
    analysis: Vec<RawSample>,
    display: usize,
    series: DerivedSeries,
    active: Quantity,
    summary: Option<SummaryStats>,
    // The last ingest held everything the source had, so asking for more
    // history would not return more.
    source_exhausted: bool,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the held windows with the trailing part of `samples`
    /// (oldest first) and rebuilds the series.
    ///
    /// Only the active quantity's summary statistics are recomputed.
    pub fn ingest(&mut self, mut samples: Vec<RawSample>, windowing: Windowing) {
        self.source_exhausted = samples.len() < windowing.analysis;

        let start = samples.len().saturating_sub(windowing.analysis);
        samples.drain(..start);
        self.analysis = samples;
        self.display = windowing.display;

        self.rebuild();
    }

    /// Shows `display` trailing samples from the data already held.
    ///
    /// Returns `false`, leaving everything untouched, when not enough history
    /// is held and a fetch is needed.
    pub fn reslice(&mut self, display: usize) -> bool {
        if self.analysis.len() < display && !self.source_exhausted {
            return false;
        }
        self.display = display;
        self.rebuild();
        true
    }

    /// Makes `quantity` the active one and recomputes its statistics from the
    /// held series.
    pub fn select_quantity(&mut self, quantity: Quantity) -> Option<SummaryStats> {
        self.active = quantity;
        self.summary = SummaryStats::from_values(self.series.values(quantity));
        self.summary
    }

    fn rebuild(&mut self) {
        self.series = DerivedSeries::from_samples(self.display_window());
        self.summary = SummaryStats::from_values(self.series.values(self.active));
    }

    pub fn analysis_window(&self) -> &[RawSample] {
        &self.analysis
    }

    /// The trailing display slice of the analysis window.
    pub fn display_window(&self) -> &[RawSample] {
        let start = self.analysis.len().saturating_sub(self.display);
        &self.analysis[start..]
    }

    pub fn series(&self) -> &DerivedSeries {
        &self.series
    }

    pub fn active_quantity(&self) -> Quantity {
        self.active
    }

    pub fn summary(&self) -> Option<SummaryStats> {
        self.summary
    }

    pub fn latest(&self) -> Option<&RawSample> {
        self.analysis.last()
    }

    pub fn is_empty(&self) -> bool {
        self.analysis.is_empty()
    }

    /// The last `points` display values of `quantity`.
    pub fn sparkline(&self, quantity: Quantity, points: usize) -> &[Option<f64>] {
        let values = self.series.values(quantity);
        &values[values.len().saturating_sub(points)..]
    }

    /// Pressure over the whole analysis window, as trend and forecast input.
    pub fn analysis_pressure(&self, policy: MissingValuePolicy) -> Vec<f64> {
        match policy {
            MissingValuePolicy::Zero => self
                .analysis
                .iter()
                .map(|s| s.pressure.unwrap_or(0.0))
                .collect(),
            MissingValuePolicy::Skip => self.analysis.iter().filter_map(|s| s.pressure).collect(),
        }
    }
}
