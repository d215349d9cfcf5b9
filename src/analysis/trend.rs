//! Direction of change between the two most recent sub-windows of a series.

use std::fmt;

/// Samples per sub-window for the pressure trend.
pub const PRESSURE_TREND_WINDOW: usize = 3;
/// Mean difference (hPa) that has to be exceeded to call a pressure trend.
pub const PRESSURE_TREND_THRESHOLD_HPA: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
}

impl TrendDirection {
    /// Arrow glyph selector for the presentation layer.
    pub fn arrow(&self) -> &'static str {
        match self {
            TrendDirection::Rising => "up",
            TrendDirection::Falling => "down",
            TrendDirection::Stable => "flat",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TrendDirection::Rising => "Rising",
            TrendDirection::Falling => "Falling",
            TrendDirection::Stable => "Stable",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trend {
    pub direction: TrendDirection,
    /// `mean(recent) - mean(previous)`.
    pub diff: f64,
}

/// Compares the mean of the last `k` values against the mean of the `k`
/// values before them.
///
/// Returns `None` when the series holds fewer than `2 * k` values (or `k` is
/// zero); that is the defined "no data yet" state, not an error. Differences
/// of exactly `threshold` are `Stable`.
pub fn analyze_trend(series: &[f64], k: usize, threshold: f64) -> Option<Trend> {
    if k == 0 || series.len() < 2 * k {
        return None;
    }

    let n = series.len();
    let recent = mean(&series[n - k..]);
    let previous = mean(&series[n - 2 * k..n - k]);
    let diff = recent - previous;

    let direction = if diff > threshold {
        TrendDirection::Rising
    } else if diff < -threshold {
        TrendDirection::Falling
    } else {
        TrendDirection::Stable
    };

    Some(Trend { direction, diff })
}

/// Pressure trend with the fixed window and threshold.
pub fn pressure_trend(pressure: &[f64]) -> Option<Trend> {
    analyze_trend(pressure, PRESSURE_TREND_WINDOW, PRESSURE_TREND_THRESHOLD_HPA)
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
