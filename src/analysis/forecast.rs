//! Short-term outlook from the change in mean barometric pressure.

use crate::analysis::trend::mean;
use std::fmt;

/// Below this many pressure samples no forecast is made.
pub const FORECAST_MIN_SAMPLES: usize = 10;
/// Samples per comparison window.
pub const FORECAST_WINDOW: usize = 12;

const STORM_BELOW_HPA: f64 = -2.0;
const RAIN_BELOW_HPA: f64 = -0.5;
const CLEARING_ABOVE_HPA: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outlook {
    StormComing,
    RainLikely,
    ClearingUp,
    FairWeather,
}

impl Outlook {
    /// Symbolic icon selector for the presentation layer.
    pub fn icon(&self) -> &'static str {
        match self {
            Outlook::StormComing => "storm",
            Outlook::RainLikely => "rain",
            Outlook::ClearingUp => "sun-behind-cloud",
            Outlook::FairWeather => "sun",
        }
    }
}

impl fmt::Display for Outlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Outlook::StormComing => "Storm Coming",
            Outlook::RainLikely => "Rain Likely",
            Outlook::ClearingUp => "Clearing Up",
            Outlook::FairWeather => "Fair Weather",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub outlook: Outlook,
    /// Mean of the recent window minus mean of the window before it (hPa).
    pub change_hpa: f64,
    pub detail: String,
}

impl Forecast {
    pub fn icon(&self) -> &'static str {
        self.outlook.icon()
    }
}

/// Classifies the outlook from a pressure series, oldest first.
///
/// The recent window is the last twelve samples, the older window the (up to)
/// twelve before it. With fewer than ten samples there is no forecast.
pub fn forecast(pressure: &[f64]) -> Option<Forecast> {
    if pressure.len() < FORECAST_MIN_SAMPLES {
        return None;
    }

    let n = pressure.len();
    let recent_start = n.saturating_sub(FORECAST_WINDOW);
    let older_start = recent_start.saturating_sub(FORECAST_WINDOW);

    let recent = &pressure[recent_start..];
    let older = &pressure[older_start..recent_start];

    let recent_mean = mean(recent);
    let older_mean = if older.is_empty() {
        recent_mean
    } else {
        mean(older)
    };
    let change = recent_mean - older_mean;

    let (outlook, detail) = if change < STORM_BELOW_HPA {
        (
            Outlook::StormComing,
            format!("Pressure dropping fast ({change:.1} hPa)"),
        )
    } else if change < RAIN_BELOW_HPA {
        (
            Outlook::RainLikely,
            format!("Pressure falling ({change:.1} hPa)"),
        )
    } else if change > CLEARING_ABOVE_HPA {
        (
            Outlook::ClearingUp,
            format!("Pressure rising (+{change:.1} hPa)"),
        )
    } else {
        (
            Outlook::FairWeather,
            format!("Pressure steady ({change:+.1} hPa)"),
        )
    };

    Some(Forecast {
        outlook,
        change_hpa: change,
        detail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(older: f64, recent: f64) -> Vec<f64> {
        let mut s = vec![older; FORECAST_WINDOW];
        s.extend(std::iter::repeat(recent).take(FORECAST_WINDOW));
        s
    }

    #[test]
    fn test_storm_coming() {
        let f = forecast(&series(1012.0, 1009.0)).unwrap();
        assert_eq!(f.outlook, Outlook::StormComing);
        assert!((f.change_hpa + 3.0).abs() < 1e-9);
        assert_eq!(f.detail, "Pressure dropping fast (-3.0 hPa)");
        assert_eq!(f.icon(), "storm");
    }

    #[test]
    fn test_exact_boundaries_use_next_class() {
        assert_eq!(
            forecast(&series(1012.0, 1010.0)).unwrap().outlook,
            Outlook::RainLikely
        );
        assert_eq!(
            forecast(&series(1012.0, 1011.5)).unwrap().outlook,
            Outlook::FairWeather
        );
        assert_eq!(
            forecast(&series(1012.0, 1013.0)).unwrap().outlook,
            Outlook::FairWeather
        );
        assert_eq!(
            forecast(&series(1012.0, 1013.5)).unwrap().outlook,
            Outlook::ClearingUp
        );
    }

    #[test]
    fn test_older_window_is_clipped() {
        // 15 samples: recent = last 12, older = first 3.
        let mut s = vec![1015.0; 3];
        s.extend(std::iter::repeat(1013.0).take(12));
        let f = forecast(&s).unwrap();
        assert_eq!(f.outlook, Outlook::RainLikely);
        assert!((f.change_hpa + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_older_window_means_no_change() {
        let s: Vec<f64> = (0..10).map(|i| 1000.0 + i as f64).collect();
        let f = forecast(&s).unwrap();
        assert_eq!(f.outlook, Outlook::FairWeather);
        assert_eq!(f.change_hpa, 0.0);
    }

    #[test]
    fn test_insufficient_samples() {
        assert_eq!(forecast(&[1010.0; 9]), None);
        assert_eq!(forecast(&[]), None);
    }

    #[test]
    fn test_only_last_two_windows_count() {
        let mut s = vec![900.0; 30];
        s.extend(series(1010.0, 1012.0));
        assert_eq!(forecast(&s).unwrap().outlook, Outlook::ClearingUp);
    }
}
