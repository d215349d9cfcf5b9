//! The measured quantities that get their own chart series, and the view
//! windows a dashboard can switch between.

use crate::types::raw_sample::RawSample;
use std::fmt;

/// A quantity plotted on the main history chart.
///
/// Rainfall is reported on the gauge only and never charted, so it has no
/// variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quantity {
    /// Air temperature in degrees Celsius.
    #[default]
    Temperature,
    /// Relative humidity in percent.
    Humidity,
    /// Barometric pressure in hectopascal.
    Pressure,
}

impl Quantity {
    pub const ALL: [Quantity; 3] = [
        Quantity::Temperature,
        Quantity::Humidity,
        Quantity::Pressure,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Quantity::Temperature => "Temperature",
            Quantity::Humidity => "Humidity",
            Quantity::Pressure => "Pressure",
        }
    }

    /// Unit suffix used for axis ticks.
    pub fn unit(&self) -> &'static str {
        match self {
            Quantity::Temperature => "°C",
            Quantity::Humidity => "%",
            Quantity::Pressure => " hPa",
        }
    }

    pub(crate) fn tab_id(&self) -> &'static str {
        match self {
            Quantity::Temperature => "temp",
            Quantity::Humidity => "humid",
            Quantity::Pressure => "press",
        }
    }

    /// Resolves the identifier of a chart tab (`temp`, `humid`, `press`).
    pub fn from_tab_id(id: &str) -> Option<Self> {
        Quantity::ALL.into_iter().find(|q| q.tab_id() == id)
    }

    pub(crate) fn value_of(&self, sample: &RawSample) -> Option<f64> {
        match self {
            Quantity::Temperature => sample.temperature,
            Quantity::Humidity => sample.humidity,
            Quantity::Pressure => sample.pressure,
        }
    }
}

/// Formats a `Quantity` using its tab identifier.
///
/// # Examples
///
/// ```
/// use edgelink::Quantity;
///
/// assert_eq!(Quantity::Pressure.to_string(), "press");
/// assert_eq!(Quantity::from_tab_id("humid"), Some(Quantity::Humidity));
/// ```
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tab_id())
    }
}

/// Which slice of history the main chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewWindow {
    /// The short, most recent window (20 samples by default).
    #[default]
    Recent,
    /// Roughly a day of samples (100 by default).
    Day,
}

impl fmt::Display for ViewWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewWindow::Recent => write!(f, "recent"),
            ViewWindow::Day => write!(f, "24h"),
        }
    }
}
