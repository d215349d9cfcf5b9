//! Defines the `WeatherCondition` enum, a coarse label derived from the latest
//! temperature and rainfall reading.

use std::fmt;

/// Temperature above which a dry reading counts as sunny.
const SUNNY_ABOVE_C: f64 = 30.0;
/// Temperature below which a dry reading counts as cold.
const COLD_BELOW_C: f64 = 20.0;

/// The condition shown next to the current readings.
///
/// This is a display heuristic, not an observation: the station has no sky or
/// precipitation-type sensor, so the label is inferred from rainfall first and
/// temperature second.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum WeatherCondition {
    /// No rain, temperature between 20 °C and 30 °C inclusive.
    Clear,
    /// Any measurable rainfall.
    Rainy,
    /// No rain, above 30 °C.
    Sunny,
    /// No rain, below 20 °C.
    Cold,
}

impl WeatherCondition {
    /// Classifies a reading.
    ///
    /// Rain takes precedence over temperature.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use edgelink::WeatherCondition;
    ///
    /// assert_eq!(WeatherCondition::classify(32.0, 0.2), WeatherCondition::Rainy);
    /// assert_eq!(WeatherCondition::classify(32.0, 0.0), WeatherCondition::Sunny);
    /// assert_eq!(WeatherCondition::classify(12.0, 0.0), WeatherCondition::Cold);
    /// assert_eq!(WeatherCondition::classify(25.0, 0.0), WeatherCondition::Clear);
    /// ```
    pub fn classify(temperature_c: f64, rainfall_mm: f64) -> Self {
        if rainfall_mm > 0.0 {
            WeatherCondition::Rainy
        } else if temperature_c > SUNNY_ABOVE_C {
            WeatherCondition::Sunny
        } else if temperature_c < COLD_BELOW_C {
            WeatherCondition::Cold
        } else {
            WeatherCondition::Clear
        }
    }

    /// Symbolic icon selector for the presentation layer.
    pub fn icon(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "partly-sunny",
            WeatherCondition::Rainy => "rain",
            WeatherCondition::Sunny => "sun",
            WeatherCondition::Cold => "snowflake",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Rainy => "Rainy",
            WeatherCondition::Sunny => "Sunny",
            WeatherCondition::Cold => "Cold",
        };
        f.write_str(text)
    }
}
