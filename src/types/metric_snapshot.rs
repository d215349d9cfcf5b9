//! The scalar view of the latest reading plus everything derived from it.

use crate::analysis::calculator::{dew_point, heat_index, rain_gauge_percent};
use crate::analysis::forecast::{forecast, Forecast};
use crate::analysis::trend::{pressure_trend, Trend};
use crate::config::MissingValuePolicy;
use crate::store::TelemetryStore;
use crate::types::weather_condition::WeatherCondition;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSnapshot {
    /// When the sensor recorded the latest sample.
    pub observed_at: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub rainfall: f64,
    /// `None` when the humidity reading is outside (0, 100].
    pub heat_index_c: Option<f64>,
    /// `None` when the humidity reading is outside (0, 100].
    pub dew_point_c: Option<f64>,
    pub weather_condition: WeatherCondition,
    /// `None` until the analysis window holds enough pressure samples.
    pub pressure_trend: Option<Trend>,
    /// `None` until the analysis window holds enough pressure samples.
    pub forecast: Option<Forecast>,
    pub rain_gauge_percent: f64,
    pub is_raining: bool,
}

impl MetricSnapshot {
    /// Computes the snapshot for the newest sample held by `store`, or
    /// `None` if the store is empty.
    ///
    /// Missing scalar readings count as zero. Trend and forecast are computed
    /// over the whole analysis window.
    pub fn compute(store: &TelemetryStore, policy: MissingValuePolicy) -> Option<Self> {
        let latest = store.latest()?;

        let temperature = latest.temperature.unwrap_or(0.0);
        let humidity = latest.humidity.unwrap_or(0.0);
        let pressure = latest.pressure.unwrap_or(0.0);
        let rainfall = latest.rainfall.unwrap_or(0.0);

        let humidity_valid = humidity > 0.0 && humidity <= 100.0;
        let pressure_series = store.analysis_pressure(policy);

        Some(MetricSnapshot {
            observed_at: latest.timestamp,
            temperature,
            humidity,
            pressure,
            rainfall,
            heat_index_c: humidity_valid.then(|| heat_index(temperature, humidity)),
            dew_point_c: humidity_valid.then(|| dew_point(temperature, humidity)),
            weather_condition: WeatherCondition::classify(temperature, rainfall),
            pressure_trend: pressure_trend(&pressure_series),
            forecast: forecast(&pressure_series),
            rain_gauge_percent: rain_gauge_percent(rainfall),
            is_raining: rainfall > 0.0,
        })
    }
}
