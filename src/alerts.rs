//! Rain and heat alerts with simple hysteresis, so each event is announced
//! once rather than on every poll.

use crate::presentation::Notice;
use crate::types::metric_snapshot::MetricSnapshot;

const HEAT_ALERT_ABOVE_C: f64 = 35.0;
const HEAT_REARM_BELOW_C: f64 = 30.0;

#[derive(Debug, Clone, Default)]
pub struct AlertMonitor {
    rain_shown: bool,
    heat_shown: bool,
}

impl AlertMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices raised by this reading, in rain, heat order.
    pub fn check(&mut self, snapshot: &MetricSnapshot) -> Vec<Notice> {
        let mut notices = Vec::new();

        if snapshot.rainfall > 0.0 {
            if !self.rain_shown {
                notices.push(Notice::info("Rain detected! Take an umbrella."));
                self.rain_shown = true;
            }
        } else {
            self.rain_shown = false;
        }

        let temp = snapshot.temperature;
        if temp > HEAT_ALERT_ABOVE_C && !self.heat_shown {
            notices.push(Notice::warning(format!(
                "High temperature warning: {temp:.1}°C"
            )));
            self.heat_shown = true;
        } else if temp < HEAT_REARM_BELOW_C {
            self.heat_shown = false;
        }

        notices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::NoticeLevel;
    use crate::types::weather_condition::WeatherCondition;
    use chrono::Utc;

    fn snapshot(temperature: f64, rainfall: f64) -> MetricSnapshot {
        MetricSnapshot {
            observed_at: Utc::now(),
            temperature,
            humidity: 40.0,
            pressure: 1010.0,
            rainfall,
            heat_index_c: None,
            dew_point_c: None,
            weather_condition: WeatherCondition::classify(temperature, rainfall),
            pressure_trend: None,
            forecast: None,
            rain_gauge_percent: 0.0,
            is_raining: rainfall > 0.0,
        }
    }

    #[test]
    fn test_rain_alert_once_per_shower() {
        let mut monitor = AlertMonitor::new();
        assert_eq!(monitor.check(&snapshot(22.0, 0.4)).len(), 1);
        assert!(monitor.check(&snapshot(22.0, 1.2)).is_empty());
        assert!(monitor.check(&snapshot(22.0, 0.0)).is_empty());
        assert_eq!(
            monitor.check(&snapshot(22.0, 0.1)),
            vec![Notice::info("Rain detected! Take an umbrella.")]
        );
    }

    #[test]
    fn test_heat_alert_rearms_below_thirty() {
        let mut monitor = AlertMonitor::new();

        let first = monitor.check(&snapshot(36.2, 0.0));
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].level, NoticeLevel::Warning);
        assert_eq!(first[0].message, "High temperature warning: 36.2°C");

        // Still hot, then cooling but not enough to re-arm.
        assert!(monitor.check(&snapshot(37.0, 0.0)).is_empty());
        assert!(monitor.check(&snapshot(31.0, 0.0)).is_empty());
        assert!(monitor.check(&snapshot(36.0, 0.0)).is_empty());

        assert!(monitor.check(&snapshot(29.5, 0.0)).is_empty());
        assert_eq!(monitor.check(&snapshot(35.5, 0.0)).len(), 1);
    }
}
