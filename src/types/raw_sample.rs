//! Telemetry records as received from the channel feed, and the parsed
//! [`RawSample`] the rest of the pipeline works with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One feed entry exactly as the channel endpoint returns it.
///
/// Field values arrive as JSON strings (`"21.4"`), occasionally as numbers,
/// and as `null` when the device did not report them. They are kept verbatim
/// so the last-good snapshot can be written back in the same shape.
///
/// Channel field layout: `field1` temperature (°C), `field2` relative
/// humidity (%), `field3` pressure (hPa), `field4` unused, `field5`
/// rainfall (mm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedRecord {
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<u64>,
    #[serde(default)]
    pub field1: Option<Value>,
    #[serde(default)]
    pub field2: Option<Value>,
    #[serde(default)]
    pub field3: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field4: Option<Value>,
    #[serde(default)]
    pub field5: Option<Value>,
}

/// Body of a `feeds.json` response. Channel metadata is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub feeds: Vec<FeedRecord>,
}

/// A single parsed telemetry reading.
///
/// Every measured quantity is `None` when the source left it out or sent
/// something that is not a finite number. That `None` is the "invalid
/// sample" marker; see [`crate::MissingValuePolicy`] for how consumers
/// turn it back into a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub timestamp: DateTime<Utc>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub rainfall: Option<f64>,
}

impl RawSample {
    pub fn new(
        timestamp: DateTime<Utc>,
        temperature: Option<f64>,
        humidity: Option<f64>,
        pressure: Option<f64>,
        rainfall: Option<f64>,
    ) -> Self {
        Self {
            timestamp,
            temperature,
            humidity,
            pressure,
            rainfall,
        }
    }
}

impl From<&FeedRecord> for RawSample {
    fn from(record: &FeedRecord) -> Self {
        RawSample {
            timestamp: record.created_at,
            temperature: parse_field(record.field1.as_ref()),
            humidity: parse_field(record.field2.as_ref()),
            pressure: parse_field(record.field3.as_ref()),
            rainfall: parse_field(record.field5.as_ref()),
        }
    }
}

impl From<&RawSample> for FeedRecord {
    fn from(sample: &RawSample) -> Self {
        let to_value = |v: Option<f64>| v.map(|n| Value::String(n.to_string()));
        FeedRecord {
            created_at: sample.timestamp,
            entry_id: None,
            field1: to_value(sample.temperature),
            field2: to_value(sample.humidity),
            field3: to_value(sample.pressure),
            field4: None,
            field5: to_value(sample.rainfall),
        }
    }
}

/// Parses every record of a feed, preserving order.
pub fn parse_feeds(records: &[FeedRecord]) -> Vec<RawSample> {
    records.iter().map(RawSample::from).collect()
}

fn parse_field(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_thingspeak_body() -> Result<(), serde_json::Error> {
        let body = r#"{
            "channel": {"id": 3214903, "name": "EdgeLink"},
            "feeds": [
                {"created_at": "2025-01-10T08:00:15Z", "entry_id": 41,
                 "field1": "21.50", "field2": "48", "field3": "1013.2",
                 "field4": "0", "field5": "0.000"},
                {"created_at": "2025-01-10T08:00:30Z", "entry_id": 42,
                 "field1": "oops", "field2": null, "field3": 1013.4,
                 "field5": "0.25"}
            ]
        }"#;

        let response: FeedResponse = serde_json::from_str(body)?;
        let samples = parse_feeds(&response.feeds);

        assert_eq!(samples.len(), 2);
        assert_eq!(
            samples[0].timestamp,
            Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 15).unwrap()
        );
        assert_eq!(samples[0].temperature, Some(21.5));
        assert_eq!(samples[0].humidity, Some(48.0));
        assert_eq!(samples[0].pressure, Some(1013.2));
        assert_eq!(samples[0].rainfall, Some(0.0));

        assert_eq!(samples[1].temperature, None);
        assert_eq!(samples[1].humidity, None);
        assert_eq!(samples[1].pressure, Some(1013.4));
        assert_eq!(samples[1].rainfall, Some(0.25));
        Ok(())
    }

    #[test]
    fn test_missing_feeds_key_is_empty() -> Result<(), serde_json::Error> {
        let response: FeedResponse = serde_json::from_str(r#"{"channel": {}}"#)?;
        assert!(response.feeds.is_empty());
        Ok(())
    }

    #[test]
    fn test_non_finite_values_are_invalid() {
        assert_eq!(parse_field(Some(&Value::String("NaN".into()))), None);
        assert_eq!(parse_field(Some(&Value::String("inf".into()))), None);
        assert_eq!(parse_field(Some(&Value::String(" 7.5 ".into()))), Some(7.5));
        assert_eq!(parse_field(Some(&Value::Bool(true))), None);
        assert_eq!(parse_field(None), None);
    }

    #[test]
    fn test_sample_survives_record_conversion() {
        let sample = RawSample::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            Some(18.25),
            None,
            Some(1008.5),
            Some(0.0),
        );
        let record = FeedRecord::from(&sample);
        assert_eq!(RawSample::from(&record), sample);
    }
}
