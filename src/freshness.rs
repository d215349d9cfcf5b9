//! Countdown until the newest observed sample is too old to trust.

use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;

/// Remaining time above which data is fresh.
const WARNING_WITHIN: TimeDelta = TimeDelta::minutes(15);
/// Remaining time at or below which the countdown turns critical.
const CRITICAL_WITHIN: TimeDelta = TimeDelta::minutes(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// No sample has been recorded yet.
    Unknown,
    /// More than 15 minutes left.
    Fresh,
    /// Between 5 (exclusive) and 15 (inclusive) minutes left.
    Warning,
    /// At most 5 minutes left.
    Critical,
    /// The threshold has been reached.
    Stale,
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Freshness::Unknown => "unknown",
            Freshness::Fresh => "fresh",
            Freshness::Warning => "warning",
            Freshness::Critical => "critical",
            Freshness::Stale => "stale",
        };
        f.write_str(text)
    }
}

/// Result of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessReading {
    pub state: Freshness,
    /// Time left before the data goes stale; negative once it is. `None`
    /// while no sample has been recorded.
    pub remaining: Option<TimeDelta>,
}

impl FreshnessReading {
    /// Countdown text, `MM:SS`, clamped at `00:00`.
    pub fn countdown(&self) -> Option<String> {
        let remaining = self.remaining?.max(TimeDelta::zero());
        let secs = remaining.num_seconds();
        Some(format!("{:02}:{:02}", secs / 60, secs % 60))
    }
}

/// Tracks the timestamp of the newest observed sample.
///
/// The state is a pure function of `now` and that anchor, so it moves back
/// to [`Freshness::Fresh`] as soon as a newer sample is recorded.
#[derive(Debug, Clone)]
pub struct FreshnessTracker {
    last_sample: Option<DateTime<Utc>>,
    threshold: TimeDelta,
}

impl FreshnessTracker {
    pub fn new(threshold: TimeDelta) -> Self {
        Self {
            last_sample: None,
            threshold,
        }
    }

    /// Re-anchors the countdown on the given sample time.
    pub fn record(&mut self, sample_time: DateTime<Utc>) {
        self.last_sample = Some(sample_time);
    }

    pub fn last_sample(&self) -> Option<DateTime<Utc>> {
        self.last_sample
    }

    pub fn threshold(&self) -> TimeDelta {
        self.threshold
    }

    pub fn evaluate(&self, now: DateTime<Utc>) -> FreshnessReading {
        let Some(last) = self.last_sample else {
            return FreshnessReading {
                state: Freshness::Unknown,
                remaining: None,
            };
        };

        let remaining = self.threshold - (now - last);
        let state = if remaining <= TimeDelta::zero() {
            Freshness::Stale
        } else if remaining <= CRITICAL_WITHIN {
            Freshness::Critical
        } else if remaining <= WARNING_WITHIN {
            Freshness::Warning
        } else {
            Freshness::Fresh
        };

        FreshnessReading {
            state,
            remaining: Some(remaining),
        }
    }
}
