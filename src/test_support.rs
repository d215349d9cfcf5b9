//! Scripted transport and a recording presentation shared by unit tests.

use crate::feed::{FeedError, FeedTransport};
use crate::freshness::FreshnessReading;
use crate::presentation::{
    ChartKind, ChartSurface, ConnectionStatus, DataOrigin, Notice, Presentation, Redraw,
};
use crate::store::SummaryStats;
use crate::types::metric_snapshot::MetricSnapshot;
use crate::types::quantity::Quantity;
use crate::types::raw_sample::FeedRecord;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// `n` plausible records, 15 s apart, no rain, temperature below 22 °C.
pub(crate) fn feed_records(n: usize) -> Vec<FeedRecord> {
    let start = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    (0..n)
        .map(|i| FeedRecord {
            created_at: start + TimeDelta::seconds(15 * i as i64),
            entry_id: Some(i as u64 + 1),
            field1: Some(Value::String(format!("{:.1}", 18.0 + (i % 8) as f64 * 0.5))),
            field2: Some(Value::String(format!("{:.1}", 55.0 + (i % 5) as f64))),
            field3: Some(Value::String(format!(
                "{:.2}",
                1012.0 + (i % 6) as f64 * 0.25
            ))),
            field4: None,
            field5: Some(Value::String("0.0".to_string())),
        })
        .collect()
}

enum MockResponse {
    Records(Vec<FeedRecord>),
    Failure,
    Hang,
}

#[derive(Default)]
struct MockState {
    responses: VecDeque<MockResponse>,
    requested: Vec<usize>,
}

/// Answers fetches from a script. An exhausted script fails.
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_records(&self, records: Vec<FeedRecord>) {
        self.push(MockResponse::Records(records));
    }

    pub(crate) fn push_failure(&self) {
        self.push(MockResponse::Failure);
    }

    /// The next fetch never completes.
    pub(crate) fn push_hang(&self) {
        self.push(MockResponse::Hang);
    }

    fn push(&self, response: MockResponse) {
        self.state.lock().unwrap().responses.push_back(response);
    }

    pub(crate) fn calls(&self) -> usize {
        self.state.lock().unwrap().requested.len()
    }

    /// `results` argument of every fetch so far.
    pub(crate) fn requested(&self) -> Vec<usize> {
        self.state.lock().unwrap().requested.clone()
    }
}

impl FeedTransport for MockTransport {
    async fn fetch_feeds(&self, results: usize) -> Result<Vec<FeedRecord>, FeedError> {
        let response = {
            let mut state = self.state.lock().unwrap();
            state.requested.push(results);
            state.responses.pop_front()
        };
        match response {
            Some(MockResponse::Records(records)) => Ok(records),
            Some(MockResponse::Hang) => std::future::pending().await,
            Some(MockResponse::Failure) | None => {
                Err(FeedError::Unavailable("scripted failure".to_string()))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Recorded {
    Chart(ChartKind, usize, Redraw),
    Status(ConnectionStatus),
    Snapshot(MetricSnapshot, DataOrigin),
    Summary(Quantity, Option<SummaryStats>),
    Freshness(FreshnessReading),
    UpdateCount(u64),
    Notice(Notice),
    Clock(DateTime<Local>),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingPresentation {
    pub(crate) events: Vec<Recorded>,
}

impl RecordingPresentation {
    pub(crate) fn charts(&self) -> Vec<(ChartKind, usize, Redraw)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Recorded::Chart(kind, len, redraw) => Some((*kind, *len, *redraw)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn statuses(&self) -> Vec<ConnectionStatus> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Recorded::Status(status) => Some(*status),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn notices(&self) -> Vec<Notice> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Recorded::Notice(notice) => Some(notice.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn last_summary(&self) -> Option<(Quantity, Option<SummaryStats>)> {
        self.events.iter().rev().find_map(|e| match e {
            Recorded::Summary(quantity, summary) => Some((*quantity, *summary)),
            _ => None,
        })
    }

    pub(crate) fn last_snapshot(&self) -> Option<&MetricSnapshot> {
        self.events.iter().rev().find_map(|e| match e {
            Recorded::Snapshot(snapshot, _) => Some(snapshot),
            _ => None,
        })
    }

    pub(crate) fn snapshot_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Recorded::Snapshot(..)))
            .count()
    }

    pub(crate) fn count_of(&self, pred: impl Fn(&Recorded) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl ChartSurface for RecordingPresentation {
    fn render(
        &mut self,
        chart: ChartKind,
        labels: &[String],
        values: &[Option<f64>],
        redraw: Redraw,
    ) {
        assert_eq!(labels.len(), values.len(), "labels and values out of step");
        self.events.push(Recorded::Chart(chart, values.len(), redraw));
    }
}

impl Presentation for RecordingPresentation {
    fn connection_changed(&mut self, status: ConnectionStatus) {
        self.events.push(Recorded::Status(status));
    }

    fn snapshot_updated(&mut self, snapshot: &MetricSnapshot, origin: DataOrigin) {
        self.events
            .push(Recorded::Snapshot(snapshot.clone(), origin));
    }

    fn summary_updated(&mut self, quantity: Quantity, summary: Option<&SummaryStats>) {
        self.events
            .push(Recorded::Summary(quantity, summary.copied()));
    }

    fn freshness_updated(&mut self, reading: &FreshnessReading) {
        self.events.push(Recorded::Freshness(*reading));
    }

    fn update_count_changed(&mut self, count: u64) {
        self.events.push(Recorded::UpdateCount(count));
    }

    fn notify(&mut self, notice: &Notice) {
        self.events.push(Recorded::Notice(notice.clone()));
    }

    fn clock_tick(&mut self, now: DateTime<Local>) {
        self.events.push(Recorded::Clock(now));
    }
}
