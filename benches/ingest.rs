use chrono::{TimeDelta, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use edgelink::{
    parse_feeds, FeedRecord, MetricSnapshot, MissingValuePolicy, TelemetryStore, Windowing,
};
use serde_json::Value;

fn records(n: usize) -> Vec<FeedRecord> {
    let start = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| FeedRecord {
            created_at: start + TimeDelta::seconds(15 * i as i64),
            entry_id: Some(i as u64),
            field1: Some(Value::String(format!("{:.1}", 20.0 + (i % 10) as f64 * 0.3))),
            field2: Some(Value::String(format!("{:.1}", 60.0 + (i % 7) as f64))),
            field3: Some(Value::String(format!("{:.2}", 1010.0 - (i % 13) as f64 * 0.1))),
            field4: None,
            field5: Some(Value::String("0.0".to_string())),
        })
        .collect()
}

fn bench_ingest(c: &mut Criterion) {
    let feed = records(100);
    let windowing = Windowing {
        display: 20,
        analysis: 100,
    };

    c.bench_function("parse_feeds", |b| b.iter(|| parse_feeds(black_box(&feed))));
    c.bench_function("ingest_and_snapshot", |b| {
        b.iter(|| {
            let mut store = TelemetryStore::new();
            store.ingest(parse_feeds(black_box(&feed)), windowing);
            MetricSnapshot::compute(&store, MissingValuePolicy::Zero)
        })
    });
}

criterion_group!(benches, bench_ingest);
criterion_main!(benches);
