pub mod summary;
pub mod telemetry_store;

pub use summary::SummaryStats;
pub use telemetry_store::{DerivedSeries, TelemetryStore, Windowing};
