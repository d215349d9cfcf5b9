pub mod metric_snapshot;
pub mod quantity;
pub mod raw_sample;
pub mod weather_condition;
