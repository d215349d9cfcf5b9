pub mod calculator;
pub mod forecast;
pub mod trend;
