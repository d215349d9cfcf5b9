//! Polls a public channel and prints what a dashboard would show.
//!
//! Usage: `cargo run --example live_channel -- <channel id> [read key]`
//! Set RUST_LOG=info (or debug) to see the fetch cycle.

use edgelink::{
    ChartKind, ChartSurface, ConnectionStatus, Dashboard, DashboardConfig, DashboardError,
    DataOrigin, FreshnessReading, MetricSnapshot, Notice, Presentation, Quantity, Redraw,
    SummaryStats,
};
use std::env;
use std::time::Duration;

struct Console;

impl ChartSurface for Console {
    fn render(&mut self, chart: ChartKind, labels: &[String], values: &[Option<f64>], _: Redraw) {
        if let ChartKind::History(quantity) = chart {
            let last = labels.last().zip(values.last().copied().flatten());
            if let Some((label, value)) = last {
                println!(
                    "[chart] {} points, last {} {:.1}{}",
                    values.len(),
                    label,
                    value,
                    quantity.unit()
                );
            }
        }
    }
}

impl Presentation for Console {
    fn connection_changed(&mut self, status: ConnectionStatus) {
        println!("[status] {}", status);
    }

    fn snapshot_updated(&mut self, snapshot: &MetricSnapshot, origin: DataOrigin) {
        let tag = match origin {
            DataOrigin::Live => "live",
            DataOrigin::Cached => "cached",
        };
        println!(
            "[{}] {:.1}°C {:.0}% {:.1} hPa {:.1} mm, {}",
            tag,
            snapshot.temperature,
            snapshot.humidity,
            snapshot.pressure,
            snapshot.rainfall,
            snapshot.weather_condition
        );
        if let Some(trend) = snapshot.pressure_trend {
            println!("        pressure {} ({:+.2} hPa)", trend.direction, trend.diff);
        }
        if let Some(forecast) = &snapshot.forecast {
            println!("        {}: {}", forecast.outlook, forecast.detail);
        }
    }

    fn summary_updated(&mut self, quantity: Quantity, summary: Option<&SummaryStats>) {
        if let Some(s) = summary {
            println!(
                "[{}] min {:.1} max {:.1} avg {:.1}",
                quantity.label(),
                s.min,
                s.max,
                s.mean
            );
        }
    }

    fn freshness_updated(&mut self, reading: &FreshnessReading) {
        // Once a minute is plenty for a terminal.
        if let Some(remaining) = reading.remaining {
            if remaining.num_seconds() % 60 == 0 {
                if let Some(countdown) = reading.countdown() {
                    println!("[freshness] {} ({})", reading.state, countdown);
                }
            }
        }
    }

    fn notify(&mut self, notice: &Notice) {
        println!("[notice] {}", notice.message);
    }
}

#[tokio::main]
async fn main() -> Result<(), DashboardError> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let channel_id = args.next().unwrap_or_else(|| "3214903".to_string());
    let read_key = args.next();

    let config = DashboardConfig::builder()
        .channel_id(channel_id)
        .maybe_read_api_key(read_key)
        .request_timeout(Duration::from_secs(10))
        .build();

    let dashboard = Dashboard::new(config).await?;
    let running = dashboard.start(Console);

    let handle = running.handle();
    tokio::time::sleep(Duration::from_secs(5)).await;
    handle.switch_quantity(Quantity::Pressure).await?;

    println!("Press Ctrl-C to stop");
    let _ = tokio::signal::ctrl_c().await;

    let controller = running.stop().await?;
    println!(
        "Stopped after {} live updates",
        controller.context().update_count()
    );
    Ok(())
}
