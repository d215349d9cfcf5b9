//! Single-task scheduler for a dashboard.
//!
//! Timers, the in-flight fetch and user commands are all multiplexed in one
//! `select!`, so every state change happens on the same task and in order.

use crate::controller::polling::{PollingController, ViewChange};
use crate::error::DashboardError;
use crate::feed::{FeedError, FeedTransport};
use crate::persistence::SnapshotStore;
use crate::presentation::Presentation;
use crate::types::quantity::{Quantity, ViewWindow};
use crate::types::raw_sample::FeedRecord;
use chrono::{Local, Utc};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

const CLOCK_PERIOD: Duration = Duration::from_secs(1);
const FRESHNESS_PERIOD: Duration = Duration::from_secs(1);
const COMMAND_BUFFER: usize = 32;

/// User actions delivered to a running dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    /// Fetch now, unless a fetch is already running.
    RefreshNow,
    SwitchQuantity(Quantity),
    SetView(ViewWindow),
    SetPollInterval(Duration),
    SetNotifications(bool),
    ResetSettings,
    Shutdown,
}

/// Cloneable sender side of a dashboard's command channel.
#[derive(Debug, Clone)]
pub struct DashboardHandle {
    commands: mpsc::Sender<DashboardCommand>,
}

impl DashboardHandle {
    /// Creates a handle and the receiver to pass to [`run_event_loop`].
    pub fn channel() -> (Self, mpsc::Receiver<DashboardCommand>) {
        let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
        (DashboardHandle { commands }, receiver)
    }

    pub async fn send(&self, command: DashboardCommand) -> Result<(), DashboardError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| DashboardError::Stopped)
    }

    pub async fn refresh(&self) -> Result<(), DashboardError> {
        self.send(DashboardCommand::RefreshNow).await
    }

    pub async fn switch_quantity(&self, quantity: Quantity) -> Result<(), DashboardError> {
        self.send(DashboardCommand::SwitchQuantity(quantity)).await
    }

    pub async fn set_view(&self, view: ViewWindow) -> Result<(), DashboardError> {
        self.send(DashboardCommand::SetView(view)).await
    }

    pub async fn set_poll_interval(&self, interval: Duration) -> Result<(), DashboardError> {
        self.send(DashboardCommand::SetPollInterval(interval)).await
    }

    pub async fn set_notifications(&self, enabled: bool) -> Result<(), DashboardError> {
        self.send(DashboardCommand::SetNotifications(enabled)).await
    }

    pub async fn reset_settings(&self) -> Result<(), DashboardError> {
        self.send(DashboardCommand::ResetSettings).await
    }

    pub async fn shutdown(&self) -> Result<(), DashboardError> {
        self.send(DashboardCommand::Shutdown).await
    }
}

type FetchFuture = BoxFuture<'static, Result<Vec<FeedRecord>, FeedError>>;

/// Fires immediately, then every `period`.
fn poll_timer(period: Duration) -> Interval {
    let mut timer = time::interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    timer
}

/// First fires one `period` from now.
fn rescheduled_poll_timer(period: Duration) -> Interval {
    let mut timer = time::interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    timer
}

fn start_fetch<T, S, P>(
    controller: &mut PollingController<S, P>,
    transport: &Arc<T>,
    in_flight: &mut Option<FetchFuture>,
) where
    T: FeedTransport,
    S: SnapshotStore,
    P: Presentation,
{
    let Some(results) = controller.begin_fetch() else {
        return;
    };
    let deadline = controller.fetch_deadline();
    debug!("Fetching {} feed entries (deadline {:?})", results, deadline);
    let transport = Arc::clone(transport);
    *in_flight = Some(
        async move {
            match time::timeout(deadline, transport.fetch_feeds(results)).await {
                Ok(result) => result,
                Err(_) => Err(FeedError::Timeout(deadline)),
            }
        }
        .boxed(),
    );
}

/// Runs the dashboard until [`DashboardCommand::Shutdown`] arrives or every
/// handle is dropped, then hands the controller back.
///
/// Restores cached state first, then fetches immediately and on every tick
/// of the poll interval. A tick that arrives while a fetch is still running
/// is skipped, and a fetch still running after one poll interval fails; the
/// failure path never retries on its own.
pub async fn run_event_loop<T, S, P>(
    mut controller: PollingController<S, P>,
    transport: Arc<T>,
    mut commands: mpsc::Receiver<DashboardCommand>,
) -> PollingController<S, P>
where
    T: FeedTransport,
    S: SnapshotStore,
    P: Presentation,
{
    controller.restore().await;

    let mut poll = poll_timer(controller.context().poll_interval());
    let mut clock = time::interval(CLOCK_PERIOD);
    let mut freshness = time::interval(FRESHNESS_PERIOD);
    clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
    freshness.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut in_flight: Option<FetchFuture> = None;

    loop {
        tokio::select! {
            _ = poll.tick() => {
                start_fetch(&mut controller, &transport, &mut in_flight);
            }
            Some(result) = async {
                match in_flight.as_mut() {
                    Some(fetch) => Some(fetch.await),
                    None => None,
                }
            }, if in_flight.is_some() => {
                in_flight = None;
                let outcome = controller.complete_fetch(result).await;
                debug!("Fetch cycle finished: {:?}", outcome);
            }
            _ = clock.tick() => {
                controller.tick_clock(Local::now());
            }
            _ = freshness.tick() => {
                controller.tick_freshness(Utc::now());
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    info!("All dashboard handles dropped, stopping");
                    break;
                };
                match command {
                    DashboardCommand::Shutdown => {
                        info!("Dashboard shutting down");
                        break;
                    }
                    DashboardCommand::RefreshNow => {
                        start_fetch(&mut controller, &transport, &mut in_flight);
                    }
                    DashboardCommand::SwitchQuantity(quantity) => {
                        controller.switch_quantity(quantity);
                    }
                    DashboardCommand::SetView(view) => {
                        if controller.set_view(view) == ViewChange::FetchRequired {
                            start_fetch(&mut controller, &transport, &mut in_flight);
                        }
                    }
                    DashboardCommand::SetPollInterval(interval) => {
                        controller.set_poll_interval(interval).await;
                        poll = rescheduled_poll_timer(controller.context().poll_interval());
                    }
                    DashboardCommand::SetNotifications(enabled) => {
                        controller.set_notifications(enabled).await;
                    }
                    DashboardCommand::ResetSettings => {
                        let before = controller.context().poll_interval();
                        controller.reset_settings().await;
                        let after = controller.context().poll_interval();
                        if after != before {
                            poll = rescheduled_poll_timer(after);
                        }
                    }
                }
            }
        }
    }

    controller
}
