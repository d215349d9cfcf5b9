pub mod event_loop;
pub mod polling;

pub use event_loop::{run_event_loop, DashboardCommand, DashboardHandle};
pub use polling::{CycleOutcome, DashboardContext, PollState, PollingController, ViewChange};
