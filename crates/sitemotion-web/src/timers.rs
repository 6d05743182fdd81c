//! Browser timer queue for scheduled reveals and re-scans

use gloo_timers::callback::Timeout;
use sitemotion_core::host::Scheduler;

/// Runs tasks through `setTimeout`.
///
/// Timers are detached once scheduled; cancellation is handled by the tasks
/// themselves through their reveal tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        Timeout::new(delay_ms, task).forget();
    }
}
