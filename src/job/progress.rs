//! Cosmetic progress pacing.
//!
//! The simulator knows nothing about the render it accompanies: it counts from 0 to 100 on a
//! fixed cadence and stops emitting once it reaches the cap.

use crate::config::GeneratorConfig;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

/// Upper bound of the progress scale.
pub const PROGRESS_MAX: u8 = 100;

/// Emits a monotonically increasing progress value on a fixed wall-clock cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressSimulator {
    interval: Duration,
    step: u8,
}

impl Default for ProgressSimulator {
    fn default() -> Self {
        Self::new(Duration::from_millis(50), 1)
    }
}

impl ProgressSimulator {
    /// Simulator adding `step` every `interval`. A zero step is treated as 1.
    pub fn new(interval: Duration, step: u8) -> Self {
        Self {
            interval,
            step: step.max(1),
        }
    }

    /// Simulator using the configured cadence and step.
    pub fn from_config(cfg: &GeneratorConfig) -> Self {
        Self::new(cfg.tick_interval(), cfg.progress_step)
    }

    /// Tick period.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start ticking on the given runtime.
    ///
    /// Progress begins at 0; the first callback fires one interval later with `step`. The value
    /// is capped at [`PROGRESS_MAX`], after which no further callbacks fire.
    pub fn start<F>(&self, runtime: &tokio::runtime::Handle, mut on_tick: F) -> ProgressHandle
    where
        F: FnMut(u8) + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let period = self.interval;
        let step = self.step;

        let task = runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut progress = 0u8;

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        progress = progress.saturating_add(step).min(PROGRESS_MAX);
                        on_tick(progress);
                        if progress >= PROGRESS_MAX {
                            break;
                        }
                    }
                }
            }
        });

        ProgressHandle { cancel, task }
    }
}

/// Handle to a running simulator. Dropping it stops the simulator.
#[derive(Debug)]
pub struct ProgressHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ProgressHandle {
    /// Stop emitting. Safe to call any number of times, including after the cap was reached.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// `true` once `stop` was called or the simulator reached the cap.
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled() || self.task.is_finished()
    }
}

impl Drop for ProgressHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/progress.rs"]
mod tests;
