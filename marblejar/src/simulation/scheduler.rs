//! Tick sources that drive a [`Simulation`].
//!
//! The engine never decides its own cadence: `Simulation::run` asks a
//! scheduler for the next tick and steps once per answer. Tests use the
//! counting schedulers; the CLI uses `FrameClock` for real-time pacing.

use std::thread;
use std::time::{Duration, Instant};

use super::engine::Simulation;

pub trait Scheduler {
    /// Wait until the next tick is due. Returning false ends the run.
    fn next_tick(&mut self, sim: &Simulation) -> bool;
}

/// Hands out a fixed number of ticks, as fast as asked.
#[derive(Debug, Clone)]
pub struct StepBudget {
    remaining: u64,
}

impl StepBudget {
    pub fn new(steps: u64) -> Self {
        Self { remaining: steps }
    }
}

impl Scheduler for StepBudget {
    fn next_tick(&mut self, _sim: &Simulation) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Ticks until every body has settled, capped at `max_steps`.
#[derive(Debug, Clone)]
pub struct UntilSettled {
    budget: StepBudget,
}

impl UntilSettled {
    pub fn new(max_steps: u64) -> Self {
        Self {
            budget: StepBudget::new(max_steps),
        }
    }
}

impl Scheduler for UntilSettled {
    fn next_tick(&mut self, sim: &Simulation) -> bool {
        !sim.all_settled() && self.budget.next_tick(sim)
    }
}

/// Real-time pacing at a fixed frame rate, optionally wrapping another
/// scheduler that decides when to stop.
#[derive(Debug, Clone)]
pub struct FrameClock<S> {
    interval: Duration,
    next: Option<Instant>,
    inner: S,
}

impl<S: Scheduler> FrameClock<S> {
    pub fn new(frame_rate: f64, inner: S) -> Self {
        let interval = if frame_rate > 0.0 {
            Duration::from_secs_f64(1.0 / frame_rate)
        } else {
            Duration::ZERO
        };
        Self {
            interval,
            next: None,
            inner,
        }
    }
}

impl<S: Scheduler> Scheduler for FrameClock<S> {
    fn next_tick(&mut self, sim: &Simulation) -> bool {
        if !self.inner.next_tick(sim) {
            return false;
        }

        let now = Instant::now();
        let due = self.next.unwrap_or(now);
        if due > now {
            thread::sleep(due - now);
        }
        // late frames are not made up for
        self.next = Some(due.max(now) + self.interval);
        true
    }
}
