use std::time::Instant;

use crate::core::world::{StepReport, World};
use crate::error::PhysicsError;
use crate::Result;

/// Default cap on the elapsed time fed to a single step, in seconds
pub const DEFAULT_MAX_TIME_STEP: f64 = 0.1;

/// Source of elapsed time between ticks
pub trait Clock {
    /// Seconds since the previous call
    fn elapsed(&mut self) -> f64;
}

/// Wall-clock time; the first call reports zero
#[derive(Debug, Default)]
pub struct SystemClock {
    last: Option<Instant>,
}

impl SystemClock {
    /// Creates a clock that starts measuring on its first call
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn elapsed(&mut self) -> f64 {
        let now = Instant::now();
        let elapsed = match self.last {
            Some(last) => now.duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        self.last = Some(now);
        elapsed
    }
}

/// A clock that always reports the same interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn elapsed(&mut self) -> f64 {
        self.0
    }
}

/// Drives a [`World`] from a [`Clock`]
///
/// The host owns the stepper and calls [`Stepper::tick`] on whatever schedule
/// it likes. Each tick reads the clock, caps the interval at the maximum time
/// step and advances the world if it is running.
pub struct Stepper<C: Clock = SystemClock> {
    clock: C,
    max_time_step: Option<f64>,
    ticks: u64,
}

impl Stepper<SystemClock> {
    /// Creates a stepper on the wall clock with the default time-step cap
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for Stepper<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Stepper<C> {
    /// Creates a stepper on the given clock with the default time-step cap
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            max_time_step: Some(DEFAULT_MAX_TIME_STEP),
            ticks: 0,
        }
    }

    /// Sets the largest interval a single step may advance by; `None` removes the cap
    ///
    /// A cap must be positive and finite.
    pub fn with_max_time_step(mut self, max_time_step: Option<f64>) -> Result<Self> {
        if let Some(cap) = max_time_step {
            if !(cap.is_finite() && cap > 0.0) {
                return Err(PhysicsError::InvalidParameter(format!(
                    "maximum time step must be positive and finite, got {}",
                    cap
                )));
            }
        }
        self.max_time_step = max_time_step;
        Ok(self)
    }

    /// Returns the time-step cap
    pub fn max_time_step(&self) -> Option<f64> {
        self.max_time_step
    }

    /// Number of ticks that advanced the world
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Reads the clock and steps the world once
    ///
    /// Returns `Ok(None)` when the world is stopped. The clock is read either
    /// way, so the time spent stopped never turns into one huge step.
    pub fn tick(&mut self, world: &mut World) -> Result<Option<StepReport>> {
        let dt = self.next_time_step();
        if !world.is_running() {
            return Ok(None);
        }

        let report = world.step(dt)?;
        self.ticks += 1;
        Ok(Some(report))
    }

    /// Ticks `count` times, stopping early on error
    pub fn run(&mut self, world: &mut World, count: usize) -> Result<Vec<StepReport>> {
        let mut reports = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(report) = self.tick(world)? {
                reports.push(report);
            }
        }
        Ok(reports)
    }

    fn next_time_step(&mut self) -> f64 {
        let elapsed = self.clock.elapsed();
        let elapsed = if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 };

        match self.max_time_step {
            Some(cap) if elapsed > cap => {
                log::warn!("elapsed time {:.3}s exceeds the {:.3}s cap, clamping", elapsed, cap);
                cap
            }
            _ => elapsed,
        }
    }
}
