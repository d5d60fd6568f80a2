//! Simulation time model.
//!
//! # Design
//!
//! Time advances in discrete `Step`s of fixed length (`step_duration_ms`).
//! Within a step every vehicle receives its own [`TimeLapse`]: a budget of
//! simulated milliseconds it may spend moving or servicing parcels.
//!
//!   step_start_ms = step * step_duration_ms
//!
//! Integer milliseconds keep budget arithmetic exact; only movement converts
//! to and from metres via the vehicle's speed.

use std::fmt;

use crate::error::{CoreError, CoreResult};

// ── Step ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step(pub u64);

impl Step {
    pub const ZERO: Step = Step(0);

    /// Return the step `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Step {
        Step(self.0 + n)
    }
}

impl std::ops::Add<u64> for Step {
    type Output = Step;
    #[inline]
    fn add(self, rhs: u64) -> Step {
        Step(self.0 + rhs)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

// ── TimeLapse ─────────────────────────────────────────────────────────────────

/// The time budget granted to one vehicle for one step.
///
/// Consumption is monotone: `consumed` only grows and never exceeds the
/// lapse length, so a lapse that reports no time left stays that way.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimeLapse {
    start_ms: u64,
    end_ms:   u64,
    consumed: u64,
}

impl TimeLapse {
    /// A lapse covering `[start_ms, end_ms)`.  `end_ms < start_ms` yields an
    /// empty lapse.
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        Self { start_ms, end_ms: end_ms.max(start_ms), consumed: 0 }
    }

    /// An empty lapse at `at_ms`: every consumer treats it as exhausted.
    pub fn empty(at_ms: u64) -> Self {
        Self::new(at_ms, at_ms)
    }

    #[inline]
    pub fn start_ms(&self) -> u64 {
        self.start_ms
    }

    #[inline]
    pub fn end_ms(&self) -> u64 {
        self.end_ms
    }

    /// Total length of the lapse in ms.
    #[inline]
    pub fn len_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    /// Simulated time at which the next action would begin.
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.start_ms + self.consumed
    }

    #[inline]
    pub fn consumed_ms(&self) -> u64 {
        self.consumed
    }

    #[inline]
    pub fn time_left_ms(&self) -> u64 {
        self.len_ms() - self.consumed
    }

    #[inline]
    pub fn has_time_left(&self) -> bool {
        self.time_left_ms() > 0
    }

    /// Consume up to `ms` of the remaining budget.
    ///
    /// Returns the part of `ms` that did not fit (0 when it fit entirely).
    pub fn consume(&mut self, ms: u64) -> u64 {
        let used = ms.min(self.time_left_ms());
        self.consumed += used;
        ms - used
    }

    /// Spend whatever is left.
    pub fn consume_all(&mut self) {
        self.consumed = self.len_ms();
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current step and hands out per-vehicle time lapses.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated milliseconds per step.
    pub step_duration_ms: u64,
    /// The current step, advanced by [`SimClock::advance`].
    pub current_step: Step,
}

impl SimClock {
    pub fn new(step_duration_ms: u64) -> Self {
        Self { step_duration_ms, current_step: Step::ZERO }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_step = Step(self.current_step.0 + 1);
    }

    /// Simulated ms at the start of the current step.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.current_step.0 * self.step_duration_ms
    }

    /// A fresh, full budget for the current step.
    #[inline]
    pub fn lapse(&self) -> TimeLapse {
        let start = self.elapsed_ms();
        TimeLapse::new(start, start + self.step_duration_ms)
    }

    /// Break elapsed time into (hours, minutes, seconds) for log lines.
    pub fn elapsed_hms(&self) -> (u64, u32, u32) {
        let secs = self.elapsed_ms() / 1_000;
        let hours = secs / 3_600;
        let minutes = ((secs % 3_600) / 60) as u32;
        let seconds = (secs % 60) as u32;
        (hours, minutes, seconds)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m, s) = self.elapsed_hms();
        write!(f, "{} ({:02}:{:02}:{:02})", self.current_step, h, m, s)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the simulation builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Simulated milliseconds per step.  Default: 1000.
    pub step_duration_ms: u64,

    /// Total steps to simulate.
    pub total_steps: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Emit a vehicle snapshot every N steps.  0 disables snapshots.
    pub output_interval_steps: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            step_duration_ms:      1_000,
            total_steps:           3_600,
            seed:                  123,
            output_interval_steps: 60,
        }
    }
}

impl SimConfig {
    /// The step at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_step(&self) -> Step {
        Step(self.total_steps)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.step_duration_ms)
    }

    /// Reject configurations the step loop cannot run.
    pub fn validate(&self) -> CoreResult<()> {
        if self.step_duration_ms == 0 {
            return Err(CoreError::Config("step_duration_ms must be positive".into()));
        }
        Ok(())
    }
}
