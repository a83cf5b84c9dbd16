//! The two core scalars and the ambient progression clock.
//!
//! [`Progress`] is the only place sky progress and growth level are stored.
//! Every write goes through a clamping method, so neither can leave `[0, 1]`
//! and growth can only move up.

use std::time::Duration;

use crate::constants::{CLOCK_PERIOD, GROWTH_PER_TICK, SKY_PER_TICK};
use crate::interpolate::unit;

// ════════════════════════════════════════════════════════════════════════════
// Progress
// ════════════════════════════════════════════════════════════════════════════

/// Sky progress (0 storm, 0.5 night, 1 clear) and growth level (0 stone,
/// 1 full bloom).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Progress {
    sky:    f32,
    growth: f32,
}

impl Progress {
    pub fn new(sky: f32, growth: f32) -> Self {
        Progress { sky: unit(sky), growth: unit(growth) }
    }

    pub fn sky(&self)    -> f32 { self.sky }
    pub fn growth(&self) -> f32 { self.growth }

    /// Move sky progress either way, clamped.
    pub fn nudge_sky(&mut self, delta: f32) {
        self.sky = unit(self.sky + delta);
    }

    /// Add growth.  Negative amounts are ignored.
    pub fn grow(&mut self, amount: f32) {
        if amount > 0.0 {
            self.growth = unit(self.growth + amount);
        }
    }

    /// One ambient tick: both scalars advance toward 1.0.
    pub fn tick(&mut self) {
        self.nudge_sky(SKY_PER_TICK);
        self.grow(GROWTH_PER_TICK);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ProgressionClock
// ════════════════════════════════════════════════════════════════════════════

/// Fixed-period tick source fed with frame deltas.
///
/// Partial periods are carried to the next call, so the tick count over a
/// run depends only on total elapsed time.
#[derive(Debug)]
pub struct ProgressionClock {
    period:  Duration,
    carry:   Duration,
    running: bool,
}

impl Default for ProgressionClock {
    fn default() -> Self { Self::new(CLOCK_PERIOD) }
}

impl ProgressionClock {
    pub fn new(period: Duration) -> Self {
        ProgressionClock {
            period: period.max(Duration::from_millis(1)),
            carry:  Duration::ZERO,
            running: true,
        }
    }

    /// Number of whole periods elapsed, including the carried remainder.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if !self.running { return 0; }
        let carry = self.carry.saturating_add(dt).as_nanos();
        let period = self.period.as_nanos();
        self.carry = Duration::from_nanos((carry % period) as u64);
        u32::try_from(carry / period).unwrap_or(u32::MAX)
    }

    /// Advance and apply the resulting ticks to `progress`.
    pub fn drive(&mut self, dt: Duration, progress: &mut Progress) -> u32 {
        let ticks = self.advance(dt);
        for _ in 0..ticks {
            if progress.sky() >= 1.0 && progress.growth() >= 1.0 { break; }
            progress.tick();
        }
        ticks
    }

    /// Cancel the clock.  A stopped clock never ticks again.
    pub fn stop(&mut self) {
        self.running = false;
        self.carry = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool { self.running }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
