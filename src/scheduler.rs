//! Tick Scheduler
//!
//! Turns the fixed 10 ms hardware timer pulse into countdown decrements and
//! coarse one-shot flags. The scheduler never interprets a countdown; the
//! component that arms one is also the one that consumes its trigger.

pub mod countdown;

pub use countdown::{CountdownId, Countdowns, Gate, TickContext};

use crate::config::{HALF_SECOND_TICKS, TAIL_SAMPLE_TICKS};

/// Tick scheduler state
#[derive(Clone, Debug)]
pub struct Scheduler {
    /// Ticks since boot
    ticks: u32,
    /// Countdown registry
    countdowns: Countdowns,
    /// Set every tick, consumed by the main loop
    timeslice: bool,
    /// Set every 50 ticks
    half_second: bool,
    /// Set every 4 ticks, consumed by the tail-tone detector
    tail_sample: bool,
}

impl Scheduler {
    /// Create a scheduler with every countdown stopped
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ticks: 0,
            countdowns: Countdowns::new(),
            timeslice: false,
            half_second: false,
            tail_sample: false,
        }
    }

    /// Advance one 10 ms tick.
    ///
    /// Runs to completion without blocking; call once per timer pulse and
    /// never re-enter it.
    pub fn tick(&mut self, ctx: &TickContext) {
        self.ticks = self.ticks.wrapping_add(1);
        self.timeslice = true;

        if self.ticks % HALF_SECOND_TICKS == 0 {
            self.half_second = true;
        }

        if self.ticks % TAIL_SAMPLE_TICKS == 0 {
            self.tail_sample = true;
        }

        self.countdowns.tick_all(ctx);
    }

    /// Ticks since boot
    #[must_use]
    pub const fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Take the per-tick flag
    pub fn take_timeslice(&mut self) -> bool {
        core::mem::take(&mut self.timeslice)
    }

    /// Take the 500 ms flag
    pub fn take_half_second(&mut self) -> bool {
        core::mem::take(&mut self.half_second)
    }

    /// Take the 40 ms tail-sampling flag
    pub fn take_tail_sample(&mut self) -> bool {
        core::mem::take(&mut self.tail_sample)
    }

    /// Countdown registry
    #[must_use]
    pub const fn countdowns(&self) -> &Countdowns {
        &self.countdowns
    }

    /// Countdown registry (mutable)
    pub fn countdowns_mut(&mut self) -> &mut Countdowns {
        &mut self.countdowns
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
