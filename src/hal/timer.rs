//! Timer Abstractions
//!
//! The 10 ms system tick that drives the scheduler, and a stopwatch for
//! checking that a main-loop pass fits inside one tick.

use embassy_time::{Duration, Instant, Ticker};

use crate::config::TICK_MS;

/// Fixed-rate scheduler tick source
pub struct SystemTick {
    ticker: Ticker,
    count: u32,
}

impl SystemTick {
    /// Tick period
    pub const PERIOD: Duration = Duration::from_millis(TICK_MS as u64);

    /// Start ticking now
    #[must_use]
    pub fn new() -> Self {
        Self {
            ticker: Ticker::every(Self::PERIOD),
            count: 0,
        }
    }

    /// Wait for the next tick and return the tick count.
    ///
    /// A late wake-up does not produce a burst of catch-up ticks beyond
    /// what the ticker itself schedules.
    pub async fn next(&mut self) -> u32 {
        self.ticker.next().await;
        self.count = self.count.wrapping_add(1);
        self.count
    }

    /// Ticks delivered so far
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }
}

impl Default for SystemTick {
    fn default() -> Self {
        Self::new()
    }
}

impl defmt::Format for SystemTick {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "SystemTick({}ms, n={})", TICK_MS, self.count);
    }
}

/// Stopwatch for timing measurements
#[derive(Clone, Copy, Debug)]
pub struct Stopwatch {
    start: Option<Instant>,
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    #[must_use]
    pub const fn new() -> Self {
        Self { start: None }
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start = Some(Instant::now());
    }

    /// Get elapsed time (returns zero if not started)
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start
            .map_or(Duration::from_ticks(0), |s| Instant::now() - s)
    }

    /// True if more than one scheduler tick has passed since start
    #[must_use]
    pub fn overran_tick(&self) -> bool {
        self.elapsed() > SystemTick::PERIOD
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
