//! Dual-Watch and NOAA Alternation
//!
//! While idle the receiver alternates between VFO A and B. A reception on
//! either side holds the alternation until it ends, then waits a little
//! longer before swapping away so the other party can answer. The NOAA
//! watcher does the same across the weather channels when the listened
//! VFO is tuned to one.

use crate::config::{
    DualWatch, Settings, DUAL_WATCH_AFTER_TX_TICKS, NOAA_AFTER_RX_TICKS, NOAA_ALTERNATE_TICKS,
};
use crate::scheduler::{CountdownId, Countdowns};
use crate::types::NOAA_FREQUENCIES_HZ;

use super::vfo::VfoIndex;

/// Dual-watch alternation state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DualWatchSession {
    active: VfoIndex,
    confirmed_receiving: bool,
}

impl DualWatchSession {
    /// Start listening on `home`
    #[must_use]
    pub const fn new(home: VfoIndex) -> Self {
        Self {
            active: home,
            confirmed_receiving: false,
        }
    }

    /// Home VFO for a dual-watch preference
    #[must_use]
    pub const fn home(preference: DualWatch, selected: VfoIndex) -> VfoIndex {
        match preference {
            DualWatch::Off => selected,
            DualWatch::HomeA => VfoIndex::A,
            DualWatch::HomeB => VfoIndex::B,
        }
    }

    /// VFO currently listened to
    #[must_use]
    pub const fn active(&self) -> VfoIndex {
        self.active
    }

    /// A confirmed reception holds the alternation
    #[must_use]
    pub const fn is_holding(&self) -> bool {
        self.confirmed_receiving
    }

    /// Enable or disable alternation according to `settings`
    pub fn configure(&mut self, settings: &Settings, selected: VfoIndex, countdowns: &mut Countdowns) {
        self.active = Self::home(settings.dual_watch, selected);
        self.confirmed_receiving = false;
        if settings.dual_watch.is_enabled() {
            countdowns.arm(CountdownId::DualWatch, settings.dual_watch_period_ticks);
        } else {
            countdowns.cancel(CountdownId::DualWatch);
        }
    }

    /// Alternation trigger fired: swap and rearm, unless a reception holds.
    ///
    /// Returns the VFO to retune to.
    pub fn on_trigger(&mut self, settings: &Settings, countdowns: &mut Countdowns) -> Option<VfoIndex> {
        if self.confirmed_receiving || !settings.dual_watch.is_enabled() {
            return None;
        }
        self.active = self.active.toggle();
        countdowns.arm(CountdownId::DualWatch, settings.dual_watch_period_ticks);
        Some(self.active)
    }

    /// Carrier heard on the active side
    pub fn on_squelch_open(&mut self, settings: &Settings, countdowns: &mut Countdowns) {
        if settings.dual_watch.is_enabled() {
            countdowns.arm(CountdownId::DualWatch, settings.dual_watch_after_rx_ticks);
        }
    }

    /// Reception confirmed on the active side
    pub fn on_confirmed(&mut self) {
        self.confirmed_receiving = true;
    }

    /// Reception over; hold a while before swapping away
    pub fn on_reception_ended(&mut self, settings: &Settings, countdowns: &mut Countdowns) {
        self.confirmed_receiving = false;
        if settings.dual_watch.is_enabled() {
            countdowns.arm(CountdownId::DualWatch, settings.dual_watch_after_rx_ticks);
        }
    }

    /// Transmission over; listen on the transmitting side for a while
    pub fn on_transmit_ended(&mut self, settings: &Settings, countdowns: &mut Countdowns) {
        self.confirmed_receiving = false;
        if settings.dual_watch.is_enabled() {
            countdowns.arm(CountdownId::DualWatch, DUAL_WATCH_AFTER_TX_TICKS);
        }
    }
}

/// NOAA weather-channel alternation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct NoaaWatch {
    armed: bool,
}

impl NoaaWatch {
    /// Watcher with no countdown armed
    #[must_use]
    pub const fn new() -> Self {
        Self { armed: false }
    }

    /// Arm the alternation when it becomes applicable
    pub fn ensure_armed(&mut self, applicable: bool, countdowns: &mut Countdowns) {
        if applicable && !self.armed {
            countdowns.arm(CountdownId::Noaa, NOAA_ALTERNATE_TICKS);
            self.armed = true;
        } else if !applicable && self.armed {
            countdowns.cancel(CountdownId::Noaa);
            self.armed = false;
        }
    }

    /// Trigger fired: next weather channel after `current`
    pub fn on_trigger(&mut self, current: u8, countdowns: &mut Countdowns) -> u8 {
        countdowns.arm(CountdownId::Noaa, NOAA_ALTERNATE_TICKS);
        self.armed = true;
        next_noaa_channel(current)
    }

    /// Reception on a weather channel ended
    pub fn on_reception_ended(&mut self, countdowns: &mut Countdowns) {
        if self.armed {
            countdowns.arm(CountdownId::Noaa, NOAA_AFTER_RX_TICKS);
        }
    }
}

/// Weather channel after `current`, wrapping
#[must_use]
pub const fn next_noaa_channel(current: u8) -> u8 {
    let next = current as usize + 1;
    if next >= NOAA_FREQUENCIES_HZ.len() {
        0
    } else {
        next as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_blocks_swap() {
        let settings = Settings::new().with_dual_watch(DualWatch::HomeA);
        let mut c = Countdowns::new();
        let mut dw = DualWatchSession::new(VfoIndex::A);
        dw.on_confirmed();
        assert_eq!(dw.on_trigger(&settings, &mut c), None);
        dw.on_reception_ended(&settings, &mut c);
        assert_eq!(c.value(CountdownId::DualWatch), settings.dual_watch_after_rx_ticks);
        assert_eq!(dw.on_trigger(&settings, &mut c), Some(VfoIndex::B));
    }

    #[test]
    fn noaa_wraps() {
        assert_eq!(next_noaa_channel(0), 1);
        assert_eq!(next_noaa_channel(9), 0);
    }
}
