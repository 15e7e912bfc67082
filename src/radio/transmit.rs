//! Transmit Control
//!
//! Transmit permission, PTT edge detection and voice-operated keying.
//! Mode changes themselves happen in [`super::state`]; this module only
//! turns raw inputs into requests for it.

use crate::config::VOX_STOP_TICKS;
use crate::platform::InterruptFlags;
use crate::scheduler::{CountdownId, Countdowns};

/// Reason a transmission was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxDenial {
    /// Channel busy and busy-channel lock set
    Busy,
    /// Battery too low to key the PA
    BatteryLow,
    /// Frequency outside the allowed transmit ranges
    FrequencyLocked,
    /// Supply voltage above the PA limit
    OverVoltage,
}

impl TxDenial {
    /// Short status-line text
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Busy => "BUSY",
            Self::BatteryLow => "LOW BATTERY",
            Self::FrequencyLocked => "TX DISABLE",
            Self::OverVoltage => "HIGH VOLTAGE",
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TxDenial {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.label());
    }
}

/// Outcome of a transmit permission check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxPermission {
    /// Transmission may start
    Allowed,
    /// Transmission refused
    Denied(TxDenial),
}

impl TxPermission {
    /// True if transmit may start
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Refuse with `Busy` when the channel is in use and locked.
    ///
    /// An earlier refusal from the external check wins.
    #[must_use]
    pub const fn with_busy_lock(self, locked_and_busy: bool) -> Self {
        match self {
            Self::Allowed if locked_and_busy => Self::Denied(TxDenial::Busy),
            other => other,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TxPermission {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Allowed => defmt::write!(f, "ALLOWED"),
            Self::Denied(reason) => defmt::write!(f, "DENIED({})", reason),
        }
    }
}

/// What keyed the transmitter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxSource {
    /// Push-to-talk key
    Ptt,
    /// Voice-operated switch
    Vox,
}

/// Phase of a transmission
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxPhase {
    /// Carrier keyed by the source
    Keyed,
    /// Source released, sending the tail tone
    WindDown,
}

#[cfg(feature = "embedded")]
impl defmt::Format for TxSource {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Ptt => defmt::write!(f, "PTT"),
            Self::Vox => defmt::write!(f, "VOX"),
        }
    }
}

/// PTT key edge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PttEdge {
    /// Key went down
    Pressed,
    /// Key went up
    Released,
}

/// Edge detector for the PTT key.
///
/// The state machine only reacts to edges, so a transmission cut by the
/// timeout is not keyed again while the key stays down.
#[derive(Clone, Copy, Debug, Default)]
pub struct PttInput {
    held: bool,
}

impl PttInput {
    /// Create with the key up
    #[must_use]
    pub const fn new() -> Self {
        Self { held: false }
    }

    /// Current key level
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.held
    }

    /// Feed the sampled key level, returning an edge if it changed
    pub fn update(&mut self, held: bool) -> Option<PttEdge> {
        let edge = match (self.held, held) {
            (false, true) => Some(PttEdge::Pressed),
            (true, false) => Some(PttEdge::Released),
            _ => None,
        };
        self.held = held;
        edge
    }
}

/// Request derived from the VOX detector
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoxRequest {
    /// Voice detected, key up the transmitter
    Start,
    /// Hang time expired, release the transmitter
    Stop,
}

/// Turn VOX interrupt flags and the VOX countdowns into a request.
///
/// Detection is ignored while `VoxResume` is still running after the
/// previous transmission. Voice returning during the hang time cancels
/// the pending stop.
pub fn vox_request(flags: &InterruptFlags, countdowns: &mut Countdowns) -> Option<VoxRequest> {
    if countdowns.take_trigger(CountdownId::VoxStop) {
        return Some(VoxRequest::Stop);
    }

    if countdowns.is_running(CountdownId::VoxResume) {
        return None;
    }

    if flags.vox_found {
        countdowns.cancel(CountdownId::VoxStop);
        return Some(VoxRequest::Start);
    }

    if flags.vox_lost && !countdowns.is_running(CountdownId::VoxStop) {
        countdowns.arm(CountdownId::VoxStop, VOX_STOP_TICKS);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radio::state::OperatingMode;
    use crate::scheduler::TickContext;

    #[test]
    fn ptt_edges() {
        let mut ptt = PttInput::new();
        assert_eq!(ptt.update(true), Some(PttEdge::Pressed));
        assert_eq!(ptt.update(true), None);
        assert_eq!(ptt.update(false), Some(PttEdge::Released));
        assert_eq!(ptt.update(false), None);
    }

    #[test]
    fn busy_lock_only_overrides_allowed() {
        assert_eq!(
            TxPermission::Allowed.with_busy_lock(true),
            TxPermission::Denied(TxDenial::Busy)
        );
        assert_eq!(
            TxPermission::Denied(TxDenial::BatteryLow).with_busy_lock(true),
            TxPermission::Denied(TxDenial::BatteryLow)
        );
        assert_eq!(TxPermission::Allowed.with_busy_lock(false), TxPermission::Allowed);
    }

    #[test]
    fn vox_hang_time() {
        let mut c = Countdowns::new();
        let ctx = TickContext::idle(OperatingMode::Transmitting);
        let lost = InterruptFlags {
            vox_lost: true,
            ..InterruptFlags::NONE
        };

        assert_eq!(vox_request(&lost, &mut c), None);
        assert_eq!(c.value(CountdownId::VoxStop), VOX_STOP_TICKS);

        for _ in 0..VOX_STOP_TICKS {
            c.tick_all(&ctx);
        }
        assert_eq!(vox_request(&InterruptFlags::NONE, &mut c), Some(VoxRequest::Stop));
    }

    #[test]
    fn vox_paused_after_transmit() {
        let mut c = Countdowns::new();
        c.arm(CountdownId::VoxResume, 5);
        let found = InterruptFlags {
            vox_found: true,
            ..InterruptFlags::NONE
        };
        assert_eq!(vox_request(&found, &mut c), None);
    }
}
