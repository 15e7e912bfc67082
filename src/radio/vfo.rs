//! VFO configuration as seen by the control core
//!
//! The channel store owns the persistent copy; the core reads snapshots of
//! it through [`crate::platform::ChannelStore`].

use crate::config::ScanListSelection;
use crate::types::{ChannelNumber, Frequency, OutputPower, ToneCode, TuningStep};

/// VFO A/B selection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VfoIndex {
    /// VFO A
    #[default]
    A,
    /// VFO B
    B,
}

impl VfoIndex {
    /// Toggle VFO selection
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// 0 for A, 1 for B
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for VfoIndex {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::A => defmt::write!(f, "VFO-A"),
            Self::B => defmt::write!(f, "VFO-B"),
        }
    }
}

/// Scan-list flags of a memory channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ScanListMembership {
    /// Member of scan list 1
    pub list1: bool,
    /// Member of scan list 2
    pub list2: bool,
}

impl ScanListMembership {
    /// Member of no list
    pub const NONE: Self = Self {
        list1: false,
        list2: false,
    };

    /// Member of both lists
    pub const BOTH: Self = Self {
        list1: true,
        list2: true,
    };

    /// Check membership against the active scan list
    #[must_use]
    pub const fn includes(self, selection: ScanListSelection) -> bool {
        match selection {
            ScanListSelection::List1 => self.list1,
            ScanListSelection::List2 => self.list2,
            ScanListSelection::All => true,
        }
    }
}

/// Snapshot of one VFO's configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VfoConfig {
    /// Receive frequency
    pub frequency: Frequency,
    /// Receive sub-audible code
    pub tone: ToneCode,
    /// Channel raster
    pub step: TuningStep,
    /// Memory channel, None in frequency mode
    pub channel: Option<ChannelNumber>,
    /// NOAA weather channel index, if tuned to one
    pub noaa_channel: Option<u8>,
    /// Scan-list flags
    pub scan_lists: ScanListMembership,
    /// Transmit power
    pub output_power: OutputPower,
    /// Refuse transmit while the channel is busy
    pub busy_channel_lock: bool,
    /// DTMF call decoding enabled
    pub dtmf_decoding: bool,
}

impl VfoConfig {
    /// Frequency-mode VFO without sub-audible code
    #[must_use]
    pub const fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            tone: ToneCode::OFF,
            step: TuningStep::KHz12_5,
            channel: None,
            noaa_channel: None,
            scan_lists: ScanListMembership::NONE,
            output_power: OutputPower::Low,
            busy_channel_lock: false,
            dtmf_decoding: false,
        }
    }

    /// Set sub-audible code (returns new config)
    #[must_use]
    pub const fn with_tone(self, tone: ToneCode) -> Self {
        Self { tone, ..self }
    }

    /// Set channel raster (returns new config)
    #[must_use]
    pub const fn with_step(self, step: TuningStep) -> Self {
        Self { step, ..self }
    }

    /// Put the VFO in memory-channel mode (returns new config)
    #[must_use]
    pub const fn with_channel(self, channel: ChannelNumber, scan_lists: ScanListMembership) -> Self {
        Self {
            channel: Some(channel),
            scan_lists,
            ..self
        }
    }

    /// Tune to a NOAA weather channel (returns new config)
    #[must_use]
    pub const fn with_noaa_channel(self, index: u8) -> Self {
        Self {
            noaa_channel: Some(index),
            ..self
        }
    }

    /// Enable busy-channel lock (returns new config)
    #[must_use]
    pub const fn with_busy_channel_lock(self, enabled: bool) -> Self {
        Self {
            busy_channel_lock: enabled,
            ..self
        }
    }

    /// Enable DTMF call decoding (returns new config)
    #[must_use]
    pub const fn with_dtmf_decoding(self, enabled: bool) -> Self {
        Self {
            dtmf_decoding: enabled,
            ..self
        }
    }

    /// True in memory-channel mode
    #[must_use]
    pub const fn is_channel_mode(&self) -> bool {
        self.channel.is_some()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for VfoConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "VFO({}, {})", self.frequency, self.tone);
    }
}
