//! Shared types used across the control core
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;

/// Frequency in Hertz with validation
///
/// Represents a valid frequency within the receiver's tuning range.
/// The frequency is stored in Hz for precision.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency(u32);

impl Frequency {
    /// Minimum supported frequency (18 MHz)
    pub const MIN_HZ: u32 = 18_000_000;

    /// Maximum supported frequency (1300 MHz)
    pub const MAX_HZ: u32 = 1_300_000_000;

    /// Power-on frequency of a blank VFO (145.500 MHz calling channel)
    pub const POWER_ON: Self = Self(145_500_000);

    /// Create a new Frequency from Hz, returns None if out of range
    #[must_use]
    pub const fn from_hz(hz: u32) -> Option<Self> {
        if hz >= Self::MIN_HZ && hz <= Self::MAX_HZ {
            Some(Self(hz))
        } else {
            None
        }
    }

    /// Create a new Frequency from kHz
    #[must_use]
    pub const fn from_khz(khz: u32) -> Option<Self> {
        match khz.checked_mul(1000) {
            Some(hz) => Self::from_hz(hz),
            None => None,
        }
    }

    /// Get the frequency in Hz
    #[must_use]
    pub const fn as_hz(self) -> u32 {
        self.0
    }

    /// Get the frequency in kHz (truncated)
    #[must_use]
    pub const fn as_khz(self) -> u32 {
        self.0 / 1000
    }

    /// Band containing this frequency
    #[must_use]
    pub const fn band(self) -> Band {
        Band::from_frequency(self)
    }

    /// Next scan frequency inside the current band.
    ///
    /// Stepping past the upper edge wraps to the lower edge; stepping below
    /// the lower edge wraps to the last step below the upper edge.
    #[must_use]
    pub fn scan_step(self, step: TuningStep, forward: bool) -> Self {
        let band = self.band();
        let step_hz = step.as_hz();
        let hz = if forward {
            let next = self.0.saturating_add(step_hz);
            if next >= band.upper_hz() {
                band.lower_hz()
            } else {
                next
            }
        } else {
            match self.0.checked_sub(step_hz) {
                Some(next) if next >= band.lower_hz() => next,
                _ => band.upper_hz().saturating_sub(step_hz).max(band.lower_hz()),
            }
        };
        Self::from_hz(hz).unwrap_or(self)
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({} Hz)", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Frequency {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} Hz", self.0);
    }
}

/// Receive band of the transceiver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    /// 18 - 108 MHz
    B50,
    /// 108 - 137 MHz (airband)
    B108,
    /// 137 - 174 MHz (VHF)
    B137,
    /// 174 - 350 MHz
    B174,
    /// 350 - 400 MHz
    B350,
    /// 400 - 470 MHz (UHF)
    B400,
    /// 470 - 1300 MHz
    B470,
}

impl Band {
    /// Get the band for a given frequency
    #[must_use]
    pub const fn from_frequency(freq: Frequency) -> Self {
        let hz = freq.as_hz();
        if hz < 108_000_000 {
            Self::B50
        } else if hz < 137_000_000 {
            Self::B108
        } else if hz < 174_000_000 {
            Self::B137
        } else if hz < 350_000_000 {
            Self::B174
        } else if hz < 400_000_000 {
            Self::B350
        } else if hz < 470_000_000 {
            Self::B400
        } else {
            Self::B470
        }
    }

    /// Get the band start frequency
    #[must_use]
    pub const fn lower_hz(self) -> u32 {
        match self {
            Self::B50 => 18_000_000,
            Self::B108 => 108_000_000,
            Self::B137 => 137_000_000,
            Self::B174 => 174_000_000,
            Self::B350 => 350_000_000,
            Self::B400 => 400_000_000,
            Self::B470 => 470_000_000,
        }
    }

    /// Get the band end frequency (exclusive)
    #[must_use]
    pub const fn upper_hz(self) -> u32 {
        match self {
            Self::B50 => 108_000_000,
            Self::B108 => 137_000_000,
            Self::B137 => 174_000_000,
            Self::B174 => 350_000_000,
            Self::B350 => 400_000_000,
            Self::B400 => 470_000_000,
            Self::B470 => 1_300_000_000,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Band {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::B50 => defmt::write!(f, "50M"),
            Self::B108 => defmt::write!(f, "108M"),
            Self::B137 => defmt::write!(f, "137M"),
            Self::B174 => defmt::write!(f, "174M"),
            Self::B350 => defmt::write!(f, "350M"),
            Self::B400 => defmt::write!(f, "400M"),
            Self::B470 => defmt::write!(f, "470M"),
        }
    }
}

/// Channel raster step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TuningStep {
    /// 2.5 kHz
    KHz2_5,
    /// 5 kHz
    KHz5,
    /// 6.25 kHz
    KHz6_25,
    /// 10 kHz
    KHz10,
    /// 12.5 kHz
    #[default]
    KHz12_5,
    /// 25 kHz
    KHz25,
    /// 8.33 kHz (airband)
    KHz8_33,
}

impl TuningStep {
    /// Get the step size in Hz
    #[must_use]
    pub const fn as_hz(self) -> u32 {
        match self {
            Self::KHz2_5 => 2_500,
            Self::KHz5 => 5_000,
            Self::KHz6_25 => 6_250,
            Self::KHz10 => 10_000,
            Self::KHz12_5 => 12_500,
            Self::KHz25 => 25_000,
            Self::KHz8_33 => 8_330,
        }
    }
}

/// Sub-audible code family configured on a VFO
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CodeType {
    /// Carrier squelch only
    #[default]
    Off,
    /// CTCSS tone
    ContinuousTone,
    /// DCS code, normal polarity
    Digital,
    /// DCS code, inverted polarity
    ReverseDigital,
}

impl CodeType {
    /// Decode a stored code type; unknown values fall back to `Off`
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::ContinuousTone,
            2 => Self::Digital,
            3 => Self::ReverseDigital,
            _ => Self::Off,
        }
    }

    /// Stored representation
    #[must_use]
    pub const fn as_raw(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::ContinuousTone => 1,
            Self::Digital => 2,
            Self::ReverseDigital => 3,
        }
    }

    /// True for both DCS variants
    #[must_use]
    pub const fn is_digital(self) -> bool {
        matches!(self, Self::Digital | Self::ReverseDigital)
    }

    /// Polarity a DCS lost event must carry to count against this code type
    #[must_use]
    pub const fn expected_polarity(self) -> Option<CdcssPolarity> {
        match self {
            Self::Digital => Some(CdcssPolarity::Positive),
            Self::ReverseDigital => Some(CdcssPolarity::Negative),
            Self::Off | Self::ContinuousTone => None,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for CodeType {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Off => defmt::write!(f, "OFF"),
            Self::ContinuousTone => defmt::write!(f, "CTCSS"),
            Self::Digital => defmt::write!(f, "DCS-N"),
            Self::ReverseDigital => defmt::write!(f, "DCS-I"),
        }
    }
}

/// Polarity reported by the DCS decoder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CdcssPolarity {
    /// Positive (normal) code
    Positive,
    /// Negative (inverted) code
    Negative,
}

/// CTCSS tones in tenths of a hertz
pub const CTCSS_TONES_DHZ: [u16; 50] = [
    670, 693, 719, 744, 770, 797, 825, 854, 885, 915, //
    948, 974, 1000, 1035, 1072, 1109, 1148, 1188, 1230, 1273, //
    1318, 1365, 1413, 1462, 1514, 1567, 1598, 1622, 1655, 1679, //
    1713, 1738, 1773, 1799, 1835, 1862, 1899, 1928, 1966, 1995, //
    2035, 2065, 2107, 2181, 2257, 2291, 2336, 2418, 2503, 2541,
];

/// DCS codes (octal notation stored as the octal value)
pub const DCS_CODES: [u16; 104] = [
    0o023, 0o025, 0o026, 0o031, 0o032, 0o036, 0o043, 0o047, 0o051, 0o053, //
    0o054, 0o065, 0o071, 0o072, 0o073, 0o074, 0o114, 0o115, 0o116, 0o122, //
    0o125, 0o131, 0o132, 0o134, 0o143, 0o145, 0o152, 0o155, 0o156, 0o162, //
    0o165, 0o172, 0o174, 0o205, 0o212, 0o223, 0o225, 0o226, 0o243, 0o244, //
    0o245, 0o246, 0o251, 0o252, 0o255, 0o261, 0o263, 0o265, 0o266, 0o271, //
    0o274, 0o306, 0o311, 0o315, 0o325, 0o331, 0o332, 0o343, 0o346, 0o351, //
    0o356, 0o364, 0o365, 0o371, 0o411, 0o412, 0o413, 0o423, 0o431, 0o432, //
    0o445, 0o446, 0o452, 0o454, 0o455, 0o462, 0o464, 0o465, 0o466, 0o503, //
    0o506, 0o516, 0o523, 0o526, 0o532, 0o546, 0o565, 0o606, 0o612, 0o624, //
    0o627, 0o631, 0o632, 0o654, 0o662, 0o664, 0o703, 0o712, 0o723, 0o731, //
    0o732, 0o734, 0o743, 0o754,
];

/// A code type together with its table index
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ToneCode {
    /// Code family
    pub code_type: CodeType,
    /// Index into [`CTCSS_TONES_DHZ`] or [`DCS_CODES`]
    pub index: u8,
}

impl ToneCode {
    /// No sub-audible code
    pub const OFF: Self = Self {
        code_type: CodeType::Off,
        index: 0,
    };

    /// Build a code, clamping an out-of-table index to `Off`
    #[must_use]
    pub const fn new(code_type: CodeType, index: u8) -> Self {
        let len = match code_type {
            CodeType::Off => return Self::OFF,
            CodeType::ContinuousTone => CTCSS_TONES_DHZ.len(),
            CodeType::Digital | CodeType::ReverseDigital => DCS_CODES.len(),
        };
        if (index as usize) < len {
            Self { code_type, index }
        } else {
            Self::OFF
        }
    }

    /// Decode stored bytes (type, index)
    #[must_use]
    pub const fn from_raw(code_type: u8, index: u8) -> Self {
        Self::new(CodeType::from_raw(code_type), index)
    }

    /// Number of candidates a tone scan steps through
    #[must_use]
    pub const fn scan_candidates() -> usize {
        CTCSS_TONES_DHZ.len() + DCS_CODES.len()
    }

    /// Tone scan candidate by position: CTCSS first, then DCS
    #[must_use]
    pub const fn scan_candidate(position: usize) -> Option<Self> {
        if position < CTCSS_TONES_DHZ.len() {
            Some(Self::new(CodeType::ContinuousTone, position as u8))
        } else if position < Self::scan_candidates() {
            Some(Self::new(
                CodeType::Digital,
                (position - CTCSS_TONES_DHZ.len()) as u8,
            ))
        } else {
            None
        }
    }

    /// CTCSS tone in tenths of a hertz, if this is a CTCSS code
    #[must_use]
    pub const fn ctcss_dhz(self) -> Option<u16> {
        match self.code_type {
            CodeType::ContinuousTone => Some(CTCSS_TONES_DHZ[self.index as usize]),
            _ => None,
        }
    }

    /// DCS code word, if this is a DCS code
    #[must_use]
    pub const fn dcs_code(self) -> Option<u16> {
        match self.code_type {
            CodeType::Digital | CodeType::ReverseDigital => Some(DCS_CODES[self.index as usize]),
            _ => None,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ToneCode {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}#{}", self.code_type, self.index);
    }
}

/// Memory channel number (0-based)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelNumber(u8);

impl ChannelNumber {
    /// Number of memory channels
    pub const COUNT: u8 = 200;

    /// First memory channel
    pub const FIRST: Self = Self(0);

    /// Last memory channel
    pub const LAST: Self = Self(Self::COUNT - 1);

    /// Create a channel number, None if out of range
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Zero-based index
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Neighbour in the given direction, wrapping at both ends
    #[must_use]
    pub const fn wrapping_step(self, forward: bool) -> Self {
        if forward {
            if self.0 >= Self::LAST.0 {
                Self::FIRST
            } else {
                Self(self.0 + 1)
            }
        } else if self.0 == Self::FIRST.0 {
            Self::LAST
        } else {
            Self(self.0 - 1)
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ChannelNumber {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "CH-{}", self.0 + 1);
    }
}

/// NOAA weather channel frequencies in Hz
pub const NOAA_FREQUENCIES_HZ: [u32; 10] = [
    162_550_000,
    162_400_000,
    162_475_000,
    162_425_000,
    162_450_000,
    162_500_000,
    162_525_000,
    161_650_000,
    161_775_000,
    163_275_000,
];

/// Transmit power setting
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputPower {
    /// Low power
    #[default]
    Low,
    /// Medium power
    Mid,
    /// High power
    High,
}

#[cfg(feature = "embedded")]
impl defmt::Format for OutputPower {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Low => defmt::write!(f, "LOW"),
            Self::Mid => defmt::write!(f, "MID"),
            Self::High => defmt::write!(f, "HIGH"),
        }
    }
}
