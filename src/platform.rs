//! External collaborator interfaces
//!
//! The control core never touches registers, storage or the display itself.
//! Everything outside the scheduling and mode logic is reached through the
//! traits in this module; a board implements all of them on one type and
//! gets [`Platform`] for free.
//!
//! All calls are expected to return promptly. Short bit-banged delays are
//! allowed inside an implementation, blocking waits on the core side are not.

use crate::radio::state::OperatingMode;
use crate::radio::transmit::{TxDenial, TxPermission};
use crate::radio::vfo::{ScanListMembership, VfoConfig, VfoIndex};
use crate::types::{CdcssPolarity, ChannelNumber, CodeType, Frequency, ToneCode};

/// Interrupt status read from the RF chip.
///
/// Each flag is sticky in the chip until read; reading clears it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterruptFlags {
    /// Squelch opened (carrier above threshold)
    pub squelch_open: bool,
    /// Squelch closed
    pub squelch_closed: bool,
    /// CTCSS tone detected
    pub ctcss_found: bool,
    /// CTCSS tone lost
    pub ctcss_lost: bool,
    /// DCS code detected
    pub cdcss_found: bool,
    /// DCS code lost, with the polarity the decoder reported
    pub cdcss_lost: Option<CdcssPolarity>,
    /// Sub-audible tail tone detected
    pub tail_detected: bool,
    /// DTMF character decoded
    pub dtmf_character: Option<u8>,
    /// VOX threshold crossed upwards
    pub vox_found: bool,
    /// VOX threshold crossed downwards
    pub vox_lost: bool,
}

impl InterruptFlags {
    /// Nothing pending
    pub const NONE: Self = Self {
        squelch_open: false,
        squelch_closed: false,
        ctcss_found: false,
        ctcss_lost: false,
        cdcss_found: false,
        cdcss_lost: None,
        tail_detected: false,
        dtmf_character: None,
        vox_found: false,
        vox_lost: false,
    };

    /// Found flag for the given code family
    #[must_use]
    pub const fn tone_found(&self, code_type: CodeType) -> bool {
        match code_type {
            CodeType::Off => false,
            CodeType::ContinuousTone => self.ctcss_found,
            CodeType::Digital | CodeType::ReverseDigital => self.cdcss_found,
        }
    }
}

/// Sound requested from the audio collaborator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeepKind {
    /// Short acknowledgement
    Confirm,
    /// Double beep for a refused action
    Error,
    /// Transmit timeout alarm
    TxTimeout,
}

#[cfg(feature = "embedded")]
impl defmt::Format for BeepKind {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Confirm => defmt::write!(f, "CONFIRM"),
            Self::Error => defmt::write!(f, "ERROR"),
            Self::TxTimeout => defmt::write!(f, "TX-TIMEOUT"),
        }
    }
}

/// RF transceiver chip driver
pub trait RfFrontEnd {
    /// Read and clear pending interrupt flags
    fn poll_interrupt_flags(&mut self) -> InterruptFlags;

    /// Program squelch open/close thresholds for a VFO
    fn apply_squelch_thresholds(&mut self, vfo: &VfoConfig, squelch_level: u8);

    /// Program the sub-audible detector
    fn program_tone_detection(&mut self, tone: ToneCode);

    /// Enable or disable the receive audio path
    fn set_audio_path(&mut self, enabled: bool);

    /// Start sending the end-of-transmission tail tone
    fn send_tail_tone(&mut self);
}

/// Hardware reconfiguration for an operating mode
pub trait ModeHardware {
    /// Reprogram RF registers, audio path and speaker for `mode`.
    ///
    /// Calling it twice with the same mode must be harmless.
    fn enter_mode(&mut self, mode: OperatingMode);
}

/// Channel and VFO storage
pub trait ChannelStore {
    /// Current configuration of a VFO
    fn vfo_config(&self, vfo: VfoIndex) -> VfoConfig;

    /// Recompute offset and squelch table for a VFO and retune to it
    fn apply_offset_and_squelch(&mut self, vfo: VfoIndex);

    /// Scan-list flags of a programmed channel, None if the slot is empty
    fn channel_scan_lists(&self, channel: ChannelNumber) -> Option<ScanListMembership>;

    /// Load a memory channel into a VFO
    fn select_channel(&mut self, vfo: VfoIndex, channel: ChannelNumber);

    /// Retune a frequency-mode VFO
    fn set_frequency(&mut self, vfo: VfoIndex, frequency: Frequency);

    /// Tune a VFO to a NOAA weather channel
    fn select_noaa_channel(&mut self, vfo: VfoIndex, index: u8);
}

/// Transmit permission check
pub trait TransmitGuard {
    /// Decide whether `vfo` may transmit right now
    fn can_transmit(&self, vfo: VfoIndex) -> TxPermission;
}

/// UI and audio notifications (fire and forget)
pub trait Notifier {
    /// Play a beep
    fn request_beep(&mut self, kind: BeepKind);

    /// Redraw the main screen
    fn request_display_update(&mut self);

    /// Redraw the status line
    fn request_status_update(&mut self);

    /// Show why a transmission was refused
    fn report_tx_denied(&mut self, reason: TxDenial);

    /// Show that a transmission was cut by the timeout
    fn report_tx_timeout(&mut self);
}

/// DTMF calling protocol
pub trait CallGate {
    /// True while a DTMF call handshake must finish before audio opens
    fn dtmf_call_pending(&self, vfo: VfoIndex) -> bool;

    /// Hand over a decoded DTMF character
    fn dtmf_character(&mut self, character: u8);
}

/// Everything the controller needs from the board
pub trait Platform: RfFrontEnd + ModeHardware + ChannelStore + TransmitGuard + Notifier + CallGate {}

impl<T> Platform for T where
    T: RfFrontEnd + ModeHardware + ChannelStore + TransmitGuard + Notifier + CallGate
{
}
