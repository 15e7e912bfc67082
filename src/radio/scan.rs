//! Scan Arbitration
//!
//! Frequency, memory-channel and tone scanning. A scan session only decides
//! what to listen to next and how long to dwell there; retuning goes
//! through the channel store and the state machine handles whatever the
//! receiver hears.
//!
//! The session owns the `ScanPause` countdown. It is armed with the dwell
//! time on every candidate, with a confirm window when the squelch opens,
//! and with the resume timer once a reception is confirmed.

use crate::config::{
    ScanListSelection, ScanResumeMode, Settings, SCAN_CHANNEL_DWELL_TICKS, SCAN_CONFIRM_TICKS,
    SCAN_FREQUENCY_DWELL_TICKS, SCAN_RESUME_CARRIER_GUARD_TICKS, SCAN_RESUME_TIMEOUT_TICKS,
    SCAN_SEARCH_DWELL_TICKS, TONE_FOUND_DEBOUNCE_TICKS, TONE_SCAN_DWELL_TICKS,
};
use crate::platform::ChannelStore;
use crate::scheduler::{CountdownId, Countdowns};
use crate::types::{ChannelNumber, CodeType, Frequency, ToneCode};

use super::vfo::VfoConfig;

/// Scan direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScanDirection {
    /// Not scanning
    #[default]
    Off,
    /// Upwards in frequency or channel number
    Forward,
    /// Downwards
    Backward,
}

impl ScanDirection {
    /// True for forward, false for backward, None when off
    #[must_use]
    pub const fn is_forward(self) -> Option<bool> {
        match self {
            Self::Off => None,
            Self::Forward => Some(true),
            Self::Backward => Some(false),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ScanDirection {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Off => defmt::write!(f, "OFF"),
            Self::Forward => defmt::write!(f, "UP"),
            Self::Backward => defmt::write!(f, "DOWN"),
        }
    }
}

/// What a scan steps through
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScanTarget {
    /// Tuning steps inside the current band
    #[default]
    Frequency,
    /// Memory channels of the active scan list
    Channel,
}

/// Progress of a tone scan
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ToneScanState {
    /// No tone scan
    #[default]
    Off,
    /// Listening for candidate `position`
    Scanning {
        /// Index into the CTCSS-then-DCS candidate list
        position: usize,
    },
    /// Code identified
    Found(ToneCode),
    /// Full pass without a match
    Failed,
}

impl ToneScanState {
    /// True while candidates are being stepped
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Scanning { .. })
    }

    /// Candidate currently programmed
    #[must_use]
    pub const fn candidate(self) -> Option<ToneCode> {
        match self {
            Self::Scanning { position } => ToneCode::scan_candidate(position),
            _ => None,
        }
    }
}

/// Next place to listen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanCandidate {
    /// Retune a frequency-mode VFO
    Frequency(Frequency),
    /// Load a memory channel
    Channel(ChannelNumber),
}

/// What the scan did with a confirmed reception
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanHit {
    /// Parked on the signal, scanning resumes later
    Parked,
    /// Scanning stopped for good
    Stopped,
}

/// Rotation over priority channel 1, priority channel 2 and ordinary
/// scan-list members
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PriorityRotation {
    slot: u8,
    ordinary: Option<ChannelNumber>,
}

impl PriorityRotation {
    /// Slot checked next: 0 and 1 are the priority channels, 2 the list
    #[must_use]
    pub const fn slot(&self) -> u8 {
        self.slot
    }

    /// Last ordinary channel visited
    #[must_use]
    pub const fn ordinary(&self) -> Option<ChannelNumber> {
        self.ordinary
    }

    fn next<S: ChannelStore + ?Sized>(
        &mut self,
        store: &S,
        current: ChannelNumber,
        forward: bool,
        selection: ScanListSelection,
        priorities: [Option<ChannelNumber>; 2],
    ) -> Option<ChannelNumber> {
        // ordinary members continue from where the scan started, not from a priority channel
        let from = *self.ordinary.get_or_insert(current);

        for _ in 0..3 {
            let slot = self.slot;
            self.slot = (slot + 1) % 3;

            let candidate = match slot {
                0 | 1 => priorities[usize::from(slot)]
                    .filter(|ch| store.channel_scan_lists(*ch).is_some()),
                _ => {
                    let next = find_next_channel(store, from, forward, selection);
                    if next.is_some() {
                        self.ordinary = next;
                    }
                    next
                }
            };

            if candidate.is_some() {
                return candidate;
            }
        }
        None
    }
}

/// Next programmed channel after `from` that belongs to `selection`.
///
/// Wraps at both ends, so a forward search past the last channel lands on
/// the first valid one and a backward search below the first lands on the
/// last valid one. `from` itself is the final candidate checked.
pub fn find_next_channel<S: ChannelStore + ?Sized>(
    store: &S,
    from: ChannelNumber,
    forward: bool,
    selection: ScanListSelection,
) -> Option<ChannelNumber> {
    let mut channel = from;
    for _ in 0..ChannelNumber::COUNT {
        channel = channel.wrapping_step(forward);
        if store
            .channel_scan_lists(channel)
            .is_some_and(|lists| lists.includes(selection))
        {
            return Some(channel);
        }
    }
    None
}

/// One running scan
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ScanSession {
    direction: ScanDirection,
    target: ScanTarget,
    hit_count: u16,
    resume_mode: ScanResumeMode,
    tone_scan: ToneScanState,
    rotation: PriorityRotation,
}

impl ScanSession {
    /// No scan running
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Scan direction, Off when no scan runs
    #[must_use]
    pub const fn direction(&self) -> ScanDirection {
        self.direction
    }

    /// What the scan steps through
    #[must_use]
    pub const fn target(&self) -> ScanTarget {
        self.target
    }

    /// Squelch openings since the last confirmed reception
    #[must_use]
    pub const fn hit_count(&self) -> u16 {
        self.hit_count
    }

    /// Resume behaviour captured at start
    #[must_use]
    pub const fn resume_mode(&self) -> ScanResumeMode {
        self.resume_mode
    }

    /// Tone scan progress
    #[must_use]
    pub const fn tone_scan(&self) -> ToneScanState {
        self.tone_scan
    }

    /// Priority rotation position
    #[must_use]
    pub const fn rotation(&self) -> PriorityRotation {
        self.rotation
    }

    /// True while a frequency or channel scan runs
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.direction, ScanDirection::Off)
    }

    /// Dwell time on one candidate
    #[must_use]
    pub const fn dwell_ticks(&self) -> u32 {
        match (self.target, self.resume_mode) {
            (ScanTarget::Frequency, _) => SCAN_FREQUENCY_DWELL_TICKS,
            (ScanTarget::Channel, ScanResumeMode::StopOnSignal) => SCAN_SEARCH_DWELL_TICKS,
            (ScanTarget::Channel, _) => SCAN_CHANNEL_DWELL_TICKS,
        }
    }

    /// Start scanning and arm the first dwell
    pub fn start(
        &mut self,
        direction: ScanDirection,
        target: ScanTarget,
        resume_mode: ScanResumeMode,
        countdowns: &mut Countdowns,
    ) {
        self.direction = direction;
        self.target = target;
        self.resume_mode = resume_mode;
        self.hit_count = 0;
        self.rotation = PriorityRotation::default();
        if self.is_active() {
            countdowns.arm(CountdownId::ScanPause, self.dwell_ticks());
        }
    }

    /// Stop scanning, keeping the current frequency or channel
    pub fn stop(&mut self, countdowns: &mut Countdowns) {
        self.direction = ScanDirection::Off;
        self.hit_count = 0;
        if !self.tone_scan.is_active() {
            countdowns.cancel(CountdownId::ScanPause);
        }
    }

    /// Pick the next candidate after the VFO's current position
    pub fn next_candidate<S: ChannelStore + ?Sized>(
        &mut self,
        store: &S,
        vfo: &VfoConfig,
        settings: &Settings,
    ) -> Option<ScanCandidate> {
        let forward = self.direction.is_forward()?;

        match (self.target, vfo.channel) {
            (ScanTarget::Channel, Some(current)) => {
                let priorities = settings
                    .scan_list
                    .list_index()
                    .map_or([None, None], |list| settings.priority_channels[list]);

                let next = if priorities.iter().all(Option::is_none) {
                    find_next_channel(store, current, forward, settings.scan_list)
                } else {
                    self.rotation
                        .next(store, current, forward, settings.scan_list, priorities)
                };
                next.map(ScanCandidate::Channel)
            }
            _ => Some(ScanCandidate::Frequency(
                vfo.frequency.scan_step(vfo.step, forward),
            )),
        }
    }

    /// Squelch opened on a candidate: hold it long enough to confirm
    pub fn on_squelch_open(&mut self, code_type: CodeType, countdowns: &mut Countdowns) {
        self.hit_count = self.hit_count.saturating_add(1);
        let window = match code_type {
            CodeType::Off => SCAN_CONFIRM_TICKS,
            _ => TONE_FOUND_DEBOUNCE_TICKS + SCAN_CONFIRM_TICKS,
        };
        countdowns.arm(CountdownId::ScanPause, window);
    }

    /// Reception confirmed while scanning
    pub fn on_confirmed(&mut self, countdowns: &mut Countdowns) -> ScanHit {
        self.hit_count = 0;
        match self.resume_mode {
            ScanResumeMode::TimeoutThenContinue => {
                countdowns.arm(CountdownId::ScanPause, SCAN_RESUME_TIMEOUT_TICKS);
                ScanHit::Parked
            }
            ScanResumeMode::CarrierOperated => {
                countdowns.cancel(CountdownId::ScanPause);
                ScanHit::Parked
            }
            ScanResumeMode::StopOnSignal => {
                self.stop(countdowns);
                ScanHit::Stopped
            }
        }
    }

    /// Reception over while parked
    pub fn on_reception_ended(&mut self, countdowns: &mut Countdowns) {
        if self.resume_mode == ScanResumeMode::CarrierOperated
            && !countdowns.is_running(CountdownId::ScanPause)
        {
            countdowns.arm(CountdownId::ScanPause, SCAN_RESUME_CARRIER_GUARD_TICKS);
        }
    }

    /// Start stepping through sub-audible codes, returning the first one
    pub fn start_tone_scan(&mut self, countdowns: &mut Countdowns) -> Option<ToneCode> {
        self.tone_scan = ToneScanState::Scanning { position: 0 };
        countdowns.arm(CountdownId::ScanPause, TONE_SCAN_DWELL_TICKS);
        self.tone_scan.candidate()
    }

    /// Dwell expired: move to the next code, None once the pass failed
    pub fn advance_tone_scan(&mut self, countdowns: &mut Countdowns) -> Option<ToneCode> {
        let ToneScanState::Scanning { position } = self.tone_scan else {
            return None;
        };

        self.tone_scan = ToneScanState::Scanning {
            position: position + 1,
        };
        match self.tone_scan.candidate() {
            Some(code) => {
                countdowns.arm(CountdownId::ScanPause, TONE_SCAN_DWELL_TICKS);
                Some(code)
            }
            None => {
                self.tone_scan = ToneScanState::Failed;
                if !self.is_active() {
                    countdowns.cancel(CountdownId::ScanPause);
                }
                None
            }
        }
    }

    /// The programmed candidate was heard
    pub fn finish_tone_scan(&mut self, code: ToneCode, countdowns: &mut Countdowns) {
        self.tone_scan = ToneScanState::Found(code);
        if !self.is_active() {
            countdowns.cancel(CountdownId::ScanPause);
        }
    }

    /// Abort a tone scan
    pub fn cancel_tone_scan(&mut self, countdowns: &mut Countdowns) {
        if self.tone_scan.is_active() && !self.is_active() {
            countdowns.cancel(CountdownId::ScanPause);
        }
        self.tone_scan = ToneScanState::Off;
    }
}
