//! Shared test fixtures
//!
//! A scripted board that records every call the controller makes, with a
//! channel table and a set of frequencies carrying a signal.

#![allow(dead_code)]

use uvk5_firmware::config::Settings;
use uvk5_firmware::platform::{
    BeepKind, CallGate, ChannelStore, InterruptFlags, ModeHardware, Notifier, RfFrontEnd,
    TransmitGuard,
};
use uvk5_firmware::radio::control::{Controller, PassSummary, UserInputs};
use uvk5_firmware::radio::state::OperatingMode;
use uvk5_firmware::radio::transmit::{TxDenial, TxPermission};
use uvk5_firmware::radio::vfo::{ScanListMembership, VfoConfig, VfoIndex};
use uvk5_firmware::types::{ChannelNumber, Frequency, ToneCode, NOAA_FREQUENCIES_HZ};

/// Something the controller asked the board to do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    EnterMode(OperatingMode),
    Audio(bool),
    Thresholds(u8),
    ProgramTone(ToneCode),
    TailTone,
    Retune(VfoIndex),
    SelectChannel(VfoIndex, ChannelNumber),
    SetFrequency(VfoIndex, Frequency),
    SelectNoaa(VfoIndex, u8),
    Beep(BeepKind),
    TxDenied(TxDenial),
    TxTimeout,
    Dtmf(u8),
}

#[derive(Clone, Copy, Debug)]
pub struct StoredChannel {
    pub frequency: Frequency,
    pub tone: ToneCode,
    pub scan_lists: ScanListMembership,
}

/// Scripted board
pub struct MockPlatform {
    pub vfos: [VfoConfig; 2],
    pub channels: Vec<Option<StoredChannel>>,
    /// Frequencies on which a carrier is present
    pub carriers: Vec<Frequency>,
    /// Extra flags delivered with the next poll
    pub pending: InterruptFlags,
    pub permission: TxPermission,
    pub dtmf_pending: bool,
    pub calls: Vec<Call>,
    pub audio: bool,
    pub mode: OperatingMode,
    pub detector: ToneCode,
    tuned: VfoIndex,
    reported_open: bool,
}

impl MockPlatform {
    pub fn new() -> Self {
        let vfo = VfoConfig::new(Frequency::POWER_ON);
        Self {
            vfos: [vfo, vfo],
            channels: vec![None; usize::from(ChannelNumber::COUNT)],
            carriers: Vec::new(),
            pending: InterruptFlags::NONE,
            permission: TxPermission::Allowed,
            dtmf_pending: false,
            calls: Vec::new(),
            audio: false,
            mode: OperatingMode::Foreground,
            detector: ToneCode::OFF,
            tuned: VfoIndex::A,
            reported_open: false,
        }
    }

    /// Program a memory channel on its own frequency (`base + n * 25 kHz`)
    pub fn program_channel(&mut self, index: u8, scan_lists: ScanListMembership) {
        self.channels[usize::from(index)] = Some(StoredChannel {
            frequency: channel_frequency(index),
            tone: ToneCode::OFF,
            scan_lists,
        });
    }

    /// Put a VFO on a programmed memory channel
    pub fn park_on_channel(&mut self, vfo: VfoIndex, index: u8) {
        let channel = ChannelNumber::new(index).expect("channel in range");
        self.select_channel(vfo, channel);
    }

    pub fn key_carrier(&mut self, frequency: Frequency) {
        if !self.carriers.contains(&frequency) {
            self.carriers.push(frequency);
        }
    }

    pub fn drop_carrier(&mut self, frequency: Frequency) {
        self.carriers.retain(|f| *f != frequency);
    }

    pub fn inject(&mut self, flags: InterruptFlags) {
        self.pending = flags;
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn receiver_on(&self) -> bool {
        !matches!(
            self.mode,
            OperatingMode::Transmitting | OperatingMode::PowerSaving
        )
    }

    fn carrier_present(&self) -> bool {
        self.carriers.contains(&self.vfos[self.tuned.index()].frequency)
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

/// Frequency of memory channel `index` in the fixtures
pub fn channel_frequency(index: u8) -> Frequency {
    Frequency::from_hz(430_000_000 + u32::from(index) * 25_000).expect("UHF channel")
}

pub fn freq(hz: u32) -> Frequency {
    Frequency::from_hz(hz).expect("frequency in range")
}

pub fn ch(index: u8) -> ChannelNumber {
    ChannelNumber::new(index).expect("channel in range")
}

impl RfFrontEnd for MockPlatform {
    fn poll_interrupt_flags(&mut self) -> InterruptFlags {
        let mut flags = std::mem::take(&mut self.pending);
        if self.receiver_on() {
            let open = self.carrier_present();
            if open != self.reported_open {
                if open {
                    flags.squelch_open = true;
                } else {
                    flags.squelch_closed = true;
                }
                self.reported_open = open;
            }
        }
        flags
    }

    fn apply_squelch_thresholds(&mut self, _vfo: &VfoConfig, squelch_level: u8) {
        self.calls.push(Call::Thresholds(squelch_level));
    }

    fn program_tone_detection(&mut self, tone: ToneCode) {
        self.detector = tone;
        self.calls.push(Call::ProgramTone(tone));
    }

    fn set_audio_path(&mut self, enabled: bool) {
        self.audio = enabled;
        self.calls.push(Call::Audio(enabled));
    }

    fn send_tail_tone(&mut self) {
        self.calls.push(Call::TailTone);
    }
}

impl ModeHardware for MockPlatform {
    fn enter_mode(&mut self, mode: OperatingMode) {
        if matches!(
            mode,
            OperatingMode::Transmitting | OperatingMode::PowerSaving
        ) {
            self.reported_open = false;
        }
        self.mode = mode;
        self.calls.push(Call::EnterMode(mode));
    }
}

impl ChannelStore for MockPlatform {
    fn vfo_config(&self, vfo: VfoIndex) -> VfoConfig {
        self.vfos[vfo.index()]
    }

    fn apply_offset_and_squelch(&mut self, vfo: VfoIndex) {
        self.tuned = vfo;
        self.reported_open = false;
        self.calls.push(Call::Retune(vfo));
    }

    fn channel_scan_lists(&self, channel: ChannelNumber) -> Option<ScanListMembership> {
        self.channels[usize::from(channel.index())].map(|c| c.scan_lists)
    }

    fn select_channel(&mut self, vfo: VfoIndex, channel: ChannelNumber) {
        if let Some(stored) = self.channels[usize::from(channel.index())] {
            let base = self.vfos[vfo.index()];
            self.vfos[vfo.index()] = VfoConfig {
                frequency: stored.frequency,
                tone: stored.tone,
                channel: Some(channel),
                noaa_channel: None,
                scan_lists: stored.scan_lists,
                ..base
            };
        }
        self.calls.push(Call::SelectChannel(vfo, channel));
    }

    fn set_frequency(&mut self, vfo: VfoIndex, frequency: Frequency) {
        let config = &mut self.vfos[vfo.index()];
        config.frequency = frequency;
        config.channel = None;
        config.noaa_channel = None;
        self.calls.push(Call::SetFrequency(vfo, frequency));
    }

    fn select_noaa_channel(&mut self, vfo: VfoIndex, index: u8) {
        let config = &mut self.vfos[vfo.index()];
        config.frequency = freq(NOAA_FREQUENCIES_HZ[usize::from(index)]);
        config.noaa_channel = Some(index);
        config.channel = None;
        self.calls.push(Call::SelectNoaa(vfo, index));
    }
}

impl TransmitGuard for MockPlatform {
    fn can_transmit(&self, _vfo: VfoIndex) -> TxPermission {
        self.permission
    }
}

impl Notifier for MockPlatform {
    fn request_beep(&mut self, kind: BeepKind) {
        self.calls.push(Call::Beep(kind));
    }

    fn request_display_update(&mut self) {}

    fn request_status_update(&mut self) {}

    fn report_tx_denied(&mut self, reason: TxDenial) {
        self.calls.push(Call::TxDenied(reason));
    }

    fn report_tx_timeout(&mut self) {
        self.calls.push(Call::TxTimeout);
    }
}

impl CallGate for MockPlatform {
    fn dtmf_call_pending(&self, _vfo: VfoIndex) -> bool {
        self.dtmf_pending
    }

    fn dtmf_character(&mut self, character: u8) {
        self.calls.push(Call::Dtmf(character));
    }
}

/// Settings with battery save off, so long scenarios never doze
pub fn awake_settings() -> Settings {
    Settings::new().with_battery_save(uvk5_firmware::config::BatterySave::Off)
}

/// Controller started on `platform`
pub fn started(settings: Settings, platform: &mut MockPlatform) -> Controller {
    let mut controller = Controller::new(settings);
    controller.start(platform);
    controller
}

/// One 10 ms tick followed by one main-loop pass
pub fn step(
    controller: &mut Controller,
    platform: &mut MockPlatform,
    inputs: &UserInputs,
) -> PassSummary {
    controller.tick();
    controller.process(platform, inputs)
}

/// `n` idle steps
pub fn run(controller: &mut Controller, platform: &mut MockPlatform, n: u32) {
    for _ in 0..n {
        step(controller, platform, &UserInputs::IDLE);
    }
}

/// `n` steps with the given inputs
pub fn run_with(
    controller: &mut Controller,
    platform: &mut MockPlatform,
    inputs: &UserInputs,
    n: u32,
) {
    for _ in 0..n {
        step(controller, platform, inputs);
    }
}
