//! UV-K5 Control Core Main Application
//!
//! Entry point for the STM32G474 bring-up board. Wires the control core to
//! the keys, the RF module's status lines, the battery ADC and an in-RAM
//! channel table, then runs the 10 ms tick and the main-loop pass as two
//! tasks sharing one controller.

#![no_std]
#![no_main]

use core::cell::RefCell;

use embassy_executor::Spawner;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::peripherals::PB1;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use uvk5_firmware::hal::adc::BatteryAdc;
use uvk5_firmware::hal::gpio::{Key, StatusLine, Switch};
use uvk5_firmware::hal::timer::{Stopwatch, SystemTick};
use uvk5_firmware::platform::{
    BeepKind, CallGate, ChannelStore, InterruptFlags, ModeHardware, Notifier, RfFrontEnd,
    TransmitGuard,
};
use uvk5_firmware::power::PowerManager;
use uvk5_firmware::prelude::*;
use uvk5_firmware::radio::state::OperatingMode;
use uvk5_firmware::radio::transmit::{TxDenial, TxPermission};
use uvk5_firmware::radio::vfo::{ScanListMembership, VfoConfig, VfoIndex};

type SharedController = Mutex<CriticalSectionRawMutex, RefCell<Controller>>;

static CONTROLLER: StaticCell<SharedController> = StaticCell::new();

/// Tick count, signalled to the control task once per tick
static TICK: Signal<CriticalSectionRawMutex, u32> = Signal::new();

const CHANNEL_SLOTS: usize = ChannelNumber::COUNT as usize;

/// Channels programmed on first boot
const FACTORY_CHANNELS: [(u8, u32, ToneCode, ScanListMembership); 4] = [
    (0, 145_500_000, ToneCode::OFF, ScanListMembership::BOTH),
    (
        1,
        145_600_000,
        ToneCode::new(CodeType::ContinuousTone, 12),
        ScanListMembership {
            list1: true,
            list2: false,
        },
    ),
    (
        2,
        433_500_000,
        ToneCode::OFF,
        ScanListMembership {
            list1: false,
            list2: true,
        },
    ),
    (
        3,
        446_006_250,
        ToneCode::new(CodeType::Digital, 0),
        ScanListMembership::BOTH,
    ),
];

#[derive(Clone, Copy)]
struct MemoryChannel {
    frequency: Frequency,
    tone: ToneCode,
    scan_lists: ScanListMembership,
}

fn factory_channels() -> [Option<MemoryChannel>; CHANNEL_SLOTS] {
    let mut table = [None; CHANNEL_SLOTS];
    for (index, hz, tone, scan_lists) in FACTORY_CHANNELS {
        if let Some(frequency) = Frequency::from_hz(hz) {
            table[usize::from(index)] = Some(MemoryChannel {
                frequency,
                tone,
                scan_lists,
            });
        }
    }
    table
}

/// Everything the control core reaches on this board
struct Board {
    squelch: StatusLine<Input<'static>>,
    tone_detect: StatusLine<Input<'static>>,
    audio: Switch<Output<'static>>,
    tx_enable: Switch<Output<'static>>,
    rf_sleep: Switch<Output<'static>>,
    tx_led: Switch<Output<'static>>,
    channels: [Option<MemoryChannel>; CHANNEL_SLOTS],
    vfos: [VfoConfig; 2],
    detector: ToneCode,
    power: PowerManager,
}

impl Board {
    fn load_channel(&self, base: VfoConfig, channel: ChannelNumber) -> Option<VfoConfig> {
        self.channels[usize::from(channel.index())].map(|entry| VfoConfig {
            frequency: entry.frequency,
            tone: entry.tone,
            channel: Some(channel),
            noaa_channel: None,
            scan_lists: entry.scan_lists,
            ..base
        })
    }
}

impl RfFrontEnd for Board {
    fn poll_interrupt_flags(&mut self) -> InterruptFlags {
        let mut flags = InterruptFlags::NONE;

        match self.squelch.edge() {
            Some(true) => flags.squelch_open = true,
            Some(false) => flags.squelch_closed = true,
            None => {}
        }

        if let Some(found) = self.tone_detect.edge() {
            match (self.detector.code_type, found) {
                (CodeType::Off, _) => {}
                (CodeType::ContinuousTone, true) => flags.ctcss_found = true,
                (CodeType::ContinuousTone, false) => flags.ctcss_lost = true,
                (_, true) => flags.cdcss_found = true,
                (code_type, false) => flags.cdcss_lost = code_type.expected_polarity(),
            }
        }

        flags
    }

    fn apply_squelch_thresholds(&mut self, vfo: &VfoConfig, squelch_level: u8) {
        debug!("squelch {} on {}", squelch_level, vfo);
    }

    fn program_tone_detection(&mut self, tone: ToneCode) {
        self.detector = tone;
        self.tone_detect.rearm();
    }

    fn set_audio_path(&mut self, enabled: bool) {
        self.audio.set(enabled);
    }

    fn send_tail_tone(&mut self) {
        debug!("tail tone");
    }
}

impl ModeHardware for Board {
    fn enter_mode(&mut self, mode: OperatingMode) {
        let transmitting = mode == OperatingMode::Transmitting;
        let sleeping = mode == OperatingMode::PowerSaving;

        if transmitting || sleeping {
            self.squelch.rearm();
        }
        if transmitting {
            self.audio.set(false);
        }
        self.rf_sleep.set(sleeping);
        self.tx_enable.set(transmitting);
        self.tx_led.set(transmitting);
    }
}

impl ChannelStore for Board {
    fn vfo_config(&self, vfo: VfoIndex) -> VfoConfig {
        self.vfos[vfo.index()]
    }

    fn apply_offset_and_squelch(&mut self, vfo: VfoIndex) {
        self.squelch.rearm();
        debug!("retune {}", self.vfos[vfo.index()]);
    }

    fn channel_scan_lists(&self, channel: ChannelNumber) -> Option<ScanListMembership> {
        self.channels[usize::from(channel.index())].map(|entry| entry.scan_lists)
    }

    fn select_channel(&mut self, vfo: VfoIndex, channel: ChannelNumber) {
        if let Some(config) = self.load_channel(self.vfos[vfo.index()], channel) {
            self.vfos[vfo.index()] = config;
        }
    }

    fn set_frequency(&mut self, vfo: VfoIndex, frequency: Frequency) {
        let config = &mut self.vfos[vfo.index()];
        config.frequency = frequency;
        config.channel = None;
        config.noaa_channel = None;
    }

    fn select_noaa_channel(&mut self, vfo: VfoIndex, index: u8) {
        let hz = NOAA_FREQUENCIES_HZ.get(usize::from(index)).copied();
        if let Some(frequency) = hz.and_then(Frequency::from_hz) {
            let config = &mut self.vfos[vfo.index()];
            config.frequency = frequency;
            config.tone = ToneCode::OFF;
            config.channel = None;
            config.noaa_channel = Some(index);
        }
    }
}

impl TransmitGuard for Board {
    fn can_transmit(&self, vfo: VfoIndex) -> TxPermission {
        let config = self.vfos[vfo.index()];
        let ham_band = matches!(config.frequency.band(), Band::B137 | Band::B400);
        if config.noaa_channel.is_some() || !ham_band {
            return TxPermission::Denied(TxDenial::FrequencyLocked);
        }
        self.power.transmit_permission()
    }
}

impl Notifier for Board {
    fn request_beep(&mut self, kind: BeepKind) {
        debug!("beep {}", kind);
    }

    fn request_display_update(&mut self) {}

    fn request_status_update(&mut self) {}

    fn report_tx_denied(&mut self, reason: TxDenial) {
        warn!("TX denied: {}", reason.label());
    }

    fn report_tx_timeout(&mut self) {
        warn!("TX timeout");
    }
}

impl CallGate for Board {
    fn dtmf_call_pending(&self, _vfo: VfoIndex) -> bool {
        false
    }

    fn dtmf_character(&mut self, character: u8) {
        debug!("DTMF {}", character);
    }
}

/// Side keys
struct Keys {
    ptt: Key<Input<'static>>,
    monitor: Key<Input<'static>>,
}

impl Keys {
    fn sample(&mut self) -> UserInputs {
        let ptt = self.ptt.update();
        let monitor = self.monitor.update();
        UserInputs {
            ptt_held: self.ptt.is_pressed(),
            monitor_pressed: monitor == Some(true),
            key_activity: monitor == Some(true) || ptt == Some(true),
            key_held: self.monitor.is_pressed(),
            on_idle_screen: true,
        }
    }
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("UV-K5 control core v{}", env!("CARGO_PKG_VERSION"));

    let p = embassy_stm32::init(embassy_stm32::Config::default());

    info!("Peripherals initialized");

    let channels = factory_channels();
    let vfo_a = VfoConfig::new(Frequency::POWER_ON);
    let mut board = Board {
        squelch: StatusLine::new(Input::new(p.PA1, Pull::Down)),
        tone_detect: StatusLine::new(Input::new(p.PA0, Pull::Down)),
        audio: Switch::new(Output::new(p.PB0, Level::Low, Speed::Low)),
        tx_enable: Switch::new(Output::new(p.PC0, Level::Low, Speed::Low)),
        rf_sleep: Switch::new(Output::new(p.PC1, Level::Low, Speed::Low)),
        tx_led: Switch::new(Output::new(p.PA5, Level::Low, Speed::Low)),
        channels,
        vfos: [vfo_a, vfo_a],
        detector: ToneCode::OFF,
        power: PowerManager::default(),
    };
    board.select_channel(VfoIndex::B, ChannelNumber::FIRST);

    let keys = Keys {
        ptt: Key::new(Input::new(p.PA3, Pull::Up)),
        monitor: Key::new(Input::new(p.PA2, Pull::Up)),
    };
    let battery = BatteryAdc::new(p.ADC1, p.PB1);

    let settings = Settings::new();
    let controller = CONTROLLER.init(Mutex::new(RefCell::new(Controller::new(settings))));

    info!("Control core ready");

    spawner.spawn(tick_task(controller)).unwrap();
    spawner
        .spawn(control_task(controller, board, keys, battery))
        .unwrap();
}

/// 10 ms tick: advance the countdowns, then wake the control task
#[embassy_executor::task]
async fn tick_task(controller: &'static SharedController) {
    let mut tick = SystemTick::new();
    loop {
        let n = tick.next().await;
        controller.lock(|c| c.borrow_mut().tick());
        TICK.signal(n);
    }
}

/// Main loop: one controller pass per tick
#[embassy_executor::task]
async fn control_task(
    controller: &'static SharedController,
    mut board: Board,
    mut keys: Keys,
    mut battery: BatteryAdc<'static, PB1>,
) {
    controller.lock(|c| c.borrow_mut().start(&mut board));

    let mut stopwatch = Stopwatch::new();
    loop {
        let tick = TICK.wait().await;
        stopwatch.start();

        let inputs = keys.sample();
        let summary = controller.lock(|c| c.borrow_mut().process(&mut board, &inputs));

        if summary.half_second {
            board.power.update_battery(battery.sample());
        }
        if summary.transitioned {
            info!("tick {}: now {}", tick, summary.mode);
        }
        if stopwatch.overran_tick() {
            warn!("pass overran its tick ({} us)", stopwatch.elapsed().as_micros());
        }
    }
}
