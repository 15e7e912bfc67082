//! System configuration and timing constants
//!
//! Every duration in this module is counted in scheduler ticks. One tick is
//! one 10 ms pulse of the hardware timer.
//!
//! Compile-time constants live at the top level; user-adjustable options
//! loaded from persistent storage are collected in [`Settings`].

use crate::types::ChannelNumber;

/// Scheduler tick period in milliseconds
pub const TICK_MS: u32 = 10;

/// Ticks between half-second flags
pub const HALF_SECOND_TICKS: u32 = 50;

/// Ticks between tail-tone sampling flags (40 ms)
pub const TAIL_SAMPLE_TICKS: u32 = 4;

/// Debounce before a found CTCSS/DCS code confirms a reception (1 s)
pub const TONE_FOUND_DEBOUNCE_TICKS: u32 = 100;

/// Audio mute window after a tail tone is detected (200 ms)
pub const TAIL_NOTE_ELIMINATION_TICKS: u32 = 20;

/// Default idle time before battery save starts (10 s)
pub const BATTERY_SAVE_IDLE_TICKS: u32 = 1000;

/// Receiver listen window after a battery-save wake (100 ms)
pub const POWER_SAVE_LISTEN_TICKS: u32 = 10;

/// Sleep time per battery-save ratio step (100 ms)
pub const POWER_SAVE_SLEEP_UNIT_TICKS: u32 = 10;

/// Steady-state dual-watch alternation period (100 ms)
pub const DUAL_WATCH_TOGGLE_TICKS: u32 = 10;

/// Dual-watch hold after a squelch opening or a reception (1 s)
pub const DUAL_WATCH_AFTER_RX_TICKS: u32 = 100;

/// Dual-watch hold after a transmission (3.6 s)
pub const DUAL_WATCH_AFTER_TX_TICKS: u32 = 360;

/// Scan dwell on a frequency-step candidate (100 ms)
pub const SCAN_FREQUENCY_DWELL_TICKS: u32 = 10;

/// Scan dwell on a memory-channel candidate (200 ms)
pub const SCAN_CHANNEL_DWELL_TICKS: u32 = 20;

/// Scan dwell on a memory-channel candidate when the scan stops on signal (300 ms)
pub const SCAN_SEARCH_DWELL_TICKS: u32 = 30;

/// Time a scan waits for a carrier to confirm before moving on (200 ms)
pub const SCAN_CONFIRM_TICKS: u32 = 20;

/// Time parked on a hit in time-operated resume mode (5 s)
pub const SCAN_RESUME_TIMEOUT_TICKS: u32 = 500;

/// Guard interval after carrier loss in carrier-operated resume mode (1 s)
pub const SCAN_RESUME_CARRIER_GUARD_TICKS: u32 = 100;

/// Dwell per candidate during a tone scan (210 ms)
pub const TONE_SCAN_DWELL_TICKS: u32 = 21;

/// NOAA weather-channel alternation period (70 ms)
pub const NOAA_ALTERNATE_TICKS: u32 = 7;

/// NOAA alternation hold after a reception (5 s)
pub const NOAA_AFTER_RX_TICKS: u32 = 500;

/// VOX hang time after voice stops (1 s)
pub const VOX_STOP_TICKS: u32 = 100;

/// VOX detection pause after a transmission (800 ms)
pub const VOX_RESUME_TICKS: u32 = 80;

/// Default transmit timeout (60 s)
pub const DEFAULT_TX_TIMEOUT_TICKS: u32 = 6000;

/// Longest transmit timeout accepted from storage (15 min)
pub const MAX_TX_TIMEOUT_TICKS: u32 = 90_000;

/// Default tail-tone hold after PTT release (0 = release immediately)
pub const DEFAULT_TX_TAIL_TICKS: u32 = 0;

/// Longest tail-tone hold accepted from storage (1 s)
pub const MAX_TX_TAIL_TICKS: u32 = 100;

/// Battery-save duty cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BatterySave {
    /// Receiver always on
    Off,
    /// Sleep `ratio` units per listen window (1..=4)
    Ratio(u8),
    /// Default 1:4 duty cycle
    #[default]
    Max,
}

impl BatterySave {
    /// Sleep window for this duty cycle, None when disabled
    #[must_use]
    pub const fn sleep_ticks(self) -> Option<u32> {
        match self {
            Self::Off => None,
            Self::Ratio(r) => Some(r as u32 * POWER_SAVE_SLEEP_UNIT_TICKS),
            Self::Max => Some(4 * POWER_SAVE_SLEEP_UNIT_TICKS),
        }
    }

    /// Clamp a stored ratio (0 = off, 1..=4)
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Off,
            1..=3 => Self::Ratio(raw),
            _ => Self::Max,
        }
    }
}

/// Dual-watch preference
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DualWatch {
    /// Listen only on the selected VFO
    #[default]
    Off,
    /// Alternate, returning home to VFO A
    HomeA,
    /// Alternate, returning home to VFO B
    HomeB,
}

impl DualWatch {
    /// True when alternation is enabled
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// What the scanner does after a confirmed reception
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScanResumeMode {
    /// Park for a fixed window, then continue
    #[default]
    TimeoutThenContinue,
    /// Park while the carrier is present, continue after it drops
    CarrierOperated,
    /// Stop scanning on the hit
    StopOnSignal,
}

/// Which memory channels a scan visits
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScanListSelection {
    /// Channels flagged for scan list 1
    #[default]
    List1,
    /// Channels flagged for scan list 2
    List2,
    /// Every programmed channel
    All,
}

impl ScanListSelection {
    /// Index into the per-list priority table
    #[must_use]
    pub const fn list_index(self) -> Option<usize> {
        match self {
            Self::List1 => Some(0),
            Self::List2 => Some(1),
            Self::All => None,
        }
    }
}

/// Runtime settings loaded from persistent storage
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Battery-save duty cycle
    pub battery_save: BatterySave,
    /// Idle time before battery save
    pub battery_save_idle_ticks: u32,
    /// Dual-watch preference
    pub dual_watch: DualWatch,
    /// Steady-state alternation period
    pub dual_watch_period_ticks: u32,
    /// Alternation hold after a reception ends
    pub dual_watch_after_rx_ticks: u32,
    /// Scan resume behaviour
    pub scan_resume: ScanResumeMode,
    /// Active scan list
    pub scan_list: ScanListSelection,
    /// Priority channels for scan list 1 and 2
    pub priority_channels: [[Option<ChannelNumber>; 2]; 2],
    /// Mute the squelch tail when a tail tone is seen
    pub tail_note_elimination: bool,
    /// Tail-tone hold after PTT release (0 = none)
    pub tx_tail_ticks: u32,
    /// Transmit timeout (0 = none)
    pub tx_timeout_ticks: u32,
    /// Voice-operated transmit
    pub vox: bool,
    /// Alternate NOAA weather channels when idle
    pub noaa_alternation: bool,
    /// Squelch level (0 = open)
    pub squelch_level: u8,
}

impl Settings {
    /// Factory defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            battery_save: BatterySave::Max,
            battery_save_idle_ticks: BATTERY_SAVE_IDLE_TICKS,
            dual_watch: DualWatch::Off,
            dual_watch_period_ticks: DUAL_WATCH_TOGGLE_TICKS,
            dual_watch_after_rx_ticks: DUAL_WATCH_AFTER_RX_TICKS,
            scan_resume: ScanResumeMode::TimeoutThenContinue,
            scan_list: ScanListSelection::List1,
            priority_channels: [[None; 2]; 2],
            tail_note_elimination: false,
            tx_tail_ticks: DEFAULT_TX_TAIL_TICKS,
            tx_timeout_ticks: DEFAULT_TX_TIMEOUT_TICKS,
            vox: false,
            noaa_alternation: false,
            squelch_level: 1,
        }
    }

    /// Set battery save (returns new settings)
    #[must_use]
    pub const fn with_battery_save(self, battery_save: BatterySave) -> Self {
        Self {
            battery_save,
            ..self
        }
    }

    /// Set dual watch (returns new settings)
    #[must_use]
    pub const fn with_dual_watch(self, dual_watch: DualWatch) -> Self {
        Self { dual_watch, ..self }
    }

    /// Set scan resume mode (returns new settings)
    #[must_use]
    pub const fn with_scan_resume(self, scan_resume: ScanResumeMode) -> Self {
        Self {
            scan_resume,
            ..self
        }
    }

    /// Set active scan list (returns new settings)
    #[must_use]
    pub const fn with_scan_list(self, scan_list: ScanListSelection) -> Self {
        Self { scan_list, ..self }
    }

    /// Set priority channels of one scan list (returns new settings)
    #[must_use]
    pub fn with_priority_channels(
        self,
        list: usize,
        first: Option<ChannelNumber>,
        second: Option<ChannelNumber>,
    ) -> Self {
        let mut priority_channels = self.priority_channels;
        if list < 2 {
            priority_channels[list] = [first, second];
        }
        Self {
            priority_channels,
            ..self
        }
    }

    /// Enable or disable tail-note elimination (returns new settings)
    #[must_use]
    pub const fn with_tail_note_elimination(self, enabled: bool) -> Self {
        Self {
            tail_note_elimination: enabled,
            ..self
        }
    }

    /// Set tail-tone hold (returns new settings)
    #[must_use]
    pub const fn with_tx_tail(self, ticks: u32) -> Self {
        Self {
            tx_tail_ticks: ticks,
            ..self
        }
    }

    /// Set transmit timeout (returns new settings)
    #[must_use]
    pub const fn with_tx_timeout(self, ticks: u32) -> Self {
        Self {
            tx_timeout_ticks: ticks,
            ..self
        }
    }

    /// Enable or disable VOX (returns new settings)
    #[must_use]
    pub const fn with_vox(self, vox: bool) -> Self {
        Self { vox, ..self }
    }

    /// Enable or disable NOAA alternation (returns new settings)
    #[must_use]
    pub const fn with_noaa_alternation(self, enabled: bool) -> Self {
        Self {
            noaa_alternation: enabled,
            ..self
        }
    }

    /// Set squelch level (returns new settings)
    #[must_use]
    pub const fn with_squelch_level(self, level: u8) -> Self {
        Self {
            squelch_level: level,
            ..self
        }
    }

    /// Clamp values that may come back corrupted from storage
    #[must_use]
    pub fn validated(self) -> Self {
        let battery_save = match self.battery_save {
            BatterySave::Ratio(0) => BatterySave::Off,
            BatterySave::Ratio(r) if r >= 4 => BatterySave::Max,
            other => other,
        };
        let nonzero = |ticks: u32, fallback: u32| if ticks == 0 { fallback } else { ticks };

        Self {
            battery_save,
            battery_save_idle_ticks: nonzero(self.battery_save_idle_ticks, BATTERY_SAVE_IDLE_TICKS),
            dual_watch_period_ticks: nonzero(self.dual_watch_period_ticks, DUAL_WATCH_TOGGLE_TICKS),
            dual_watch_after_rx_ticks: nonzero(
                self.dual_watch_after_rx_ticks,
                DUAL_WATCH_AFTER_RX_TICKS,
            ),
            tx_tail_ticks: self.tx_tail_ticks.min(MAX_TX_TAIL_TICKS),
            tx_timeout_ticks: self.tx_timeout_ticks.min(MAX_TX_TIMEOUT_TICKS),
            squelch_level: self.squelch_level.min(9),
            ..self
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Pin assignments for the bring-up board
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// Transmit indicator LED
    pub const LED_STATUS: &str = "PA5";

    /// PTT input (active low)
    pub const PTT_IN: &str = "PA3";

    /// Monitor side key (active low)
    pub const MONITOR_KEY: &str = "PA2";

    /// Squelch-open line from the RF module (active high)
    pub const SQUELCH_IN: &str = "PA1";

    /// Sub-audible detector output from the RF module (active high)
    pub const TONE_DETECT_IN: &str = "PA0";

    /// Audio amplifier enable
    pub const AUDIO_EN: &str = "PB0";

    /// RF module transmit enable
    pub const TX_EN: &str = "PC0";

    /// RF module power-down (active high)
    pub const RF_SLEEP: &str = "PC1";

    /// Battery voltage divider ADC input
    pub const BATTERY_ADC: &str = "PB1";
}
