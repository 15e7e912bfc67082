//! Countdown Registry
//!
//! A fixed bank of named countdowns, each paired with a one-shot trigger.
//! Values are counted in scheduler ticks. A countdown only moves when
//! [`Countdowns::tick_all`] decrements it or its owner rearms it; reaching
//! zero latches the trigger until the owner takes it.
//!
//! Some countdowns only run in particular operating modes. The rule for
//! each entry is expressed as a [`Gate`] so the conditions sit next to the
//! entry instead of being spread across the tick handler.

use crate::radio::state::OperatingMode;

/// Identifier of one countdown/trigger pair
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CountdownId {
    /// Idle time before battery save (state machine)
    BatterySave,
    /// Sleep window inside battery save (state machine)
    PowerSaveWake,
    /// Dual-watch alternation (dual-watch arbitrator)
    DualWatch,
    /// NOAA weather-channel alternation (dual-watch arbitrator)
    Noaa,
    /// Scan dwell / park window (scan arbitrator)
    ScanPause,
    /// Audio mute after a tail tone (tone confirmation)
    TailNoteElimination,
    /// CTCSS found debounce (tone confirmation)
    CtcssFound,
    /// DCS found debounce (tone confirmation)
    CdcssFound,
    /// Transmit timeout (transmit control)
    TxTimeout,
    /// Tail-tone hold after PTT release (transmit control)
    TxTail,
    /// VOX detection pause after a transmission (transmit control)
    VoxResume,
    /// VOX hang time (transmit control)
    VoxStop,
    /// Queued voice prompt playback (voice prompt player)
    VoicePrompt,
    /// FM broadcast scan dwell (FM radio)
    FmScan,
    /// Key auto-repeat (keyboard)
    KeyRepeat,
}

impl CountdownId {
    /// Number of countdowns in the registry
    pub const COUNT: usize = 15;

    /// Every countdown, in registry order
    pub const ALL: [Self; Self::COUNT] = [
        Self::BatterySave,
        Self::PowerSaveWake,
        Self::DualWatch,
        Self::Noaa,
        Self::ScanPause,
        Self::TailNoteElimination,
        Self::CtcssFound,
        Self::CdcssFound,
        Self::TxTimeout,
        Self::TxTail,
        Self::VoxResume,
        Self::VoxStop,
        Self::VoicePrompt,
        Self::FmScan,
        Self::KeyRepeat,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    /// Condition under which the scheduler decrements this countdown
    #[must_use]
    pub const fn gate(self) -> Gate {
        match self {
            Self::BatterySave => Gate::Foreground,
            Self::PowerSaveWake => Gate::PowerSaving,
            Self::DualWatch => Gate::DualWatch,
            Self::Noaa => Gate::Noaa,
            Self::ScanPause => Gate::Scan,
            Self::FmScan => Gate::FmScan,
            Self::TailNoteElimination
            | Self::CtcssFound
            | Self::CdcssFound
            | Self::TxTimeout
            | Self::TxTail
            | Self::VoxResume
            | Self::VoxStop
            | Self::VoicePrompt
            | Self::KeyRepeat => Gate::Always,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for CountdownId {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", defmt::Debug2Format(self));
    }
}

/// Snapshot of the state the gating rules look at
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickContext {
    /// Current operating mode
    pub mode: OperatingMode,
    /// Dual watch enabled in settings
    pub dual_watch: bool,
    /// NOAA alternation enabled and the listened VFO is on a weather channel
    pub noaa: bool,
    /// Frequency or channel scan running
    pub scan_active: bool,
    /// Tone scan running
    pub tone_scan_active: bool,
    /// FM broadcast scan running
    pub fm_scan_active: bool,
}

impl TickContext {
    /// Context with every feature disabled
    #[must_use]
    pub const fn idle(mode: OperatingMode) -> Self {
        Self {
            mode,
            dual_watch: false,
            noaa: false,
            scan_active: false,
            tone_scan_active: false,
            fm_scan_active: false,
        }
    }

    const fn any_scan(&self) -> bool {
        self.scan_active || self.tone_scan_active
    }

    const fn busy(&self) -> bool {
        matches!(
            self.mode,
            OperatingMode::Receiving | OperatingMode::Transmitting | OperatingMode::Monitoring
        )
    }
}

/// Decrement condition of a countdown
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    /// Every tick
    Always,
    /// Only in Foreground
    Foreground,
    /// Only in PowerSaving
    PowerSaving,
    /// Dual watch on, no scan, not receiving/transmitting/monitoring
    DualWatch,
    /// NOAA alternation on, dual watch off, no scan, not receiving/transmitting/monitoring
    Noaa,
    /// Scan or tone scan running, not monitoring/transmitting
    Scan,
    /// FM scan running, not receiving/transmitting/monitoring
    FmScan,
}

impl Gate {
    /// Check whether the countdown may decrement this tick
    #[must_use]
    pub const fn allows(self, ctx: &TickContext) -> bool {
        match self {
            Self::Always => true,
            Self::Foreground => matches!(ctx.mode, OperatingMode::Foreground),
            Self::PowerSaving => matches!(ctx.mode, OperatingMode::PowerSaving),
            Self::DualWatch => ctx.dual_watch && !ctx.any_scan() && !ctx.busy(),
            Self::Noaa => ctx.noaa && !ctx.dual_watch && !ctx.any_scan() && !ctx.busy(),
            Self::Scan => {
                ctx.any_scan()
                    && !matches!(
                        ctx.mode,
                        OperatingMode::Monitoring | OperatingMode::Transmitting
                    )
            }
            Self::FmScan => ctx.fm_scan_active && !ctx.busy(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Countdown {
    value: u32,
    fired: bool,
}

/// The registry of every countdown/trigger pair
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Countdowns {
    slots: [Countdown; CountdownId::COUNT],
}

impl Countdowns {
    /// Create a registry with every countdown stopped
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [Countdown {
                value: 0,
                fired: false,
            }; CountdownId::COUNT],
        }
    }

    /// Rearm a countdown. Arming with zero cancels it.
    ///
    /// Any trigger that fired earlier and was not taken is discarded.
    pub fn arm(&mut self, id: CountdownId, ticks: u32) {
        self.slots[id.index()] = Countdown {
            value: ticks,
            fired: false,
        };
    }

    /// Stop a countdown and discard its pending trigger
    pub fn cancel(&mut self, id: CountdownId) {
        self.arm(id, 0);
    }

    /// Remaining ticks
    #[must_use]
    pub const fn value(&self, id: CountdownId) -> u32 {
        self.slots[id.index()].value
    }

    /// True while the countdown has ticks left
    #[must_use]
    pub const fn is_running(&self, id: CountdownId) -> bool {
        self.slots[id.index()].value > 0
    }

    /// True if the trigger fired and has not been taken
    #[must_use]
    pub const fn is_triggered(&self, id: CountdownId) -> bool {
        self.slots[id.index()].fired
    }

    /// Take the trigger, clearing it
    pub fn take_trigger(&mut self, id: CountdownId) -> bool {
        core::mem::take(&mut self.slots[id.index()].fired)
    }

    /// Decrement every running countdown whose gate allows it
    pub fn tick_all(&mut self, ctx: &TickContext) {
        for id in CountdownId::ALL {
            if !id.gate().allows(ctx) {
                continue;
            }
            let slot = &mut self.slots[id.index()];
            if slot.value > 0 {
                slot.value -= 1;
                if slot.value == 0 {
                    slot.fired = true;
                }
            }
        }
    }
}

impl Default for Countdowns {
    fn default() -> Self {
        Self::new()
    }
}
