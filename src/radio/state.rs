//! Operating-Mode State Machine
//!
//! Holds the one live operating mode and decides every transition between
//! modes. The transition function is pure: it takes the current state and
//! one event and returns the next state plus a list of [`Effect`]s for the
//! controller to apply. It owns no timers; every delay is a countdown that
//! it arms or cancels through an effect.
//!
//! ```text
//!             squelch opens               confirmed
//!  Foreground ─────────────► Confirming ──────────────► Receiving
//!      ▲  ▲                      │  ended                   │ ended / tail
//!      │  └──────────────────────┴──────────────────────────┘
//!      │ wake          battery save due
//!  PowerSaving ◄──────────────────────── Foreground
//!
//!  any but Transmitting ── PTT (allowed) ──► Transmitting ── release/timeout ──► Foreground
//!  Foreground ◄── monitor key ──► Monitoring
//! ```

use heapless::Vec;

use super::transmit::{TxDenial, TxPermission, TxPhase, TxSource};
use super::vfo::VfoIndex;
use crate::config::{Settings, POWER_SAVE_LISTEN_TICKS, VOX_RESUME_TICKS};
use crate::platform::BeepKind;
use crate::scheduler::CountdownId;

/// Operating mode of the radio
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OperatingMode {
    /// Idle, listening for a carrier
    #[default]
    Foreground,
    /// Carrier confirmed, audio open
    Receiving,
    /// Carrier detected, waiting for tone confirmation
    ConfirmingSignal,
    /// Transmitting
    Transmitting,
    /// Squelch forced open by the monitor key
    Monitoring,
    /// Receiver duty-cycled off
    PowerSaving,
}

impl OperatingMode {
    /// True while a reception is being confirmed or received
    #[must_use]
    pub const fn is_reception(self) -> bool {
        matches!(self, Self::Receiving | Self::ConfirmingSignal)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for OperatingMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Foreground => defmt::write!(f, "FOREGROUND"),
            Self::Receiving => defmt::write!(f, "RECEIVE"),
            Self::ConfirmingSignal => defmt::write!(f, "INCOMING"),
            Self::Transmitting => defmt::write!(f, "TRANSMIT"),
            Self::Monitoring => defmt::write!(f, "MONITOR"),
            Self::PowerSaving => defmt::write!(f, "POWER-SAVE"),
        }
    }
}

/// Listen mode that caught a carrier
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenOrigin {
    /// Plain listening on the selected VFO
    Plain,
    /// Frequency or channel scan
    Scan,
    /// Dual-watch alternation
    DualWatch,
}

/// Context of one reception, alive from squelch open until it ends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReceptionContext {
    /// VFO that heard the carrier
    pub vfo: VfoIndex,
    /// Listen mode that caught it
    pub origin: ListenOrigin,
}

impl ReceptionContext {
    /// Create a reception context
    #[must_use]
    pub const fn new(vfo: VfoIndex, origin: ListenOrigin) -> Self {
        Self { vfo, origin }
    }
}

/// Live mode together with the data that only exists in that mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ModeState {
    /// Idle
    #[default]
    Foreground,
    /// Waiting for confirmation
    ConfirmingSignal(ReceptionContext),
    /// Audio open
    Receiving(ReceptionContext),
    /// Transmitting
    Transmitting {
        /// Transmitting VFO
        vfo: VfoIndex,
        /// Keying source
        source: TxSource,
        /// Keyed or sending the tail tone
        phase: TxPhase,
    },
    /// Squelch forced open
    Monitoring,
    /// Receiver asleep
    PowerSaving,
}

impl ModeState {
    /// Plain mode value
    #[must_use]
    pub const fn mode(&self) -> OperatingMode {
        match self {
            Self::Foreground => OperatingMode::Foreground,
            Self::ConfirmingSignal(_) => OperatingMode::ConfirmingSignal,
            Self::Receiving(_) => OperatingMode::Receiving,
            Self::Transmitting { .. } => OperatingMode::Transmitting,
            Self::Monitoring => OperatingMode::Monitoring,
            Self::PowerSaving => OperatingMode::PowerSaving,
        }
    }

    /// Active reception, if any
    #[must_use]
    pub const fn reception(&self) -> Option<ReceptionContext> {
        match self {
            Self::ConfirmingSignal(ctx) | Self::Receiving(ctx) => Some(*ctx),
            _ => None,
        }
    }

    /// True while the transmitter is keyed or winding down
    #[must_use]
    pub const fn is_transmitting(&self) -> bool {
        matches!(self, Self::Transmitting { .. })
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ModeState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::ConfirmingSignal(ctx) | Self::Receiving(ctx) => {
                defmt::write!(f, "{}({})", self.mode(), ctx.vfo);
            }
            Self::Transmitting { vfo, source, .. } => {
                defmt::write!(f, "TRANSMIT({}, {})", vfo, source);
            }
            _ => defmt::write!(f, "{}", self.mode()),
        }
    }
}

/// Input to the transition function
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeEvent {
    /// Squelch opened (rising edge)
    SquelchOpened(ReceptionContext),
    /// Confirmation reported a valid reception
    Confirmed {
        /// A DTMF call handshake still holds the audio closed
        dtmf_gated: bool,
    },
    /// Reception ended or was a false alarm
    Ended,
    /// Reception abandoned by an arbitrator (scan moved on)
    Abandoned,
    /// Transmit requested
    TransmitRequested {
        /// VFO to transmit on
        vfo: VfoIndex,
        /// Keying source
        source: TxSource,
        /// Outcome of the permission check
        permission: TxPermission,
    },
    /// Keying source released
    TransmitReleased(TxSource),
    /// Tail-tone hold expired
    TxTailExpired,
    /// Transmit timeout expired
    TxTimeout,
    /// Monitor key pressed
    MonitorToggled,
    /// Idle long enough to duty-cycle the receiver
    BatterySaveDue {
        /// Sleep window before the next listen
        sleep_ticks: u32,
    },
    /// Leave power save
    Wake {
        /// Woken by the duty-cycle timer rather than by the user
        scheduled: bool,
    },
}

#[cfg(feature = "embedded")]
impl defmt::Format for ModeEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::SquelchOpened(ctx) => defmt::write!(f, "SquelchOpened({})", ctx.vfo),
            Self::Confirmed { dtmf_gated } => defmt::write!(f, "Confirmed(gated={})", dtmf_gated),
            Self::Ended => defmt::write!(f, "Ended"),
            Self::Abandoned => defmt::write!(f, "Abandoned"),
            Self::TransmitRequested { permission, .. } => {
                defmt::write!(f, "TransmitRequested({})", permission);
            }
            Self::TransmitReleased(source) => defmt::write!(f, "TransmitReleased({})", source),
            Self::TxTailExpired => defmt::write!(f, "TxTailExpired"),
            Self::TxTimeout => defmt::write!(f, "TxTimeout"),
            Self::MonitorToggled => defmt::write!(f, "MonitorToggled"),
            Self::BatterySaveDue { sleep_ticks } => {
                defmt::write!(f, "BatterySaveDue({})", sleep_ticks);
            }
            Self::Wake { scheduled } => defmt::write!(f, "Wake(scheduled={})", scheduled),
        }
    }
}

/// Something that happened which other components react to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    /// Squelch opened and a reception is being confirmed
    ListenStarted(ReceptionContext),
    /// Reception confirmed, audio open
    ReceptionConfirmed(ReceptionContext),
    /// Reception over (carrier or tone gone)
    ReceptionEnded(ReceptionContext),
    /// Reception dropped by the scan or dual watch moving on
    ReceptionAbandoned(ReceptionContext),
    /// Transmission started
    TransmitStarted,
    /// Transmission over
    TransmitEnded {
        /// Cut by the transmit timeout
        timed_out: bool,
    },
}

/// Side effect requested by a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Reconfigure hardware for a mode
    EnterMode(OperatingMode),
    /// Open or close the receive audio path
    AudioPath(bool),
    /// Rearm a countdown
    Arm(CountdownId, u32),
    /// Cancel a countdown
    Cancel(CountdownId),
    /// Play a beep
    Beep(BeepKind),
    /// Report a refused transmission
    TxDenied(TxDenial),
    /// Report a transmission cut by the timeout
    TxTimedOut,
    /// Start the end-of-transmission tail tone
    SendTailTone,
    /// Inform the other components
    Notify(Notice),
}

/// Longest effect list a single transition produces
pub const MAX_EFFECTS: usize = 10;

/// Effect list of one transition
pub type Effects = Vec<Effect, MAX_EFFECTS>;

/// Result of applying one event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// State after the event
    pub next: ModeState,
    /// Effects to apply, in order
    pub effects: Effects,
}

impl Transition {
    fn stay(state: ModeState) -> Self {
        Self {
            next: state,
            effects: Vec::new(),
        }
    }

    fn to(next: ModeState) -> Self {
        let mut t = Self::stay(next);
        t.push(Effect::EnterMode(next.mode()));
        t
    }

    fn push(&mut self, effect: Effect) {
        let pushed = self.effects.push(effect);
        debug_assert!(pushed.is_ok(), "effect list full");
    }

    fn with(mut self, effect: Effect) -> Self {
        self.push(effect);
        self
    }

    /// True if the mode changed
    #[must_use]
    pub fn changed_from(&self, previous: &ModeState) -> bool {
        self.next.mode() != previous.mode()
    }
}

/// Apply an event to the mode state, returning the next state and effects
#[must_use]
pub fn transition(state: ModeState, event: ModeEvent, settings: &Settings) -> Transition {
    match (state, event) {
        (ModeState::Foreground | ModeState::PowerSaving, ModeEvent::SquelchOpened(ctx)) => {
            let t = Transition::to(ModeState::ConfirmingSignal(ctx))
                .with(Effect::Notify(Notice::ListenStarted(ctx)));
            if state == ModeState::PowerSaving {
                t.with(Effect::Cancel(CountdownId::PowerSaveWake))
            } else {
                t
            }
        }

        (ModeState::ConfirmingSignal(ctx), ModeEvent::Confirmed { dtmf_gated }) => {
            if dtmf_gated {
                Transition::stay(state)
            } else {
                Transition::to(ModeState::Receiving(ctx))
                    .with(Effect::AudioPath(true))
                    .with(Effect::Notify(Notice::ReceptionConfirmed(ctx)))
            }
        }

        (ModeState::ConfirmingSignal(ctx) | ModeState::Receiving(ctx), ModeEvent::Ended) => {
            to_idle(settings).with(Effect::Notify(Notice::ReceptionEnded(ctx)))
        }

        (ModeState::ConfirmingSignal(ctx) | ModeState::Receiving(ctx), ModeEvent::Abandoned) => {
            to_idle(settings).with(Effect::Notify(Notice::ReceptionAbandoned(ctx)))
        }

        (
            ModeState::Transmitting { .. },
            ModeEvent::TransmitRequested { .. },
        ) => Transition::stay(state),

        (
            _,
            ModeEvent::TransmitRequested {
                vfo,
                source,
                permission,
            },
        ) => match permission {
            TxPermission::Denied(reason) => Transition::stay(state)
                .with(Effect::Beep(BeepKind::Error))
                .with(Effect::TxDenied(reason)),
            TxPermission::Allowed => start_transmit(state, vfo, source, settings),
        },

        (
            ModeState::Transmitting {
                vfo,
                source,
                phase: TxPhase::Keyed,
            },
            ModeEvent::TransmitReleased(released),
        ) if released == source => {
            if settings.tx_tail_ticks > 0 {
                Transition::stay(ModeState::Transmitting {
                    vfo,
                    source,
                    phase: TxPhase::WindDown,
                })
                .with(Effect::SendTailTone)
                .with(Effect::Arm(CountdownId::TxTail, settings.tx_tail_ticks))
            } else {
                end_transmit(settings, false)
            }
        }

        (
            ModeState::Transmitting {
                phase: TxPhase::WindDown,
                ..
            },
            ModeEvent::TxTailExpired,
        ) => end_transmit(settings, false),

        (ModeState::Transmitting { .. }, ModeEvent::TxTimeout) => end_transmit(settings, true)
            .with(Effect::Cancel(CountdownId::TxTail))
            .with(Effect::Beep(BeepKind::TxTimeout))
            .with(Effect::TxTimedOut),

        (ModeState::Monitoring, ModeEvent::MonitorToggled) => to_idle(settings),

        (
            ModeState::Foreground
            | ModeState::PowerSaving
            | ModeState::ConfirmingSignal(_)
            | ModeState::Receiving(_),
            ModeEvent::MonitorToggled,
        ) => {
            let t = Transition::to(ModeState::Monitoring)
                .with(Effect::Cancel(CountdownId::PowerSaveWake))
                .with(Effect::AudioPath(true));
            match state.reception() {
                Some(ctx) => t.with(Effect::Notify(Notice::ReceptionEnded(ctx))),
                None => t,
            }
        }

        (
            ModeState::Foreground | ModeState::Receiving(_),
            ModeEvent::BatterySaveDue { sleep_ticks },
        ) => {
            let t = Transition::to(ModeState::PowerSaving)
                .with(Effect::AudioPath(false))
                .with(Effect::Arm(CountdownId::PowerSaveWake, sleep_ticks));
            match state.reception() {
                Some(ctx) => t.with(Effect::Notify(Notice::ReceptionEnded(ctx))),
                None => t,
            }
        }

        (ModeState::PowerSaving, ModeEvent::Wake { scheduled }) => {
            let idle = if scheduled {
                POWER_SAVE_LISTEN_TICKS
            } else {
                settings.battery_save_idle_ticks
            };
            Transition::to(ModeState::Foreground)
                .with(Effect::Cancel(CountdownId::PowerSaveWake))
                .with(Effect::Arm(CountdownId::BatterySave, idle))
        }

        _ => Transition::stay(state),
    }
}

fn to_idle(settings: &Settings) -> Transition {
    Transition::to(ModeState::Foreground)
        .with(Effect::AudioPath(false))
        .with(Effect::Arm(
            CountdownId::BatterySave,
            settings.battery_save_idle_ticks,
        ))
}

fn start_transmit(
    state: ModeState,
    vfo: VfoIndex,
    source: TxSource,
    settings: &Settings,
) -> Transition {
    let mut t = Transition::to(ModeState::Transmitting {
        vfo,
        source,
        phase: TxPhase::Keyed,
    });

    if state.mode() != OperatingMode::Foreground {
        t.push(Effect::AudioPath(false));
    }
    t.push(Effect::Cancel(CountdownId::PowerSaveWake));
    t.push(Effect::Cancel(CountdownId::VoxStop));

    if settings.tx_timeout_ticks > 0 {
        t.push(Effect::Arm(CountdownId::TxTimeout, settings.tx_timeout_ticks));
    }

    if let Some(ctx) = state.reception() {
        t.push(Effect::Notify(Notice::ReceptionEnded(ctx)));
    }
    t.with(Effect::Notify(Notice::TransmitStarted))
}

fn end_transmit(settings: &Settings, timed_out: bool) -> Transition {
    let t = Transition::to(ModeState::Foreground)
        .with(Effect::Cancel(CountdownId::TxTimeout))
        .with(Effect::Arm(
            CountdownId::BatterySave,
            settings.battery_save_idle_ticks,
        ))
        .with(Effect::Notify(Notice::TransmitEnded { timed_out }));

    if settings.vox {
        t.with(Effect::Arm(CountdownId::VoxResume, VOX_RESUME_TICKS))
    } else {
        t
    }
}
