//! Tone/Squelch Confirmation
//!
//! Decides when an open squelch becomes a reception worth unmuting for.
//! Without a sub-audible code the carrier alone confirms. With CTCSS or DCS
//! the found flag must hold for [`TONE_FOUND_DEBOUNCE_TICKS`] without a
//! lost flag in between. A tail tone at the end of a transmission mutes
//! the audio for [`TAIL_NOTE_ELIMINATION_TICKS`] and then ends the
//! reception, so the squelch crash is never heard.

use crate::config::{Settings, TAIL_NOTE_ELIMINATION_TICKS, TONE_FOUND_DEBOUNCE_TICKS};
use crate::platform::InterruptFlags;
use crate::scheduler::{CountdownId, Countdowns};
use crate::types::{CodeType, ToneCode};

use super::vfo::VfoIndex;

/// Why a reception ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndCause {
    /// Carrier dropped below the squelch threshold
    SquelchClosed,
    /// Sub-audible code lost after confirmation
    ToneLost,
    /// Tail tone muted and the mute window elapsed
    TailEliminated,
}

#[cfg(feature = "embedded")]
impl defmt::Format for EndCause {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::SquelchClosed => defmt::write!(f, "squelch closed"),
            Self::ToneLost => defmt::write!(f, "tone lost"),
            Self::TailEliminated => defmt::write!(f, "tail eliminated"),
        }
    }
}

/// Inputs for one evaluation pass
#[derive(Clone, Copy, Debug)]
pub struct ToneInputs {
    /// Interrupt flags read this pass
    pub flags: InterruptFlags,
    /// Current squelch level
    pub squelch_open: bool,
    /// 40 ms tail-sampling flag
    pub tail_sample: bool,
    /// A reception is being confirmed or received
    pub in_reception: bool,
}

/// Result of one evaluation pass
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ToneVerdict {
    /// The listened VFO carries a valid reception
    pub confirmed: bool,
    /// The active reception ended this pass
    pub ended: Option<EndCause>,
    /// A tail tone was caught; audio must mute now
    pub tail_started: bool,
}

/// Tone tracking for one VFO
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ToneState {
    code: ToneCode,
    found: bool,
    debounce: Option<ToneCode>,
    confirmed: bool,
    lost_sticky: bool,
    tail_sticky: bool,
}

impl ToneState {
    /// Code the detector is programmed for
    #[must_use]
    pub const fn code(&self) -> ToneCode {
        self.code
    }

    /// Found flag seen and not lost since
    #[must_use]
    pub const fn is_found(&self) -> bool {
        self.found
    }

    /// Debounce passed
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// A lost flag was seen since the last found flag
    #[must_use]
    pub const fn lost_seen(&self) -> bool {
        self.lost_sticky
    }

    /// Tail tone seen and not yet sampled
    #[must_use]
    pub const fn tail_pending(&self) -> bool {
        self.tail_sticky
    }

    fn fresh(code: ToneCode) -> Self {
        Self {
            code,
            ..Self::default()
        }
    }
}

const fn debounce_id(code_type: CodeType) -> Option<CountdownId> {
    match code_type {
        CodeType::Off => None,
        CodeType::ContinuousTone => Some(CountdownId::CtcssFound),
        CodeType::Digital | CodeType::ReverseDigital => Some(CountdownId::CdcssFound),
    }
}

fn lost_flag(flags: &InterruptFlags, code_type: CodeType) -> bool {
    match code_type {
        CodeType::Off => false,
        CodeType::ContinuousTone => flags.ctcss_lost,
        CodeType::Digital | CodeType::ReverseDigital => {
            flags.cdcss_lost.is_some() && flags.cdcss_lost == code_type.expected_polarity()
        }
    }
}

/// Confirmation state of both VFOs
#[derive(Clone, Debug, Default)]
pub struct ToneConfirmation {
    vfos: [ToneState; 2],
    tail_muting: bool,
}

impl ToneConfirmation {
    /// Both VFOs without a code
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracking state of one VFO
    #[must_use]
    pub const fn state(&self, vfo: VfoIndex) -> &ToneState {
        &self.vfos[vfo.index()]
    }

    /// Audio held muted by tail-note elimination
    #[must_use]
    pub const fn is_tail_muting(&self) -> bool {
        self.tail_muting
    }

    /// Start over for a VFO after retuning or a configuration edit.
    ///
    /// Any debounce still running is cancelled so its trigger can never
    /// confirm against the new code.
    pub fn reconfigure(&mut self, vfo: VfoIndex, code: ToneCode, countdowns: &mut Countdowns) {
        let old = self.vfos[vfo.index()];
        if old.debounce.is_some() {
            if let Some(id) = debounce_id(old.code.code_type) {
                countdowns.cancel(id);
            }
        }
        self.vfos[vfo.index()] = ToneState::fresh(code);
        if self.tail_muting {
            self.tail_muting = false;
            countdowns.cancel(CountdownId::TailNoteElimination);
        }
    }

    /// Evaluate the listened VFO for one main-loop pass
    pub fn evaluate(
        &mut self,
        vfo: VfoIndex,
        inputs: &ToneInputs,
        settings: &Settings,
        countdowns: &mut Countdowns,
    ) -> ToneVerdict {
        let mut verdict = ToneVerdict::default();
        let state = &mut self.vfos[vfo.index()];
        let code_type = state.code.code_type;
        let mut lost_after_confirm = false;

        if let Some(id) = debounce_id(code_type) {
            if inputs.flags.tone_found(code_type) && !state.found {
                state.found = true;
                state.lost_sticky = false;
                state.debounce = Some(state.code);
                countdowns.arm(id, TONE_FOUND_DEBOUNCE_TICKS);
            }

            if lost_flag(&inputs.flags, code_type) {
                state.found = false;
                state.lost_sticky = true;
                if state.debounce.take().is_some() {
                    countdowns.cancel(id);
                }
                if state.confirmed {
                    state.confirmed = false;
                    lost_after_confirm = true;
                }
            }

            if countdowns.take_trigger(id) {
                // a trigger armed for another code is stale
                if state.debounce.take() == Some(state.code) && state.found {
                    state.confirmed = true;
                }
            }
        }

        if settings.tail_note_elimination && inputs.flags.tail_detected {
            state.tail_sticky = true;
        }

        if inputs.tail_sample && core::mem::take(&mut state.tail_sticky) {
            if inputs.in_reception && !self.tail_muting {
                self.tail_muting = true;
                countdowns.arm(CountdownId::TailNoteElimination, TAIL_NOTE_ELIMINATION_TICKS);
                verdict.tail_started = true;
            }
        }

        let tone_ok = match code_type {
            CodeType::Off => true,
            _ => state.confirmed,
        };
        verdict.confirmed = inputs.squelch_open && tone_ok && !self.tail_muting;

        if self.tail_muting && countdowns.take_trigger(CountdownId::TailNoteElimination) {
            self.tail_muting = false;
            verdict.ended = Some(EndCause::TailEliminated);
        } else if inputs.in_reception && !inputs.squelch_open {
            if self.tail_muting {
                self.tail_muting = false;
                countdowns.cancel(CountdownId::TailNoteElimination);
            }
            verdict.ended = Some(EndCause::SquelchClosed);
        } else if inputs.in_reception && lost_after_confirm {
            verdict.ended = Some(EndCause::ToneLost);
        }

        if verdict.ended.is_some() {
            if state.debounce.take().is_some() {
                if let Some(id) = debounce_id(code_type) {
                    countdowns.cancel(id);
                }
            }
            state.found = false;
            state.confirmed = false;
            verdict.confirmed = false;
        }

        verdict
    }
}
