//! Radio Controller
//!
//! The imperative shell around the pure state machine. One [`Controller`]
//! owns the scheduler, the live mode, tone confirmation and the scan and
//! dual-watch arbitrators. The board calls [`Controller::tick`] from its
//! 10 ms timer and [`Controller::process`] once per main-loop pass.
//!
//! A pass runs in a fixed order: read the RF interrupt flags, handle
//! transmit inputs, the monitor key and power-save wake-ups, evaluate
//! tone/squelch confirmation, check the battery-save timeout and finally
//! let the scan or dual-watch arbitrator move the receiver.

use crate::config::Settings;
use crate::platform::{InterruptFlags, Platform};
use crate::power::{battery_save_sleep, BatterySaveBlockers};
use crate::scheduler::{CountdownId, Countdowns, Scheduler, TickContext};

use super::dual_watch::{DualWatchSession, NoaaWatch};
use super::scan::{ScanCandidate, ScanDirection, ScanHit, ScanSession, ScanTarget};
use super::state::{
    transition, Effect, ListenOrigin, ModeEvent, ModeState, Notice, OperatingMode,
    ReceptionContext,
};
use super::tone::{ToneConfirmation, ToneInputs, ToneVerdict};
use super::transmit::{vox_request, PttEdge, PttInput, TxPermission, TxSource, VoxRequest};
use super::vfo::VfoIndex;

/// Key and UI state sampled for one pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserInputs {
    /// PTT key level
    pub ptt_held: bool,
    /// Monitor key pressed this pass (edge)
    pub monitor_pressed: bool,
    /// Any key pressed this pass
    pub key_activity: bool,
    /// A key is being held down
    pub key_held: bool,
    /// The main screen is shown
    pub on_idle_screen: bool,
}

impl UserInputs {
    /// Nothing pressed, main screen shown
    pub const IDLE: Self = Self {
        ptt_held: false,
        monitor_pressed: false,
        key_activity: false,
        key_held: false,
        on_idle_screen: true,
    };

    /// Idle inputs with the PTT level set
    #[must_use]
    pub const fn with_ptt(self, held: bool) -> Self {
        Self {
            ptt_held: held,
            ..self
        }
    }
}

impl Default for UserInputs {
    fn default() -> Self {
        Self::IDLE
    }
}

/// What a pass did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassSummary {
    /// Mode after the pass
    pub mode: OperatingMode,
    /// The mode changed during the pass
    pub transitioned: bool,
    /// The 500 ms flag was set (battery sampling, blink timers)
    pub half_second: bool,
    /// Tone/squelch verdict of the pass
    pub verdict: ToneVerdict,
}

/// Control core of the radio
#[derive(Clone, Debug)]
pub struct Controller {
    scheduler: Scheduler,
    state: ModeState,
    tone: ToneConfirmation,
    scan: ScanSession,
    dual_watch: DualWatchSession,
    noaa: NoaaWatch,
    settings: Settings,
    selected: VfoIndex,
    ptt: PttInput,
    squelch_open: bool,
    relisten: bool,
    listened_noaa: Option<u8>,
    fm_scan_active: bool,
}

impl Controller {
    /// Create a controller in Foreground; call [`Self::start`] before the
    /// first pass
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let settings = settings.validated();
        Self {
            scheduler: Scheduler::new(),
            state: ModeState::Foreground,
            tone: ToneConfirmation::new(),
            scan: ScanSession::idle(),
            dual_watch: DualWatchSession::new(DualWatchSession::home(
                settings.dual_watch,
                VfoIndex::A,
            )),
            noaa: NoaaWatch::new(),
            settings,
            selected: VfoIndex::A,
            ptt: PttInput::new(),
            squelch_open: false,
            relisten: false,
            listened_noaa: None,
            fm_scan_active: false,
        }
    }

    /// Program the hardware for the initial state
    pub fn start<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        self.dual_watch
            .configure(&self.settings, self.selected, self.scheduler.countdowns_mut());
        self.retune(platform, self.listened_vfo());
        platform.enter_mode(OperatingMode::Foreground);
        platform.set_audio_path(false);
        self.scheduler
            .countdowns_mut()
            .arm(CountdownId::BatterySave, self.settings.battery_save_idle_ticks);

        #[cfg(feature = "embedded")]
        defmt::info!("control core started on {}", self.listened_vfo());
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Current mode
    #[must_use]
    pub const fn mode(&self) -> OperatingMode {
        self.state.mode()
    }

    /// Current mode with its data
    #[must_use]
    pub const fn state(&self) -> &ModeState {
        &self.state
    }

    /// Scan session
    #[must_use]
    pub const fn scan(&self) -> &ScanSession {
        &self.scan
    }

    /// Dual-watch session
    #[must_use]
    pub const fn dual_watch(&self) -> &DualWatchSession {
        &self.dual_watch
    }

    /// Tone confirmation state
    #[must_use]
    pub const fn tone(&self) -> &ToneConfirmation {
        &self.tone
    }

    /// Active settings
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Tick scheduler
    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Countdown registry
    #[must_use]
    pub const fn countdowns(&self) -> &Countdowns {
        self.scheduler.countdowns()
    }

    /// Countdown registry, for the voice prompt, FM radio and keyboard
    /// owners of their countdowns
    pub fn countdowns_mut(&mut self) -> &mut Countdowns {
        self.scheduler.countdowns_mut()
    }

    /// VFO selected for transmit and single-watch listening
    #[must_use]
    pub const fn selected_vfo(&self) -> VfoIndex {
        self.selected
    }

    /// VFO the receiver is listening on
    #[must_use]
    pub const fn listened_vfo(&self) -> VfoIndex {
        self.dual_watch.active()
    }

    /// Squelch level tracked from the interrupt flags
    #[must_use]
    pub const fn is_squelch_open(&self) -> bool {
        self.squelch_open
    }

    // ------------------------------------------------------------------
    // Scheduler
    // ------------------------------------------------------------------

    /// State the countdown gates look at
    #[must_use]
    pub fn tick_context(&self) -> TickContext {
        TickContext {
            mode: self.state.mode(),
            dual_watch: self.settings.dual_watch.is_enabled(),
            noaa: self.settings.noaa_alternation && self.listened_noaa.is_some(),
            scan_active: self.scan.is_active(),
            tone_scan_active: self.scan.tone_scan().is_active(),
            fm_scan_active: self.fm_scan_active,
        }
    }

    /// Advance one 10 ms tick
    pub fn tick(&mut self) {
        let ctx = self.tick_context();
        self.scheduler.tick(&ctx);
    }

    /// Report whether the FM broadcast receiver is scanning
    pub fn set_fm_scan_active(&mut self, active: bool) {
        self.fm_scan_active = active;
    }

    // ------------------------------------------------------------------
    // User operations
    // ------------------------------------------------------------------

    /// Replace the settings and reprogram the listened VFO
    pub fn set_settings<P: Platform + ?Sized>(&mut self, platform: &mut P, settings: Settings) {
        self.settings = settings.validated();
        self.dual_watch
            .configure(&self.settings, self.selected, self.scheduler.countdowns_mut());
        self.retune(platform, self.listened_vfo());
    }

    /// Select the VFO used for transmit and single-watch listening
    pub fn select_vfo<P: Platform + ?Sized>(&mut self, platform: &mut P, vfo: VfoIndex) {
        self.selected = vfo;
        self.dual_watch
            .configure(&self.settings, self.selected, self.scheduler.countdowns_mut());
        self.retune(platform, self.listened_vfo());
    }

    /// A VFO's configuration was edited.
    ///
    /// Any tone debounce in flight for that VFO is dropped so it cannot
    /// confirm against the new code.
    pub fn reconfigure_vfo<P: Platform + ?Sized>(&mut self, platform: &mut P, vfo: VfoIndex) {
        if vfo == self.listened_vfo() && !self.state.is_transmitting() {
            self.retune(platform, vfo);
        } else {
            let code = platform.vfo_config(vfo).tone;
            self.tone
                .reconfigure(vfo, code, self.scheduler.countdowns_mut());
        }
    }

    /// Start a frequency or channel scan on the listened VFO.
    ///
    /// Returns false if the radio is transmitting.
    pub fn start_scan<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        direction: ScanDirection,
    ) -> bool {
        if self.state.is_transmitting() {
            return false;
        }

        let countdowns = self.scheduler.countdowns_mut();
        self.scan.cancel_tone_scan(countdowns);
        let target = if platform.vfo_config(self.dual_watch.active()).is_channel_mode() {
            ScanTarget::Channel
        } else {
            ScanTarget::Frequency
        };
        self.scan
            .start(direction, target, self.settings.scan_resume, countdowns);

        #[cfg(feature = "embedded")]
        defmt::info!("scan started {}", direction);

        platform.request_status_update();
        true
    }

    /// Stop scanning, staying on the current frequency or channel
    pub fn stop_scan<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        if !self.scan.is_active() {
            return;
        }
        self.scan.stop(self.scheduler.countdowns_mut());

        #[cfg(feature = "embedded")]
        defmt::info!("scan stopped");

        platform.request_status_update();
    }

    /// Search the CTCSS and DCS tables for the code on the listened VFO
    pub fn start_tone_scan<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        self.stop_scan(platform);
        if let Some(first) = self.scan.start_tone_scan(self.scheduler.countdowns_mut()) {
            platform.program_tone_detection(first);
        }

        #[cfg(feature = "embedded")]
        defmt::info!("tone scan started");

        platform.request_display_update();
    }

    // ------------------------------------------------------------------
    // Main-loop pass
    // ------------------------------------------------------------------

    /// Run one main-loop pass
    pub fn process<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        inputs: &UserInputs,
    ) -> PassSummary {
        let start_mode = self.state.mode();
        let half_second = self.scheduler.take_half_second();
        let tail_sample = self.scheduler.take_tail_sample();
        self.scheduler.take_timeslice();

        let flags = platform.poll_interrupt_flags();
        let rising = self.update_squelch(&flags);

        if let Some(character) = flags.dtmf_character {
            platform.dtmf_character(character);
        }

        self.handle_transmit_inputs(platform, inputs, &flags);

        if inputs.monitor_pressed {
            self.dispatch(platform, ModeEvent::MonitorToggled);
        }

        if self.state == ModeState::PowerSaving {
            if inputs.key_activity {
                self.dispatch(platform, ModeEvent::Wake { scheduled: false });
            } else if self
                .scheduler
                .countdowns_mut()
                .take_trigger(CountdownId::PowerSaveWake)
            {
                self.dispatch(platform, ModeEvent::Wake { scheduled: true });
            }
        } else if inputs.key_activity && self.state == ModeState::Foreground {
            self.scheduler
                .countdowns_mut()
                .arm(CountdownId::BatterySave, self.settings.battery_save_idle_ticks);
        }

        let rising = rising || core::mem::take(&mut self.relisten);
        let verdict = self.handle_reception(platform, &flags, rising, tail_sample);

        self.handle_battery_save(platform, inputs);
        self.arbitrate(platform);

        let noaa_applicable = self.tick_context().noaa;
        self.noaa
            .ensure_armed(noaa_applicable, self.scheduler.countdowns_mut());

        PassSummary {
            mode: self.state.mode(),
            transitioned: self.state.mode() != start_mode,
            half_second,
            verdict,
        }
    }

    fn update_squelch(&mut self, flags: &InterruptFlags) -> bool {
        let was_open = self.squelch_open;
        if flags.squelch_open {
            self.squelch_open = true;
        }
        if flags.squelch_closed {
            self.squelch_open = false;
        }
        self.squelch_open && !was_open
    }

    fn handle_transmit_inputs<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        inputs: &UserInputs,
        flags: &InterruptFlags,
    ) {
        match self.ptt.update(inputs.ptt_held) {
            Some(PttEdge::Pressed) => {
                self.stop_scan(platform);
                self.scan.cancel_tone_scan(self.scheduler.countdowns_mut());
                let vfo = self.selected;
                let permission = self.transmit_permission(platform, vfo);
                self.dispatch(
                    platform,
                    ModeEvent::TransmitRequested {
                        vfo,
                        source: TxSource::Ptt,
                        permission,
                    },
                );
            }
            Some(PttEdge::Released) => {
                self.dispatch(platform, ModeEvent::TransmitReleased(TxSource::Ptt));
            }
            None => {}
        }

        if self.settings.vox {
            match vox_request(flags, self.scheduler.countdowns_mut()) {
                Some(VoxRequest::Start) if self.state == ModeState::Foreground => {
                    let vfo = self.selected;
                    let permission = self.transmit_permission(platform, vfo);
                    self.dispatch(
                        platform,
                        ModeEvent::TransmitRequested {
                            vfo,
                            source: TxSource::Vox,
                            permission,
                        },
                    );
                }
                Some(VoxRequest::Stop) => {
                    self.dispatch(platform, ModeEvent::TransmitReleased(TxSource::Vox));
                }
                _ => {}
            }
        }

        let countdowns = self.scheduler.countdowns_mut();
        let timed_out = countdowns.take_trigger(CountdownId::TxTimeout);
        let tail_done = countdowns.take_trigger(CountdownId::TxTail);
        if timed_out {
            self.dispatch(platform, ModeEvent::TxTimeout);
        }
        if tail_done {
            self.dispatch(platform, ModeEvent::TxTailExpired);
        }
    }

    fn transmit_permission<P: Platform + ?Sized>(&self, platform: &P, vfo: VfoIndex) -> TxPermission {
        let busy = platform.vfo_config(vfo).busy_channel_lock
            && self.state.reception().is_some_and(|ctx| ctx.vfo == vfo);
        platform.can_transmit(vfo).with_busy_lock(busy)
    }

    fn handle_reception<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        flags: &InterruptFlags,
        rising: bool,
        tail_sample: bool,
    ) -> ToneVerdict {
        if matches!(
            self.state,
            ModeState::Monitoring | ModeState::Transmitting { .. }
        ) {
            return ToneVerdict::default();
        }

        let vfo = self.listened_vfo();
        self.handle_tone_scan(platform, flags, vfo);

        let inputs = ToneInputs {
            flags: *flags,
            squelch_open: self.squelch_open,
            tail_sample,
            in_reception: self.state.reception().is_some(),
        };
        let verdict = self.tone.evaluate(
            vfo,
            &inputs,
            &self.settings,
            self.scheduler.countdowns_mut(),
        );

        if verdict.tail_started {
            #[cfg(feature = "embedded")]
            defmt::debug!("tail tone, muting");
            platform.set_audio_path(false);
        }

        if rising
            && !self.scan.tone_scan().is_active()
            && matches!(self.state, ModeState::Foreground | ModeState::PowerSaving)
        {
            let origin = if self.scan.is_active() {
                ListenOrigin::Scan
            } else if self.settings.dual_watch.is_enabled() {
                ListenOrigin::DualWatch
            } else {
                ListenOrigin::Plain
            };
            self.dispatch(
                platform,
                ModeEvent::SquelchOpened(ReceptionContext::new(vfo, origin)),
            );
        }

        match self.state {
            ModeState::ConfirmingSignal(_) | ModeState::Receiving(_) if verdict.ended.is_some() => {
                #[cfg(feature = "embedded")]
                if let Some(cause) = verdict.ended {
                    defmt::debug!("reception ended: {}", cause);
                }
                self.dispatch(platform, ModeEvent::Ended);
            }
            ModeState::ConfirmingSignal(ctx) if verdict.confirmed => {
                let dtmf_gated =
                    platform.vfo_config(ctx.vfo).dtmf_decoding && platform.dtmf_call_pending(ctx.vfo);
                self.dispatch(platform, ModeEvent::Confirmed { dtmf_gated });
            }
            _ => {}
        }

        verdict
    }

    fn handle_tone_scan<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        flags: &InterruptFlags,
        vfo: VfoIndex,
    ) {
        let Some(candidate) = self.scan.tone_scan().candidate() else {
            return;
        };
        let countdowns = self.scheduler.countdowns_mut();

        if self.squelch_open && flags.tone_found(candidate.code_type) {
            self.scan.finish_tone_scan(candidate, countdowns);
            self.tone.reconfigure(vfo, candidate, countdowns);

            #[cfg(feature = "embedded")]
            defmt::info!("tone scan found {}", candidate);

            platform.request_display_update();
        } else if countdowns.take_trigger(CountdownId::ScanPause) {
            match self.scan.advance_tone_scan(countdowns) {
                Some(code) => platform.program_tone_detection(code),
                None => {
                    #[cfg(feature = "embedded")]
                    defmt::info!("tone scan failed");

                    self.retune(platform, vfo);
                }
            }
        }
    }

    fn handle_battery_save<P: Platform + ?Sized>(&mut self, platform: &mut P, inputs: &UserInputs) {
        if self.state != ModeState::Foreground
            || !self
                .scheduler
                .countdowns_mut()
                .take_trigger(CountdownId::BatterySave)
        {
            return;
        }

        let blockers = BatterySaveBlockers {
            ptt_held: inputs.ptt_held,
            key_held: inputs.key_held,
            scanning: self.scan.is_active() || self.scan.tone_scan().is_active(),
            off_idle_screen: !inputs.on_idle_screen,
        };

        match battery_save_sleep(&self.settings, &blockers) {
            Some(sleep_ticks) => {
                self.dispatch(platform, ModeEvent::BatterySaveDue { sleep_ticks });
            }
            None => self
                .scheduler
                .countdowns_mut()
                .arm(CountdownId::BatterySave, self.settings.battery_save_idle_ticks),
        }
    }

    fn arbitrate<P: Platform + ?Sized>(&mut self, platform: &mut P) {
        let vfo = self.listened_vfo();

        if self.scan.is_active() {
            let parked_on_scan = matches!(
                self.state.reception(),
                Some(ReceptionContext {
                    origin: ListenOrigin::Scan,
                    ..
                })
            );
            let may_step = self.state == ModeState::Foreground || parked_on_scan;
            if may_step
                && self
                    .scheduler
                    .countdowns_mut()
                    .take_trigger(CountdownId::ScanPause)
            {
                if parked_on_scan {
                    self.dispatch(platform, ModeEvent::Abandoned);
                }
                self.scan_step(platform, vfo);
            }
            return;
        }

        let unconfirmed = matches!(self.state, ModeState::ConfirmingSignal(_));
        if self.state != ModeState::Foreground && !unconfirmed {
            return;
        }

        if self
            .scheduler
            .countdowns_mut()
            .take_trigger(CountdownId::DualWatch)
        {
            if unconfirmed
                && self.settings.dual_watch.is_enabled()
                && !self.dual_watch.is_holding()
            {
                // carrier never confirmed on this side; go watch the other
                self.dispatch(platform, ModeEvent::Abandoned);
            }
            if let Some(next) = self
                .dual_watch
                .on_trigger(&self.settings, self.scheduler.countdowns_mut())
            {
                #[cfg(feature = "embedded")]
                defmt::debug!("dual watch -> {}", next);

                self.retune(platform, next);
                return;
            }
        }

        if unconfirmed {
            return;
        }

        if self
            .scheduler
            .countdowns_mut()
            .take_trigger(CountdownId::Noaa)
        {
            if let Some(current) = self.listened_noaa {
                let next = self
                    .noaa
                    .on_trigger(current, self.scheduler.countdowns_mut());
                platform.select_noaa_channel(vfo, next);
                self.retune(platform, vfo);
            }
        }
    }

    fn scan_step<P: Platform + ?Sized>(&mut self, platform: &mut P, vfo: VfoIndex) {
        let config = platform.vfo_config(vfo);
        match self.scan.next_candidate(&*platform, &config, &self.settings) {
            Some(ScanCandidate::Channel(channel)) => platform.select_channel(vfo, channel),
            Some(ScanCandidate::Frequency(frequency)) => platform.set_frequency(vfo, frequency),
            None => {
                #[cfg(feature = "embedded")]
                defmt::warn!("scan list empty, stopping");

                self.stop_scan(platform);
                return;
            }
        }

        self.retune(platform, vfo);
        let dwell = self.scan.dwell_ticks();
        self.scheduler
            .countdowns_mut()
            .arm(CountdownId::ScanPause, dwell);
    }

    fn retune<P: Platform + ?Sized>(&mut self, platform: &mut P, vfo: VfoIndex) {
        platform.apply_offset_and_squelch(vfo);
        let config = platform.vfo_config(vfo);
        platform.apply_squelch_thresholds(&config, self.settings.squelch_level);
        platform.program_tone_detection(config.tone);
        self.tone
            .reconfigure(vfo, config.tone, self.scheduler.countdowns_mut());
        self.squelch_open = false;
        self.relisten = false;
        self.listened_noaa = config.noaa_channel;
        platform.request_display_update();
    }

    // ------------------------------------------------------------------
    // State machine plumbing
    // ------------------------------------------------------------------

    fn dispatch<P: Platform + ?Sized>(&mut self, platform: &mut P, event: ModeEvent) {
        let t = transition(self.state, event, &self.settings);
        let leaving_monitor =
            self.state == ModeState::Monitoring && t.next == ModeState::Foreground;

        #[cfg(feature = "embedded")]
        if t.changed_from(&self.state) {
            defmt::info!("{} -> {} on {}", self.state, t.next, event);
        }

        self.state = t.next;
        for effect in t.effects {
            self.apply(platform, effect);
        }

        if leaving_monitor && self.squelch_open {
            // no new edge will come for a carrier heard while monitoring
            self.relisten = true;
        }
    }

    fn apply<P: Platform + ?Sized>(&mut self, platform: &mut P, effect: Effect) {
        match effect {
            Effect::EnterMode(mode) => {
                if matches!(mode, OperatingMode::Transmitting | OperatingMode::PowerSaving) {
                    // receiver off; the chip reports the squelch afresh afterwards
                    self.squelch_open = false;
                }
                if matches!(mode, OperatingMode::Transmitting | OperatingMode::Monitoring) {
                    // tone flags are not evaluated in these modes
                    let vfo = self.listened_vfo();
                    let code = self.tone.state(vfo).code();
                    self.tone
                        .reconfigure(vfo, code, self.scheduler.countdowns_mut());
                }
                platform.enter_mode(mode);
                platform.request_status_update();
            }
            Effect::AudioPath(enabled) => platform.set_audio_path(enabled),
            Effect::Arm(id, ticks) => self.scheduler.countdowns_mut().arm(id, ticks),
            Effect::Cancel(id) => self.scheduler.countdowns_mut().cancel(id),
            Effect::Beep(kind) => platform.request_beep(kind),
            Effect::TxDenied(reason) => {
                #[cfg(feature = "embedded")]
                defmt::warn!("transmit refused: {}", reason);

                platform.report_tx_denied(reason);
            }
            Effect::TxTimedOut => {
                #[cfg(feature = "embedded")]
                defmt::warn!("transmit timeout");

                platform.report_tx_timeout();
            }
            Effect::SendTailTone => platform.send_tail_tone(),
            Effect::Notify(notice) => self.notice(platform, notice),
        }
    }

    fn notice<P: Platform + ?Sized>(&mut self, platform: &mut P, notice: Notice) {
        let countdowns = self.scheduler.countdowns_mut();
        match notice {
            Notice::ListenStarted(ctx) => {
                if self.scan.is_active() && ctx.origin == ListenOrigin::Scan {
                    let code_type = platform.vfo_config(ctx.vfo).tone.code_type;
                    self.scan.on_squelch_open(code_type, countdowns);
                }
                self.dual_watch.on_squelch_open(&self.settings, countdowns);
            }
            Notice::ReceptionConfirmed(ctx) => {
                self.dual_watch.on_confirmed();
                if self.scan.is_active() && ctx.origin == ListenOrigin::Scan {
                    match self.scan.on_confirmed(countdowns) {
                        ScanHit::Stopped => {
                            #[cfg(feature = "embedded")]
                            defmt::info!("scan stopped on signal");

                            platform.request_status_update();
                        }
                        ScanHit::Parked => {}
                    }
                }
                platform.request_display_update();
            }
            Notice::ReceptionEnded(_) => {
                self.dual_watch.on_reception_ended(&self.settings, countdowns);
                if self.scan.is_active() {
                    self.scan.on_reception_ended(countdowns);
                }
                if self.listened_noaa.is_some() {
                    self.noaa.on_reception_ended(countdowns);
                }
                platform.request_display_update();
            }
            Notice::ReceptionAbandoned(_) => {
                self.dual_watch.on_reception_ended(&self.settings, countdowns);
                platform.request_display_update();
            }
            Notice::TransmitStarted => platform.request_display_update(),
            Notice::TransmitEnded { .. } => {
                self.dual_watch.on_transmit_ended(&self.settings, countdowns);
                platform.request_display_update();
            }
        }
    }
}
