//! Operating-Mode State Machine Tests
//!
//! Tests for the pure transition function: reception lifecycle, transmit
//! permission, tail hold, timeout, monitor and battery save.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test state_tests

use uvk5_firmware::config::{Settings, POWER_SAVE_LISTEN_TICKS, VOX_RESUME_TICKS};
use uvk5_firmware::platform::BeepKind;
use uvk5_firmware::radio::state::{
    transition, Effect, ListenOrigin, ModeEvent, ModeState, Notice, OperatingMode,
    ReceptionContext,
};
use uvk5_firmware::radio::transmit::{TxDenial, TxPermission, TxPhase, TxSource};
use uvk5_firmware::radio::vfo::VfoIndex;
use uvk5_firmware::scheduler::CountdownId;

fn ctx() -> ReceptionContext {
    ReceptionContext::new(VfoIndex::B, ListenOrigin::Plain)
}

fn keyed(source: TxSource) -> ModeState {
    ModeState::Transmitting {
        vfo: VfoIndex::A,
        source,
        phase: TxPhase::Keyed,
    }
}

fn request(permission: TxPermission) -> ModeEvent {
    ModeEvent::TransmitRequested {
        vfo: VfoIndex::A,
        source: TxSource::Ptt,
        permission,
    }
}

// =============================================================================
// Reception Lifecycle Tests
// =============================================================================

#[test]
fn squelch_open_starts_confirmation() {
    let t = transition(
        ModeState::Foreground,
        ModeEvent::SquelchOpened(ctx()),
        &Settings::new(),
    );
    assert_eq!(t.next, ModeState::ConfirmingSignal(ctx()));
    assert_eq!(t.effects[0], Effect::EnterMode(OperatingMode::ConfirmingSignal));
    assert!(t
        .effects
        .contains(&Effect::Notify(Notice::ListenStarted(ctx()))));
    // audio stays closed until confirmation
    assert!(!t.effects.contains(&Effect::AudioPath(true)));
}

#[test]
fn squelch_open_while_asleep_stops_sleep_timer() {
    let t = transition(
        ModeState::PowerSaving,
        ModeEvent::SquelchOpened(ctx()),
        &Settings::new(),
    );
    assert_eq!(t.next.mode(), OperatingMode::ConfirmingSignal);
    assert!(t.effects.contains(&Effect::Cancel(CountdownId::PowerSaveWake)));
}

#[test]
fn confirmation_opens_audio() {
    let t = transition(
        ModeState::ConfirmingSignal(ctx()),
        ModeEvent::Confirmed { dtmf_gated: false },
        &Settings::new(),
    );
    assert_eq!(t.next, ModeState::Receiving(ctx()));
    assert!(t.effects.contains(&Effect::AudioPath(true)));
}

#[test]
fn reception_end_returns_to_idle() {
    let settings = Settings::new();
    for state in [ModeState::ConfirmingSignal(ctx()), ModeState::Receiving(ctx())] {
        let t = transition(state, ModeEvent::Ended, &settings);
        assert_eq!(t.next, ModeState::Foreground);
        assert!(t.effects.contains(&Effect::AudioPath(false)));
        assert!(t.effects.contains(&Effect::Arm(
            CountdownId::BatterySave,
            settings.battery_save_idle_ticks
        )));
        assert!(t
            .effects
            .contains(&Effect::Notify(Notice::ReceptionEnded(ctx()))));
    }
}

#[test]
fn abandoned_reception_is_not_announced() {
    let t = transition(
        ModeState::Receiving(ctx()),
        ModeEvent::Abandoned,
        &Settings::new(),
    );
    assert_eq!(t.next, ModeState::Foreground);
    assert!(!t
        .effects
        .iter()
        .any(|e| matches!(e, Effect::Notify(Notice::ReceptionEnded(_)))));
    // dual watch still has to drop its hold
    assert_eq!(
        t.effects.last(),
        Some(&Effect::Notify(Notice::ReceptionAbandoned(ctx())))
    );
}

#[test]
fn confirmation_outside_confirming_is_ignored() {
    let t = transition(
        ModeState::Foreground,
        ModeEvent::Confirmed { dtmf_gated: false },
        &Settings::new(),
    );
    assert_eq!(t.next, ModeState::Foreground);
    assert!(t.effects.is_empty());
}

// =============================================================================
// Transmit Tests
// =============================================================================

#[test]
fn denied_transmit_keeps_state_and_reports() {
    let settings = Settings::new();
    for state in [
        ModeState::Foreground,
        ModeState::Receiving(ctx()),
        ModeState::PowerSaving,
    ] {
        let t = transition(
            state,
            request(TxPermission::Denied(TxDenial::BatteryLow)),
            &settings,
        );
        assert_eq!(t.next, state);
        assert_eq!(
            t.effects.as_slice(),
            &[
                Effect::Beep(BeepKind::Error),
                Effect::TxDenied(TxDenial::BatteryLow)
            ]
        );
    }
}

#[test]
fn transmit_from_reception_mutes_and_ends_it() {
    let settings = Settings::new().with_tx_timeout(300);
    let t = transition(
        ModeState::Receiving(ctx()),
        request(TxPermission::Allowed),
        &settings,
    );
    assert_eq!(t.next, keyed(TxSource::Ptt));
    assert!(t.effects.contains(&Effect::AudioPath(false)));
    assert!(t.effects.contains(&Effect::Arm(CountdownId::TxTimeout, 300)));
    assert!(t
        .effects
        .contains(&Effect::Notify(Notice::ReceptionEnded(ctx()))));
    assert!(t.effects.contains(&Effect::Notify(Notice::TransmitStarted)));
}

#[test]
fn zero_timeout_arms_nothing() {
    let t = transition(
        ModeState::Foreground,
        request(TxPermission::Allowed),
        &Settings::new().with_tx_timeout(0),
    );
    assert!(!t
        .effects
        .iter()
        .any(|e| matches!(e, Effect::Arm(CountdownId::TxTimeout, _))));
}

#[test]
fn second_request_while_transmitting_is_ignored() {
    let state = keyed(TxSource::Vox);
    let t = transition(state, request(TxPermission::Allowed), &Settings::new());
    assert_eq!(t.next, state);
    assert!(t.effects.is_empty());
}

#[test]
fn release_without_tail_ends_transmit() {
    let settings = Settings::new();
    let t = transition(
        keyed(TxSource::Ptt),
        ModeEvent::TransmitReleased(TxSource::Ptt),
        &settings,
    );
    assert_eq!(t.next, ModeState::Foreground);
    assert!(t.effects.contains(&Effect::Cancel(CountdownId::TxTimeout)));
    assert!(t
        .effects
        .contains(&Effect::Notify(Notice::TransmitEnded { timed_out: false })));
}

#[test]
fn release_with_tail_winds_down() {
    let settings = Settings::new().with_tx_tail(30);
    let t = transition(
        keyed(TxSource::Ptt),
        ModeEvent::TransmitReleased(TxSource::Ptt),
        &settings,
    );
    assert_eq!(
        t.next,
        ModeState::Transmitting {
            vfo: VfoIndex::A,
            source: TxSource::Ptt,
            phase: TxPhase::WindDown,
        }
    );
    assert_eq!(
        t.effects.as_slice(),
        &[Effect::SendTailTone, Effect::Arm(CountdownId::TxTail, 30)]
    );

    let t = transition(t.next, ModeEvent::TxTailExpired, &settings);
    assert_eq!(t.next, ModeState::Foreground);
}

#[test]
fn release_from_other_source_is_ignored() {
    let state = keyed(TxSource::Ptt);
    let t = transition(state, ModeEvent::TransmitReleased(TxSource::Vox), &Settings::new());
    assert_eq!(t.next, state);
}

#[test]
fn timeout_cuts_transmit() {
    let settings = Settings::new().with_vox(true);
    let t = transition(keyed(TxSource::Ptt), ModeEvent::TxTimeout, &settings);
    assert_eq!(t.next, ModeState::Foreground);
    assert!(t.effects.contains(&Effect::Beep(BeepKind::TxTimeout)));
    assert!(t.effects.contains(&Effect::TxTimedOut));
    assert!(t
        .effects
        .contains(&Effect::Notify(Notice::TransmitEnded { timed_out: true })));
    assert!(t
        .effects
        .contains(&Effect::Arm(CountdownId::VoxResume, VOX_RESUME_TICKS)));
}

// =============================================================================
// Monitor and Battery Save Tests
// =============================================================================

#[test]
fn monitor_toggles() {
    let settings = Settings::new();
    let t = transition(ModeState::Foreground, ModeEvent::MonitorToggled, &settings);
    assert_eq!(t.next, ModeState::Monitoring);
    assert!(t.effects.contains(&Effect::AudioPath(true)));

    let t = transition(t.next, ModeEvent::MonitorToggled, &settings);
    assert_eq!(t.next, ModeState::Foreground);
    assert!(t.effects.contains(&Effect::AudioPath(false)));
}

#[test]
fn monitor_over_reception_ends_it() {
    let t = transition(
        ModeState::ConfirmingSignal(ctx()),
        ModeEvent::MonitorToggled,
        &Settings::new(),
    );
    assert_eq!(t.next, ModeState::Monitoring);
    assert!(t
        .effects
        .contains(&Effect::Notify(Notice::ReceptionEnded(ctx()))));
}

#[test]
fn battery_save_sleeps_and_wakes() {
    let settings = Settings::new();
    let t = transition(
        ModeState::Foreground,
        ModeEvent::BatterySaveDue { sleep_ticks: 40 },
        &settings,
    );
    assert_eq!(t.next, ModeState::PowerSaving);
    assert!(t.effects.contains(&Effect::Arm(CountdownId::PowerSaveWake, 40)));

    let t = transition(t.next, ModeEvent::Wake { scheduled: true }, &settings);
    assert_eq!(t.next, ModeState::Foreground);
    assert!(t.effects.contains(&Effect::Arm(
        CountdownId::BatterySave,
        POWER_SAVE_LISTEN_TICKS
    )));
}

#[test]
fn user_wake_restarts_idle_timer() {
    let settings = Settings::new();
    let t = transition(
        ModeState::PowerSaving,
        ModeEvent::Wake { scheduled: false },
        &settings,
    );
    assert!(t.effects.contains(&Effect::Arm(
        CountdownId::BatterySave,
        settings.battery_save_idle_ticks
    )));
}

#[test]
fn battery_save_never_interrupts_transmit() {
    let state = keyed(TxSource::Ptt);
    let t = transition(
        state,
        ModeEvent::BatterySaveDue { sleep_ticks: 40 },
        &Settings::new(),
    );
    assert_eq!(t.next, state);
}

#[test]
fn exactly_one_mode_at_a_time() {
    let states = [
        ModeState::Foreground,
        ModeState::ConfirmingSignal(ctx()),
        ModeState::Receiving(ctx()),
        keyed(TxSource::Ptt),
        ModeState::Monitoring,
        ModeState::PowerSaving,
    ];
    let modes: Vec<OperatingMode> = states.iter().map(ModeState::mode).collect();
    for (i, a) in modes.iter().enumerate() {
        for b in &modes[i + 1..] {
            assert_ne!(a, b);
        }
    }
    assert!(states[1].reception().is_some() && states[2].reception().is_some());
    assert!(states[3].is_transmitting());
}
