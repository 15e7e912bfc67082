//! Tick Scheduler Tests
//!
//! Tests for the coarse flags, countdown one-shot semantics and the
//! per-countdown gating rules.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test scheduler_tests

use uvk5_firmware::config::{HALF_SECOND_TICKS, TAIL_SAMPLE_TICKS};
use uvk5_firmware::radio::state::OperatingMode;
use uvk5_firmware::scheduler::{CountdownId, Countdowns, Gate, Scheduler, TickContext};

fn idle() -> TickContext {
    TickContext::idle(OperatingMode::Foreground)
}

// =============================================================================
// Coarse Flag Tests
// =============================================================================

#[test]
fn half_second_flag_every_fifty_ticks() {
    let mut s = Scheduler::new();
    let mut seen = 0;
    for _ in 0..(HALF_SECOND_TICKS * 4) {
        s.tick(&idle());
        if s.take_half_second() {
            seen += 1;
            assert_eq!(s.ticks() % HALF_SECOND_TICKS, 0);
        }
    }
    assert_eq!(seen, 4);
}

#[test]
fn tail_sample_flag_every_four_ticks() {
    let mut s = Scheduler::new();
    let mut at = Vec::new();
    for _ in 0..12 {
        s.tick(&idle());
        if s.take_tail_sample() {
            at.push(s.ticks());
        }
    }
    assert_eq!(at, vec![TAIL_SAMPLE_TICKS, 2 * TAIL_SAMPLE_TICKS, 3 * TAIL_SAMPLE_TICKS]);
}

#[test]
fn flags_are_consumed_once() {
    let mut s = Scheduler::new();
    s.tick(&idle());
    assert!(s.take_timeslice());
    assert!(!s.take_timeslice());
}

#[test]
fn unconsumed_flag_stays_set() {
    let mut s = Scheduler::new();
    for _ in 0..(HALF_SECOND_TICKS + 3) {
        s.tick(&idle());
    }
    assert!(s.take_half_second());
}

// =============================================================================
// Countdown Tests
// =============================================================================

#[test]
fn countdown_fires_exactly_once() {
    let mut c = Countdowns::new();
    c.arm(CountdownId::TxTimeout, 3);

    c.tick_all(&idle());
    c.tick_all(&idle());
    assert!(!c.is_triggered(CountdownId::TxTimeout));

    c.tick_all(&idle());
    assert!(c.is_triggered(CountdownId::TxTimeout));
    assert!(!c.is_running(CountdownId::TxTimeout));

    for _ in 0..10 {
        c.tick_all(&idle());
    }
    assert!(c.take_trigger(CountdownId::TxTimeout));
    assert!(!c.take_trigger(CountdownId::TxTimeout));
}

#[test]
fn countdown_never_increases_while_ticking() {
    let mut c = Countdowns::new();
    c.arm(CountdownId::VoxStop, 25);
    let mut last = c.value(CountdownId::VoxStop);
    for _ in 0..40 {
        c.tick_all(&idle());
        let now = c.value(CountdownId::VoxStop);
        assert!(now <= last);
        last = now;
    }
    assert_eq!(last, 0);
}

#[test]
fn arming_zero_cancels_without_trigger() {
    let mut c = Countdowns::new();
    c.arm(CountdownId::TxTail, 5);
    c.arm(CountdownId::TxTail, 0);
    for _ in 0..10 {
        c.tick_all(&idle());
    }
    assert!(!c.is_triggered(CountdownId::TxTail));
}

#[test]
fn cancel_discards_latched_trigger() {
    let mut c = Countdowns::new();
    c.arm(CountdownId::ScanPause, 1);
    c.tick_all(&TickContext {
        scan_active: true,
        ..idle()
    });
    assert!(c.is_triggered(CountdownId::ScanPause));
    c.cancel(CountdownId::ScanPause);
    assert!(!c.take_trigger(CountdownId::ScanPause));
}

#[test]
fn countdowns_are_independent() {
    let mut c = Countdowns::new();
    c.arm(CountdownId::CtcssFound, 2);
    c.arm(CountdownId::CdcssFound, 4);
    c.tick_all(&idle());
    c.tick_all(&idle());
    assert!(c.is_triggered(CountdownId::CtcssFound));
    assert!(!c.is_triggered(CountdownId::CdcssFound));
    assert_eq!(c.value(CountdownId::CdcssFound), 2);
}

// =============================================================================
// Gating Tests
// =============================================================================

#[test]
fn battery_save_counts_only_in_foreground() {
    let mut c = Countdowns::new();
    c.arm(CountdownId::BatterySave, 5);
    for _ in 0..10 {
        c.tick_all(&TickContext::idle(OperatingMode::Receiving));
    }
    assert_eq!(c.value(CountdownId::BatterySave), 5);

    c.tick_all(&idle());
    assert_eq!(c.value(CountdownId::BatterySave), 4);
}

#[test]
fn power_save_wake_counts_only_while_asleep() {
    let mut c = Countdowns::new();
    c.arm(CountdownId::PowerSaveWake, 2);
    c.tick_all(&idle());
    assert_eq!(c.value(CountdownId::PowerSaveWake), 2);

    let asleep = TickContext::idle(OperatingMode::PowerSaving);
    c.tick_all(&asleep);
    c.tick_all(&asleep);
    assert!(c.is_triggered(CountdownId::PowerSaveWake));
}

#[test]
fn dual_watch_frozen_by_reception_and_scan() {
    let on = TickContext {
        dual_watch: true,
        ..idle()
    };
    assert!(Gate::DualWatch.allows(&on));
    assert!(!Gate::DualWatch.allows(&TickContext {
        mode: OperatingMode::Receiving,
        ..on
    }));
    assert!(!Gate::DualWatch.allows(&TickContext {
        mode: OperatingMode::Transmitting,
        ..on
    }));
    assert!(!Gate::DualWatch.allows(&TickContext {
        scan_active: true,
        ..on
    }));
    assert!(!Gate::DualWatch.allows(&TickContext {
        tone_scan_active: true,
        ..on
    }));
    assert!(!Gate::DualWatch.allows(&idle()));
}

#[test]
fn dual_watch_counts_while_confirming() {
    let ctx = TickContext {
        dual_watch: true,
        ..TickContext::idle(OperatingMode::ConfirmingSignal)
    };
    assert!(Gate::DualWatch.allows(&ctx));
}

#[test]
fn noaa_yields_to_dual_watch() {
    let noaa = TickContext { noaa: true, ..idle() };
    assert!(Gate::Noaa.allows(&noaa));
    assert!(!Gate::Noaa.allows(&TickContext {
        dual_watch: true,
        ..noaa
    }));
    assert!(!Gate::Noaa.allows(&TickContext {
        mode: OperatingMode::Monitoring,
        ..noaa
    }));
}

#[test]
fn scan_pause_runs_while_receiving_but_not_monitoring() {
    let scan = TickContext {
        scan_active: true,
        ..idle()
    };
    assert!(Gate::Scan.allows(&scan));
    assert!(Gate::Scan.allows(&TickContext {
        mode: OperatingMode::Receiving,
        ..scan
    }));
    assert!(!Gate::Scan.allows(&TickContext {
        mode: OperatingMode::Monitoring,
        ..scan
    }));
    assert!(!Gate::Scan.allows(&TickContext {
        mode: OperatingMode::Transmitting,
        ..scan
    }));
    assert!(!Gate::Scan.allows(&idle()));
}

#[test]
fn fm_scan_gate() {
    let fm = TickContext {
        fm_scan_active: true,
        ..idle()
    };
    assert!(Gate::FmScan.allows(&fm));
    assert!(!Gate::FmScan.allows(&TickContext {
        mode: OperatingMode::Receiving,
        ..fm
    }));
}

#[test]
fn every_countdown_has_a_gate() {
    for id in CountdownId::ALL {
        // Always-gated entries run in every context
        if id.gate() == Gate::Always {
            assert!(id.gate().allows(&TickContext::idle(OperatingMode::Transmitting)));
        }
    }
    assert_eq!(CountdownId::ALL.len(), CountdownId::COUNT);
}

#[test]
fn scheduler_tick_drives_countdowns() {
    let mut s = Scheduler::new();
    s.countdowns_mut().arm(CountdownId::KeyRepeat, 2);
    s.tick(&idle());
    s.tick(&idle());
    assert!(s.countdowns_mut().take_trigger(CountdownId::KeyRepeat));
}
