//! Scan Tests
//!
//! Tests for scan-list walking, priority rotation and the resume modes,
//! driven through the controller against the scripted board.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test scan_tests

mod common;

use common::{ch, channel_frequency, freq, run, started, MockPlatform};
use uvk5_firmware::config::{
    DualWatch, ScanListSelection, ScanResumeMode, DUAL_WATCH_AFTER_RX_TICKS,
    SCAN_RESUME_CARRIER_GUARD_TICKS,
};
use uvk5_firmware::radio::scan::{find_next_channel, ScanCandidate, ScanDirection, ScanSession, ScanTarget};
use uvk5_firmware::radio::state::OperatingMode;
use uvk5_firmware::radio::vfo::{ScanListMembership, VfoConfig, VfoIndex};
use uvk5_firmware::scheduler::Countdowns;

const LIST1: ScanListMembership = ScanListMembership {
    list1: true,
    list2: false,
};

const LIST2: ScanListMembership = ScanListMembership {
    list1: false,
    list2: true,
};

fn board_with(channels: &[u8]) -> MockPlatform {
    let mut board = MockPlatform::new();
    for &index in channels {
        board.program_channel(index, LIST1);
    }
    board
}

// =============================================================================
// Channel Search Tests
// =============================================================================

#[test]
fn next_channel_skips_empty_and_other_lists() {
    let mut board = board_with(&[5, 9]);
    board.program_channel(7, LIST2);
    assert_eq!(
        find_next_channel(&board, ch(5), true, ScanListSelection::List1),
        Some(ch(9))
    );
    assert_eq!(
        find_next_channel(&board, ch(5), true, ScanListSelection::All),
        Some(ch(7))
    );
}

#[test]
fn forward_search_wraps_to_first_valid() {
    let board = board_with(&[3, 150]);
    assert_eq!(
        find_next_channel(&board, ch(150), true, ScanListSelection::List1),
        Some(ch(3))
    );
}

#[test]
fn backward_search_wraps_to_last_valid() {
    let board = board_with(&[3, 150]);
    assert_eq!(
        find_next_channel(&board, ch(3), false, ScanListSelection::List1),
        Some(ch(150))
    );
}

#[test]
fn single_member_finds_itself() {
    let board = board_with(&[42]);
    assert_eq!(
        find_next_channel(&board, ch(42), true, ScanListSelection::List1),
        Some(ch(42))
    );
}

#[test]
fn empty_list_finds_nothing() {
    let board = board_with(&[]);
    assert_eq!(
        find_next_channel(&board, ch(0), true, ScanListSelection::List1),
        None
    );
}

// =============================================================================
// Priority Rotation Tests
// =============================================================================

#[test]
fn priority_channels_interleave_with_list() {
    let mut board = board_with(&[5, 7]);
    board.program_channel(20, ScanListMembership::NONE);
    board.program_channel(30, ScanListMembership::NONE);
    board.park_on_channel(VfoIndex::A, 5);

    let settings = common::awake_settings().with_priority_channels(0, Some(ch(20)), Some(ch(30)));
    let mut countdowns = Countdowns::new();
    let mut scan = ScanSession::idle();
    scan.start(
        ScanDirection::Forward,
        ScanTarget::Channel,
        settings.scan_resume,
        &mut countdowns,
    );

    let mut visited = Vec::new();
    for _ in 0..6 {
        let vfo = board.vfos[0];
        match scan.next_candidate(&board, &vfo, &settings) {
            Some(ScanCandidate::Channel(next)) => {
                visited.push(next.index());
                board.park_on_channel(VfoIndex::A, next.index());
            }
            other => panic!("unexpected candidate {other:?}"),
        }
    }
    assert_eq!(visited, vec![20, 30, 7, 20, 30, 5]);
}

#[test]
fn unprogrammed_priority_slot_is_skipped() {
    let mut board = board_with(&[5, 7]);
    board.program_channel(30, ScanListMembership::NONE);
    board.park_on_channel(VfoIndex::A, 5);

    // channel 20 is not programmed
    let settings = common::awake_settings().with_priority_channels(0, Some(ch(20)), Some(ch(30)));
    let mut countdowns = Countdowns::new();
    let mut scan = ScanSession::idle();
    scan.start(
        ScanDirection::Forward,
        ScanTarget::Channel,
        settings.scan_resume,
        &mut countdowns,
    );

    let vfo = board.vfos[0];
    assert_eq!(
        scan.next_candidate(&board, &vfo, &settings),
        Some(ScanCandidate::Channel(ch(30)))
    );
    assert_eq!(
        scan.next_candidate(&board, &vfo, &settings),
        Some(ScanCandidate::Channel(ch(7)))
    );
}

#[test]
fn frequency_scan_steps_by_raster() {
    let board = MockPlatform::new();
    let vfo = board.vfos[0];
    let mut countdowns = Countdowns::new();
    let mut scan = ScanSession::idle();
    scan.start(
        ScanDirection::Backward,
        ScanTarget::Frequency,
        ScanResumeMode::TimeoutThenContinue,
        &mut countdowns,
    );
    let expected = vfo.frequency.as_hz() - vfo.step.as_hz();
    assert_eq!(
        scan.next_candidate(&board, &vfo, &common::awake_settings()),
        Some(ScanCandidate::Frequency(common::freq(expected)))
    );
}

// =============================================================================
// Resume Mode Tests
// =============================================================================

#[test]
fn stop_on_signal_pins_the_hit() {
    let mut board = board_with(&[5, 7, 9]);
    board.park_on_channel(VfoIndex::A, 5);
    board.key_carrier(channel_frequency(9));

    let settings = common::awake_settings().with_scan_resume(ScanResumeMode::StopOnSignal);
    let mut radio = started(settings, &mut board);
    assert!(radio.start_scan(&mut board, ScanDirection::Forward));

    run(&mut radio, &mut board, 100);

    assert_eq!(board.vfos[0].channel, Some(ch(9)));
    assert_eq!(radio.scan().direction(), ScanDirection::Off);
    assert_eq!(radio.mode(), OperatingMode::Receiving);
    assert!(board.audio);

    // carrier gone: no further stepping
    board.drop_carrier(channel_frequency(9));
    run(&mut radio, &mut board, 200);
    assert_eq!(board.vfos[0].channel, Some(ch(9)));
    assert_eq!(radio.mode(), OperatingMode::Foreground);
}

#[test]
fn carrier_operated_resumes_after_guard() {
    let mut board = board_with(&[5, 9, 10]);
    board.park_on_channel(VfoIndex::A, 5);
    board.key_carrier(channel_frequency(9));

    let settings = common::awake_settings().with_scan_resume(ScanResumeMode::CarrierOperated);
    let mut radio = started(settings, &mut board);
    radio.start_scan(&mut board, ScanDirection::Forward);

    run(&mut radio, &mut board, 60);
    assert_eq!(board.vfos[0].channel, Some(ch(9)));
    assert_eq!(radio.mode(), OperatingMode::Receiving);

    // parked for as long as the carrier stays
    run(&mut radio, &mut board, 1000);
    assert_eq!(board.vfos[0].channel, Some(ch(9)));

    board.drop_carrier(channel_frequency(9));
    run(&mut radio, &mut board, 1);
    assert_eq!(radio.mode(), OperatingMode::Foreground);

    run(&mut radio, &mut board, SCAN_RESUME_CARRIER_GUARD_TICKS - 1);
    assert_eq!(board.vfos[0].channel, Some(ch(9)));

    run(&mut radio, &mut board, 1);
    assert_eq!(board.vfos[0].channel, Some(ch(10)));
    assert!(radio.scan().is_active());
}

#[test]
fn timeout_resume_moves_on_while_carrier_persists() {
    let mut board = board_with(&[5, 9, 10]);
    board.park_on_channel(VfoIndex::A, 5);
    board.key_carrier(channel_frequency(9));

    let settings = common::awake_settings().with_scan_resume(ScanResumeMode::TimeoutThenContinue);
    let mut radio = started(settings, &mut board);
    radio.start_scan(&mut board, ScanDirection::Forward);

    run(&mut radio, &mut board, 30);
    assert_eq!(radio.mode(), OperatingMode::Receiving);

    // park window runs out with the carrier still present
    run(&mut radio, &mut board, 500);
    assert_eq!(board.vfos[0].channel, Some(ch(10)));
    assert_eq!(radio.mode(), OperatingMode::Foreground);
    assert!(radio.scan().is_active());
}

#[test]
fn abandoned_hit_releases_dual_watch() {
    let mut board = board_with(&[5, 9, 10]);
    board.park_on_channel(VfoIndex::A, 5);
    board.vfos[1] = VfoConfig::new(freq(146_000_000));
    board.key_carrier(channel_frequency(9));

    let settings = common::awake_settings()
        .with_dual_watch(DualWatch::HomeA)
        .with_scan_resume(ScanResumeMode::TimeoutThenContinue);
    let mut radio = started(settings, &mut board);
    radio.start_scan(&mut board, ScanDirection::Forward);

    run(&mut radio, &mut board, 30);
    assert_eq!(radio.mode(), OperatingMode::Receiving);
    assert!(radio.dual_watch().is_holding());

    run(&mut radio, &mut board, 500);
    assert_eq!(board.vfos[0].channel, Some(ch(10)));
    assert_eq!(radio.mode(), OperatingMode::Foreground);
    assert!(!radio.dual_watch().is_holding());

    // alternation resumes once the scan is stopped
    radio.stop_scan(&mut board);
    run(&mut radio, &mut board, DUAL_WATCH_AFTER_RX_TICKS - 1);
    assert_eq!(radio.listened_vfo(), VfoIndex::A);
    run(&mut radio, &mut board, 1);
    assert_eq!(radio.listened_vfo(), VfoIndex::B);

    run(&mut radio, &mut board, settings.dual_watch_period_ticks);
    assert_eq!(radio.listened_vfo(), VfoIndex::A);
}

#[test]
fn empty_scan_list_stops_the_scan() {
    let mut board = MockPlatform::new();
    board.program_channel(5, LIST2);
    board.park_on_channel(VfoIndex::A, 5);

    let mut radio = started(common::awake_settings(), &mut board);
    radio.start_scan(&mut board, ScanDirection::Forward);
    run(&mut radio, &mut board, 50);
    assert!(!radio.scan().is_active());
    assert_eq!(board.vfos[0].channel, Some(ch(5)));
}

#[test]
fn ptt_stops_the_scan() {
    let mut board = board_with(&[5, 7]);
    board.park_on_channel(VfoIndex::A, 5);
    let mut radio = started(common::awake_settings(), &mut board);
    radio.start_scan(&mut board, ScanDirection::Forward);

    let ptt = uvk5_firmware::radio::control::UserInputs::IDLE.with_ptt(true);
    common::step(&mut radio, &mut board, &ptt);
    assert!(!radio.scan().is_active());
    assert_eq!(radio.mode(), OperatingMode::Transmitting);
}
