//! Radio Control Logic
//!
//! Operating-mode state machine, tone/squelch confirmation and the scan
//! and dual-watch arbitrators, tied together by [`control::Controller`].
//! Everything here is pure logic; hardware is reached through
//! [`crate::platform`].

pub mod control;
pub mod dual_watch;
pub mod scan;
pub mod state;
pub mod tone;
pub mod transmit;
pub mod vfo;
