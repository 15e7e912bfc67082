//! UV-K5 Control Core Library
//!
//! The tick scheduler and operating-mode control core of a handheld FM
//! transceiver. A 10 ms timer pulse drives a bank of countdowns; a
//! cooperative main loop reads the RF chip's interrupt flags and moves the
//! radio between idle, confirming, receiving, transmitting, monitoring and
//! power-saving.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      BOARD (main.rs)                         │
//! │  GPIO keys  │  squelch line  │  battery ADC  │  channel table │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   PLATFORM TRAITS                            │
//! │  RfFrontEnd │ ModeHardware │ ChannelStore │ Notifier │ ...   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     CONTROLLER                               │
//! │  Tone confirmation │ Scan │ Dual watch │ Transmit │ Power    │
//! ├─────────────────────────────────────────────────────────────┤
//! │             PURE STATE MACHINE + SCHEDULER                   │
//! │      transition(state, event) -> (next, effects)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Functional core, imperative shell**: [`radio::state::transition`] is
//!   pure; [`radio::control::Controller`] applies its effects
//! - **Type-driven design**: data that only exists in one mode lives in
//!   that mode's variant
//! - **No unsafe**: hardware is reached through embassy and the
//!   [`platform`] traits
//! - **Countdowns are owned**: the component that arms a countdown is the
//!   one that consumes its trigger

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_sync;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Tick source, keys, switched outputs and the battery ADC.
#[cfg(feature = "embedded")]
pub mod hal;

/// Tick Scheduler
///
/// 10 ms tick, coarse flags and the gated countdown registry.
pub mod scheduler;

/// Radio Control Logic
///
/// Operating-mode state machine, tone confirmation, scan, dual watch and
/// transmit control.
pub mod radio;

/// External collaborator interfaces
pub mod platform;

/// Power Management
///
/// Battery monitoring and battery-save rules.
pub mod power;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    pub use crate::platform::Platform;
    pub use crate::radio::control::{Controller, UserInputs};

    // Common traits
    pub use embedded_hal::digital::OutputPin;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
