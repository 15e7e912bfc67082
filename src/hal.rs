//! Hardware Abstraction Layer
//!
//! Board-side services built on embassy for the STM32G474.

pub mod adc;
pub mod gpio;
pub mod timer;
