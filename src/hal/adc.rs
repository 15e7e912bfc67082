//! ADC Driver
//!
//! Blocking battery-voltage sampling on ADC1. The main loop reads it on the
//! half-second flag, so a single conversion per call is enough.

use embassy_stm32::adc::{Adc, AdcChannel, SampleTime};
use embassy_stm32::peripherals::ADC1;

use crate::power::BatteryVoltage;

/// Battery divider input
pub struct BatteryAdc<'d, P> {
    adc: Adc<'d, ADC1>,
    pin: P,
}

impl<'d, P: AdcChannel<ADC1>> BatteryAdc<'d, P> {
    /// Divider between the pack and the ADC pin (two-cell pack, 3.3 V reference)
    pub const DIVIDER_RATIO: f32 = 3.0;

    /// ADC reference voltage
    pub const VREF: f32 = 3.3;

    /// Create the driver; uses the longest sample time since the divider is high impedance
    #[must_use]
    pub fn new(adc: ADC1, pin: P) -> Self {
        let mut adc = Adc::new(adc);
        adc.set_sample_time(SampleTime::CYCLES247_5);
        Self { adc, pin }
    }

    /// Take one reading
    pub fn sample(&mut self) -> BatteryVoltage {
        let raw = self.adc.blocking_read(&mut self.pin);
        BatteryVoltage::from_adc(raw, Self::DIVIDER_RATIO, Self::VREF)
    }
}
