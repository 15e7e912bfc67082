//! Power Management
//!
//! Battery monitoring, the battery side of the transmit permission check,
//! and the battery-save duty-cycle rules.

use crate::config::Settings;
use crate::radio::transmit::{TxDenial, TxPermission};

/// Battery voltage reading
#[derive(Clone, Copy, Debug)]
pub struct BatteryVoltage {
    /// Raw ADC reading (12-bit)
    raw: u16,
    /// Voltage divider ratio
    divider_ratio: f32,
    /// Reference voltage
    vref: f32,
}

impl BatteryVoltage {
    /// Create from ADC reading
    #[must_use]
    pub const fn from_adc(raw: u16, divider_ratio: f32, vref: f32) -> Self {
        Self {
            raw,
            divider_ratio,
            vref,
        }
    }

    /// Get voltage in volts
    #[must_use]
    pub fn voltage(&self) -> f32 {
        (f32::from(self.raw) / 4095.0) * self.vref * self.divider_ratio
    }

    /// Voltage per cell
    #[must_use]
    pub fn per_cell(&self, cells: u8) -> f32 {
        self.voltage() / f32::from(cells.max(1))
    }

    /// Get battery percentage (Li-ion 3.0-4.2V per cell)
    #[must_use]
    pub fn percentage(&self, cells: u8) -> u8 {
        let v_per_cell = self.per_cell(cells);

        let pct = if v_per_cell >= 4.2 {
            100.0
        } else if v_per_cell <= 3.0 {
            0.0
        } else {
            ((v_per_cell - 3.0) / 1.2) * 100.0
        };

        pct as u8
    }

    /// Too low to key the transmitter
    #[must_use]
    pub fn is_low(&self, cells: u8) -> bool {
        self.per_cell(cells) < PowerManager::TX_MIN_CELL_VOLTS
    }

    /// Above what the PA tolerates (charger connected to a full pack)
    #[must_use]
    pub fn is_over_voltage(&self, cells: u8) -> bool {
        self.per_cell(cells) > PowerManager::TX_MAX_CELL_VOLTS
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BatteryVoltage {
    fn format(&self, f: defmt::Formatter) {
        let v = self.voltage();
        let whole = v as u32;
        let frac = ((v - whole as f32) * 100.0) as u32;
        defmt::write!(f, "{}.{:02}V", whole, frac);
    }
}

/// Battery supervision
#[derive(Clone, Debug)]
pub struct PowerManager {
    /// Latest battery reading
    battery: Option<BatteryVoltage>,
    /// Number of battery cells
    cells: u8,
}

impl PowerManager {
    /// Lowest per-cell voltage for transmit
    pub const TX_MIN_CELL_VOLTS: f32 = 3.2;

    /// Highest per-cell voltage for transmit
    pub const TX_MAX_CELL_VOLTS: f32 = 4.35;

    /// Create a new power manager
    #[must_use]
    pub const fn new(cells: u8) -> Self {
        Self {
            battery: None,
            cells,
        }
    }

    /// Get battery voltage
    #[must_use]
    pub const fn battery(&self) -> Option<BatteryVoltage> {
        self.battery
    }

    /// Get battery percentage
    #[must_use]
    pub fn battery_percent(&self) -> Option<u8> {
        self.battery.map(|b| b.percentage(self.cells))
    }

    /// Update battery voltage (sampled on the half-second flag)
    pub fn update_battery(&mut self, voltage: BatteryVoltage) {
        #[cfg(feature = "embedded")]
        if voltage.is_low(self.cells) {
            defmt::warn!("battery low: {}", voltage);
        }
        self.battery = Some(voltage);
    }

    /// Battery side of the transmit permission check.
    ///
    /// Allowed until the first reading arrives.
    #[must_use]
    pub fn transmit_permission(&self) -> TxPermission {
        match self.battery {
            Some(b) if b.is_low(self.cells) => TxPermission::Denied(TxDenial::BatteryLow),
            Some(b) if b.is_over_voltage(self.cells) => {
                TxPermission::Denied(TxDenial::OverVoltage)
            }
            _ => TxPermission::Allowed,
        }
    }
}

impl Default for PowerManager {
    fn default() -> Self {
        Self::new(2) // 7.4 V two-cell pack
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PowerManager {
    fn format(&self, f: defmt::Formatter) {
        match self.battery {
            Some(b) => defmt::write!(f, "Power({})", b),
            None => defmt::write!(f, "Power(?)"),
        }
    }
}

/// Conditions that keep the receiver awake
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct BatterySaveBlockers {
    /// PTT held
    pub ptt_held: bool,
    /// A key is held
    pub key_held: bool,
    /// Frequency, channel or tone scan running
    pub scanning: bool,
    /// Display is not on the main screen
    pub off_idle_screen: bool,
}

impl BatterySaveBlockers {
    /// True if any condition blocks battery save
    #[must_use]
    pub const fn any(&self) -> bool {
        self.ptt_held || self.key_held || self.scanning || self.off_idle_screen
    }
}

/// Sleep window to enter when the idle timeout expires, None to stay awake
#[must_use]
pub fn battery_save_sleep(settings: &Settings, blockers: &BatterySaveBlockers) -> Option<u32> {
    if blockers.any() {
        return None;
    }
    settings.battery_save.sleep_ticks()
}
