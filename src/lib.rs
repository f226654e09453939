#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod conversion;
pub mod registers;
mod tmp11x;
#[cfg(feature = "rp2040")]
mod tmp11x_rp;

pub use registers::{
    AlertFunction, AlertPolarity, Averaging, ConfigField, ConversionCycle, DEFAULT_ADDRESS,
    DEFAULT_FREQUENCY, EepromCell, FieldValue, Mode, Register,
};
pub use tmp11x::Tmp11xSensor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tmp11xError {
    /// The bus transaction did not complete, or returned fewer bytes than requested.
    I2CError,
    /// The address is not one of the three EEPROM scratch cells.
    InvalidEepromCell(u8),
    /// No TMP116/TMP117 answered with a known identity during initialization.
    DeviceNotFound,
}

/// Which part answered the identity read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceVariant {
    Tmp116,
    Tmp117,
}

impl DeviceVariant {
    pub fn from_id(id: u16) -> Option<Self> {
        match id {
            registers::TMP117_DEVICE_ID => Some(DeviceVariant::Tmp117),
            registers::TMP116_DEVICE_ID => Some(DeviceVariant::Tmp116),
            _ => None,
        }
    }
}

/// Snapshot of the read-only flags in the configuration register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub high_alert: bool,
    pub low_alert: bool,
    pub data_ready: bool,
    pub eeprom_busy: bool,
}

impl Status {
    pub fn from_config(config: u16) -> Self {
        Self {
            high_alert: config & registers::HIGH_ALERT_FLAG != 0,
            low_alert: config & registers::LOW_ALERT_FLAG != 0,
            data_ready: config & registers::DATA_READY_FLAG != 0,
            eeprom_busy: config & registers::EEPROM_BUSY_FLAG != 0,
        }
    }
}

/// SDA/SCL pin numbers for transports that can route the bus to arbitrary pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinPair {
    pub sda: u8,
    pub scl: u8,
}

impl PinPair {
    /// Pin number meaning "leave the platform default in place".
    pub const PLATFORM_DEFAULT: u8 = 0xFF;

    /// Returns `None` unless both pins are given explicitly.
    pub fn from_raw(sda: u8, scl: u8) -> Option<Self> {
        if sda == Self::PLATFORM_DEFAULT || scl == Self::PLATFORM_DEFAULT {
            None
        } else {
            Some(Self { sda, scl })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Bus clock in Hz.
    pub frequency: u32,
    /// Custom pin routing, `None` for the platform's default pins.
    pub pins: Option<PinPair>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_FREQUENCY,
            pins: None,
        }
    }
}

impl BusConfig {
    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_pins(mut self, sda: u8, scl: u8) -> Self {
        self.pins = PinPair::from_raw(sda, scl);
        self
    }
}

/// Bus bring-up hook used by [`Tmp11xSensor::initialize`].
///
/// The driver forwards the whole [`BusConfig`]; the transport decides whether it can honor
/// the pin request.
pub trait BusSetup {
    fn supports_custom_pins(&self) -> bool {
        false
    }

    fn configure(&mut self, config: &BusConfig) -> Result<(), Tmp11xError>;
}
