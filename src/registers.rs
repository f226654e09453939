//! TMP116/TMP117 register map and configuration bit-fields.
//!
//! All registers are 16 bits wide and travel MSB first.

use crate::Tmp11xError;

pub const DEFAULT_ADDRESS: u8 = 0x48;
pub const DEFAULT_FREQUENCY: u32 = 400_000;

pub const TMP117_DEVICE_ID: u16 = 0x0117;
pub const TMP116_DEVICE_ID: u16 = 0x1116;

/// Written to CONFIG to trigger a soft reset.
pub const SOFT_RESET: u16 = 0x8000;
pub const EEPROM_UNLOCK: u16 = 0x8000;
pub const EEPROM_LOCK: u16 = 0x0000;

// Read-only status flags in CONFIG. Bit 15 doubles as the reset trigger on write.
pub const HIGH_ALERT_FLAG: u16 = 1 << 15;
pub const LOW_ALERT_FLAG: u16 = 1 << 14;
pub const DATA_READY_FLAG: u16 = 1 << 13;
pub const EEPROM_BUSY_FLAG: u16 = 1 << 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    Temperature = 0x00,
    Configuration = 0x01,
    HighLimit = 0x02,
    LowLimit = 0x03,
    EepromUnlock = 0x04,
    Eeprom1 = 0x05,
    Eeprom2 = 0x06,
    TemperatureOffset = 0x07,
    Eeprom3 = 0x08,
    DeviceId = 0x0F,
}

impl Register {
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

/// One of the three general purpose EEPROM scratch registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromCell {
    Cell1,
    Cell2,
    Cell3,
}

impl EepromCell {
    pub fn from_register(addr: u8) -> Result<Self, Tmp11xError> {
        match addr {
            0x05 => Ok(EepromCell::Cell1),
            0x06 => Ok(EepromCell::Cell2),
            0x08 => Ok(EepromCell::Cell3),
            other => Err(Tmp11xError::InvalidEepromCell(other)),
        }
    }

    pub const fn register(self) -> Register {
        match self {
            EepromCell::Cell1 => Register::Eeprom1,
            EepromCell::Cell2 => Register::Eeprom2,
            EepromCell::Cell3 => Register::Eeprom3,
        }
    }

    pub const fn addr(self) -> u8 {
        self.register().addr()
    }
}

impl TryFrom<u8> for EepromCell {
    type Error = Tmp11xError;

    fn try_from(addr: u8) -> Result<Self, Self::Error> {
        Self::from_register(addr)
    }
}

/// Position and width of a bit-field inside the configuration register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigField {
    offset: u8,
    width: u8,
}

impl ConfigField {
    pub const MODE: ConfigField = ConfigField::new(10, 2);
    pub const CONVERSION: ConfigField = ConfigField::new(7, 3);
    pub const AVERAGING: ConfigField = ConfigField::new(5, 2);
    pub const THERM_ALERT: ConfigField = ConfigField::new(4, 1);
    pub const POLARITY: ConfigField = ConfigField::new(3, 1);

    pub const fn new(offset: u8, width: u8) -> Self {
        Self { offset, width }
    }

    pub const fn offset(self) -> u8 {
        self.offset
    }

    pub const fn width(self) -> u8 {
        self.width
    }

    pub const fn mask(self) -> u16 {
        ((1u16 << self.width) - 1) << self.offset
    }

    pub const fn extract(self, word: u16) -> u8 {
        ((word & self.mask()) >> self.offset) as u8
    }

    /// Replaces the field in `word`. `value` is cut down to the field width; other bits stay.
    pub const fn insert(self, word: u16, value: u8) -> u16 {
        (word & !self.mask()) | (((value as u16) << self.offset) & self.mask())
    }
}

/// A typed value stored in one configuration bit-field.
pub trait FieldValue: Sized {
    const FIELD: ConfigField;

    /// Decodes the low `FIELD.width()` bits; higher bits are ignored.
    fn from_bits(bits: u8) -> Self;

    fn bits(self) -> u8;
}

/// Conversion mode, CONFIG[11:10].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Continuous = 0,
    Shutdown = 1,
    /// Same behavior as `Continuous`; the device reads it back as 0.
    ContinuousAlt = 2,
    OneShot = 3,
}

impl FieldValue for Mode {
    const FIELD: ConfigField = ConfigField::MODE;

    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Mode::Continuous,
            1 => Mode::Shutdown,
            2 => Mode::ContinuousAlt,
            _ => Mode::OneShot,
        }
    }

    fn bits(self) -> u8 {
        self as u8
    }
}

/// Conversion cycle selector, CONFIG[9:7].
///
/// The real cycle time also depends on [`Averaging`]; the names give the datasheet value
/// without averaging. The driver only moves the selector around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionCycle {
    Ms15_5 = 0,
    Ms125 = 1,
    Ms250 = 2,
    Ms500 = 3,
    S1 = 4,
    S4 = 5,
    S8 = 6,
    S16 = 7,
}

impl FieldValue for ConversionCycle {
    const FIELD: ConfigField = ConfigField::CONVERSION;

    fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => ConversionCycle::Ms15_5,
            1 => ConversionCycle::Ms125,
            2 => ConversionCycle::Ms250,
            3 => ConversionCycle::Ms500,
            4 => ConversionCycle::S1,
            5 => ConversionCycle::S4,
            6 => ConversionCycle::S8,
            _ => ConversionCycle::S16,
        }
    }

    fn bits(self) -> u8 {
        self as u8
    }
}

/// Number of conversions averaged per result, CONFIG[6:5].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Averaging {
    Off = 0,
    X8 = 1,
    X32 = 2,
    X64 = 3,
}

impl FieldValue for Averaging {
    const FIELD: ConfigField = ConfigField::AVERAGING;

    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Averaging::Off,
            1 => Averaging::X8,
            2 => Averaging::X32,
            _ => Averaging::X64,
        }
    }

    fn bits(self) -> u8 {
        self as u8
    }
}

/// ALERT pin behavior, CONFIG[4].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertFunction {
    Alert = 0,
    Therm = 1,
}

impl FieldValue for AlertFunction {
    const FIELD: ConfigField = ConfigField::THERM_ALERT;

    fn from_bits(bits: u8) -> Self {
        if bits & 1 == 0 {
            AlertFunction::Alert
        } else {
            AlertFunction::Therm
        }
    }

    fn bits(self) -> u8 {
        self as u8
    }
}

/// ALERT pin polarity, CONFIG[3].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertPolarity {
    ActiveLow = 0,
    ActiveHigh = 1,
}

impl FieldValue for AlertPolarity {
    const FIELD: ConfigField = ConfigField::POLARITY;

    fn from_bits(bits: u8) -> Self {
        if bits & 1 == 0 {
            AlertPolarity::ActiveLow
        } else {
            AlertPolarity::ActiveHigh
        }
    }

    fn bits(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_masks_match_register_layout() {
        assert_eq!(ConfigField::MODE.mask(), 0x0C00);
        assert_eq!(ConfigField::CONVERSION.mask(), 0x0380);
        assert_eq!(ConfigField::AVERAGING.mask(), 0x0060);
        assert_eq!(ConfigField::THERM_ALERT.mask(), 0x0010);
        assert_eq!(ConfigField::POLARITY.mask(), 0x0008);
    }

    #[test]
    fn insert_leaves_other_bits_alone() {
        let word = 0xFFFF;
        assert_eq!(ConfigField::AVERAGING.insert(word, 0), 0xFF9F);
        assert_eq!(ConfigField::MODE.insert(0x0000, 3), 0x0C00);
        assert_eq!(ConfigField::POLARITY.insert(0x0220, 1), 0x0228);
    }

    #[test]
    fn insert_truncates_out_of_range_values() {
        // 9 = 0b1001 only keeps its low three bits.
        let word = ConfigField::CONVERSION.insert(0x0000, 9);
        assert_eq!(ConfigField::CONVERSION.extract(word), 1);
        assert_eq!(word & !ConfigField::CONVERSION.mask(), 0);
    }

    #[test]
    fn extract_reads_each_field() {
        // TMP117 power-on default.
        let config = 0x0220;
        assert_eq!(Mode::from_bits(ConfigField::MODE.extract(config)), Mode::Continuous);
        assert_eq!(
            ConversionCycle::from_bits(ConfigField::CONVERSION.extract(config)),
            ConversionCycle::S1
        );
        assert_eq!(
            Averaging::from_bits(ConfigField::AVERAGING.extract(config)),
            Averaging::X8
        );
        assert_eq!(
            AlertFunction::from_bits(ConfigField::THERM_ALERT.extract(config)),
            AlertFunction::Alert
        );
        assert_eq!(
            AlertPolarity::from_bits(ConfigField::POLARITY.extract(config)),
            AlertPolarity::ActiveLow
        );
    }

    #[test]
    fn from_bits_ignores_high_bits() {
        assert_eq!(Mode::from_bits(0b101), Mode::Shutdown);
        assert_eq!(Averaging::from_bits(0xFE), Averaging::X32);
        assert_eq!(ConversionCycle::from_bits(0x0F), ConversionCycle::S16);
        assert_eq!(AlertPolarity::from_bits(2), AlertPolarity::ActiveLow);
    }

    #[test]
    fn only_three_eeprom_cells_are_legal() {
        assert_eq!(EepromCell::from_register(0x05), Ok(EepromCell::Cell1));
        assert_eq!(EepromCell::from_register(0x06), Ok(EepromCell::Cell2));
        assert_eq!(EepromCell::try_from(0x08), Ok(EepromCell::Cell3));
        for addr in [0x00, 0x01, 0x04, 0x07, 0x09, 0x0F] {
            assert_eq!(
                EepromCell::from_register(addr),
                Err(Tmp11xError::InvalidEepromCell(addr))
            );
        }
        assert_eq!(EepromCell::Cell3.addr(), 0x08);
    }
}
