use embassy_time::Duration;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::conversion::{celsius_to_fahrenheit, celsius_to_raw, raw_to_celsius};
use crate::registers::{
    AlertFunction, AlertPolarity, Averaging, ConfigField, ConversionCycle, EEPROM_LOCK,
    EEPROM_UNLOCK, EepromCell, FieldValue, Mode, Register, SOFT_RESET,
};
use crate::{BusConfig, BusSetup, DeviceVariant, Status, Tmp11xError};

/// Wait after unlocking before the EEPROM accepts a write.
const EEPROM_SETTLE_TIME: Duration = Duration::from_millis(2);
/// Must cover the device's internal programming time (7 ms typical).
const EEPROM_COMMIT_TIME: Duration = Duration::from_millis(10);

/// TMP116/TMP117 driver.
///
/// The bus is borrowed, so other devices may share it between calls. Nothing is cached:
/// every accessor is a fresh register transaction.
pub struct Tmp11xSensor<'a, T: I2c, D: DelayNs> {
    i2c: &'a mut T,
    delay: D,
    address: u8,
}

impl<'a, T: I2c, D: DelayNs> Tmp11xSensor<'a, T, D> {
    pub fn new(i2c: &'a mut T, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Gives back the delay provider; the bus borrow ends with `self`.
    pub fn release(self) -> D {
        self.delay
    }

    /// Reads DEVICE_ID and checks it against the known TMP116/TMP117 codes.
    ///
    /// A failed read and an unknown identity both end up as [`Tmp11xError::DeviceNotFound`].
    pub async fn verify_device(&mut self) -> Result<DeviceVariant, Tmp11xError> {
        let id = match self.device_id().await {
            Ok(id) => id,
            Err(_) => {
                warn!("No answer from TMP11x at {:#x}", self.address);
                return Err(Tmp11xError::DeviceNotFound);
            }
        };
        match DeviceVariant::from_id(id) {
            Some(variant) => {
                info!("TMP11x at {:#x} identified, id {:#x}", self.address, id);
                Ok(variant)
            }
            None => {
                warn!("Unexpected device id {:#x} at {:#x}", id, self.address);
                Err(Tmp11xError::DeviceNotFound)
            }
        }
    }

    pub async fn device_id(&mut self) -> Result<u16, Tmp11xError> {
        self.read_register(Register::DeviceId).await
    }

    pub async fn read_raw_temperature(&mut self) -> Result<i16, Tmp11xError> {
        Ok(self.read_register(Register::Temperature).await? as i16)
    }

    pub async fn read_temperature_celsius(&mut self) -> Result<f32, Tmp11xError> {
        Ok(raw_to_celsius(self.read_raw_temperature().await?))
    }

    pub async fn read_temperature_fahrenheit(&mut self) -> Result<f32, Tmp11xError> {
        Ok(celsius_to_fahrenheit(self.read_temperature_celsius().await?))
    }

    pub async fn read_config(&mut self) -> Result<u16, Tmp11xError> {
        self.read_register(Register::Configuration).await
    }

    pub async fn write_config(&mut self, config: u16) -> Result<(), Tmp11xError> {
        self.write_register(Register::Configuration, config).await
    }

    /// Triggers a soft reset. The device reloads its EEPROM defaults on its own time.
    pub async fn reset(&mut self) -> Result<(), Tmp11xError> {
        debug!("Soft reset");
        self.write_config(SOFT_RESET).await
    }

    pub async fn read_status(&mut self) -> Result<Status, Tmp11xError> {
        Ok(Status::from_config(self.read_config().await?))
    }

    /// Reads CONFIG and returns the bits of `field`, right-aligned.
    pub async fn read_field(&mut self, field: ConfigField) -> Result<u8, Tmp11xError> {
        Ok(field.extract(self.read_config().await?))
    }

    /// Read-modify-write of one CONFIG field.
    ///
    /// `value` is truncated to the field width rather than rejected.
    pub async fn write_field(&mut self, field: ConfigField, value: u8) -> Result<(), Tmp11xError> {
        let config = self.read_config().await?;
        self.write_config(field.insert(config, value)).await
    }

    async fn read_value<F: FieldValue>(&mut self) -> Result<F, Tmp11xError> {
        Ok(F::from_bits(self.read_field(F::FIELD).await?))
    }

    async fn write_value<F: FieldValue>(&mut self, value: F) -> Result<(), Tmp11xError> {
        self.write_field(F::FIELD, value.bits()).await
    }

    pub async fn get_mode(&mut self) -> Result<Mode, Tmp11xError> {
        self.read_value().await
    }

    pub async fn set_mode(&mut self, mode: Mode) -> Result<(), Tmp11xError> {
        self.write_value(mode).await
    }

    pub async fn get_conversion_cycle(&mut self) -> Result<ConversionCycle, Tmp11xError> {
        self.read_value().await
    }

    pub async fn set_conversion_cycle(&mut self, cycle: ConversionCycle) -> Result<(), Tmp11xError> {
        self.write_value(cycle).await
    }

    pub async fn get_averaging(&mut self) -> Result<Averaging, Tmp11xError> {
        self.read_value().await
    }

    pub async fn set_averaging(&mut self, averaging: Averaging) -> Result<(), Tmp11xError> {
        self.write_value(averaging).await
    }

    pub async fn get_alert_function(&mut self) -> Result<AlertFunction, Tmp11xError> {
        self.read_value().await
    }

    pub async fn set_alert_function(&mut self, function: AlertFunction) -> Result<(), Tmp11xError> {
        self.write_value(function).await
    }

    pub async fn get_alert_polarity(&mut self) -> Result<AlertPolarity, Tmp11xError> {
        self.read_value().await
    }

    pub async fn set_alert_polarity(&mut self, polarity: AlertPolarity) -> Result<(), Tmp11xError> {
        self.write_value(polarity).await
    }

    pub async fn get_high_limit(&mut self) -> Result<f32, Tmp11xError> {
        self.read_celsius(Register::HighLimit).await
    }

    pub async fn set_high_limit(&mut self, celsius: f32) -> Result<(), Tmp11xError> {
        self.write_celsius(Register::HighLimit, celsius).await
    }

    pub async fn get_low_limit(&mut self) -> Result<f32, Tmp11xError> {
        self.read_celsius(Register::LowLimit).await
    }

    pub async fn set_low_limit(&mut self, celsius: f32) -> Result<(), Tmp11xError> {
        self.write_celsius(Register::LowLimit, celsius).await
    }

    /// Offset the device adds to every conversion result.
    pub async fn get_offset(&mut self) -> Result<f32, Tmp11xError> {
        self.read_celsius(Register::TemperatureOffset).await
    }

    /// Example: a sensor reading 0.3 °C high is corrected with `set_offset(-0.3)`.
    pub async fn set_offset(&mut self, celsius: f32) -> Result<(), Tmp11xError> {
        self.write_celsius(Register::TemperatureOffset, celsius).await
    }

    /// Reads one of the EEPROM scratch cells (0x05, 0x06 or 0x08). No unlock is needed.
    pub async fn read_eeprom(&mut self, cell: u8) -> Result<u16, Tmp11xError> {
        let cell = EepromCell::from_register(cell)?;
        self.read_register(cell.register()).await
    }

    /// Programs one of the EEPROM scratch cells (0x05, 0x06 or 0x08).
    ///
    /// Runs the whole unlock, write, commit wait, lock sequence and blocks for roughly 12 ms.
    /// The result is the result of the cell write; a failed re-lock is only logged.
    pub async fn write_eeprom(&mut self, cell: u8, value: u16) -> Result<(), Tmp11xError> {
        let cell = EepromCell::from_register(cell)?;

        self.write_register(Register::EepromUnlock, EEPROM_UNLOCK).await?;
        self.wait(EEPROM_SETTLE_TIME).await;

        let written = self.write_register(cell.register(), value).await;
        if written.is_ok() {
            self.wait(EEPROM_COMMIT_TIME).await;
        }

        if self.write_register(Register::EepromUnlock, EEPROM_LOCK).await.is_err() {
            warn!("EEPROM left unlocked after writing {:?}", cell);
        }
        written
    }

    async fn read_celsius(&mut self, register: Register) -> Result<f32, Tmp11xError> {
        Ok(raw_to_celsius(self.read_register(register).await? as i16))
    }

    async fn write_celsius(&mut self, register: Register, celsius: f32) -> Result<(), Tmp11xError> {
        self.write_register(register, celsius_to_raw(celsius) as u16).await
    }

    async fn wait(&mut self, duration: Duration) {
        self.delay.delay_us(duration.as_micros() as u32).await;
    }

    async fn read_register(&mut self, register: Register) -> Result<u16, Tmp11xError> {
        let mut buf = [0u8; 2];
        self.i2c_write_read(&[register.addr()], &mut buf).await?;
        let value = u16::from_be_bytes(buf);
        trace!("Read {:?} = {:#x}", register, value);
        Ok(value)
    }

    async fn write_register(&mut self, register: Register, value: u16) -> Result<(), Tmp11xError> {
        let [msb, lsb] = value.to_be_bytes();
        trace!("Write {:?} = {:#x}", register, value);
        self.i2c_write(&[register.addr(), msb, lsb]).await
    }

    async fn i2c_write_read(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Tmp11xError> {
        match self.i2c.write_read(self.address, write, read).await {
            Ok(_) => Ok(()),
            Err(_) => {
                debug!("I2C read of register {:#x} failed", write[0]);
                Err(Tmp11xError::I2CError)
            }
        }
    }

    async fn i2c_write(&mut self, write: &[u8]) -> Result<(), Tmp11xError> {
        match self.i2c.write(self.address, write).await {
            Ok(_) => Ok(()),
            Err(_) => {
                debug!("I2C write of register {:#x} failed", write[0]);
                Err(Tmp11xError::I2CError)
            }
        }
    }
}

impl<'a, T: I2c + BusSetup, D: DelayNs> Tmp11xSensor<'a, T, D> {
    /// Brings the bus up with `config`, then checks the device identity.
    pub async fn initialize(&mut self, config: BusConfig) -> Result<DeviceVariant, Tmp11xError> {
        if config.pins.is_some() && !self.i2c.supports_custom_pins() {
            debug!("Transport uses fixed pins, pin request ignored");
        }
        self.i2c.configure(&config)?;
        self.verify_device().await
    }
}
