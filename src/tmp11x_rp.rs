use embassy_embedded_hal::SetConfig;
use embassy_rp::i2c::{self, Instance, Mode};

use crate::{BusConfig, BusSetup, Tmp11xError};

/// RP2040 pins are bound when the peripheral is constructed, so only the clock is applied.
impl<'d, T: Instance, M: Mode> BusSetup for i2c::I2c<'d, T, M> {
    fn configure(&mut self, config: &BusConfig) -> Result<(), Tmp11xError> {
        if let Some(pins) = config.pins {
            warn!("Ignoring SDA {} / SCL {}, RP2040 pins are fixed at construction", pins.sda, pins.scl);
        }
        let mut rp_config = i2c::Config::default();
        rp_config.frequency = config.frequency;
        match self.set_config(&rp_config) {
            Ok(_) => Ok(()),
            Err(_) => {
                warn!("Unsupported I2C frequency {}", config.frequency);
                Err(Tmp11xError::I2CError)
            }
        }
    }
}
