#![no_std]
#![no_main]

use defmt::{error, info};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::peripherals::I2C0;
use embassy_rp::{bind_interrupts, i2c};
use embassy_time::{Delay, Duration, Timer};
use embassy_tmp11x_sensor::{
    Averaging, BusConfig, ConversionCycle, DEFAULT_ADDRESS, Tmp11xError, Tmp11xSensor,
};
use panic_probe as _;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

#[embassy_executor::main]
async fn main(_spawner: Spawner) -> ! {
    let p = embassy_rp::init(Default::default());

    let sda = p.PIN_0;
    let scl = p.PIN_1;

    // Configure I2C
    let mut i2c = i2c::I2c::new_async(p.I2C0, scl, sda, Irqs, Default::default());

    // Create sensor instance
    let mut sensor = Tmp11xSensor::new(&mut i2c, Delay, DEFAULT_ADDRESS);

    match sensor.initialize(BusConfig::default()).await {
        Ok(variant) => info!("Found {}", variant),
        Err(_) => error!("No TMP116/TMP117 on the bus"),
    }

    // 32 averaged conversions, one result per second
    if let Err(e) = sensor.set_averaging(Averaging::X32).await {
        error!("Configuration failed: {}", e);
    }
    if let Err(e) = sensor.set_conversion_cycle(ConversionCycle::S1).await {
        error!("Configuration failed: {}", e);
    }
    if let Err(e) = sensor.set_high_limit(30.0).await {
        error!("Setting high limit failed: {}", e);
    }
    if let Err(e) = sensor.set_low_limit(10.0).await {
        error!("Setting low limit failed: {}", e);
    }

    // Read sensor data
    loop {
        match sensor.read_temperature_celsius().await {
            Ok(temperature) => {
                info!("Temperature: {}°C", temperature);
            }
            Err(e) => match e {
                Tmp11xError::I2CError => error!("I2C communication error"),
                Tmp11xError::InvalidEepromCell(addr) => error!("Invalid EEPROM cell {}", addr),
                Tmp11xError::DeviceNotFound => error!("Device not found"),
            },
        }

        Timer::after(Duration::from_secs(1)).await;
    }
}
