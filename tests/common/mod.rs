#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embassy_tmp11x_sensor::{BusConfig, BusSetup, Tmp11xError};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

pub const ADDRESS: u8 = 0x48;
/// TMP117 power-on CONFIG: continuous, 1 s cycle, 8x averaging.
pub const DEFAULT_CONFIG: u16 = 0x0220;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Configure(BusConfig),
    Read(u8),
    Write(u8, u16),
    DelayNs(u32),
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

/// Register-level model of a TMP117 that records every bus transaction.
pub struct SimulatedTmp117 {
    pub registers: [u16; 16],
    pub log: EventLog,
    /// Reads deliver fewer bytes than requested, which the transport reports as an error.
    pub short_reads: bool,
    /// Writes to these registers are not acknowledged.
    pub failing_writes: Vec<u8>,
    /// Exact register/value writes that are not acknowledged.
    pub rejected_writes: Vec<(u8, u16)>,
    pub custom_pins: bool,
}

impl SimulatedTmp117 {
    pub fn new(log: EventLog) -> Self {
        let mut registers = [0u16; 16];
        registers[0x01] = DEFAULT_CONFIG;
        registers[0x02] = 0x6000;
        registers[0x03] = 0x8000;
        registers[0x0F] = 0x0117;
        Self {
            registers,
            log,
            short_reads: false,
            failing_writes: Vec::new(),
            rejected_writes: Vec::new(),
            custom_pins: false,
        }
    }

    pub fn with_register(mut self, register: u8, value: u16) -> Self {
        self.registers[register as usize] = value;
        self
    }

    pub fn eeprom_unlocked(&self) -> bool {
        self.registers[0x04] & 0x8000 != 0
    }

    fn store(&mut self, register: u8, value: u16) {
        match register {
            0x00 | 0x0F => {}
            0x01 if value == 0x8000 => self.registers[0x01] = DEFAULT_CONFIG,
            0x05 | 0x06 | 0x08 if !self.eeprom_unlocked() => {}
            _ => self.registers[register as usize] = value,
        }
    }
}

impl ErrorType for SimulatedTmp117 {
    type Error = ErrorKind;
}

impl I2c for SimulatedTmp117 {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != ADDRESS {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        match operations {
            [Operation::Write(bytes)] if bytes.len() == 3 => {
                let register = bytes[0];
                let value = u16::from_be_bytes([bytes[1], bytes[2]]);
                self.log.borrow_mut().push(Event::Write(register, value));
                if self.failing_writes.contains(&register)
                    || self.rejected_writes.contains(&(register, value))
                {
                    return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
                }
                self.store(register, value);
                Ok(())
            }
            [Operation::Write(pointer), Operation::Read(buf)] if pointer.len() == 1 => {
                let register = pointer[0];
                self.log.borrow_mut().push(Event::Read(register));
                if self.short_reads || buf.len() != 2 {
                    return Err(ErrorKind::Other);
                }
                buf.copy_from_slice(&self.registers[(register & 0x0F) as usize].to_be_bytes());
                Ok(())
            }
            _ => Err(ErrorKind::Other),
        }
    }
}

impl BusSetup for SimulatedTmp117 {
    fn supports_custom_pins(&self) -> bool {
        self.custom_pins
    }

    fn configure(&mut self, config: &BusConfig) -> Result<(), Tmp11xError> {
        self.log.borrow_mut().push(Event::Configure(*config));
        Ok(())
    }
}

/// Delay that returns immediately but shows up in the event log.
pub struct SimulatedDelay {
    pub log: EventLog,
}

impl DelayNs for SimulatedDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::DelayNs(ns));
    }
}

pub struct NoDelay;

impl DelayNs for NoDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

pub fn simulated() -> (SimulatedTmp117, SimulatedDelay, EventLog) {
    let log = EventLog::default();
    (
        SimulatedTmp117::new(log.clone()),
        SimulatedDelay { log: log.clone() },
        log,
    )
}
