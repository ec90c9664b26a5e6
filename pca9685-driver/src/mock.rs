//! Test doubles: an in-memory register file and a recording delay.
//!
//! Both write into one shared [`OpLog`] so tests can assert the exact
//! interleaving of bus transactions and pauses.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;

use crate::config::Pca9685Config;
use crate::driver::RegisterBus;
use crate::pca9685::Pca9685;
use crate::registers::{
    MODE1, MODE1_ALL_CALL, MODE1_AUTO_INCREMENT, MODE1_SLEEP, MODE2, MODE2_OUTPUT_DRIVER, PRESCALE,
};

/// Oscillator settle pause as recorded by [`MockDelay`], in nanoseconds.
pub const SETTLE: u64 = 5_000_000;

/// One observable interaction with the chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusOp {
    Read(u8),
    Write(u8, u8),
    Burst(u8, Vec<u8>),
    /// Pause length in nanoseconds.
    Pause(u64),
}

/// Injected transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

/// Shared, cloneable operation log.
#[derive(Clone, Default)]
pub struct OpLog(Rc<RefCell<Vec<BusOp>>>);

impl OpLog {
    pub fn ops(&self) -> Vec<BusOp> {
        self.0.borrow().clone()
    }

    fn push(&self, op: BusOp) {
        self.0.borrow_mut().push(op);
    }
}

/// 256-byte register file behind a [`RegisterBus`].
///
/// Starts with the chip's power-on values for MODE1, MODE2 and PRESCALE.
/// Bursts advance the register pointer only while MODE1 has auto-increment
/// set; otherwise every byte lands on the start register.
pub struct MockBus {
    log: OpLog,
    address: u8,
    registers: [u8; 256],
    transactions: usize,
    fail_at: Option<usize>,
}

impl MockBus {
    pub fn new(address: u8, log: OpLog) -> Self {
        let mut registers = [0u8; 256];
        registers[MODE1 as usize] = MODE1_SLEEP | MODE1_ALL_CALL;
        registers[MODE2 as usize] = MODE2_OUTPUT_DRIVER;
        registers[PRESCALE as usize] = 0x1E;

        Self {
            log,
            address,
            registers,
            transactions: 0,
            fail_at: None,
        }
    }

    /// Fail the `index`-th transaction (0-based). Failed transactions are
    /// not logged and do not change registers.
    pub fn fail_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    pub fn register(&self, register: u8) -> u8 {
        self.registers[register as usize]
    }

    /// Preload a register without logging.
    pub fn set_register(&mut self, register: u8, value: u8) {
        self.registers[register as usize] = value;
    }

    fn begin(&mut self) -> Result<(), MockBusError> {
        let index = self.transactions;
        self.transactions += 1;
        if self.fail_at == Some(index) {
            Err(MockBusError)
        } else {
            Ok(())
        }
    }
}

impl RegisterBus for MockBus {
    type Error = MockBusError;

    fn device_address(&self) -> u8 {
        self.address
    }

    async fn read_register(&mut self, register: u8) -> Result<u8, Self::Error> {
        self.begin()?;
        self.log.push(BusOp::Read(register));
        Ok(self.registers[register as usize])
    }

    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.begin()?;
        self.log.push(BusOp::Write(register, value));
        self.registers[register as usize] = value;
        Ok(())
    }

    async fn write_burst(&mut self, start: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.begin()?;
        self.log.push(BusOp::Burst(start, bytes.to_vec()));
        let auto_increment = self.registers[MODE1 as usize] & MODE1_AUTO_INCREMENT != 0;
        let mut register = start;
        for &byte in bytes {
            self.registers[register as usize] = byte;
            if auto_increment {
                register = register.wrapping_add(1);
            }
        }
        Ok(())
    }
}

/// Delay that returns immediately and records its length.
pub struct MockDelay {
    log: OpLog,
}

impl MockDelay {
    pub fn new(log: OpLog) -> Self {
        Self { log }
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.push(BusOp::Pause(u64::from(ns)));
    }

    async fn delay_us(&mut self, us: u32) {
        self.log.push(BusOp::Pause(u64::from(us) * 1_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.log.push(BusOp::Pause(u64::from(ms) * 1_000_000));
    }
}

/// Controller at `address` with default configuration, plus its log.
pub fn controller(address: u8) -> (Pca9685<MockBus, MockDelay>, OpLog) {
    let log = OpLog::default();
    let pwm = Pca9685::with_delay(
        MockBus::new(address, log.clone()),
        MockDelay::new(log.clone()),
        Pca9685Config::default(),
    );
    (pwm, log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    #[test]
    fn burst_without_auto_increment_overwrites_start_register() {
        let mut bus = MockBus::new(0x40, OpLog::default());

        block_on(bus.write_burst(0x06, &[1, 2, 3, 4])).unwrap();

        assert_eq!(bus.register(0x06), 4);
        assert_eq!(bus.register(0x07), 0);
        assert_eq!(bus.register(0x09), 0);
    }

    #[test]
    fn burst_with_auto_increment_fills_consecutive_registers() {
        let mut bus = MockBus::new(0x40, OpLog::default());
        bus.set_register(MODE1, MODE1_AUTO_INCREMENT);

        block_on(bus.write_burst(0x06, &[1, 2, 3, 4])).unwrap();

        assert_eq!(
            [0x06, 0x07, 0x08, 0x09].map(|r| bus.register(r)),
            [1, 2, 3, 4]
        );
    }
}
