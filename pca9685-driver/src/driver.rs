//! Register-level bus access.
//!
//! [`RegisterBus`] is the only capability the controller needs from the
//! transport: single-byte register reads and writes, a contiguous burst
//! write, and the device address. [`I2cRegisterBus`] implements it over any
//! `embedded-hal-async` I2C peripheral.
//!
//! Sharing one physical bus between several devices is the caller's job:
//! hand each driver its own mutex-guarded bus device (for example
//! `embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice`).

use embedded_hal_async::i2c::{I2c, Operation};

/// Byte-addressed register access to a single device.
///
/// Implementations perform each call as one bus transaction and report
/// failures unchanged; the controller never retries.
#[allow(async_fn_in_trait)]
pub trait RegisterBus {
    /// Transport error type.
    type Error;

    /// 7-bit address of the target device. `0` means "not configured".
    fn device_address(&self) -> u8;

    /// Read one byte from `register`.
    async fn read_register(&mut self, register: u8) -> Result<u8, Self::Error>;

    /// Write one byte to `register`.
    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;

    /// Write `bytes` to consecutive registers starting at `start`.
    ///
    /// Relies on the device's auto-increment addressing.
    async fn write_burst(&mut self, start: u8, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// [`RegisterBus`] over an `embedded-hal-async` I2C peripheral.
///
/// Owns the I2C handle for exclusive access.
pub struct I2cRegisterBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cRegisterBus<I2C>
where
    I2C: I2c,
{
    /// Create a new register bus.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    /// * `address` — 7-bit I2C device address (typically 0x40)
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Give back the I2C peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> RegisterBus for I2cRegisterBus<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn device_address(&self) -> u8 {
        self.address
    }

    /// Register address write followed by a repeated-start read.
    async fn read_register(&mut self, register: u8) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(self.address, &[register], &mut buf).await?;
        Ok(buf[0])
    }

    async fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value]).await
    }

    /// Adjacent write operations in one transaction go out without a
    /// repeated start, so the device sees `[start, bytes...]` as one burst.
    async fn write_burst(&mut self, start: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c
            .transaction(
                self.address,
                &mut [Operation::Write(&[start]), Operation::Write(bytes)],
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embassy_futures::block_on;
    use embedded_hal_async::i2c::{ErrorType, SevenBitAddress};

    /// Captures the raw bytes of each I2C transaction.
    #[derive(Default)]
    struct WireLog {
        transactions: Vec<(u8, Vec<u8>)>,
        read_value: u8,
    }

    impl ErrorType for WireLog {
        type Error = Infallible;
    }

    impl I2c<SevenBitAddress> for WireLog {
        async fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            let mut written = Vec::new();
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(bytes) => written.extend_from_slice(bytes),
                    Operation::Read(buf) => buf.fill(self.read_value),
                }
            }
            self.transactions.push((address, written));
            Ok(())
        }
    }

    #[test]
    fn burst_is_one_transaction_with_register_prefix() {
        let mut bus = I2cRegisterBus::new(WireLog::default(), 0x41);
        block_on(bus.write_burst(0x0A, &[1, 2, 3, 4])).unwrap();

        let log = bus.release();
        assert_eq!(log.transactions, [(0x41, vec![0x0A, 1, 2, 3, 4])]);
    }

    #[test]
    fn single_register_write_and_read() {
        let mut bus = I2cRegisterBus::new(
            WireLog {
                read_value: 0x11,
                ..WireLog::default()
            },
            0x40,
        );

        block_on(bus.write_register(0x01, 0x04)).unwrap();
        let value = block_on(bus.read_register(0x00)).unwrap();

        assert_eq!(value, 0x11);
        let log = bus.release();
        assert_eq!(log.transactions[0], (0x40, vec![0x01, 0x04]));
        assert_eq!(log.transactions[1], (0x40, vec![0x00]));
    }

    #[test]
    fn reports_configured_address() {
        let bus = I2cRegisterBus::new(WireLog::default(), 0x5F);
        assert_eq!(bus.device_address(), 0x5F);
    }
}
