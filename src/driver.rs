//! Low-level register access driver.
//!
//! Implements the register primitives shared by both sensors on top of
//! single I2C write and read transactions. Register width and the
//! read-selection quirk are the only per-device differences.
//!
//! This module is crate-private. Consumers interact with
//! [`AmbientLightSensor`](crate::AmbientLightSensor) and
//! [`TemperatureSensor`](crate::TemperatureSensor) instead.

use core::marker::PhantomData;

use embedded_hal_async::i2c::I2c;

use crate::bitfield::RegisterValue;
use crate::error::SensorError;

/// Largest register width handled by the driver, in bytes.
const MAX_REGISTER_BYTES: usize = 2;

/// Register access driver for one device.
///
/// Owns an I2C peripheral and provides register read/write primitives for
/// registers of width `V` (`u8` or `u16`).
pub(crate) struct RegisterDriver<I2C, V> {
    i2c: I2C,
    address: u8,
    /// OR'd into the register address when selecting it for a read.
    read_select: u8,
    _width: PhantomData<V>,
}

impl<I2C, V> RegisterDriver<I2C, V>
where
    I2C: I2c,
    V: RegisterValue,
{
    /// Create a new register driver.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    /// * `address` — 7-bit I2C device address
    /// * `read_select` — bits OR'd into the register address on the read path
    pub fn new(i2c: I2C, address: u8, read_select: u8) -> Self {
        Self {
            i2c,
            address,
            read_select,
            _width: PhantomData,
        }
    }

    /// 7-bit bus address of the device.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the underlying I2C peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }

    // -----------------------------------------------------------------------
    // Core protocol primitives
    // -----------------------------------------------------------------------

    /// Select a register for reading.
    ///
    /// Sends the register address (with the device's read-select bits) as a
    /// write transaction of its own. The following read transaction returns
    /// data starting at that register.
    async fn select(&mut self, register: u8) -> Result<(), SensorError<I2C::Error>> {
        self.i2c
            .write(self.address, &[register | self.read_select])
            .await?;
        Ok(())
    }

    /// Select a register, then read `buffer.len()` bytes from it.
    ///
    /// Uses separate `write()` and `read()` operations rather than
    /// `write_read()`: the selection must be a complete transaction.
    pub async fn read_bytes(
        &mut self,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), SensorError<I2C::Error>> {
        self.select(register).await?;
        self.i2c.read(self.address, buffer).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Typed register helpers
    // -----------------------------------------------------------------------

    /// Write a full register value.
    ///
    /// Sends the register address followed by the value bytes,
    /// most-significant byte first, in a single write transaction.
    pub async fn write_register(
        &mut self,
        register: u8,
        value: V,
    ) -> Result<(), SensorError<I2C::Error>> {
        // Full write buffer: [register, msb, .., lsb]
        let mut buf = [0u8; 1 + MAX_REGISTER_BYTES];
        buf[0] = register;
        value.write_be(&mut buf[1..=V::BYTES]);

        self.i2c.write(self.address, &buf[..=V::BYTES]).await?;

        Ok(())
    }

    /// Read a full register value.
    ///
    /// Requests exactly the register width and assembles the bytes
    /// most-significant byte first.
    pub async fn read_register(&mut self, register: u8) -> Result<V, SensorError<I2C::Error>> {
        let mut buf = [0u8; MAX_REGISTER_BYTES];
        self.read_bytes(register, &mut buf[..V::BYTES]).await?;
        Ok(V::from_be(&buf[..V::BYTES]))
    }

    /// Read a single byte from a register, regardless of its width.
    pub async fn read_low_byte(&mut self, register: u8) -> Result<u8, SensorError<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.read_bytes(register, &mut buf).await?;
        Ok(buf[0])
    }
}
