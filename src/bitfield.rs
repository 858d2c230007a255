//! Register widths and the single-bit read-modify-write editor.
//!
//! Every edit is one register read followed by one register write. Nothing
//! is cached between calls, and the pair is not atomic: a change made by
//! another bus master between the read and the write is lost. Exclusive
//! access comes from the driver owning its I2C handle (`&mut self`).

use core::ops::{BitAnd, BitOr, Not};

use embedded_hal_async::i2c::I2c;

use crate::driver::RegisterDriver;
use crate::error::SensorError;

/// Value type of a device register (`u8` or `u16`).
pub(crate) trait RegisterValue:
    Copy + PartialEq + BitAnd<Output = Self> + BitOr<Output = Self> + Not<Output = Self>
{
    /// Register width in bytes.
    const BYTES: usize;

    /// Zero value of the register.
    const ZERO: Self;

    /// Single-bit mask, or `None` if `index` is outside the register.
    fn bit(index: u8) -> Option<Self>;

    /// Write the value into `out` most-significant byte first.
    /// `out.len()` must equal [`Self::BYTES`].
    fn write_be(self, out: &mut [u8]);

    /// Assemble a value from `bytes`, most-significant byte first.
    fn from_be(bytes: &[u8]) -> Self;
}

impl RegisterValue for u8 {
    const BYTES: usize = 1;
    const ZERO: Self = 0;

    fn bit(index: u8) -> Option<Self> {
        1u8.checked_shl(u32::from(index))
    }

    fn write_be(self, out: &mut [u8]) {
        out[0] = self;
    }

    fn from_be(bytes: &[u8]) -> Self {
        bytes[0]
    }
}

impl RegisterValue for u16 {
    const BYTES: usize = 2;
    const ZERO: Self = 0;

    fn bit(index: u8) -> Option<Self> {
        1u16.checked_shl(u32::from(index))
    }

    fn write_be(self, out: &mut [u8]) {
        out.copy_from_slice(&self.to_be_bytes());
    }

    fn from_be(bytes: &[u8]) -> Self {
        u16::from_be_bytes([bytes[0], bytes[1]])
    }
}

impl<I2C, V> RegisterDriver<I2C, V>
where
    I2C: I2c,
    V: RegisterValue,
{
    /// Set one bit of a register.
    ///
    /// # Errors
    /// * [`SensorError::InvalidBit`] if `bit` is outside the register
    ///   (checked before any bus traffic)
    /// * [`SensorError::I2c`] on communication failure
    pub async fn set_bit(&mut self, register: u8, bit: u8) -> Result<(), SensorError<I2C::Error>> {
        let mask = V::bit(bit).ok_or(SensorError::InvalidBit)?;
        let contents = self.read_register(register).await?;
        self.write_register(register, contents | mask).await
    }

    /// Clear one bit of a register.
    ///
    /// # Errors
    /// Same as [`set_bit`](Self::set_bit).
    pub async fn clear_bit(
        &mut self,
        register: u8,
        bit: u8,
    ) -> Result<(), SensorError<I2C::Error>> {
        let mask = V::bit(bit).ok_or(SensorError::InvalidBit)?;
        let contents = self.read_register(register).await?;
        self.write_register(register, contents & !mask).await
    }

    /// Check whether one bit of a register is set.
    pub async fn check_bit(
        &mut self,
        register: u8,
        bit: u8,
    ) -> Result<bool, SensorError<I2C::Error>> {
        let mask = V::bit(bit).ok_or(SensorError::InvalidBit)?;
        let contents = self.read_register(register).await?;
        Ok(contents & mask != V::ZERO)
    }
}
