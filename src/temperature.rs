//! High-level interface for the MCP9808 temperature sensor.
//!
//! All registers are 16 bits wide and transferred most-significant byte
//! first. The ambient temperature register packs alert flags and a sign
//! bit into the upper byte; only its low nibble is temperature data.

use embedded_hal_async::i2c::I2c;

use crate::driver::RegisterDriver;
use crate::error::SensorError;
use crate::registers::{
    CONFIG_SHUTDOWN_BIT, REG_CONFIG, REG_DEVICE_ID, REG_MANUFACTURER_ID, REG_T_AMBIENT,
    T_AMBIENT_UPPER_MASK,
};

/// High-level interface for the MCP9808 temperature sensor.
///
/// # Example
///
/// ```ignore
/// use plant_sensors::{TemperatureSensor, TEMP_DEFAULT_ADDRESS};
///
/// let mut sensor = TemperatureSensor::new(i2c, TEMP_DEFAULT_ADDRESS);
/// let fahrenheit = sensor.read_temperature_f().await?;
/// ```
pub struct TemperatureSensor<I2C> {
    driver: RegisterDriver<I2C, u16>,
}

impl<I2C> TemperatureSensor<I2C>
where
    I2C: I2c,
{
    /// Create a new sensor interface. No bus traffic is generated.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    /// * `address` — 7-bit I2C device address (typically 0x18)
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            driver: RegisterDriver::new(i2c, address, 0),
        }
    }

    /// 7-bit bus address of the sensor.
    pub fn address(&self) -> u8 {
        self.driver.address()
    }

    /// Release the underlying I2C peripheral.
    pub fn release(self) -> I2C {
        self.driver.release()
    }

    // -----------------------------------------------------------------------
    // Measurements
    // -----------------------------------------------------------------------

    /// Ambient temperature in the sensor's Celsius scale.
    ///
    /// Computed as `upper_nibble * 16 + lower / 16`. The sign bit is
    /// discarded with the flag bits, so sub-zero readings are not
    /// represented.
    pub async fn read_temperature_c(&mut self) -> Result<f32, SensorError<I2C::Error>> {
        let mut buf = [0u8; 2];
        self.driver.read_bytes(REG_T_AMBIENT, &mut buf).await?;

        let upper = buf[0] & T_AMBIENT_UPPER_MASK;
        let lower = buf[1];
        Ok(f32::from(upper) * 16.0 + f32::from(lower) / 16.0)
    }

    /// Ambient temperature in degrees Fahrenheit. Same sign limitation as
    /// [`read_temperature_c`](Self::read_temperature_c).
    pub async fn read_temperature_f(&mut self) -> Result<f32, SensorError<I2C::Error>> {
        let celsius = self.read_temperature_c().await?;
        Ok(celsius * 9.0 / 5.0 + 32.0)
    }

    /// Manufacturer ID register (`0x0054` on a genuine part).
    pub async fn manufacturer_id(&mut self) -> Result<u16, SensorError<I2C::Error>> {
        self.driver.read_register(REG_MANUFACTURER_ID).await
    }

    /// Device ID (upper byte) and revision (lower byte).
    pub async fn device_id(&mut self) -> Result<u16, SensorError<I2C::Error>> {
        self.driver.read_register(REG_DEVICE_ID).await
    }

    // -----------------------------------------------------------------------
    // Power
    // -----------------------------------------------------------------------

    /// Enter (`true`) or leave (`false`) low-power shutdown mode.
    pub async fn set_shutdown(&mut self, enable: bool) -> Result<(), SensorError<I2C::Error>> {
        if enable {
            self.driver.set_bit(REG_CONFIG, CONFIG_SHUTDOWN_BIT).await
        } else {
            self.driver.clear_bit(REG_CONFIG, CONFIG_SHUTDOWN_BIT).await
        }
    }

    /// Whether the sensor is in shutdown mode (config bit 8).
    pub async fn is_shutdown(&mut self) -> Result<bool, SensorError<I2C::Error>> {
        self.driver.check_bit(REG_CONFIG, CONFIG_SHUTDOWN_BIT).await
    }

    // -----------------------------------------------------------------------
    // Direct registers
    // -----------------------------------------------------------------------

    /// Write one 16-bit register, most-significant byte first.
    pub async fn write_register(&mut self, register: u8, value: u16) -> Result<(), SensorError<I2C::Error>> {
        self.driver.write_register(register, value).await
    }

    /// Read one 16-bit register, most-significant byte first.
    pub async fn read_register(&mut self, register: u8) -> Result<u16, SensorError<I2C::Error>> {
        self.driver.read_register(register).await
    }

    /// Select a register and read a single byte of it.
    pub async fn read_low_byte(&mut self, register: u8) -> Result<u8, SensorError<I2C::Error>> {
        self.driver.read_low_byte(register).await
    }

    /// Set one bit of a register (read-modify-write).
    pub async fn set_bit(&mut self, register: u8, bit: u8) -> Result<(), SensorError<I2C::Error>> {
        self.driver.set_bit(register, bit).await
    }

    /// Clear one bit of a register (read-modify-write).
    pub async fn clear_bit(&mut self, register: u8, bit: u8) -> Result<(), SensorError<I2C::Error>> {
        self.driver.clear_bit(register, bit).await
    }

    /// Whether one bit of a register is set.
    pub async fn check_bit(&mut self, register: u8, bit: u8) -> Result<bool, SensorError<I2C::Error>> {
        self.driver.check_bit(register, bit).await
    }
}
