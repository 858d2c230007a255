//! Error types for the sensor drivers.

use core::fmt;

use crate::mailbox::ResponseError;

/// Errors that can occur when communicating with either sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError<E> {
    /// Underlying I2C bus error.
    I2c(E),

    /// Bit index is not inside the register (0–7 or 0–15).
    InvalidBit,

    /// Parameter RAM offset is out of range (must be 0x00–0x1F).
    InvalidRamOffset,

    /// The hardware key never read back as `0x17`.
    NotReady {
        /// Number of readiness checks performed before giving up.
        attempts: u8,
    },

    /// The firmware response counter did not advance after a command.
    CommandTimeout,

    /// The firmware reported an error code in the RESPONSE register.
    Response(ResponseError),
}

// Allow ergonomic `?` propagation from raw I2C errors.
impl<E> From<E> for SensorError<E> {
    fn from(error: E) -> Self {
        SensorError::I2c(error)
    }
}

impl<E: fmt::Debug> fmt::Display for SensorError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SensorError::I2c(e) => write!(f, "I2C error: {:?}", e),
            SensorError::InvalidBit => write!(f, "Bit index outside register width"),
            SensorError::InvalidRamOffset => write!(f, "RAM offset out of range (must be 0x00-0x1F)"),
            SensorError::NotReady { attempts } => {
                write!(f, "Sensor not ready after {} attempts", attempts)
            }
            SensorError::CommandTimeout => write!(f, "Command completion timed out"),
            SensorError::Response(code) => write!(f, "Firmware response error: {:?}", code),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for SensorError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            SensorError::I2c(e) => defmt::write!(f, "I2C error: {}", e),
            SensorError::InvalidBit => defmt::write!(f, "Invalid bit index"),
            SensorError::InvalidRamOffset => defmt::write!(f, "Invalid RAM offset"),
            SensorError::NotReady { attempts } => {
                defmt::write!(f, "Not ready after {} attempts", attempts)
            }
            SensorError::CommandTimeout => defmt::write!(f, "Command timeout"),
            SensorError::Response(code) => defmt::write!(f, "Response error: {}", code),
        }
    }
}
