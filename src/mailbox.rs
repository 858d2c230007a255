//! Si1145 command mailbox.
//!
//! The firmware is driven through three registers:
//! - `COMMAND` — writing a code triggers a firmware action.
//! - `PARAM_WR` — staging register for parameter RAM writes.
//! - `PARAM_RD` — result register for parameter RAM reads.
//!
//! Parameter RAM is only reachable through this triad. Ordering is the
//! protocol's core invariant:
//! - RAM write: stage in `PARAM_WR` **before** issuing `PARAM_SET | offset`.
//! - RAM read: issue `PARAM_QUERY | offset` **before** reading `PARAM_RD`.
//!
//! Under [`CompletionPolicy::Assumed`] the mailbox never reads `RESPONSE`
//! and relies on the device finishing each command before the next bus
//! transaction. [`CompletionPolicy::Polled`] reads `RESPONSE` after each
//! counted command and waits (bounded) for the counter to move.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::config::{as_delay_us, CompletionPolicy};
use crate::driver::RegisterDriver;
use crate::error::SensorError;
use crate::registers::{
    CMD_ALS_FORCE, CMD_GET_CAL, CMD_NOP, CMD_PARAM_QUERY, CMD_PARAM_SET, CMD_RESET,
    LIGHT_READ_SELECT, RAM_OFFSET_MAX, REG_COMMAND, REG_PARAM_RD, REG_PARAM_WR, REG_RESPONSE,
};

/// A mailbox command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Clear the RESPONSE register.
    Nop,
    /// Reset the sensor firmware.
    Reset,
    /// Report calibration data into registers 0x22–0x2D.
    GetCalibration,
    /// Force one visible + IR ambient light measurement.
    ForceMeasurement,
    /// Copy RAM at `offset` into `PARAM_RD`.
    ParamQuery(u8),
    /// Copy `PARAM_WR` into RAM at `offset`.
    ParamSet(u8),
}

impl Command {
    /// Wire code written to the COMMAND register.
    ///
    /// RAM offsets are masked to 5 bits here; [`Mailbox::send_command`]
    /// rejects out-of-range offsets before a code is ever built.
    pub fn code(self) -> u8 {
        match self {
            Command::Nop => CMD_NOP,
            Command::Reset => CMD_RESET,
            Command::GetCalibration => CMD_GET_CAL,
            Command::ForceMeasurement => CMD_ALS_FORCE,
            Command::ParamQuery(offset) => CMD_PARAM_QUERY | (offset & RAM_OFFSET_MAX),
            Command::ParamSet(offset) => CMD_PARAM_SET | (offset & RAM_OFFSET_MAX),
        }
    }

    /// Whether the firmware advances the RESPONSE counter on completion.
    /// NOP and RESET zero it instead.
    fn advances_counter(self) -> bool {
        !matches!(self, Command::Nop | Command::Reset)
    }

    /// RAM offset addressed by a parameter command.
    fn ram_offset(self) -> Option<u8> {
        match self {
            Command::ParamQuery(offset) | Command::ParamSet(offset) => Some(offset),
            _ => None,
        }
    }
}

/// Firmware error codes reported in RESPONSE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseError {
    InvalidCommand,
    Ps1AdcOverflow,
    Ps2AdcOverflow,
    Ps3AdcOverflow,
    AlsVisAdcOverflow,
    AlsIrAdcOverflow,
    AuxAdcOverflow,
    /// Error bit set with an undocumented code.
    Unknown(u8),
}

impl ResponseError {
    fn from_code(code: u8) -> Self {
        match code {
            0x80 => ResponseError::InvalidCommand,
            0x88 => ResponseError::Ps1AdcOverflow,
            0x89 => ResponseError::Ps2AdcOverflow,
            0x8A => ResponseError::Ps3AdcOverflow,
            0x8C => ResponseError::AlsVisAdcOverflow,
            0x8D => ResponseError::AlsIrAdcOverflow,
            0x8E => ResponseError::AuxAdcOverflow,
            other => ResponseError::Unknown(other),
        }
    }
}

/// Decoded contents of the RESPONSE register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Completion counter (low nibble, wraps at 16).
    Counter(u8),
    /// Firmware error code.
    Error(ResponseError),
}

impl Response {
    /// Decode a raw RESPONSE byte: top bit set means an error code.
    pub fn from_raw(raw: u8) -> Self {
        if raw & 0x80 != 0 {
            Response::Error(ResponseError::from_code(raw))
        } else {
            Response::Counter(raw & 0x0F)
        }
    }
}

/// Command mailbox for one Si1145.
///
/// Owns the 8-bit register driver and the delay used by bounded polls.
pub(crate) struct Mailbox<I2C, D> {
    registers: RegisterDriver<I2C, u8>,
    delay: D,
    completion: CompletionPolicy,
}

impl<I2C, D> Mailbox<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Build a mailbox with the Si1145 read-select quirk and assumed completion.
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            registers: RegisterDriver::new(i2c, address, LIGHT_READ_SELECT),
            delay,
            completion: CompletionPolicy::Assumed,
        }
    }

    pub fn address(&self) -> u8 {
        self.registers.address()
    }

    /// Direct register access, bypassing the mailbox.
    pub fn registers(&mut self) -> &mut RegisterDriver<I2C, u8> {
        &mut self.registers
    }

    /// Delay provider shared with readiness polling.
    pub fn delay(&mut self) -> &mut D {
        &mut self.delay
    }

    pub fn set_completion_policy(&mut self, policy: CompletionPolicy) {
        self.completion = policy;
    }

    pub fn completion_policy(&self) -> CompletionPolicy {
        self.completion
    }

    pub fn release(self) -> (I2C, D) {
        (self.registers.release(), self.delay)
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Write a command code to COMMAND.
    ///
    /// Under [`CompletionPolicy::Polled`] the current RESPONSE value is
    /// sampled first and the call returns once it changes.
    ///
    /// # Errors
    /// * [`SensorError::InvalidRamOffset`] if a parameter command addresses
    ///   an offset above `0x1F` (checked before any bus traffic)
    pub async fn send_command(&mut self, command: Command) -> Result<(), SensorError<I2C::Error>> {
        if let Some(offset) = command.ram_offset() {
            check_offset(offset)?;
        }

        match self.completion {
            CompletionPolicy::Polled { attempts, interval } if command.advances_counter() => {
                let before = self.registers.read_register(REG_RESPONSE).await?;
                self.write_command(command).await?;
                self.await_completion(before, attempts, as_delay_us(interval))
                    .await
            }
            _ => self.write_command(command).await,
        }
    }

    async fn write_command(&mut self, command: Command) -> Result<(), SensorError<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("Si1145 command {}", command);

        self.registers.write_register(REG_COMMAND, command.code()).await
    }

    async fn await_completion(
        &mut self,
        before: u8,
        attempts: u8,
        interval_us: u32,
    ) -> Result<(), SensorError<I2C::Error>> {
        for _ in 0..attempts {
            self.delay.delay_us(interval_us).await;
            let raw = self.registers.read_register(REG_RESPONSE).await?;
            match Response::from_raw(raw) {
                Response::Error(code) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Si1145 response error: {}", code);

                    // NOP clears the error so the next command starts clean.
                    self.write_command(Command::Nop).await?;
                    return Err(SensorError::Response(code));
                }
                Response::Counter(_) if raw != before => return Ok(()),
                Response::Counter(_) => {}
            }
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("Si1145 command did not complete after {} polls", attempts);

        Err(SensorError::CommandTimeout)
    }

    /// Read and decode RESPONSE.
    pub async fn read_response(&mut self) -> Result<Response, SensorError<I2C::Error>> {
        let raw = self.registers.read_register(REG_RESPONSE).await?;
        Ok(Response::from_raw(raw))
    }

    // -----------------------------------------------------------------------
    // Parameter RAM
    // -----------------------------------------------------------------------

    /// Write `value` to parameter RAM at `offset`.
    ///
    /// # Errors
    /// * [`SensorError::InvalidRamOffset`] if `offset > 0x1F`
    /// * [`SensorError::I2c`] on communication failure
    pub async fn ram_write(&mut self, offset: u8, value: u8) -> Result<(), SensorError<I2C::Error>> {
        check_offset(offset)?;

        // Stage first: the firmware copies PARAM_WR as soon as it sees the command.
        self.registers.write_register(REG_PARAM_WR, value).await?;
        self.send_command(Command::ParamSet(offset)).await
    }

    /// Read parameter RAM at `offset`.
    ///
    /// # Errors
    /// Same as [`ram_write`](Self::ram_write).
    pub async fn ram_read(&mut self, offset: u8) -> Result<u8, SensorError<I2C::Error>> {
        check_offset(offset)?;

        self.send_command(Command::ParamQuery(offset)).await?;
        self.registers.read_register(REG_PARAM_RD).await
    }
}

fn check_offset<E>(offset: u8) -> Result<(), SensorError<E>> {
    if offset > RAM_OFFSET_MAX {
        Err(SensorError::InvalidRamOffset)
    } else {
        Ok(())
    }
}
