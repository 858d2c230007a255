//! Simulated sensors for host tests.
//!
//! [`SimLight`] models the Si1145 register file, command mailbox, and
//! parameter RAM. [`SimTemperature`] models the MCP9808 16-bit register
//! file. Both record every bus transfer so tests can assert exact wire
//! sequences.

use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use crate::registers::{
    CMD_NOP, CMD_PARAM_QUERY, CMD_PARAM_SET, CMD_RESET, LIGHT_READ_SELECT, RAM_OFFSET_MAX,
    REG_COMMAND, REG_PARAM_RD, REG_PARAM_WR, REG_RESPONSE,
};

/// One recorded bus transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Transfer {
    /// Write transaction carrying these bytes.
    Write(Vec<u8>),
    /// Read transaction requesting this many bytes.
    Read(usize),
}

// ── Si1145 ───────────────────────────────────────────────────────────────

pub(crate) struct SimLight {
    address: u8,
    pub registers: [u8; 0x40],
    pub ram: [u8; 0x20],
    pointer: u8,
    pub transfers: Vec<Transfer>,
    /// Fail the transfer with this index (0-based) with a bus error.
    pub fail_at: Option<usize>,
    /// Error code placed in RESPONSE instead of advancing the counter.
    pub respond_with_error: Option<u8>,
    /// When set, commands are accepted but RESPONSE never changes.
    pub stalled: bool,
}

impl SimLight {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            registers: [0; 0x40],
            ram: [0; 0x20],
            pointer: 0,
            transfers: Vec::new(),
            fail_at: None,
            respond_with_error: None,
            stalled: false,
        }
    }

    /// Bytes written to COMMAND, in order.
    pub fn commands(&self) -> Vec<u8> {
        self.transfers
            .iter()
            .filter_map(|t| match t {
                Transfer::Write(bytes) if bytes.len() == 2 && bytes[0] == REG_COMMAND => {
                    Some(bytes[1])
                }
                _ => None,
            })
            .collect()
    }

    fn execute(&mut self, code: u8) {
        if self.stalled {
            return;
        }
        let offset = (code & RAM_OFFSET_MAX) as usize;
        match code {
            CMD_NOP | CMD_RESET => {
                self.registers[REG_RESPONSE as usize] = 0;
                return;
            }
            c if c & 0xE0 == CMD_PARAM_SET => {
                self.ram[offset] = self.registers[REG_PARAM_WR as usize];
                self.registers[REG_PARAM_RD as usize] = self.ram[offset];
            }
            c if c & 0xE0 == CMD_PARAM_QUERY => {
                self.registers[REG_PARAM_RD as usize] = self.ram[offset];
            }
            _ => {}
        }
        let response = &mut self.registers[REG_RESPONSE as usize];
        *response = match self.respond_with_error {
            Some(err) => err,
            None => response.wrapping_add(1) & 0x0F,
        };
    }

    fn write(&mut self, bytes: &[u8]) {
        self.pointer = bytes[0] & !LIGHT_READ_SELECT;
        for &value in &bytes[1..] {
            let reg = self.pointer;
            self.registers[reg as usize] = value;
            if reg == REG_COMMAND {
                self.execute(value);
            }
            self.pointer = (self.pointer + 1) & 0x3F;
        }
    }

    fn read(&mut self, buffer: &mut [u8]) {
        for byte in buffer.iter_mut() {
            *byte = self.registers[self.pointer as usize];
            self.pointer = (self.pointer + 1) & 0x3F;
        }
    }
}

impl ErrorType for SimLight {
    type Error = ErrorKind;
}

impl I2c for SimLight {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            let index = self.transfers.len();
            match op {
                Operation::Write(bytes) => {
                    self.transfers.push(Transfer::Write(bytes.to_vec()));
                    if self.fail_at == Some(index) {
                        return Err(ErrorKind::Bus);
                    }
                    self.write(bytes);
                }
                Operation::Read(buffer) => {
                    self.transfers.push(Transfer::Read(buffer.len()));
                    if self.fail_at == Some(index) {
                        return Err(ErrorKind::Bus);
                    }
                    self.read(buffer);
                }
            }
        }
        Ok(())
    }
}

// ── MCP9808 ──────────────────────────────────────────────────────────────

pub(crate) struct SimTemperature {
    address: u8,
    pub registers: [u16; 0x10],
    pointer: u8,
    pub transfers: Vec<Transfer>,
}

impl SimTemperature {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            registers: [0; 0x10],
            pointer: 0,
            transfers: Vec::new(),
        }
    }
}

impl ErrorType for SimTemperature {
    type Error = ErrorKind;
}

impl I2c for SimTemperature {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    self.transfers.push(Transfer::Write(bytes.to_vec()));
                    self.pointer = bytes[0] & 0x0F;
                    if bytes.len() == 3 {
                        self.registers[self.pointer as usize] =
                            u16::from_be_bytes([bytes[1], bytes[2]]);
                    }
                }
                Operation::Read(buffer) => {
                    self.transfers.push(Transfer::Read(buffer.len()));
                    let value = self.registers[self.pointer as usize].to_be_bytes();
                    for (byte, src) in buffer.iter_mut().zip(value.iter()) {
                        *byte = *src;
                    }
                }
            }
        }
        Ok(())
    }
}

// ── Delay ────────────────────────────────────────────────────────────────

/// Delay that returns immediately and records what was requested.
#[derive(Default)]
pub(crate) struct CountingDelay {
    pub calls: u32,
    pub total_ns: u64,
}

impl DelayNs for CountingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.calls += 1;
        self.total_ns += u64::from(ns);
    }
}
