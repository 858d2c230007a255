//! Register, command, and RAM offset constants for both sensors.
//!
//! The Si1145 exposes a flat 8-bit register map plus a 32-byte parameter
//! RAM that is only reachable through the command mailbox:
//! - Stage a value in `PARAM_WR`, then write `PARAM_SET | offset` to `COMMAND`.
//! - Write `PARAM_QUERY | offset` to `COMMAND`, then read `PARAM_RD`.
//!
//! The MCP9808 uses 16-bit registers transferred most-significant byte first.

// ---------------------------------------------------------------------------
// Si1145 bus address and wire quirks
// ---------------------------------------------------------------------------

/// Default I2C address of the Si1145 ambient light sensor.
pub const LIGHT_DEFAULT_ADDRESS: u8 = 0x60;

/// OR'd into the register address when selecting a Si1145 register for a
/// read. Reads without it do not return the selected register.
pub const LIGHT_READ_SELECT: u8 = 0b0100_0000;

// ---------------------------------------------------------------------------
// Si1145 direct registers
// ---------------------------------------------------------------------------

/// Hardware key register. Must hold [`HW_KEY_VALUE`] for normal operation.
pub const REG_HW_KEY: u8 = 0x07;
pub const REG_MEAS_RATE0: u8 = 0x08;
pub const REG_MEAS_RATE1: u8 = 0x09;

/// Mailbox staging register for RAM writes.
pub const REG_PARAM_WR: u8 = 0x17;

/// Mailbox command register (write-only trigger).
pub const REG_COMMAND: u8 = 0x18;

/// Firmware response register: a completion counter in the low nibble, or
/// an error code with the top bit set.
pub const REG_RESPONSE: u8 = 0x20;

pub const REG_ALS_VIS_DATA0: u8 = 0x22;
pub const REG_ALS_VIS_DATA1: u8 = 0x23;
pub const REG_ALS_IR_DATA0: u8 = 0x24;
pub const REG_ALS_IR_DATA1: u8 = 0x25;

/// Mailbox result register for RAM reads.
pub const REG_PARAM_RD: u8 = 0x2E;

/// Number of registers covered by a full register dump (0x00..0x3F).
pub const LIGHT_REGISTER_COUNT: usize = 0x3F;

/// Value the hardware key register must read back before the sensor is usable.
pub const HW_KEY_VALUE: u8 = 0x17;

// ---------------------------------------------------------------------------
// Si1145 mailbox command codes
// ---------------------------------------------------------------------------

pub const CMD_NOP: u8 = 0x00;
pub const CMD_RESET: u8 = 0x01;
pub const CMD_ALS_FORCE: u8 = 0x06;
pub const CMD_GET_CAL: u8 = 0x12;

/// Base code for an indirect RAM read. Per-offset code: `CMD_PARAM_QUERY | offset`.
pub const CMD_PARAM_QUERY: u8 = 0x80;

/// Base code for an indirect RAM write. Per-offset code: `CMD_PARAM_SET | offset`.
pub const CMD_PARAM_SET: u8 = 0xA0;

/// Highest addressable parameter RAM offset. Larger offsets would spill
/// into the command code bits.
pub const RAM_OFFSET_MAX: u8 = 0x1F;

// ---------------------------------------------------------------------------
// Si1145 parameter RAM offsets
// ---------------------------------------------------------------------------

/// Channel list: one enable bit group per sensing channel.
pub const RAM_CHLIST: u8 = 0x01;
pub const RAM_ALS_IR_ADC_MUX: u8 = 0x0E;
pub const RAM_ALS_VIS_ADC_COUNTER: u8 = 0x10;
pub const RAM_ALS_VIS_ADC_GAIN: u8 = 0x11;
pub const RAM_ALS_VIS_ADC_MISC: u8 = 0x12;
pub const RAM_ALS_IR_ADC_COUNTER: u8 = 0x1D;
pub const RAM_ALS_IR_ADC_GAIN: u8 = 0x1E;
pub const RAM_ALS_IR_ADC_MISC: u8 = 0x1F;

// ---------------------------------------------------------------------------
// Si1145 channel list masks
// ---------------------------------------------------------------------------

pub const CHLIST_PROXIMITY: u8 = 0x07;
pub const CHLIST_ALS: u8 = 0x30;
pub const CHLIST_AUX: u8 = 0x40;
pub const CHLIST_UV: u8 = 0x80;

// ---------------------------------------------------------------------------
// MCP9808 registers
// ---------------------------------------------------------------------------

/// Default I2C address of the MCP9808 temperature sensor.
pub const TEMP_DEFAULT_ADDRESS: u8 = 0x18;

pub const REG_CONFIG: u8 = 0x01;
pub const REG_T_UPPER: u8 = 0x02;
pub const REG_T_LOWER: u8 = 0x03;
pub const REG_T_CRIT: u8 = 0x04;
pub const REG_T_AMBIENT: u8 = 0x05;
pub const REG_MANUFACTURER_ID: u8 = 0x06;
pub const REG_DEVICE_ID: u8 = 0x07;
pub const REG_RESOLUTION: u8 = 0x08;

/// Shutdown (low-power) bit of the configuration register.
pub const CONFIG_SHUTDOWN_BIT: u8 = 8;

/// Manufacturer ID reported by a genuine MCP9808.
pub const MANUFACTURER_ID: u16 = 0x0054;

/// Device ID / revision reported by a genuine MCP9808.
pub const DEVICE_ID_REV: u16 = 0x0400;

/// Upper byte of the ambient temperature register carries alert flags in
/// its top bits; only the low nibble is temperature data.
pub const T_AMBIENT_UPPER_MASK: u8 = 0x0F;
