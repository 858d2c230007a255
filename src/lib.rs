//! Async drivers for the plant monitor's I2C sensors.
//!
//! This crate provides Embassy-compatible async drivers for the Silicon
//! Labs Si1145 ambient light sensor and the Microchip MCP9808 temperature
//! sensor, sharing one two-wire bus.
//!
//! # Architecture
//!
//! - **`driver`** (crate-private) — register access over single I2C write
//!   and read transactions, generic over 8- and 16-bit register widths.
//! - **`bitfield`** (crate-private) — single-bit read-modify-write editing.
//! - **`mailbox`** — the Si1145 command mailbox: firmware commands and
//!   indirect parameter RAM access through `COMMAND` / `PARAM_WR` /
//!   `PARAM_RD`.
//! - **`channels`** — masked CHLIST updates that enable or disable one
//!   sensing channel without disturbing the others.
//! - **[`AmbientLightSensor`]** and **[`TemperatureSensor`]** (public) —
//!   validated, high-level APIs.
//!
//! # Quick start
//!
//! ```ignore
//! use plant_sensors::{
//!     AmbientLightSensor, LightConfig, ReadyPolicy, TemperatureSensor,
//!     LIGHT_DEFAULT_ADDRESS, TEMP_DEFAULT_ADDRESS,
//! };
//!
//! let mut light = AmbientLightSensor::new(i2c_light, delay, LIGHT_DEFAULT_ADDRESS);
//! let mut temp = TemperatureSensor::new(i2c_temp, TEMP_DEFAULT_ADDRESS);
//!
//! light.configure(&LightConfig::default()).await?;
//! light.wait_until_ready(&ReadyPolicy::default()).await?;
//! light.force_measurement().await?;
//!
//! let visible = light.read_visible().await?;
//! let fahrenheit = temp.read_temperature_f().await?;
//! ```
//!
//! # Features
//!
//! - **`defmt`** — Enable [`defmt::Format`] implementations on public types
//!   and protocol logging.

#![cfg_attr(not(test), no_std)]

pub use channels::Channel;
pub use config::{CompletionPolicy, LightConfig, ReadyPolicy};
pub use error::SensorError;
pub use light::AmbientLightSensor;
pub use mailbox::{Command, Response, ResponseError};
pub use reading::Reading;
pub use registers::{LIGHT_DEFAULT_ADDRESS, TEMP_DEFAULT_ADDRESS};
pub use temperature::TemperatureSensor;

mod bitfield;
mod channels;
mod config;
mod driver;
mod error;
mod light;
mod mailbox;
mod reading;
pub mod registers;
mod temperature;

#[cfg(test)]
mod sim;
