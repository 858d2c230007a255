//! Sensor reading snapshot handed to the relay layer.

/// One polling cycle's worth of sensor values.
///
/// Immutable once built; owned by whoever requested it and dropped after
/// it has been sent upstream.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Raw visible light count from the Si1145.
    pub visible: u16,
    /// Raw infrared light count from the Si1145.
    pub infrared: u16,
    /// Ambient temperature in degrees Fahrenheit from the MCP9808.
    pub temperature_f: f32,
}

impl Reading {
    /// Assemble a reading from one polling cycle.
    pub const fn new(visible: u16, infrared: u16, temperature_f: f32) -> Self {
        Self {
            visible,
            infrared,
            temperature_f,
        }
    }
}
