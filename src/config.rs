//! Driver configuration.
//!
//! Plain structs with documented defaults. [`LightConfig::default()`]
//! reproduces the forced-measurement setup the plant monitor runs with.

use embassy_time::Duration;

use crate::registers::HW_KEY_VALUE;

/// Start-up configuration for the ambient light sensor, applied by
/// [`AmbientLightSensor::configure()`](crate::AmbientLightSensor::configure).
///
/// Channel fields are `Option<bool>`: `Some(true)` enables, `Some(false)`
/// disables, `None` leaves the channel list bits untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightConfig {
    /// Value written to HW_KEY. Default: `0x17`.
    pub hw_key: u8,
    /// MEAS_RATE0 / MEAS_RATE1. Default: `(0, 0)` (forced mode).
    pub measurement_rate: (u8, u8),
    /// Proximity channels (PS1–PS3). Default: disabled.
    pub proximity: Option<bool>,
    /// Visible and IR ambient light channels. Default: enabled.
    pub als: Option<bool>,
    /// UV index channel. Default: disabled.
    pub uv: Option<bool>,
    /// Auxiliary channel. Default: untouched.
    pub aux: Option<bool>,
    /// How mailbox commands wait for firmware completion. Default: assumed.
    pub completion: CompletionPolicy,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            hw_key: HW_KEY_VALUE,
            measurement_rate: (0x00, 0x00),
            proximity: Some(false),
            als: Some(true),
            uv: Some(false),
            aux: None,
            completion: CompletionPolicy::Assumed,
        }
    }
}

/// Bounded readiness polling, used by
/// [`AmbientLightSensor::wait_until_ready()`](crate::AmbientLightSensor::wait_until_ready).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadyPolicy {
    /// Number of HW_KEY checks before giving up; 0 is treated as 1.
    /// Default: 10.
    pub attempts: u8,
    /// Delay between checks. Default: 1 s.
    pub backoff: Duration,
}

impl Default for ReadyPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            backoff: Duration::from_secs(1),
        }
    }
}

/// How the mailbox confirms that the firmware finished a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompletionPolicy {
    /// Issue commands back to back and rely on the device finishing each one
    /// before the next bus transaction. RESPONSE is never read.
    #[default]
    Assumed,
    /// After each counted command, poll RESPONSE until the completion
    /// counter changes or a firmware error code appears.
    Polled {
        /// Number of RESPONSE reads before reporting a timeout.
        attempts: u8,
        /// Delay before each RESPONSE read.
        interval: Duration,
    },
}

/// Convert a [`Duration`] to whole microseconds for a `DelayNs` call,
/// saturating at `u32::MAX`.
pub(crate) fn as_delay_us(duration: Duration) -> u32 {
    u32::try_from(duration.as_micros()).unwrap_or(u32::MAX)
}
