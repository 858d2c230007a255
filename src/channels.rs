//! Channel enable policy.
//!
//! The CHLIST parameter (RAM offset 0x01) packs one enable group per
//! sensing channel:
//!
//! ```text
//! bit   7    6    5    4    3    2    1    0
//!      UV  AUX  ALS  ALS   --  PS3  PS2  PS1
//! ```
//!
//! Updates are a masked read-modify-write over the current RAM contents,
//! so toggling one channel never disturbs the others.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::error::SensorError;
use crate::mailbox::Mailbox;
use crate::registers::{CHLIST_ALS, CHLIST_AUX, CHLIST_PROXIMITY, CHLIST_UV, RAM_CHLIST};

/// An independently enable-able sensing channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Proximity sensing (PS1–PS3).
    Proximity,
    /// Visible and IR ambient light.
    Als,
    /// UV index.
    Uv,
    /// Auxiliary input.
    Aux,
}

impl Channel {
    /// All channels, in CHLIST bit order.
    pub const ALL: [Channel; 4] = [Channel::Proximity, Channel::Als, Channel::Aux, Channel::Uv];

    /// CHLIST bits owned by this channel.
    pub const fn mask(self) -> u8 {
        match self {
            Channel::Proximity => CHLIST_PROXIMITY,
            Channel::Als => CHLIST_ALS,
            Channel::Uv => CHLIST_UV,
            Channel::Aux => CHLIST_AUX,
        }
    }

    /// Apply an enable/disable to a channel list value.
    pub const fn apply(self, chlist: u8, enabled: bool) -> u8 {
        if enabled {
            chlist | self.mask()
        } else {
            chlist & !self.mask()
        }
    }
}

impl<I2C, D> Mailbox<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Raw CHLIST value.
    pub async fn channel_list(&mut self) -> Result<u8, SensorError<I2C::Error>> {
        self.ram_read(RAM_CHLIST).await
    }

    /// Enable or disable one channel, leaving the other groups untouched.
    pub async fn set_channel_enable(
        &mut self,
        channel: Channel,
        enabled: bool,
    ) -> Result<(), SensorError<I2C::Error>> {
        let current = self.ram_read(RAM_CHLIST).await?;
        self.ram_write(RAM_CHLIST, channel.apply(current, enabled))
            .await
    }

    /// Whether every bit of the channel's group is set.
    pub async fn channel_enabled(&mut self, channel: Channel) -> Result<bool, SensorError<I2C::Error>> {
        let current = self.ram_read(RAM_CHLIST).await?;
        Ok(current & channel.mask() == channel.mask())
    }
}
