//! High-level interface for the Si1145 ambient light sensor.
//!
//! [`AmbientLightSensor`] wraps the command mailbox with start-up
//! configuration, bounded readiness polling, and the light measurement
//! readers.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::channels::Channel;
use crate::config::{as_delay_us, CompletionPolicy, LightConfig, ReadyPolicy};
use crate::error::SensorError;
use crate::mailbox::{Command, Mailbox, Response};
use crate::registers::{
    HW_KEY_VALUE, LIGHT_REGISTER_COUNT, REG_ALS_IR_DATA0, REG_ALS_IR_DATA1, REG_ALS_VIS_DATA0,
    REG_ALS_VIS_DATA1, REG_HW_KEY, REG_MEAS_RATE0, REG_MEAS_RATE1,
};

/// High-level interface for the Si1145 ambient light sensor.
///
/// # Example
///
/// ```ignore
/// use plant_sensors::{AmbientLightSensor, LightConfig, ReadyPolicy, LIGHT_DEFAULT_ADDRESS};
///
/// // `i2c` is any `embedded-hal-async` I2C implementation, `delay` any async `DelayNs`
/// let mut sensor = AmbientLightSensor::new(i2c, delay, LIGHT_DEFAULT_ADDRESS);
/// sensor.configure(&LightConfig::default()).await?;
///
/// sensor.wait_until_ready(&ReadyPolicy::default()).await?;
/// sensor.force_measurement().await?;
/// // ... wait for the measurement to settle ...
/// let visible = sensor.read_visible().await?;
/// ```
pub struct AmbientLightSensor<I2C, D> {
    mailbox: Mailbox<I2C, D>,
}

impl<I2C, D> AmbientLightSensor<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create a new sensor interface. No bus traffic is generated.
    ///
    /// # Arguments
    /// * `i2c` — I2C peripheral (takes ownership for exclusive access)
    /// * `delay` — delay provider for readiness and completion polling
    /// * `address` — 7-bit I2C device address (typically 0x60)
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            mailbox: Mailbox::new(i2c, delay, address),
        }
    }

    /// 7-bit bus address of the sensor.
    pub fn address(&self) -> u8 {
        self.mailbox.address()
    }

    /// Release the I2C peripheral and delay provider.
    pub fn release(self) -> (I2C, D) {
        self.mailbox.release()
    }

    // -----------------------------------------------------------------------
    // Start-up
    // -----------------------------------------------------------------------

    /// Apply a start-up configuration.
    ///
    /// Sets the completion policy, writes HW_KEY and both measurement rate
    /// registers, then updates the channel list for every channel the
    /// config names.
    pub async fn configure(&mut self, config: &LightConfig) -> Result<(), SensorError<I2C::Error>> {
        self.mailbox.set_completion_policy(config.completion);

        self.set_hw_key(config.hw_key).await?;
        let (rate0, rate1) = config.measurement_rate;
        self.set_measurement_rate(rate0, rate1).await?;

        let plan = [
            (Channel::Proximity, config.proximity),
            (Channel::Als, config.als),
            (Channel::Uv, config.uv),
            (Channel::Aux, config.aux),
        ];
        for (channel, enabled) in plan {
            if let Some(enabled) = enabled {
                self.set_channel_enable(channel, enabled).await?;
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("Si1145 configured: {}", config);

        Ok(())
    }

    /// Change how mailbox commands wait for completion.
    pub fn set_completion_policy(&mut self, policy: CompletionPolicy) {
        self.mailbox.set_completion_policy(policy);
    }

    /// Completion policy currently applied to mailbox commands.
    pub fn completion_policy(&self) -> CompletionPolicy {
        self.mailbox.completion_policy()
    }

    /// Write the hardware key register. The sensor only operates once it
    /// holds `0x17`.
    pub async fn set_hw_key(&mut self, key: u8) -> Result<(), SensorError<I2C::Error>> {
        self.mailbox.registers().write_register(REG_HW_KEY, key).await
    }

    /// Write MEAS_RATE0 and MEAS_RATE1. `(0, 0)` selects forced mode.
    pub async fn set_measurement_rate(
        &mut self,
        rate0: u8,
        rate1: u8,
    ) -> Result<(), SensorError<I2C::Error>> {
        let registers = self.mailbox.registers();
        registers.write_register(REG_MEAS_RATE0, rate0).await?;
        registers.write_register(REG_MEAS_RATE1, rate1).await
    }

    // -----------------------------------------------------------------------
    // Readiness
    // -----------------------------------------------------------------------

    /// Single-shot readiness check: HW_KEY reads back `0x17`.
    pub async fn is_ready(&mut self) -> Result<bool, SensorError<I2C::Error>> {
        let key = self.mailbox.registers().read_register(REG_HW_KEY).await?;
        Ok(key == HW_KEY_VALUE)
    }

    /// Poll [`is_ready`](Self::is_ready) up to `policy.attempts` times,
    /// sleeping `policy.backoff` between checks. At least one check is
    /// always made, even when `policy.attempts` is 0.
    ///
    /// A bus error counts as a failed check; the sensor is often
    /// unresponsive while it boots.
    ///
    /// # Errors
    /// [`SensorError::NotReady`] once every attempt has failed.
    pub async fn wait_until_ready(
        &mut self,
        policy: &ReadyPolicy,
    ) -> Result<(), SensorError<I2C::Error>> {
        let backoff_us = as_delay_us(policy.backoff);
        let attempts = policy.attempts.max(1);

        for attempt in 1..=attempts {
            match self.is_ready().await {
                Ok(true) => return Ok(()),
                Ok(false) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("Si1145 not ready ({}/{})", attempt, attempts);
                }
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Si1145 readiness check failed ({}/{})", attempt, attempts);
                }
            }

            if attempt < attempts {
                self.mailbox.delay().delay_us(backoff_us).await;
            }
        }

        Err(SensorError::NotReady { attempts })
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Issue a raw mailbox command.
    ///
    /// # Errors
    /// [`SensorError::InvalidRamOffset`] for a parameter command addressing
    /// an offset above `0x1F`.
    pub async fn send_command(&mut self, command: Command) -> Result<(), SensorError<I2C::Error>> {
        self.mailbox.send_command(command).await
    }

    /// Trigger one visible + IR sampling cycle. The result is available
    /// after the device's settling time.
    pub async fn force_measurement(&mut self) -> Result<(), SensorError<I2C::Error>> {
        self.mailbox.send_command(Command::ForceMeasurement).await
    }

    /// Reset the sensor firmware.
    pub async fn reset(&mut self) -> Result<(), SensorError<I2C::Error>> {
        self.mailbox.send_command(Command::Reset).await
    }

    /// Ask the firmware to report calibration data into registers 0x22–0x2D.
    pub async fn get_calibration(&mut self) -> Result<(), SensorError<I2C::Error>> {
        self.mailbox.send_command(Command::GetCalibration).await
    }

    /// Clear RESPONSE with a NOP.
    pub async fn clear_response(&mut self) -> Result<(), SensorError<I2C::Error>> {
        self.mailbox.send_command(Command::Nop).await
    }

    /// Read and decode RESPONSE.
    pub async fn read_response(&mut self) -> Result<Response, SensorError<I2C::Error>> {
        self.mailbox.read_response().await
    }

    // -----------------------------------------------------------------------
    // Parameter RAM and channels
    // -----------------------------------------------------------------------

    /// Write parameter RAM through the mailbox.
    pub async fn ram_write(&mut self, offset: u8, value: u8) -> Result<(), SensorError<I2C::Error>> {
        self.mailbox.ram_write(offset, value).await
    }

    /// Read parameter RAM through the mailbox.
    pub async fn ram_read(&mut self, offset: u8) -> Result<u8, SensorError<I2C::Error>> {
        self.mailbox.ram_read(offset).await
    }

    /// Enable or disable one sensing channel.
    pub async fn set_channel_enable(
        &mut self,
        channel: Channel,
        enabled: bool,
    ) -> Result<(), SensorError<I2C::Error>> {
        self.mailbox.set_channel_enable(channel, enabled).await
    }

    /// Whether every CHLIST bit of `channel` is set.
    pub async fn channel_enabled(&mut self, channel: Channel) -> Result<bool, SensorError<I2C::Error>> {
        self.mailbox.channel_enabled(channel).await
    }

    // -----------------------------------------------------------------------
    // Direct registers
    // -----------------------------------------------------------------------

    /// Write one 8-bit register.
    pub async fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorError<I2C::Error>> {
        self.mailbox.registers().write_register(register, value).await
    }

    /// Read one 8-bit register (selector sent with the read-select bit).
    pub async fn read_register(&mut self, register: u8) -> Result<u8, SensorError<I2C::Error>> {
        self.mailbox.registers().read_register(register).await
    }

    /// Set one bit of a register (read-modify-write).
    pub async fn set_bit(&mut self, register: u8, bit: u8) -> Result<(), SensorError<I2C::Error>> {
        self.mailbox.registers().set_bit(register, bit).await
    }

    /// Clear one bit of a register (read-modify-write).
    pub async fn clear_bit(&mut self, register: u8, bit: u8) -> Result<(), SensorError<I2C::Error>> {
        self.mailbox.registers().clear_bit(register, bit).await
    }

    /// Whether one bit of a register is set.
    pub async fn check_bit(&mut self, register: u8, bit: u8) -> Result<bool, SensorError<I2C::Error>> {
        self.mailbox.registers().check_bit(register, bit).await
    }

    /// Read registers 0x00–0x3E, one selection and read per register.
    pub async fn dump_registers(
        &mut self,
    ) -> Result<[u8; LIGHT_REGISTER_COUNT], SensorError<I2C::Error>> {
        let mut dump = [0u8; LIGHT_REGISTER_COUNT];
        for (register, value) in (0u8..).zip(dump.iter_mut()) {
            *value = self.read_register(register).await?;
        }
        Ok(dump)
    }

    // -----------------------------------------------------------------------
    // Measurements
    // -----------------------------------------------------------------------

    /// Latest visible light count.
    ///
    /// The data registers are little-endian (DATA0 low, DATA1 high), unlike
    /// the MSB-first register write path.
    pub async fn read_visible(&mut self) -> Result<u16, SensorError<I2C::Error>> {
        self.read_pair(REG_ALS_VIS_DATA0, REG_ALS_VIS_DATA1).await
    }

    /// Latest infrared light count.
    pub async fn read_infrared(&mut self) -> Result<u16, SensorError<I2C::Error>> {
        self.read_pair(REG_ALS_IR_DATA0, REG_ALS_IR_DATA1).await
    }

    async fn read_pair(&mut self, low: u8, high: u8) -> Result<u16, SensorError<I2C::Error>> {
        let registers = self.mailbox.registers();
        let low = registers.read_register(low).await?;
        let high = registers.read_register(high).await?;
        Ok(u16::from(low) | (u16::from(high) << 8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::{
        LIGHT_READ_SELECT, RAM_CHLIST, REG_COMMAND, REG_PARAM_RD, REG_PARAM_WR, REG_RESPONSE,
    };
    use crate::sim::{CountingDelay, SimLight, Transfer};
    use embassy_time::Duration;
    use embedded_hal_async::i2c::ErrorKind;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x60;

    fn sim_sensor() -> AmbientLightSensor<SimLight, CountingDelay> {
        AmbientLightSensor::new(SimLight::new(ADDR), CountingDelay::default(), ADDR)
    }

    // ── Wire contract ────────────────────────────────────────────────

    #[tokio::test]
    async fn read_selector_sets_bit_6() {
        for register in [0x00u8, 0x07, 0x17, 0x20, 0x22, 0x2E, 0x3F] {
            let expectations = [
                I2cTransaction::write(ADDR, vec![register | 0x40]),
                I2cTransaction::read(ADDR, vec![0xAB]),
            ];
            let i2c = I2cMock::new(&expectations);
            let mut i2c_clone = i2c.clone();

            let mut sensor = AmbientLightSensor::new(i2c, NoopDelay::new(), ADDR);
            assert_eq!(sensor.read_register(register).await.unwrap(), 0xAB);

            i2c_clone.done();
        }
    }

    #[tokio::test]
    async fn write_path_does_not_set_read_select() {
        let expectations = [I2cTransaction::write(ADDR, vec![REG_HW_KEY, 0x17])];
        let i2c = I2cMock::new(&expectations);
        let mut i2c_clone = i2c.clone();

        let mut sensor = AmbientLightSensor::new(i2c, NoopDelay::new(), ADDR);
        sensor.set_hw_key(HW_KEY_VALUE).await.unwrap();

        i2c_clone.done();
    }

    #[tokio::test]
    async fn visible_reassembly_is_little_endian() {
        let expectations = [
            I2cTransaction::write(ADDR, vec![REG_ALS_VIS_DATA0 | LIGHT_READ_SELECT]),
            I2cTransaction::read(ADDR, vec![0x34]),
            I2cTransaction::write(ADDR, vec![REG_ALS_VIS_DATA1 | LIGHT_READ_SELECT]),
            I2cTransaction::read(ADDR, vec![0x12]),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut i2c_clone = i2c.clone();

        let mut sensor = AmbientLightSensor::new(i2c, NoopDelay::new(), ADDR);
        assert_eq!(sensor.read_visible().await.unwrap(), 0x1234);

        i2c_clone.done();
    }

    #[tokio::test]
    async fn infrared_reads_ir_registers() {
        let mut sim = SimLight::new(ADDR);
        sim.registers[REG_ALS_IR_DATA0 as usize] = 0xCD;
        sim.registers[REG_ALS_IR_DATA1 as usize] = 0x0A;
        let mut sensor = AmbientLightSensor::new(sim, CountingDelay::default(), ADDR);

        assert_eq!(sensor.read_infrared().await.unwrap(), 0x0ACD);
    }

    #[tokio::test]
    async fn force_measurement_writes_command() {
        let expectations = [I2cTransaction::write(ADDR, vec![REG_COMMAND, 0x06])];
        let i2c = I2cMock::new(&expectations);
        let mut i2c_clone = i2c.clone();

        let mut sensor = AmbientLightSensor::new(i2c, NoopDelay::new(), ADDR);
        sensor.force_measurement().await.unwrap();

        i2c_clone.done();
    }

    #[tokio::test]
    async fn bus_error_is_reported() {
        let expectations = [I2cTransaction::write(ADDR, vec![REG_COMMAND, 0x01])
            .with_error(ErrorKind::Other)];
        let i2c = I2cMock::new(&expectations);
        let mut i2c_clone = i2c.clone();

        let mut sensor = AmbientLightSensor::new(i2c, NoopDelay::new(), ADDR);
        assert_eq!(
            sensor.reset().await,
            Err(SensorError::I2c(ErrorKind::Other))
        );

        i2c_clone.done();
    }

    // ── Configuration ────────────────────────────────────────────────

    #[tokio::test]
    async fn configure_applies_default_setup() {
        let mut sim = SimLight::new(ADDR);
        // AUX and an unassigned bit start set and must survive.
        sim.ram[RAM_CHLIST as usize] = 0x4F;
        sim.registers[REG_MEAS_RATE0 as usize] = 0x84;
        let mut sensor = AmbientLightSensor::new(sim, CountingDelay::default(), ADDR);

        sensor.configure(&LightConfig::default()).await.unwrap();
        assert!(sensor.is_ready().await.unwrap());
        assert!(sensor.channel_enabled(Channel::Als).await.unwrap());
        assert!(sensor.channel_enabled(Channel::Aux).await.unwrap());
        assert!(!sensor.channel_enabled(Channel::Proximity).await.unwrap());
        assert!(!sensor.channel_enabled(Channel::Uv).await.unwrap());

        let (sim, _) = sensor.release();
        assert_eq!(sim.ram[RAM_CHLIST as usize], 0x78);
        assert_eq!(sim.registers[REG_HW_KEY as usize], 0x17);
        assert_eq!(sim.registers[REG_MEAS_RATE0 as usize], 0x00);
        assert_eq!(sim.registers[REG_MEAS_RATE1 as usize], 0x00);
    }

    #[tokio::test]
    async fn configure_sequence_on_the_wire() {
        let config = LightConfig {
            proximity: None,
            als: Some(true),
            uv: None,
            aux: None,
            ..LightConfig::default()
        };
        let expectations = [
            I2cTransaction::write(ADDR, vec![REG_HW_KEY, 0x17]),
            I2cTransaction::write(ADDR, vec![REG_MEAS_RATE0, 0x00]),
            I2cTransaction::write(ADDR, vec![REG_MEAS_RATE1, 0x00]),
            // ALS enable: query CHLIST, fetch, stage, set.
            I2cTransaction::write(ADDR, vec![REG_COMMAND, 0x81]),
            I2cTransaction::write(ADDR, vec![REG_PARAM_RD | LIGHT_READ_SELECT]),
            I2cTransaction::read(ADDR, vec![0x80]),
            I2cTransaction::write(ADDR, vec![REG_PARAM_WR, 0xB0]),
            I2cTransaction::write(ADDR, vec![REG_COMMAND, 0xA1]),
        ];
        let i2c = I2cMock::new(&expectations);
        let mut i2c_clone = i2c.clone();

        let mut sensor = AmbientLightSensor::new(i2c, NoopDelay::new(), ADDR);
        sensor.configure(&config).await.unwrap();

        i2c_clone.done();
    }

    #[tokio::test]
    async fn configure_installs_completion_policy() {
        let policy = CompletionPolicy::Polled {
            attempts: 2,
            interval: Duration::from_micros(10),
        };
        let config = LightConfig {
            completion: policy,
            ..LightConfig::default()
        };
        let mut sensor = sim_sensor();
        sensor.configure(&config).await.unwrap();
        assert_eq!(sensor.completion_policy(), policy);

        // Six counted commands: three channel updates, each a query and a set.
        assert_eq!(sensor.read_response().await.unwrap(), Response::Counter(6));
    }

    // ── Readiness ────────────────────────────────────────────────────

    #[tokio::test]
    async fn wait_until_ready_returns_once_key_matches() {
        let mut sim = SimLight::new(ADDR);
        sim.registers[REG_HW_KEY as usize] = HW_KEY_VALUE;
        let mut sensor = AmbientLightSensor::new(sim, CountingDelay::default(), ADDR);

        sensor.wait_until_ready(&ReadyPolicy::default()).await.unwrap();

        let (_, delay) = sensor.release();
        assert_eq!(delay.calls, 0);
    }

    #[tokio::test]
    async fn wait_until_ready_is_bounded() {
        let mut sensor = sim_sensor();
        let policy = ReadyPolicy {
            attempts: 3,
            backoff: Duration::from_millis(100),
        };

        assert_eq!(
            sensor.wait_until_ready(&policy).await,
            Err(SensorError::NotReady { attempts: 3 })
        );

        let (sim, delay) = sensor.release();
        assert_eq!(delay.calls, 2);
        assert_eq!(delay.total_ns, 200_000_000);
        let reads = sim
            .transfers
            .iter()
            .filter(|t| matches!(t, Transfer::Read(1)))
            .count();
        assert_eq!(reads, 3);
    }

    #[tokio::test]
    async fn wait_until_ready_retries_through_bus_errors() {
        let mut sim = SimLight::new(ADDR);
        sim.registers[REG_HW_KEY as usize] = HW_KEY_VALUE;
        sim.fail_at = Some(0);
        let mut sensor = AmbientLightSensor::new(sim, CountingDelay::default(), ADDR);

        sensor.wait_until_ready(&ReadyPolicy::default()).await.unwrap();

        let (_, delay) = sensor.release();
        assert_eq!(delay.calls, 1);
    }

    #[tokio::test]
    async fn fresh_sensor_is_ready_once_configured() {
        let mut sensor = sim_sensor();
        assert!(!sensor.is_ready().await.unwrap());

        sensor.configure(&LightConfig::default()).await.unwrap();
        sensor.wait_until_ready(&ReadyPolicy::default()).await.unwrap();

        let (_, delay) = sensor.release();
        assert_eq!(delay.calls, 0);
    }

    #[tokio::test]
    async fn zero_attempt_policy_still_checks_once() {
        let mut sim = SimLight::new(ADDR);
        sim.registers[REG_HW_KEY as usize] = HW_KEY_VALUE;
        let mut sensor = AmbientLightSensor::new(sim, CountingDelay::default(), ADDR);
        let policy = ReadyPolicy {
            attempts: 0,
            backoff: Duration::from_millis(100),
        };
        sensor.wait_until_ready(&policy).await.unwrap();

        let mut sensor = sim_sensor();
        assert_eq!(
            sensor.wait_until_ready(&policy).await,
            Err(SensorError::NotReady { attempts: 1 })
        );
        let (sim, delay) = sensor.release();
        assert_eq!(delay.calls, 0);
        assert_eq!(sim.transfers.len(), 2);
    }

    // ── Diagnostics ──────────────────────────────────────────────────

    #[tokio::test]
    async fn dump_covers_register_map() {
        let mut sim = SimLight::new(ADDR);
        for (i, reg) in sim.registers.iter_mut().enumerate() {
            *reg = i as u8 ^ 0x55;
        }
        let mut sensor = AmbientLightSensor::new(sim, CountingDelay::default(), ADDR);

        let dump = sensor.dump_registers().await.unwrap();
        for (i, value) in dump.iter().enumerate() {
            assert_eq!(*value, i as u8 ^ 0x55);
        }
    }

    #[tokio::test]
    async fn clear_response_zeroes_counter() {
        let mut sensor = sim_sensor();
        sensor.get_calibration().await.unwrap();
        assert_eq!(sensor.read_response().await.unwrap(), Response::Counter(1));

        sensor.clear_response().await.unwrap();
        assert_eq!(sensor.read_response().await.unwrap(), Response::Counter(0));

        let (sim, _) = sensor.release();
        assert_eq!(sim.registers[REG_RESPONSE as usize], 0);
    }

    #[tokio::test]
    async fn raw_command_with_out_of_range_offset_leaves_ram_alone() {
        let mut sim = SimLight::new(ADDR);
        sim.ram[RAM_CHLIST as usize] = 0x30;
        let mut sensor = AmbientLightSensor::new(sim, CountingDelay::default(), ADDR);

        assert_eq!(
            sensor.send_command(Command::ParamSet(0x21)).await,
            Err(SensorError::InvalidRamOffset)
        );

        let (sim, _) = sensor.release();
        assert!(sim.transfers.is_empty());
        assert_eq!(sim.ram[RAM_CHLIST as usize], 0x30);
    }

    #[tokio::test]
    async fn register_bit_helpers_use_8_bit_width() {
        let mut sensor = sim_sensor();
        sensor.set_bit(REG_MEAS_RATE1, 3).await.unwrap();
        assert!(sensor.check_bit(REG_MEAS_RATE1, 3).await.unwrap());
        sensor.clear_bit(REG_MEAS_RATE1, 3).await.unwrap();
        assert_eq!(sensor.read_register(REG_MEAS_RATE1).await.unwrap(), 0);
        assert_eq!(
            sensor.set_bit(REG_MEAS_RATE1, 8).await,
            Err(SensorError::InvalidBit)
        );
    }
}
