//! plant-monitor-fw
//!
//! Sensor polling firmware for the Raspberry Pi Pico 2. Both sensors sit on
//! I2C0 and are read once per polling period:
//!
//! 0. At boot, configure the Si1145 (hardware key, forced mode, channels).
//! 1. Wait (bounded) for the Si1145 to report ready.
//! 2. Force a one-shot light measurement and let it settle.
//! 3. Read visible and infrared counts from the Si1145 and the ambient
//!    temperature from the MCP9808.
//! 4. Log the assembled [`Reading`] over defmt.
//!
//! Relaying readings to the network is handled elsewhere.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_embedded_hal::shared_bus::asynch::i2c::I2cDevice;
use embassy_embedded_hal::shared_bus::I2cDeviceError;
use embassy_time::{Delay, Duration, Ticker, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use plant_sensors::{
    AmbientLightSensor, LightConfig, ReadyPolicy, Reading, SensorError, TemperatureSensor,
    LIGHT_DEFAULT_ADDRESS, TEMP_DEFAULT_ADDRESS,
};

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Shared I2C0 bus. Each sensor reaches it through its own `I2cDevice`,
/// which holds the lock for exactly one transaction.
static I2C_BUS: StaticCell<
    Mutex<CriticalSectionRawMutex, I2c<'static, I2C0, i2c::Async>>,
> = StaticCell::new();

type SensorI2c = I2cDevice<
    'static,
    CriticalSectionRawMutex,
    I2c<'static, I2C0, i2c::Async>,
>;

type LightSensor = AmbientLightSensor<SensorI2c, Delay>;
type TempSensor = TemperatureSensor<SensorI2c>;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Polling schedule for [`poll_task`].
#[derive(Debug, Clone, Copy, defmt::Format)]
pub struct PollConfig {
    /// Time between the start of consecutive polling cycles.
    pub period: Duration,
    /// Wait between forcing a light measurement and reading its result.
    pub settling: Duration,
    /// Readiness check applied at the start of every cycle.
    pub ready: ReadyPolicy,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(60),
            settling: Duration::from_secs(5),
            ready: ReadyPolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// One complete polling cycle. Any failure aborts the cycle; the caller
/// logs it and tries again next period.
async fn poll_once(
    light: &mut LightSensor,
    temp: &mut TempSensor,
    config: &PollConfig,
) -> Result<Reading, SensorError<I2cDeviceError<i2c::Error>>> {
    light.wait_until_ready(&config.ready).await?;
    light.force_measurement().await?;
    Timer::after(config.settling).await;

    let visible = light.read_visible().await?;
    let infrared = light.read_infrared().await?;
    let temperature_f = temp.read_temperature_f().await?;

    Ok(Reading::new(visible, infrared, temperature_f))
}

/// Periodic sensor polling task. Owns both drivers, so no further locking
/// is needed beyond the per-transaction bus mutex.
#[embassy_executor::task]
async fn poll_task(mut light: LightSensor, mut temp: TempSensor, config: PollConfig) {
    info!("Sensor poll task started: {}", config);

    let mut ticker = Ticker::every(config.period);
    loop {
        match poll_once(&mut light, &mut temp, &config).await {
            Ok(reading) => info!("{}", reading),
            Err(SensorError::NotReady { attempts }) => {
                warn!("Light sensor not ready after {} attempts; skipping cycle", attempts)
            }
            Err(e) => error!("Sensor poll failed: {}", e),
        }

        ticker.next().await;
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("plant-monitor-fw starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // I2C_SDA → GP4  (p.PIN_4)
    // I2C_SCL → GP5  (p.PIN_5)
    // ———————————————————————————————————————————————————————————————————————

    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_5, // SCL
        p.PIN_4, // SDA
        Irqs,
        i2c::Config::default(),
    );
    let i2c_bus = I2C_BUS.init(Mutex::new(i2c));

    let mut light = AmbientLightSensor::new(I2cDevice::new(i2c_bus), Delay, LIGHT_DEFAULT_ADDRESS);
    let mut temp = TemperatureSensor::new(I2cDevice::new(i2c_bus), TEMP_DEFAULT_ADDRESS);

    // —— Sensor initialisation ——————————————————————————————————————————————

    // HW_KEY reads 0x00 until configure writes it, so readiness is only
    // meaningful afterwards. The poll task re-checks it every cycle.
    let config = PollConfig::default();
    match light.configure(&LightConfig::default()).await {
        Ok(()) => match light.wait_until_ready(&config.ready).await {
            Ok(()) => info!("Light sensor ready"),
            Err(e) => warn!("Light sensor not ready after configure: {}", e),
        },
        Err(e) => error!("Light sensor configuration failed: {}", e),
    }

    match (temp.manufacturer_id().await, temp.device_id().await) {
        (Ok(manufacturer), Ok(device)) => {
            info!("MCP9808 manufacturer={:#x} device={:#x}", manufacturer, device)
        }
        _ => warn!("Could not read MCP9808 identification"),
    }

    // —— Spawn tasks ————————————————————————————————————————————————————————

    spawner.spawn(unwrap!(poll_task(light, temp, config)));

    info!("All tasks spawned");
}
