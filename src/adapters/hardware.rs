//! Hardware adapter: builds the real (or simulated) peripherals behind
//! the port traits.
//!
//! This is the only module that decides between sysfs/IIO and the
//! in-memory drivers.  Everything downstream is generic over the
//! `embedded-hal` traits and the sensor port.

use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};
use log::info;

use crate::app::ports::HumidityTemperatureSensor;
use crate::app::service::ClimateService;
use crate::config::SystemConfig;
use crate::drivers::delay::StdDelay;
use crate::drivers::fan::FanDriver;
use crate::drivers::heat_lamp::HeatLampDriver;
use crate::drivers::sim::{SimPin, SimPwm};
use crate::drivers::status_led::IndicatorLeds;
use crate::drivers::sysfs::{SysfsError, SysfsPin, SysfsPwm};
use crate::error::Error;
use crate::sensors::deadline::DeadlineSensor;
use crate::sensors::iio::IioDht;
use crate::sensors::sim::SimulatedSensor;

pub type BoxedSensor = Box<dyn HumidityTemperatureSensor + Send>;
pub type Fan = FanDriver<PwmOutput, StdDelay>;
pub type HeatLamp = HeatLampDriver<PwmOutput, StdDelay>;
pub type Leds = IndicatorLeds<PinOutput, PinOutput>;
pub type HabitatService = ClimateService<BoxedSensor, Fan, HeatLamp, Leds, StdDelay>;

/// Failure while bringing up the peripherals.
#[derive(Debug)]
pub enum HardwareError {
    Pwm { channel: u32, source: SysfsError },
    Gpio { gpio: u32, source: SysfsError },
    Service(Error),
}

impl core::fmt::Display for HardwareError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Pwm { channel, source } => write!(f, "PWM channel {channel}: {source}"),
            Self::Gpio { gpio, source } => write!(f, "GPIO {gpio}: {source}"),
            Self::Service(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for HardwareError {}

// ───────────────────────────────────────────────────────────────
// Output wrappers
// ───────────────────────────────────────────────────────────────

/// A PWM channel that is either real or simulated.
pub enum PwmOutput {
    Sysfs(SysfsPwm),
    Sim(SimPwm),
}

impl PwmErrorType for PwmOutput {
    type Error = SysfsError;
}

impl SetDutyCycle for PwmOutput {
    fn max_duty_cycle(&self) -> u16 {
        match self {
            Self::Sysfs(p) => p.max_duty_cycle(),
            Self::Sim(p) => p.max_duty_cycle(),
        }
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        match self {
            Self::Sysfs(p) => p.set_duty_cycle(duty),
            Self::Sim(p) => match p.set_duty_cycle(duty) {
                Ok(()) => Ok(()),
                Err(never) => match never {},
            },
        }
    }
}

/// A GPIO output that is either real or simulated.
pub enum PinOutput {
    Sysfs(SysfsPin),
    Sim(SimPin),
}

impl PinErrorType for PinOutput {
    type Error = SysfsError;
}

impl OutputPin for PinOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        match self {
            Self::Sysfs(p) => p.set_low(),
            Self::Sim(p) => match p.set_low() {
                Ok(()) => Ok(()),
                Err(never) => match never {},
            },
        }
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        match self {
            Self::Sysfs(p) => p.set_high(),
            Self::Sim(p) => match p.set_high() {
                Ok(()) => Ok(()),
                Err(never) => match never {},
            },
        }
    }
}

fn open_pwm(config: &SystemConfig, channel: u32) -> Result<PwmOutput, HardwareError> {
    if config.simulate {
        return Ok(PwmOutput::Sim(SimPwm::new()));
    }
    let pins = &config.pins;
    SysfsPwm::open(pins.pwm_chip, channel, pins.pwm_period_ns)
        .map(PwmOutput::Sysfs)
        .map_err(|source| HardwareError::Pwm { channel, source })
}

fn open_pin(config: &SystemConfig, gpio: u32) -> Result<PinOutput, HardwareError> {
    if config.simulate {
        return Ok(PinOutput::Sim(SimPin::new()));
    }
    SysfsPin::output(gpio)
        .map(PinOutput::Sysfs)
        .map_err(|source| HardwareError::Gpio { gpio, source })
}

// ───────────────────────────────────────────────────────────────
// Sensors
// ───────────────────────────────────────────────────────────────

/// One driver per configured sensor, numbered from 1 in config order.
pub fn build_sensors(config: &SystemConfig) -> Vec<(u8, BoxedSensor)> {
    let deadline = config.climate.read_deadline();
    config
        .pins
        .sensors
        .iter()
        .enumerate()
        .map(|(i, pins)| {
            let id = (i + 1) as u8;
            let driver: BoxedSensor = match (config.simulate, deadline) {
                (true, _) => Box::new(SimulatedSensor::steady(80.0, 24.0)),
                (false, None) => Box::new(IioDht::new(pins.iio_device)),
                (false, Some(d)) => Box::new(DeadlineSensor::new(IioDht::new(pins.iio_device), d)),
            };
            info!(
                "sensor {}: GPIO {} via iio:device{}{}",
                id,
                pins.gpio,
                pins.iio_device,
                if config.simulate { " (simulated)" } else { "" }
            );
            (id, driver)
        })
        .collect()
}

// ───────────────────────────────────────────────────────────────
// Assembly
// ───────────────────────────────────────────────────────────────

/// Wire up the full climate service from configuration.
pub fn build_climate_service(config: &SystemConfig) -> Result<HabitatService, HardwareError> {
    let climate = &config.climate;
    let pins = &config.pins;

    let fan = FanDriver::new(open_pwm(config, pins.fan_pwm_channel)?, StdDelay, climate);
    let heat_lamp = if climate.heat_lamp_enabled {
        Some(HeatLampDriver::new(
            open_pwm(config, pins.heat_lamp_pwm_channel)?,
            StdDelay,
            climate,
        ))
    } else {
        None
    };
    let leds = IndicatorLeds::new(
        open_pin(config, pins.temperature_led_gpio)?,
        open_pin(config, pins.humidity_led_gpio)?,
    );

    let mut service = ClimateService::new(climate, fan, heat_lamp, leds, StdDelay);
    for (id, driver) in build_sensors(config) {
        service.add_sensor(id, driver).map_err(HardwareError::Service)?;
    }
    Ok(service)
}
