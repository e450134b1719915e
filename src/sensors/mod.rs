//! Sensor subsystem: per-sensor health tracking and the drivers behind it.
//!
//! Each physical sensor is wrapped in a [`SensorMonitor`] that counts
//! consecutive failures and derives a [`HealthStatus`].  The monitors are
//! owned by the [`ClimateService`](crate::app::service::ClimateService);
//! [`aggregate`] turns their current samples into one average.

pub mod aggregate;
pub mod deadline;
pub mod iio;
pub mod sim;

use log::{error, info, warn};

use crate::app::ports::HumidityTemperatureSensor;
use crate::error::{SensorFault, TransientKind};

pub use aggregate::{Aggregate, aggregate};

/// Upper bound on sensors per enclosure (fixed-capacity storage).
pub const MAX_SENSORS: usize = 4;

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

/// One successful humidity/temperature sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub sensor_id: u8,
    /// Relative humidity, 0–100 %.
    pub humidity: f32,
    pub temperature_c: f32,
    pub temperature_f: f32,
}

impl SensorReading {
    pub fn new(sensor_id: u8, humidity: f32, temperature_c: f32) -> Self {
        Self {
            sensor_id,
            humidity,
            temperature_c,
            temperature_f: celsius_to_fahrenheit(temperature_c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Last sample succeeded.
    Healthy,
    /// Last sample failed; the offline threshold has not been reached.
    Degraded,
    /// At least `offline_threshold` consecutive samples failed.
    Offline,
}

/// Wraps one physical sensor and tracks its health.
pub struct SensorMonitor<S> {
    sensor_id: u8,
    driver: S,
    offline_threshold: u32,
    consecutive_failures: u32,
    health: HealthStatus,
    /// Outcome of the most recent `sample()` call.
    latest: Option<Result<SensorReading, SensorFault>>,
    /// Most recent successful reading, kept for diagnostics only.
    last_good: Option<SensorReading>,
}

impl<S> SensorMonitor<S> {
    pub fn new(sensor_id: u8, driver: S, offline_threshold: u32) -> Self {
        Self {
            sensor_id,
            driver,
            offline_threshold: offline_threshold.max(1),
            consecutive_failures: 0,
            health: HealthStatus::Healthy,
            latest: None,
            last_good: None,
        }
    }

    pub fn sensor_id(&self) -> u8 {
        self.sensor_id
    }

    pub fn health(&self) -> HealthStatus {
        self.health
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn latest(&self) -> Option<Result<SensorReading, SensorFault>> {
        self.latest
    }

    pub fn last_good(&self) -> Option<SensorReading> {
        self.last_good
    }

    /// The reading that counts toward this cycle's average: present only
    /// when the monitor is healthy *and* its latest sample succeeded.
    /// A stale last-good value never qualifies.
    pub fn current_reading(&self) -> Option<SensorReading> {
        match (self.health, self.latest) {
            (HealthStatus::Healthy, Some(Ok(reading))) => Some(reading),
            _ => None,
        }
    }

    pub fn driver_mut(&mut self) -> &mut S {
        &mut self.driver
    }

    fn record_success(&mut self, reading: SensorReading) -> SensorReading {
        if self.health == HealthStatus::Offline {
            info!(
                "sensor {}: back online after {} failed reads",
                self.sensor_id, self.consecutive_failures
            );
        }
        self.consecutive_failures = 0;
        self.health = HealthStatus::Healthy;
        self.latest = Some(Ok(reading));
        self.last_good = Some(reading);
        reading
    }

    fn record_fault(&mut self, fault: SensorFault) -> SensorFault {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        let was_offline = self.health == HealthStatus::Offline;
        self.health = if self.consecutive_failures >= self.offline_threshold {
            HealthStatus::Offline
        } else {
            HealthStatus::Degraded
        };
        self.latest = Some(Err(fault));

        match fault {
            SensorFault::Transient(_) => warn!(
                "sensor {}: {} (consecutive failures: {})",
                self.sensor_id, fault, self.consecutive_failures
            ),
            SensorFault::Unknown => error!(
                "sensor {}: {} (consecutive failures: {})",
                self.sensor_id, fault, self.consecutive_failures
            ),
        }
        if self.health == HealthStatus::Offline && !was_offline {
            warn!(
                "sensor {}: OFFLINE after {} consecutive failures",
                self.sensor_id, self.consecutive_failures
            );
        }
        fault
    }
}

impl<S: HumidityTemperatureSensor> SensorMonitor<S> {
    /// Take exactly one sample.  Faults come back as values and are
    /// already logged; the caller decides cadence and retries.
    pub fn sample(&mut self) -> Result<SensorReading, SensorFault> {
        match self.driver.read().and_then(check_plausible) {
            Ok((humidity, celsius)) => {
                Ok(self.record_success(SensorReading::new(self.sensor_id, humidity, celsius)))
            }
            Err(fault) => Err(self.record_fault(fault)),
        }
    }
}

/// Reject decoded values no DHT22 can produce.
fn check_plausible((humidity, celsius): (f32, f32)) -> Result<(f32, f32), SensorFault> {
    if !humidity.is_finite() || !celsius.is_finite() || !(0.0..=100.0).contains(&humidity) {
        return Err(SensorFault::Transient(TransientKind::OutOfRange));
    }
    Ok((humidity, celsius))
}
