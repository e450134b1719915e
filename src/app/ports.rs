//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ClimateService / CaptureService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, indicators, camera, volume, clock,
//! event sinks, config storage) implement these traits.  The services
//! consume them via generics, so the domain core never touches sysfs or
//! spawns processes directly.
//!
//! PWM outputs, GPIO outputs and delays use the `embedded-hal` 1.0 traits
//! directly; the ports here cover what `embedded-hal` has no vocabulary for.
//!
//! All port errors are typed; callers must handle every variant explicitly.

use std::path::Path;

use chrono::NaiveDateTime;

use crate::config::SystemConfig;
use crate::control::hysteresis::ActuatorState;
use crate::error::{ActuatorFault, CaptureFault, SensorFault, StorageFault};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One combined humidity/temperature sensor (DHT22 class).
pub trait HumidityTemperatureSensor {
    /// Exactly one read attempt.  Returns `(relative humidity %, °C)`.
    fn read(&mut self) -> Result<(f32, f32), SensorFault>;
}

impl<T: HumidityTemperatureSensor + ?Sized> HumidityTemperatureSensor for Box<T> {
    fn read(&mut self) -> Result<(f32, f32), SensorFault> {
        (**self).read()
    }
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// An on/off actuator with its own switching sequence.
///
/// `command` returns only after the sequence (including any settle hold)
/// has completed.  On error the caller must assume nothing changed.
pub trait ActuatorPort {
    fn command(&mut self, target: ActuatorState) -> Result<(), ActuatorFault>;
}

// ───────────────────────────────────────────────────────────────
// Indicator port
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorChannel {
    Temperature,
    Humidity,
}

/// Two independent comfort lights.
pub trait IndicatorPort {
    fn set_channel(&mut self, channel: IndicatorChannel, on: bool) -> Result<(), ActuatorFault>;
}

// ───────────────────────────────────────────────────────────────
// Camera port
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureMode {
    Auto,
    Night,
}

/// Opaque still camera.
pub trait CameraPort {
    /// Select the exposure program for subsequent captures.
    fn set_exposure(&mut self, mode: ExposureMode) -> Result<(), CaptureFault>;

    /// Take one picture into `destination`.  Returns the file name written.
    fn capture(&mut self, destination: &Path) -> Result<String, CaptureFault>;
}

// ───────────────────────────────────────────────────────────────
// Volume port
// ───────────────────────────────────────────────────────────────

/// Free-space query against the filesystem holding `path`.
pub trait VolumePort {
    fn free_kb(&self, path: &Path) -> Result<u64, StorageFault>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Local wall-clock time, used for file names and log stamps.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting and
/// after loading.  Invalid ranges are rejected with
/// [`ConfigError::ValidationFailed`], never silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config file present.
    NotFound,
    /// Stored config failed to deserialize.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
