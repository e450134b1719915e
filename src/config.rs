//! System configuration parameters
//!
//! All tunable parameters for the habitat controller.  Built once at
//! startup (defaults, optionally overridden by a JSON file) and passed by
//! reference into every component constructor.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::pins;

/// Core system configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub volume: VolumeConfig,
    pub climate: ClimateConfig,
    pub camera: CameraConfig,
    pub storage: StorageConfig,
    pub pins: PinConfig,
    /// Use in-memory drivers instead of sysfs/IIO (bench runs).
    pub simulate: bool,
}

/// Removable data volume layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Mount point of the USB stick.  Must exist at startup.
    pub data_root: PathBuf,
    /// Sub-directory for daily reading logs.
    pub logs_dir: String,
    /// Sub-directory for hourly capture folders.
    pub captures_dir: String,
}

/// Sampling, hysteresis and indicator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateConfig {
    // --- Timing ---
    /// Sleep between polls (seconds)
    pub poll_interval_secs: u32,
    /// Re-initialise and check free space every N polls
    pub maintenance_every: u32,
    /// Optional per-read deadline (milliseconds).  `None` blocks like the
    /// bare driver does.
    pub read_deadline_ms: Option<u32>,

    // --- Sensor health ---
    /// Consecutive failures before a sensor is reported offline
    pub offline_threshold: u32,

    // --- Ventilation fan (humidity %, on above upper, off below lower) ---
    pub humidity_upper: f32,
    pub humidity_lower: f32,
    /// Fan duty when on (0-100%)
    pub fan_on_duty: u8,
    /// Fan duty when off (0-100%)
    pub fan_off_duty: u8,
    /// Hold after a fan transition (milliseconds)
    pub fan_settle_ms: u32,

    // --- Heat lamp (°F, on below lower, off above upper) ---
    /// Wire the heat lamp into the loop.  Off until the servo linkage is
    /// trusted.
    pub heat_lamp_enabled: bool,
    pub temperature_upper: f32,
    pub temperature_lower: f32,
    /// Servo pulse that presses the switch on (0-100%)
    pub heat_on_pulse: u8,
    /// Servo pulse that presses the switch off (0-100%)
    pub heat_off_pulse: u8,
    /// Servo rest position after a pulse (0-100%)
    pub heat_neutral_duty: u8,
    /// How long the pulse is held before returning to neutral (milliseconds)
    pub heat_pulse_ms: u32,
    /// Hold after a heat lamp transition (milliseconds)
    pub heat_settle_ms: u32,

    // --- Comfort band (indicators only) ---
    pub comfort_temperature_upper: f32,
    pub comfort_temperature_lower: f32,
    pub comfort_humidity_upper: f32,
    pub comfort_humidity_lower: f32,
    /// Length of the over-threshold alert pulse (milliseconds)
    pub alert_pulse_ms: u32,
}

/// Capture loop parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Sleep after each capture (seconds)
    pub capture_interval_secs: u32,
    /// Re-initialise and check free space every N captures
    pub maintenance_every: u32,
    /// Local time (HHMM) after which night exposure is used
    pub night_start_hhmm: u16,
    /// Local time (HHMM) before which night exposure is used
    pub day_start_hhmm: u16,
    pub width: u32,
    pub height: u32,
    /// Still-capture tool invoked per frame
    pub command: String,
}

/// Free-space management.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Below this many free KB the oldest data is evicted
    pub space_threshold_kb: u64,
    /// Daily log files removed per cleanup pass
    pub log_days_to_clear: usize,
    /// Hourly capture folders removed per cleanup pass
    pub capture_hours_to_clear: usize,
}

/// One DHT22 and where the kernel exposes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorPins {
    pub gpio: u32,
    pub iio_device: u32,
}

/// Peripheral wiring.  Defaults come from [`crate::pins`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    pub pwm_chip: u32,
    pub pwm_period_ns: u32,
    pub fan_pwm_channel: u32,
    pub heat_lamp_pwm_channel: u32,
    pub temperature_led_gpio: u32,
    pub humidity_led_gpio: u32,
    pub sensors: Vec<SensorPins>,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("/media/pi/HERMITCRAB"),
            logs_dir: "temp-humid-logs".into(),
            captures_dir: "captures".into(),
        }
    }
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            // Timing
            poll_interval_secs: 2,
            maintenance_every: 10,
            read_deadline_ms: None,

            // Sensor health
            offline_threshold: 50,

            // Fan
            humidity_upper: 85.0,
            humidity_lower: 75.0,
            fan_on_duty: 100,
            fan_off_duty: 0,
            fan_settle_ms: 10_000,

            // Heat lamp
            heat_lamp_enabled: false,
            temperature_upper: 79.0,
            temperature_lower: 72.0,
            heat_on_pulse: 2,
            heat_off_pulse: 12,
            heat_neutral_duty: 0,
            heat_pulse_ms: 1_000,
            heat_settle_ms: 10_000,

            // Comfort band
            comfort_temperature_upper: 85.0,
            comfort_temperature_lower: 69.0,
            comfort_humidity_upper: 85.0,
            comfort_humidity_lower: 75.0,
            alert_pulse_ms: 1_000,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            capture_interval_secs: 2,
            maintenance_every: 10,
            night_start_hhmm: 2000, // 8 pm
            day_start_hhmm: 700,    // 7 am
            width: 1280,
            height: 720,
            command: "libcamera-still".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            space_threshold_kb: 10_000,
            log_days_to_clear: 1,
            capture_hours_to_clear: 2,
        }
    }
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            pwm_chip: pins::PWM_CHIP,
            pwm_period_ns: pins::PWM_PERIOD_NS,
            fan_pwm_channel: pins::FAN_PWM_CHANNEL,
            heat_lamp_pwm_channel: pins::HEAT_LAMP_PWM_CHANNEL,
            temperature_led_gpio: pins::TEMPERATURE_LED_GPIO,
            humidity_led_gpio: pins::HUMIDITY_LED_GPIO,
            sensors: vec![
                SensorPins {
                    gpio: pins::DHT_A_GPIO,
                    iio_device: pins::DHT_IIO_DEVICES[0],
                },
                SensorPins {
                    gpio: pins::DHT_B_GPIO,
                    iio_device: pins::DHT_IIO_DEVICES[1],
                },
            ],
        }
    }
}

impl VolumeConfig {
    pub fn logs_root(&self) -> PathBuf {
        self.data_root.join(&self.logs_dir)
    }

    pub fn captures_root(&self) -> PathBuf {
        self.data_root.join(&self.captures_dir)
    }
}

impl ClimateConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.into())
    }

    pub fn read_deadline(&self) -> Option<Duration> {
        self.read_deadline_ms.map(|ms| Duration::from_millis(ms.into()))
    }
}

impl CameraConfig {
    pub fn capture_interval(&self) -> Duration {
        Duration::from_secs(self.capture_interval_secs.into())
    }
}

impl SystemConfig {
    /// Range-check every field.  Rejects rather than clamps.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.climate;
        if c.humidity_lower >= c.humidity_upper {
            return Err(ConfigError::ValidationFailed(
                "humidity_lower must be < humidity_upper",
            ));
        }
        if !(0.0..=100.0).contains(&c.humidity_lower) || !(0.0..=100.0).contains(&c.humidity_upper) {
            return Err(ConfigError::ValidationFailed(
                "humidity limits must be 0-100",
            ));
        }
        if c.temperature_lower >= c.temperature_upper {
            return Err(ConfigError::ValidationFailed(
                "temperature_lower must be < temperature_upper",
            ));
        }
        if c.comfort_temperature_lower > c.comfort_temperature_upper
            || c.comfort_humidity_lower > c.comfort_humidity_upper
        {
            return Err(ConfigError::ValidationFailed(
                "comfort band lower bound must be <= upper bound",
            ));
        }
        let duties = [
            c.fan_on_duty,
            c.fan_off_duty,
            c.heat_on_pulse,
            c.heat_off_pulse,
            c.heat_neutral_duty,
        ];
        if duties.iter().any(|d| *d > 100) {
            return Err(ConfigError::ValidationFailed(
                "duty levels must be 0-100",
            ));
        }
        if c.offline_threshold == 0 {
            return Err(ConfigError::ValidationFailed(
                "offline_threshold must be at least 1",
            ));
        }
        if c.poll_interval_secs == 0 || self.camera.capture_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "poll intervals must be at least 1 s",
            ));
        }
        if c.maintenance_every == 0 || self.camera.maintenance_every == 0 {
            return Err(ConfigError::ValidationFailed(
                "maintenance_every must be at least 1",
            ));
        }
        if c.read_deadline_ms == Some(0) {
            return Err(ConfigError::ValidationFailed(
                "read_deadline_ms must be positive when set",
            ));
        }
        if self.camera.night_start_hhmm > 2359 || self.camera.day_start_hhmm > 2359 {
            return Err(ConfigError::ValidationFailed(
                "camera day/night times must be HHMM 0000-2359",
            ));
        }
        if self.pins.sensors.len() > crate::sensors::MAX_SENSORS {
            return Err(ConfigError::ValidationFailed(
                "too many sensors configured",
            ));
        }
        Ok(())
    }
}
