//! Peripheral assignments for the Raspberry Pi habitat board.
//!
//! Single source of truth for the default [`PinConfig`](crate::config::PinConfig).
//! GPIO numbers are BCM numbering.

// ---------------------------------------------------------------------------
// Actuators (servo-style PWM at 50 Hz on the hardware PWM block)
// ---------------------------------------------------------------------------

/// sysfs PWM chip that carries both actuator channels.
pub const PWM_CHIP: u32 = 0;
/// 50 Hz servo period.
pub const PWM_PERIOD_NS: u32 = 20_000_000;

/// Ventilation fan speed controller.
pub const FAN_PWM_CHANNEL: u32 = 0;
/// Servo that presses the heat lamp switch.
pub const HEAT_LAMP_PWM_CHANNEL: u32 = 1;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Temperature-comfort LED.
pub const TEMPERATURE_LED_GPIO: u32 = 27;
/// Humidity-comfort LED.
pub const HUMIDITY_LED_GPIO: u32 = 22;

// ---------------------------------------------------------------------------
// Sensors (DHT22 through the kernel `dht11` IIO driver)
// ---------------------------------------------------------------------------

/// Data line of the first DHT22 (`dtoverlay=dht11,gpiopin=4`).
pub const DHT_A_GPIO: u32 = 4;
/// Data line of the second DHT22 (`dtoverlay=dht11,gpiopin=15`).
pub const DHT_B_GPIO: u32 = 15;

/// IIO device indices, in overlay load order.
pub const DHT_IIO_DEVICES: [u32; 2] = [0, 1];
