//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements                  | Connects to                 |
//! |---------------|-----------------------------|-----------------------------|
//! | `camera`      | CameraPort                  | `libcamera-still` process   |
//! | `config_file` | ConfigPort                  | JSON file on disk           |
//! | `hardware`    | SetDutyCycle, OutputPin     | sysfs PWM/GPIO or simulated |
//! |               | HumidityTemperatureSensor   | IIO `dht11` or simulated    |
//! | `log_sink`    | EventSink                   | `log` facade                |
//! | `time`        | Clock                       | local wall clock            |
//! | `volume`      | VolumePort                  | `statvfs(3)`                |

pub mod camera;
pub mod config_file;
pub mod hardware;
pub mod log_sink;
pub mod time;
pub mod volume;
