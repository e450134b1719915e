//! DHT22 through the Linux `dht11` IIO driver.
//!
//! With `dtoverlay=dht11,gpiopin=N` the kernel bit-bangs the sensor and
//! exposes milli-unit attributes:
//!
//! ```text
//! /sys/bus/iio/devices/iio:deviceN/in_humidityrelative_input   65300
//! /sys/bus/iio/devices/iio:deviceN/in_temp_input               23100
//! ```
//!
//! A failed bus transaction surfaces as `EIO` (bad checksum) or
//! `ETIMEDOUT` / `EAGAIN` (no response), which map onto the transient
//! fault class.  Anything else is reported as `Unknown`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::app::ports::HumidityTemperatureSensor;
use crate::error::{SensorFault, TransientKind};

const IIO_ROOT: &str = "/sys/bus/iio/devices";

pub struct IioDht {
    humidity_path: PathBuf,
    temperature_path: PathBuf,
}

impl IioDht {
    pub fn new(device_index: u32) -> Self {
        Self::with_root(Path::new(IIO_ROOT), device_index)
    }

    /// Same as [`new`](Self::new) under a different sysfs root.
    pub fn with_root(root: &Path, device_index: u32) -> Self {
        let dev = root.join(format!("iio:device{device_index}"));
        Self {
            humidity_path: dev.join("in_humidityrelative_input"),
            temperature_path: dev.join("in_temp_input"),
        }
    }
}

impl HumidityTemperatureSensor for IioDht {
    fn read(&mut self) -> Result<(f32, f32), SensorFault> {
        // The driver caches one conversion for both channels, so reading
        // them back to back costs a single bus transaction.
        let humidity = read_milli(&self.humidity_path)?;
        let celsius = read_milli(&self.temperature_path)?;
        Ok((humidity, celsius))
    }
}

fn read_milli(path: &Path) -> Result<f32, SensorFault> {
    let raw = fs::read_to_string(path).map_err(|e| classify(&e))?;
    raw.trim()
        .parse::<i32>()
        .map(|milli| milli as f32 / 1000.0)
        .map_err(|_| SensorFault::Transient(TransientKind::Checksum))
}

fn classify(e: &io::Error) -> SensorFault {
    match e.raw_os_error() {
        Some(libc::EIO) => SensorFault::Transient(TransientKind::Checksum),
        Some(libc::ETIMEDOUT | libc::EAGAIN | libc::EBUSY) => {
            SensorFault::Transient(TransientKind::NotReady)
        }
        _ => match e.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
                SensorFault::Transient(TransientKind::NotReady)
            }
            _ => SensorFault::Unknown,
        },
    }
}
