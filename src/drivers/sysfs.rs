//! Linux sysfs backends for the PWM and GPIO traits.
//!
//! Hardware PWM on the Pi is exposed as `/sys/class/pwm/pwmchipN/pwmM`
//! and takes period and duty in nanoseconds.  Plain GPIO outputs go
//! through `/sys/class/gpio/gpioN/value`.  Both roots are injectable so
//! the tests can point them at a temporary directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use embedded_hal::digital::{self, ErrorType as PinErrorType, OutputPin};
use embedded_hal::pwm::{self, ErrorType as PwmErrorType, SetDutyCycle};
use log::{debug, info};

pub const PWM_SYSFS_ROOT: &str = "/sys/class/pwm";
pub const GPIO_SYSFS_ROOT: &str = "/sys/class/gpio";

/// Wraps the `io::ErrorKind` of the failed attribute write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SysfsError(pub io::ErrorKind);

impl From<io::Error> for SysfsError {
    fn from(e: io::Error) -> Self {
        Self(e.kind())
    }
}

impl core::fmt::Display for SysfsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "sysfs attribute write failed: {}", self.0)
    }
}

impl std::error::Error for SysfsError {}

impl pwm::Error for SysfsError {
    fn kind(&self) -> pwm::ErrorKind {
        pwm::ErrorKind::Other
    }
}

impl digital::Error for SysfsError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

fn write_attr(path: &Path, value: &str) -> Result<(), SysfsError> {
    fs::write(path, value).map_err(|e| {
        debug!("sysfs write {} <- {:?} failed: {}", path.display(), value, e);
        SysfsError::from(e)
    })
}

// ---------------------------------------------------------------------------
// PWM
// ---------------------------------------------------------------------------

pub struct SysfsPwm {
    channel_dir: PathBuf,
    period_ns: u32,
}

impl SysfsPwm {
    /// Resolution exposed through `SetDutyCycle`; 0.01 % steps.
    pub const MAX_DUTY: u16 = 10_000;

    pub fn open(chip: u32, channel: u32, period_ns: u32) -> Result<Self, SysfsError> {
        Self::with_root(Path::new(PWM_SYSFS_ROOT), chip, channel, period_ns)
    }

    /// Exports the channel if needed, sets the period and enables output
    /// at 0 % duty.
    pub fn with_root(
        root: &Path,
        chip: u32,
        channel: u32,
        period_ns: u32,
    ) -> Result<Self, SysfsError> {
        let chip_dir = root.join(format!("pwmchip{chip}"));
        let channel_dir = chip_dir.join(format!("pwm{channel}"));
        if !channel_dir.is_dir() {
            write_attr(&chip_dir.join("export"), &channel.to_string())?;
            fs::create_dir_all(&channel_dir).ok();
        }
        let pwm = Self {
            channel_dir,
            period_ns,
        };
        write_attr(&pwm.channel_dir.join("duty_cycle"), "0")?;
        write_attr(&pwm.channel_dir.join("period"), &period_ns.to_string())?;
        write_attr(&pwm.channel_dir.join("enable"), "1")?;
        info!(
            "PWM chip {} channel {} ready ({} ns period)",
            chip, channel, period_ns
        );
        Ok(pwm)
    }

    fn duty_ns(&self, duty: u16) -> u64 {
        u64::from(self.period_ns) * u64::from(duty.min(Self::MAX_DUTY)) / u64::from(Self::MAX_DUTY)
    }
}

impl PwmErrorType for SysfsPwm {
    type Error = SysfsError;
}

impl SetDutyCycle for SysfsPwm {
    fn max_duty_cycle(&self) -> u16 {
        Self::MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        let ns = self.duty_ns(duty);
        write_attr(&self.channel_dir.join("duty_cycle"), &ns.to_string())
    }
}

// ---------------------------------------------------------------------------
// GPIO
// ---------------------------------------------------------------------------

pub struct SysfsPin {
    value_path: PathBuf,
}

impl SysfsPin {
    pub fn output(gpio: u32) -> Result<Self, SysfsError> {
        Self::with_root(Path::new(GPIO_SYSFS_ROOT), gpio)
    }

    /// Exports the line if needed and configures it as a low output.
    pub fn with_root(root: &Path, gpio: u32) -> Result<Self, SysfsError> {
        let pin_dir = root.join(format!("gpio{gpio}"));
        if !pin_dir.is_dir() {
            write_attr(&root.join("export"), &gpio.to_string())?;
            fs::create_dir_all(&pin_dir).ok();
        }
        // "low" sets direction and initial level in one write.
        write_attr(&pin_dir.join("direction"), "low")?;
        Ok(Self {
            value_path: pin_dir.join("value"),
        })
    }
}

impl PinErrorType for SysfsPin {
    type Error = SysfsError;
}

impl OutputPin for SysfsPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        write_attr(&self.value_path, "0")
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        write_attr(&self.value_path, "1")
    }
}
