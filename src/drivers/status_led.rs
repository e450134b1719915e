//! Comfort indicator LEDs.
//!
//! Two discrete GPIO LEDs: one for temperature, one for humidity.  Lit
//! means the metric is inside its comfort band.

use embedded_hal::digital::{OutputPin, PinState};
use log::debug;

use crate::app::ports::{IndicatorChannel, IndicatorPort};
use crate::error::ActuatorFault;

pub struct IndicatorLeds<T, H> {
    temperature: T,
    humidity: H,
    current: (bool, bool),
}

impl<T: OutputPin, H: OutputPin> IndicatorLeds<T, H> {
    pub fn new(temperature: T, humidity: H) -> Self {
        Self {
            temperature,
            humidity,
            current: (false, false),
        }
    }

    /// Last successfully written `(temperature, humidity)` levels.
    pub fn current(&self) -> (bool, bool) {
        self.current
    }
}

impl<T: OutputPin, H: OutputPin> IndicatorPort for IndicatorLeds<T, H> {
    fn set_channel(&mut self, channel: IndicatorChannel, on: bool) -> Result<(), ActuatorFault> {
        let level = PinState::from(on);
        match channel {
            IndicatorChannel::Temperature => {
                self.temperature.set_state(level).map_err(|e| {
                    debug!("temperature LED error: {:?}", e);
                    ActuatorFault::GpioWriteFailed
                })?;
                self.current.0 = on;
            }
            IndicatorChannel::Humidity => {
                self.humidity.set_state(level).map_err(|e| {
                    debug!("humidity LED error: {:?}", e);
                    ActuatorFault::GpioWriteFailed
                })?;
                self.current.1 = on;
            }
        }
        Ok(())
    }
}
