//! In-memory PWM, GPIO and delay for `simulate` runs and unit tests.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};

/// PWM channel that records every percentage written to it.
#[derive(Debug, Default)]
pub struct SimPwm {
    duty: u16,
    history: Vec<u8>,
}

impl SimPwm {
    pub const MAX_DUTY: u16 = 100;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn percent(&self) -> u8 {
        // MAX_DUTY is 100, so the raw duty already is a percentage.
        self.duty as u8
    }

    pub fn history(&self) -> &[u8] {
        &self.history
    }
}

impl PwmErrorType for SimPwm {
    type Error = Infallible;
}

impl SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        Self::MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty = duty.min(Self::MAX_DUTY);
        self.history.push(self.duty as u8);
        Ok(())
    }
}

/// Output pin that only remembers its level.
#[derive(Debug, Default)]
pub struct SimPin {
    high: bool,
}

impl SimPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.high
    }
}

impl PinErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }
}

/// Delay that returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
