//! Ventilation fan driver (PWM speed controller).
//!
//! Blows outside air into the enclosure when humidity is too high.  The
//! controller is driven like a servo input at 50 Hz; 100 % is full speed.
//!
//! After every change the driver holds for `fan_settle_ms` so the fan spins
//! up (or down) before the next poll can observe the effect.

use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::SetDutyCycle;
use log::debug;

use crate::app::ports::ActuatorPort;
use crate::config::ClimateConfig;
use crate::control::hysteresis::ActuatorState;
use crate::error::ActuatorFault;

pub struct FanDriver<P, D> {
    pwm: P,
    delay: D,
    on_duty: u8,
    off_duty: u8,
    settle_ms: u32,
    hw_duty: u8,
}

impl<P: SetDutyCycle, D: DelayNs> FanDriver<P, D> {
    pub fn new(pwm: P, delay: D, config: &ClimateConfig) -> Self {
        Self {
            pwm,
            delay,
            on_duty: config.fan_on_duty.min(100),
            off_duty: config.fan_off_duty.min(100),
            settle_ms: config.fan_settle_ms,
            hw_duty: 0,
        }
    }

    fn set_duty_hw(&mut self, duty: u8) -> Result<(), ActuatorFault> {
        self.pwm.set_duty_cycle_percent(duty).map_err(|e| {
            debug!("fan PWM error: {:?}", e);
            ActuatorFault::PwmWriteFailed
        })?;
        self.hw_duty = duty;
        Ok(())
    }

    pub fn current_duty(&self) -> u8 {
        self.hw_duty
    }
}

impl<P: SetDutyCycle, D: DelayNs> ActuatorPort for FanDriver<P, D> {
    fn command(&mut self, target: ActuatorState) -> Result<(), ActuatorFault> {
        let duty = match target {
            ActuatorState::On => self.on_duty,
            ActuatorState::Off => self.off_duty,
        };
        self.set_duty_hw(duty)?;
        self.delay.delay_ms(self.settle_ms);
        Ok(())
    }
}
