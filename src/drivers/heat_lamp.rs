//! Heat lamp driver (servo pressing a rocker switch).
//!
//! The lamp has no electrical control input; a hobby servo presses its
//! rocker.  Each transition is a two-step sequence:
//!
//! 1. Pulse to the on or off position and hold `heat_pulse_ms`.
//! 2. Return to the neutral duty so the servo stops loading the switch.
//!
//! Then hold `heat_settle_ms` before returning.  If either step fails the
//! lamp position is unknown and the fault is reported; the controller
//! keeps its previous state.

use embedded_hal::delay::DelayNs;
use embedded_hal::pwm::SetDutyCycle;
use log::debug;

use crate::app::ports::ActuatorPort;
use crate::config::ClimateConfig;
use crate::control::hysteresis::ActuatorState;
use crate::error::ActuatorFault;

pub struct HeatLampDriver<P, D> {
    servo: P,
    delay: D,
    on_pulse: u8,
    off_pulse: u8,
    neutral: u8,
    pulse_ms: u32,
    settle_ms: u32,
}

impl<P: SetDutyCycle, D: DelayNs> HeatLampDriver<P, D> {
    pub fn new(servo: P, delay: D, config: &ClimateConfig) -> Self {
        Self {
            servo,
            delay,
            on_pulse: config.heat_on_pulse.min(100),
            off_pulse: config.heat_off_pulse.min(100),
            neutral: config.heat_neutral_duty.min(100),
            pulse_ms: config.heat_pulse_ms,
            settle_ms: config.heat_settle_ms,
        }
    }

    fn set_duty_hw(&mut self, duty: u8) -> Result<(), ActuatorFault> {
        self.servo.set_duty_cycle_percent(duty).map_err(|e| {
            debug!("heat lamp servo error: {:?}", e);
            ActuatorFault::PwmWriteFailed
        })
    }
}

impl<P: SetDutyCycle, D: DelayNs> ActuatorPort for HeatLampDriver<P, D> {
    fn command(&mut self, target: ActuatorState) -> Result<(), ActuatorFault> {
        let pulse = match target {
            ActuatorState::On => self.on_pulse,
            ActuatorState::Off => self.off_pulse,
        };
        self.set_duty_hw(pulse)?;
        self.delay.delay_ms(self.pulse_ms);
        self.set_duty_hw(self.neutral)?;
        self.delay.delay_ms(self.settle_ms);
        Ok(())
    }
}
