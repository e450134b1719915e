//! Two-threshold (dead-zone) on/off control for the fan and heat lamp.
//!
//! Each controller only evaluates the crossing that matters for its
//! current state: while `Off` only the turn-on condition, while `On` only
//! the turn-off condition.  Inputs inside the band never change state.

use core::fmt;

use log::{error, info};

use crate::app::ports::ActuatorPort;
use crate::config::ClimateConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActuatorState {
    #[default]
    Off,
    On,
}

impl ActuatorState {
    /// Status token used in the reading log.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "off" => Some(Self::Off),
            "on" => Some(Self::On),
            _ => None,
        }
    }
}

impl fmt::Display for ActuatorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the band switches the actuator on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// On above `upper`, off below `lower` (ventilation).
    OnAbove,
    /// On below `lower`, off above `upper` (heating).
    OnBelow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HysteresisBand {
    pub lower: f32,
    pub upper: f32,
    pub polarity: Polarity,
}

impl HysteresisBand {
    /// Next state for `value`, given the current one.  Pure.
    pub fn next(&self, state: ActuatorState, value: f32) -> ActuatorState {
        match (self.polarity, state) {
            (Polarity::OnAbove, ActuatorState::Off) if value > self.upper => ActuatorState::On,
            (Polarity::OnAbove, ActuatorState::On) if value < self.lower => ActuatorState::Off,
            (Polarity::OnBelow, ActuatorState::Off) if value < self.lower => ActuatorState::On,
            (Polarity::OnBelow, ActuatorState::On) if value > self.upper => ActuatorState::Off,
            _ => state,
        }
    }
}

/// One hysteresis state machine bound to one actuator.
pub struct ActuatorController<A> {
    name: &'static str,
    band: HysteresisBand,
    state: ActuatorState,
    actuator: A,
}

impl<A: ActuatorPort> ActuatorController<A> {
    pub fn new(name: &'static str, band: HysteresisBand, actuator: A) -> Self {
        Self {
            name,
            band,
            state: ActuatorState::Off,
            actuator,
        }
    }

    /// Fan: on above `humidity_upper`, off below `humidity_lower`.
    pub fn ventilation(config: &ClimateConfig, actuator: A) -> Self {
        Self::new(
            "fan",
            HysteresisBand {
                lower: config.humidity_lower,
                upper: config.humidity_upper,
                polarity: Polarity::OnAbove,
            },
            actuator,
        )
    }

    /// Heat lamp: on below `temperature_lower`, off above `temperature_upper`.
    pub fn heating(config: &ClimateConfig, actuator: A) -> Self {
        Self::new(
            "heat lamp",
            HysteresisBand {
                lower: config.temperature_lower,
                upper: config.temperature_upper,
                polarity: Polarity::OnBelow,
            },
            actuator,
        )
    }

    /// Feed one aggregated value.  Commands the actuator on a crossing and
    /// returns the resulting state; a failed command leaves it unchanged.
    pub fn update(&mut self, value: f32) -> ActuatorState {
        let target = self.band.next(self.state, value);
        if target == self.state {
            return self.state;
        }
        match self.actuator.command(target) {
            Ok(()) => {
                info!("{}: {} -> {} at {:.1}", self.name, self.state, target, value);
                self.state = target;
            }
            Err(e) => {
                error!(
                    "{}: switching {} failed ({}), staying {}",
                    self.name, target, e, self.state
                );
            }
        }
        self.state
    }

    pub fn state(&self) -> ActuatorState {
        self.state
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }
}
