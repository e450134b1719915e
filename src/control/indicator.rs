//! Comfort indicators.
//!
//! Each metric is classified against an inclusive comfort band that is
//! independent of (usually wider than) the actuator thresholds.  Above the
//! band the channel gets a short alert pulse; below it the condition is
//! only logged.  Every cycle ends by writing each channel to its in-range
//! boolean, so an in-range reading always wins over a pulse.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::ports::{IndicatorChannel, IndicatorPort};
use crate::config::ClimateConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comfort {
    Low,
    InRange,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComfortBand {
    pub lower: f32,
    pub upper: f32,
}

impl ComfortBand {
    pub fn classify(&self, value: f32) -> Comfort {
        if value < self.lower {
            Comfort::Low
        } else if value > self.upper {
            Comfort::High
        } else {
            Comfort::InRange
        }
    }
}

/// Indicator outcome for one cycle.  Carries no history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorState {
    pub temperature: Comfort,
    pub humidity: Comfort,
}

impl IndicatorState {
    pub fn evaluate(
        temperature_band: &ComfortBand,
        humidity_band: &ComfortBand,
        avg_temperature_f: f32,
        avg_humidity: f32,
    ) -> Self {
        Self {
            temperature: temperature_band.classify(avg_temperature_f),
            humidity: humidity_band.classify(avg_humidity),
        }
    }

    pub fn temperature_ok(&self) -> bool {
        self.temperature == Comfort::InRange
    }

    pub fn humidity_ok(&self) -> bool {
        self.humidity == Comfort::InRange
    }
}

pub struct IndicatorController<I, D> {
    temperature_band: ComfortBand,
    humidity_band: ComfortBand,
    alert_pulse_ms: u32,
    port: I,
    delay: D,
}

impl<I: IndicatorPort, D: DelayNs> IndicatorController<I, D> {
    pub fn new(config: &ClimateConfig, port: I, delay: D) -> Self {
        Self {
            temperature_band: ComfortBand {
                lower: config.comfort_temperature_lower,
                upper: config.comfort_temperature_upper,
            },
            humidity_band: ComfortBand {
                lower: config.comfort_humidity_lower,
                upper: config.comfort_humidity_upper,
            },
            alert_pulse_ms: config.alert_pulse_ms,
            port,
            delay,
        }
    }

    /// Classify, pulse alerts, then write the final channel levels.
    /// Driver errors are logged and never escape.
    pub fn update(&mut self, avg_temperature_f: f32, avg_humidity: f32) -> IndicatorState {
        let state = IndicatorState::evaluate(
            &self.temperature_band,
            &self.humidity_band,
            avg_temperature_f,
            avg_humidity,
        );

        self.announce(IndicatorChannel::Temperature, state.temperature, avg_temperature_f);
        self.announce(IndicatorChannel::Humidity, state.humidity, avg_humidity);

        self.write(IndicatorChannel::Temperature, state.temperature_ok());
        self.write(IndicatorChannel::Humidity, state.humidity_ok());
        state
    }

    pub fn port(&self) -> &I {
        &self.port
    }

    fn announce(&mut self, channel: IndicatorChannel, comfort: Comfort, value: f32) {
        match comfort {
            Comfort::High => {
                info!("NOTICE: average {:?} too HIGH: {:.1}", channel, value);
                self.write(channel, true);
                self.delay.delay_ms(self.alert_pulse_ms);
            }
            Comfort::Low => info!("NOTICE: average {:?} too LOW: {:.1}", channel, value),
            Comfort::InRange => {}
        }
    }

    fn write(&mut self, channel: IndicatorChannel, on: bool) {
        if let Err(e) = self.port.set_channel(channel, on) {
            warn!("indicator {:?}: {}", channel, e);
        }
    }
}
