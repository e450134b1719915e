//! Climate service: the hexagonal core of the `habitat` loop.
//!
//! [`ClimateService`] owns the sensor monitors, both hysteresis
//! controllers and the indicator controller.  One [`tick`](ClimateService::tick)
//! is one climate cycle; the caller owns pacing and maintenance.
//!
//! ```text
//!  HumidityTemperatureSensor ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!                                │     ClimateService       │
//!        ActuatorPort (fan)   ◀──│ monitors · aggregate     │
//!        ActuatorPort (heat)  ◀──│ hysteresis · indicators  │
//!        IndicatorPort        ◀──└─────────────────────────┘
//! ```

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use log::{debug, info};

use crate::config::ClimateConfig;
use crate::control::hysteresis::{ActuatorController, ActuatorState};
use crate::control::indicator::IndicatorController;
use crate::error::{Error, Result};
use crate::sensors::{HealthStatus, MAX_SENSORS, SensorMonitor, aggregate};

use super::events::{AppEvent, CycleReport};
use super::ports::{ActuatorPort, EventSink, HumidityTemperatureSensor, IndicatorPort};

pub struct ClimateService<S, F, H, I, D> {
    monitors: Vec<SensorMonitor<S>, MAX_SENSORS>,
    offline_threshold: u32,
    fan: ActuatorController<F>,
    /// `None` unless the heat lamp is enabled in config.
    heat_lamp: Option<ActuatorController<H>>,
    indicators: IndicatorController<I, D>,
    cycle: u64,
}

impl<S, F, H, I, D> ClimateService<S, F, H, I, D>
where
    S: HumidityTemperatureSensor,
    F: ActuatorPort,
    H: ActuatorPort,
    I: IndicatorPort,
    D: DelayNs,
{
    pub fn new(config: &ClimateConfig, fan: F, heat_lamp: Option<H>, indicators: I, delay: D) -> Self {
        Self {
            monitors: Vec::new(),
            offline_threshold: config.offline_threshold,
            fan: ActuatorController::ventilation(config, fan),
            heat_lamp: heat_lamp.map(|h| ActuatorController::heating(config, h)),
            indicators: IndicatorController::new(config, indicators, delay),
            cycle: 0,
        }
    }

    /// Register one physical sensor.  Sensors are sampled and logged in
    /// the order they were added.
    pub fn add_sensor(&mut self, sensor_id: u8, driver: S) -> Result<()> {
        self.monitors
            .push(SensorMonitor::new(sensor_id, driver, self.offline_threshold))
            .map_err(|_| Error::Config("too many sensors"))
    }

    pub fn start(&mut self, sink: &mut impl EventSink) {
        info!(
            "climate service started: {} sensor(s), heat lamp {}",
            self.monitors.len(),
            if self.heat_lamp.is_some() { "enabled" } else { "disabled" }
        );
        sink.emit(&AppEvent::Started {
            sensors: self.monitors.len(),
            heat_lamp: self.heat_lamp.is_some(),
        });
    }

    /// Run one climate cycle: sample → aggregate → fan → heat lamp →
    /// indicators.  Returns `None` when no sensor was healthy, in which
    /// case nothing was actuated.
    pub fn tick(&mut self, sink: &mut impl EventSink) -> Option<CycleReport> {
        self.cycle += 1;

        // 1. Sample every monitor exactly once
        let mut samples = Vec::new();
        for monitor in self.monitors.iter_mut() {
            let before = monitor.health();
            let outcome = monitor.sample().ok();
            let after = monitor.health();
            if after == HealthStatus::Offline && before != HealthStatus::Offline {
                sink.emit(&AppEvent::SensorOffline {
                    sensor_id: monitor.sensor_id(),
                    failures: monitor.consecutive_failures(),
                });
            } else if before == HealthStatus::Offline && after == HealthStatus::Healthy {
                sink.emit(&AppEvent::SensorRecovered {
                    sensor_id: monitor.sensor_id(),
                });
            }
            // Same capacity as `monitors`.
            let _ = samples.push(outcome);
        }

        // 2. Aggregate over healthy monitors only
        let Some(avg) = aggregate(&self.monitors) else {
            debug!("cycle {}: no healthy sensors, skipping", self.cycle);
            sink.emit(&AppEvent::CycleSkipped { cycle: self.cycle });
            return None;
        };

        // 3. Actuators
        let fan = Self::drive(&mut self.fan, avg.humidity, sink);
        let heat_lamp = match self.heat_lamp.as_mut() {
            Some(controller) => Self::drive(controller, avg.temperature_f, sink),
            None => ActuatorState::Off,
        };

        // 4. Indicators
        let indicators = self.indicators.update(avg.temperature_f, avg.humidity);

        let report = CycleReport {
            cycle: self.cycle,
            aggregate: avg,
            samples,
            fan,
            heat_lamp,
            indicators,
        };
        sink.emit(&AppEvent::Cycle(report.clone()));
        Some(report)
    }

    fn drive<A: ActuatorPort>(
        controller: &mut ActuatorController<A>,
        value: f32,
        sink: &mut impl EventSink,
    ) -> ActuatorState {
        let from = controller.state();
        let to = controller.update(value);
        if to != from {
            sink.emit(&AppEvent::ActuatorChanged {
                actuator: controller.name(),
                from,
                to,
            });
        }
        to
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn monitors(&self) -> &[SensorMonitor<S>] {
        &self.monitors
    }

    pub fn fan(&self) -> &ActuatorController<F> {
        &self.fan
    }

    pub fn heat_lamp(&self) -> Option<&ActuatorController<H>> {
        self.heat_lamp.as_ref()
    }

    pub fn indicators(&self) -> &IndicatorController<I, D> {
        &self.indicators
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }
}
