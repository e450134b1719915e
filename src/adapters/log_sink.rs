//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (stderr through `env_logger` in the binaries).

use log::{debug, error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] as a `TAG | key=value` line.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Cycle(r) => {
                info!(
                    "CYCLE | n={} | RH={:.1}% T={:.1}\u{00b0}F over {} sensor(s) | \
                     fan={} heat={} | temp_ok={} humid_ok={}",
                    r.cycle,
                    r.aggregate.humidity,
                    r.aggregate.temperature_f,
                    r.aggregate.count,
                    r.fan,
                    r.heat_lamp,
                    r.indicators.temperature_ok(),
                    r.indicators.humidity_ok(),
                );
            }
            AppEvent::CycleSkipped { cycle } => {
                warn!("CYCLE | n={} skipped, no healthy sensors", cycle);
            }
            AppEvent::ActuatorChanged { actuator, from, to } => {
                info!("ACTUATOR | {} {} -> {}", actuator, from, to);
            }
            AppEvent::SensorOffline { sensor_id, failures } => {
                warn!("SENSOR | id={} offline after {} failures", sensor_id, failures);
            }
            AppEvent::SensorRecovered { sensor_id } => {
                info!("SENSOR | id={} recovered", sensor_id);
            }
            AppEvent::MaintenanceFailed { category, fault } => {
                error!("MAINT | {} failed: {}", category.label(), fault);
            }
            AppEvent::SpaceReclaimed {
                category,
                free_kb,
                removed,
            } => match free_kb {
                Some(kb) if *removed > 0 => {
                    info!("SPACE | {} free={}KB removed={}", category.label(), kb, removed)
                }
                Some(kb) => debug!("SPACE | {} free={}KB", category.label(), kb),
                None => warn!("SPACE | {} free space unknown", category.label()),
            },
            AppEvent::Captured { file } => {
                debug!("CAPTURE | file={}", file);
            }
            AppEvent::CaptureFailed(fault) => {
                warn!("CAPTURE | failed: {}", fault);
            }
            AppEvent::Started { sensors, heat_lamp } => {
                info!("START | sensors={} heat_lamp={}", sensors, heat_lamp);
            }
        }
    }
}
