//! Outbound application events.
//!
//! The services emit these through the [`EventSink`](super::ports::EventSink)
//! port.  The stock adapter renders them as log lines; tests record them.

use chrono::NaiveDateTime;
use heapless::Vec;

use crate::control::hysteresis::ActuatorState;
use crate::control::indicator::IndicatorState;
use crate::error::{CaptureFault, InitFault};
use crate::sensors::{Aggregate, MAX_SENSORS, SensorReading};
use crate::storage::CategoryKind;
use crate::storage::reading_log::{LogLine, LoggedSample};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The climate service is wired up.
    Started { sensors: usize, heat_lamp: bool },

    /// One climate cycle produced an aggregate.
    Cycle(CycleReport),

    /// No sensor was healthy; nothing was actuated or logged.
    CycleSkipped { cycle: u64 },

    ActuatorChanged {
        actuator: &'static str,
        from: ActuatorState,
        to: ActuatorState,
    },

    SensorOffline { sensor_id: u8, failures: u32 },

    SensorRecovered { sensor_id: u8 },

    /// A maintenance pass could not prepare its directories.
    MaintenanceFailed {
        category: CategoryKind,
        fault: InitFault,
    },

    /// A reclaim pass ran (whether or not it removed anything).
    SpaceReclaimed {
        category: CategoryKind,
        free_kb: Option<u64>,
        removed: usize,
    },

    Captured { file: String },

    CaptureFailed(CaptureFault),
}

/// Everything one climate cycle decided.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub cycle: u64,
    pub aggregate: Aggregate,
    /// Per-monitor outcome in sensor order; `None` for a failed sample.
    pub samples: Vec<Option<SensorReading>, MAX_SENSORS>,
    pub fan: ActuatorState,
    pub heat_lamp: ActuatorState,
    pub indicators: IndicatorState,
}

impl CycleReport {
    /// The reading-log line for this cycle.
    pub fn log_line(&self, now: NaiveDateTime) -> LogLine {
        LogLine {
            timestamp: now,
            sensors: self
                .samples
                .iter()
                .map(|s| {
                    s.map(|r| LoggedSample {
                        humidity: r.humidity,
                        temperature_f: r.temperature_f,
                    })
                })
                .collect(),
            fan: self.fan,
            heat_lamp: self.heat_lamp,
        }
    }
}
