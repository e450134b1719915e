//! Mock adapters for integration tests.
//!
//! Records every actuator, indicator and camera call so tests can assert
//! on the full command history without touching sysfs or spawning the
//! capture tool.  Clock and volume share their state through `Rc` so a
//! test can move them into a runtime and still steer them.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime};
use embedded_hal::delay::DelayNs;
use habitat::app::events::AppEvent;
use habitat::app::ports::{
    ActuatorPort, CameraPort, Clock, EventSink, ExposureMode, IndicatorChannel, IndicatorPort,
    VolumePort,
};
use habitat::control::hysteresis::ActuatorState;
use habitat::error::{ActuatorFault, CaptureFault, StorageFault};

// ── Actuator ──────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MockActuator {
    pub commands: Vec<ActuatorState>,
    pub fail: bool,
}

#[allow(dead_code)]
impl MockActuator {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl ActuatorPort for MockActuator {
    fn command(&mut self, target: ActuatorState) -> Result<(), ActuatorFault> {
        if self.fail {
            return Err(ActuatorFault::PwmWriteFailed);
        }
        self.commands.push(target);
        Ok(())
    }
}

// ── Indicators ────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MockIndicators {
    pub writes: Vec<(IndicatorChannel, bool)>,
}

impl IndicatorPort for MockIndicators {
    fn set_channel(&mut self, channel: IndicatorChannel, on: bool) -> Result<(), ActuatorFault> {
        self.writes.push((channel, on));
        Ok(())
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Adds up requested delays instead of sleeping.
#[derive(Debug, Default)]
pub struct CountingDelay {
    pub total_ns: u64,
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

// ── Camera ────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MockCamera {
    pub modes: Vec<ExposureMode>,
    pub shots: Vec<PathBuf>,
    pub fault: Option<CaptureFault>,
}

impl CameraPort for MockCamera {
    fn set_exposure(&mut self, mode: ExposureMode) -> Result<(), CaptureFault> {
        self.modes.push(mode);
        Ok(())
    }

    fn capture(&mut self, destination: &Path) -> Result<String, CaptureFault> {
        if let Some(fault) = self.fault {
            return Err(fault);
        }
        std::fs::write(destination, b"jpeg").map_err(|_| CaptureFault::CommandFailed)?;
        self.shots.push(destination.to_path_buf());
        Ok(destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default())
    }
}

// ── Volume ────────────────────────────────────────────────────

/// Reports whatever free space the test sets.
#[derive(Debug, Clone)]
pub struct MockVolume {
    free_kb: Rc<Cell<Option<u64>>>,
}

#[allow(dead_code)]
impl MockVolume {
    pub fn with_free_kb(kb: u64) -> Self {
        Self {
            free_kb: Rc::new(Cell::new(Some(kb))),
        }
    }

    pub fn set_free_kb(&self, kb: Option<u64>) {
        self.free_kb.set(kb);
    }
}

impl VolumePort for MockVolume {
    fn free_kb(&self, _path: &Path) -> Result<u64, StorageFault> {
        self.free_kb.get().ok_or(StorageFault::QueryFailure)
    }
}

// ── Clock ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<NaiveDateTime>>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

#[allow(dead_code)]
pub fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
