//! Per-iteration orchestration for the two binaries.
//!
//! A runtime bundles a service with its housekeeping and clock, and
//! knows what one loop iteration does.  Pacing stays with
//! [`PollLoop`](crate::scheduler::PollLoop) so tests can drive iterations
//! directly.

use chrono::NaiveDateTime;
use embedded_hal::delay::DelayNs;
use log::{debug, error, info};

use super::capture::CaptureService;
use super::events::{AppEvent, CycleReport};
use super::housekeeping::Housekeeper;
use super::ports::{
    ActuatorPort, CameraPort, Clock, EventSink, HumidityTemperatureSensor, IndicatorPort,
    VolumePort,
};
use super::service::ClimateService;
use crate::error::InitFault;
use crate::scheduler::LoopTick;
use crate::storage::init::ensure_capture_hour_dir;
use crate::storage::naming::NamingScheme;
use crate::storage::reading_log::ReadingLog;

// ───────────────────────────────────────────────────────────────
// Climate loop
// ───────────────────────────────────────────────────────────────

pub struct ClimateRuntime<S, F, H, I, D, V, K> {
    service: ClimateService<S, F, H, I, D>,
    housekeeper: Housekeeper<V>,
    clock: K,
    log: Option<ReadingLog>,
}

impl<S, F, H, I, D, V, K> ClimateRuntime<S, F, H, I, D, V, K>
where
    S: HumidityTemperatureSensor,
    F: ActuatorPort,
    H: ActuatorPort,
    I: IndicatorPort,
    D: DelayNs,
    V: VolumePort,
    K: Clock,
{
    pub fn new(service: ClimateService<S, F, H, I, D>, housekeeper: Housekeeper<V>, clock: K) -> Self {
        Self {
            service,
            housekeeper,
            clock,
            log: None,
        }
    }

    /// Lay out the volume and open today's log.  A failure here is fatal
    /// for the binary; later maintenance failures only skip a cycle.
    pub fn prepare(&mut self, sink: &mut impl EventSink) -> crate::error::Result<()> {
        self.maintain(sink)?;
        self.service.start(sink);
        Ok(())
    }

    /// One loop iteration.  Returns the cycle report when a line was due.
    pub fn iterate(&mut self, tick: LoopTick, sink: &mut impl EventSink) -> Option<CycleReport> {
        if tick.maintenance && self.maintain(sink).is_err() {
            // Try again at the next maintenance tick.
            return None;
        }

        let report = self.service.tick(sink)?;
        let now = self.clock.now();
        match self.log.as_mut() {
            Some(log) => {
                let line = report.log_line(now);
                debug!("writing: {}", line);
                if let Err(e) = log.append(&line) {
                    error!("reading log: {}", e);
                }
            }
            None => error!("reading log not open, cycle {} not recorded", report.cycle),
        }
        Some(report)
    }

    /// Re-check the layout, reclaim log space and (re)open the day file.
    fn maintain(&mut self, sink: &mut impl EventSink) -> Result<(), InitFault> {
        let root = self.housekeeper.run(sink)?;
        let today = self.clock.now().date();
        match ReadingLog::open(&root, today, NamingScheme::V1) {
            Ok(log) => {
                self.log = Some(log);
                Ok(())
            }
            Err(fault) => {
                self.log = None;
                sink.emit(&AppEvent::MaintenanceFailed {
                    category: self.housekeeper.category().kind,
                    fault,
                });
                Err(fault)
            }
        }
    }

    pub fn service(&self) -> &ClimateService<S, F, H, I, D> {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut ClimateService<S, F, H, I, D> {
        &mut self.service
    }

    pub fn housekeeper(&self) -> &Housekeeper<V> {
        &self.housekeeper
    }

    pub fn log(&self) -> Option<&ReadingLog> {
        self.log.as_ref()
    }
}

// ───────────────────────────────────────────────────────────────
// Camera loop
// ───────────────────────────────────────────────────────────────

pub struct CameraRuntime<C, V, K> {
    capture: CaptureService<C>,
    housekeeper: Housekeeper<V>,
    clock: K,
}

impl<C, V, K> CameraRuntime<C, V, K>
where
    C: CameraPort,
    V: VolumePort,
    K: Clock,
{
    pub fn new(capture: CaptureService<C>, housekeeper: Housekeeper<V>, clock: K) -> Self {
        Self {
            capture,
            housekeeper,
            clock,
        }
    }

    pub fn prepare(&mut self, sink: &mut impl EventSink) -> crate::error::Result<()> {
        self.maintain(self.clock.now(), sink)?;
        Ok(())
    }

    /// One loop iteration.  Returns the file name captured, if any.
    pub fn iterate(&mut self, tick: LoopTick, sink: &mut impl EventSink) -> Option<String> {
        let now = self.clock.now();
        if tick.maintenance && self.maintain(now, sink).is_err() {
            return None;
        }

        match self.capture.capture(now) {
            Ok(file) => {
                info!("picture captured: {}", file);
                sink.emit(&AppEvent::Captured { file: file.clone() });
                Some(file)
            }
            Err(fault) => {
                error!("capture failed: {}", fault);
                sink.emit(&AppEvent::CaptureFailed(fault));
                None
            }
        }
    }

    /// Re-check the layout, reclaim image space and move to the current
    /// hour folder.
    fn maintain(&mut self, now: NaiveDateTime, sink: &mut impl EventSink) -> Result<(), InitFault> {
        let root = self.housekeeper.run(sink)?;
        let dir = ensure_capture_hour_dir(&root, now, NamingScheme::V1).inspect_err(|fault| {
            sink.emit(&AppEvent::MaintenanceFailed {
                category: self.housekeeper.category().kind,
                fault: *fault,
            });
        })?;
        self.capture.set_directory(dir);
        Ok(())
    }

    pub fn capture(&self) -> &CaptureService<C> {
        &self.capture
    }

    pub fn housekeeper(&self) -> &Housekeeper<V> {
        &self.housekeeper
    }
}
