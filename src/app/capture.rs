//! Still capture into the current hour folder.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::{info, warn};

use super::ports::{CameraPort, ExposureMode};
use crate::config::CameraConfig;
use crate::error::CaptureFault;
use crate::scheduler::NightWindow;
use crate::storage::naming::NamingScheme;

pub struct CaptureService<C> {
    camera: C,
    window: NightWindow,
    scheme: NamingScheme,
    /// Mode last applied to the camera; `None` until the first success.
    exposure: Option<ExposureMode>,
    directory: Option<PathBuf>,
}

impl<C: CameraPort> CaptureService<C> {
    pub fn new(config: &CameraConfig, camera: C) -> Self {
        Self {
            camera,
            window: NightWindow {
                night_start_hhmm: config.night_start_hhmm,
                day_start_hhmm: config.day_start_hhmm,
            },
            scheme: NamingScheme::V1,
            exposure: None,
            directory: None,
        }
    }

    /// Point subsequent captures at `dir` (the current hour folder).
    pub fn set_directory(&mut self, dir: PathBuf) {
        self.directory = Some(dir);
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn exposure(&self) -> Option<ExposureMode> {
        self.exposure
    }

    pub fn exposure_for(&self, now: NaiveDateTime) -> ExposureMode {
        if self.window.is_night_at(now) {
            ExposureMode::Night
        } else {
            ExposureMode::Auto
        }
    }

    /// Select exposure for `now` and take one picture.  Returns the file
    /// name written.
    pub fn capture(&mut self, now: NaiveDateTime) -> Result<String, CaptureFault> {
        let dir = self.directory.as_ref().ok_or(CaptureFault::NoDirectory)?;
        let path = dir.join(self.scheme.image_file_name(now));

        let mode = self.exposure_for(now);
        if self.exposure != Some(mode) {
            match self.camera.set_exposure(mode) {
                Ok(()) => {
                    info!("camera exposure -> {:?}", mode);
                    self.exposure = Some(mode);
                }
                // Keep the old program and retry on the next capture.
                Err(e) => warn!("setting exposure {:?} failed: {}", mode, e),
            }
        }

        self.camera.capture(&path)
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }
}
