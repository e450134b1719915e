//! Still camera driven through an external capture command.
//!
//! Each capture runs the configured tool (`libcamera-still` by default)
//! once, preview disabled.  Exposure is passed per invocation, so
//! `set_exposure` only records the program for the next run.

use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use crate::app::ports::{CameraPort, ExposureMode};
use crate::config::CameraConfig;
use crate::error::CaptureFault;

pub struct CommandCamera {
    program: String,
    width: u32,
    height: u32,
    exposure: ExposureMode,
}

impl CommandCamera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            program: config.command.clone(),
            width: config.width,
            height: config.height,
            exposure: ExposureMode::Auto,
        }
    }

    fn exposure_arg(mode: ExposureMode) -> &'static str {
        match mode {
            ExposureMode::Auto => "normal",
            ExposureMode::Night => "long",
        }
    }

    /// Full command line for one capture into `destination`.
    pub fn command_for(&self, destination: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-n")
            .arg("-o")
            .arg(destination)
            .arg("--width")
            .arg(self.width.to_string())
            .arg("--height")
            .arg(self.height.to_string())
            .arg("--exposure")
            .arg(Self::exposure_arg(self.exposure))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl CameraPort for CommandCamera {
    fn set_exposure(&mut self, mode: ExposureMode) -> Result<(), CaptureFault> {
        self.exposure = mode;
        Ok(())
    }

    fn capture(&mut self, destination: &Path) -> Result<String, CaptureFault> {
        let output = self.command_for(destination).output().map_err(|e| {
            debug!("starting {} failed: {}", self.program, e);
            CaptureFault::Unavailable
        })?;
        if !output.status.success() {
            debug!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(CaptureFault::CommandFailed);
        }
        destination
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or(CaptureFault::CommandFailed)
    }
}
