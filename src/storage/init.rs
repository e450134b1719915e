//! Directory layout on the data volume.
//!
//! Run at startup and again on every maintenance tick, so a re-plugged
//! volume or a new hour/day picks up its directories without a restart.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::{error, info};

use super::CategoryKind;
use super::naming::NamingScheme;
use crate::config::VolumeConfig;
use crate::error::InitFault;

/// Checks that the volume is mounted and creates the category directory.
/// Returns the category root.
pub fn ensure_layout(volume: &VolumeConfig, kind: CategoryKind) -> Result<PathBuf, InitFault> {
    if !volume.data_root.is_dir() {
        error!("data volume {} is not mounted", volume.data_root.display());
        return Err(InitFault::VolumeMissing);
    }
    let root = match kind {
        CategoryKind::Logs => volume.logs_root(),
        CategoryKind::Images => volume.captures_root(),
    };
    create_dir(&root)?;
    Ok(root)
}

/// Creates (if needed) the folder for the hour containing `now`.
pub fn ensure_capture_hour_dir(
    captures_root: &Path,
    now: NaiveDateTime,
    scheme: NamingScheme,
) -> Result<PathBuf, InitFault> {
    let dir = captures_root.join(scheme.capture_dir_name(now));
    create_dir(&dir)?;
    Ok(dir)
}

fn create_dir(dir: &Path) -> Result<(), InitFault> {
    if dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| {
        error!("creating {} failed: {}", dir.display(), e);
        InitFault::CreateDirFailed
    })?;
    info!("created {}", dir.display());
    Ok(())
}
