//! Maintenance pass for one storage category.
//!
//! Prepares the directory layout, then reclaims space if the volume is
//! running low.  Run at startup and on every maintenance tick.

use std::path::PathBuf;

use log::error;

use super::events::AppEvent;
use super::ports::{EventSink, VolumePort};
use crate::config::SystemConfig;
use crate::config::VolumeConfig;
use crate::error::InitFault;
use crate::storage::init::ensure_layout;
use crate::storage::{ReclaimReport, StorageCategory, StorageJanitor};

pub struct Housekeeper<V> {
    volume: VolumeConfig,
    category: StorageCategory,
    janitor: StorageJanitor<V>,
    last_report: Option<ReclaimReport>,
}

impl<V: VolumePort> Housekeeper<V> {
    pub fn new(config: &SystemConfig, category: StorageCategory, volume_port: V) -> Self {
        Self {
            volume: config.volume.clone(),
            category,
            janitor: StorageJanitor::new(
                volume_port,
                &config.volume.data_root,
                config.storage.space_threshold_kb,
            ),
            last_report: None,
        }
    }

    /// Returns the category root on success.  Reclaim faults are reported
    /// through the sink only; a layout fault is returned.
    pub fn run(&mut self, sink: &mut impl EventSink) -> Result<PathBuf, InitFault> {
        let root = ensure_layout(&self.volume, self.category.kind).map_err(|fault| {
            error!("{}: initialization failed: {}", self.category.kind.label(), fault);
            sink.emit(&AppEvent::MaintenanceFailed {
                category: self.category.kind,
                fault,
            });
            fault
        })?;

        let report = self.janitor.reclaim(&self.category);
        sink.emit(&AppEvent::SpaceReclaimed {
            category: self.category.kind,
            free_kb: report.free_kb,
            removed: report.removed.len(),
        });
        self.last_report = Some(report);
        Ok(root)
    }

    pub fn last_report(&self) -> Option<&ReclaimReport> {
        self.last_report.as_ref()
    }

    pub fn category(&self) -> &StorageCategory {
        &self.category
    }
}
