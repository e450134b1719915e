//! Free-space driven eviction of the oldest units in a category.
//!
//! One pass: query free space on the volume; if it is below the threshold
//! remove the `evict_count` units with the smallest timestamp keys.  A
//! pass never propagates a fault.  Everything that went wrong is logged
//! and collected in the [`ReclaimReport`].

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::{debug, error, info, warn};

use super::{EvictionUnit, StorageCategory};
use crate::app::ports::VolumePort;
use crate::error::StorageFault;

/// Outcome of one reclaim pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReclaimReport {
    /// Free space measured at the start of the pass, if the query worked.
    pub free_kb: Option<u64>,
    /// Units removed, oldest first.
    pub removed: Vec<PathBuf>,
    pub faults: Vec<StorageFault>,
}

impl ReclaimReport {
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

pub struct StorageJanitor<V> {
    volume: V,
    data_root: PathBuf,
    threshold_kb: u64,
}

impl<V: VolumePort> StorageJanitor<V> {
    pub fn new(volume: V, data_root: impl Into<PathBuf>, threshold_kb: u64) -> Self {
        Self {
            volume,
            data_root: data_root.into(),
            threshold_kb,
        }
    }

    pub fn threshold_kb(&self) -> u64 {
        self.threshold_kb
    }

    pub fn volume(&self) -> &V {
        &self.volume
    }

    pub fn reclaim(&mut self, category: &StorageCategory) -> ReclaimReport {
        let mut report = ReclaimReport::default();
        let label = category.kind.label();

        let free_kb = match self.volume.free_kb(&self.data_root) {
            Ok(kb) => kb,
            Err(e) => {
                error!("{}: free space query on {} failed: {}", label, self.data_root.display(), e);
                report.faults.push(e);
                return report;
            }
        };
        report.free_kb = Some(free_kb);
        if free_kb >= self.threshold_kb {
            debug!("{}: {} KB free, nothing to reclaim", label, free_kb);
            return report;
        }
        warn!(
            "{}: only {} KB free (threshold {} KB), evicting up to {}",
            label, free_kb, self.threshold_kb, category.evict_count
        );

        let mut units = match list_units(category) {
            Ok(units) => units,
            Err(e) => {
                error!("{}: listing {} failed: {}", label, category.root.display(), e);
                report.faults.push(e);
                return report;
            }
        };
        units.sort();

        for (_, path) in units.into_iter().take(category.evict_count) {
            match remove_unit(category.unit(), &path) {
                Ok(()) => {
                    info!("{}: removed {}", label, path.display());
                    report.removed.push(path);
                }
                Err(e) => {
                    // Retried on the next maintenance tick.
                    error!("{}: removing {} failed: {}", label, path.display(), e);
                    report.faults.push(e);
                    break;
                }
            }
        }
        report
    }
}

/// Units of the category's kind with a parseable key.  Entries of the
/// other kind are ignored; malformed names are skipped with a warning.
fn list_units(category: &StorageCategory) -> Result<Vec<(NaiveDateTime, PathBuf)>, StorageFault> {
    let entries = fs::read_dir(&category.root).map_err(|_| StorageFault::ListFailure)?;
    let mut units = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|_| StorageFault::ListFailure)?;
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let matches_kind = match category.unit() {
            EvictionUnit::File => file_type.is_file(),
            EvictionUnit::Directory => file_type.is_dir(),
        };
        if !matches_kind {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            warn!("{}: skipping non-UTF-8 name {:?}", category.kind.label(), name);
            continue;
        };
        match category.parse_key(name) {
            Ok(key) => units.push((key, entry.path())),
            Err(e) => warn!("{}: skipping {:?}: {}", category.kind.label(), name, e),
        }
    }
    Ok(units)
}

fn remove_unit(unit: EvictionUnit, path: &Path) -> Result<(), StorageFault> {
    let result = match unit {
        EvictionUnit::File => fs::remove_file(path),
        EvictionUnit::Directory => fs::remove_dir_all(path),
    };
    result.map_err(|_| StorageFault::DeleteFailure)
}
