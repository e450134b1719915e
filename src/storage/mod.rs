//! Data volume layout, reading log and space reclamation.
//!
//! Two categories live under the volume root and are managed separately:
//!
//! | Category | Directory          | Unit              | Evicted per pass |
//! |----------|--------------------|-------------------|------------------|
//! | logs     | `temp-humid-logs/` | one file per day  | 1                |
//! | images   | `captures/`        | one dir per hour  | 2                |

pub mod init;
pub mod janitor;
pub mod naming;
pub mod reading_log;

use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::config::SystemConfig;
use naming::{NameError, NamingScheme};

pub use janitor::{ReclaimReport, StorageJanitor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Logs,
    Images,
}

impl CategoryKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Logs => "logs",
            Self::Images => "images",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionUnit {
    File,
    Directory,
}

/// One independently managed set of timestamped units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageCategory {
    pub kind: CategoryKind,
    pub root: PathBuf,
    pub evict_count: usize,
    pub scheme: NamingScheme,
}

impl StorageCategory {
    pub fn logs(config: &SystemConfig) -> Self {
        Self {
            kind: CategoryKind::Logs,
            root: config.volume.logs_root(),
            evict_count: config.storage.log_days_to_clear,
            scheme: NamingScheme::V1,
        }
    }

    pub fn images(config: &SystemConfig) -> Self {
        Self {
            kind: CategoryKind::Images,
            root: config.volume.captures_root(),
            evict_count: config.storage.capture_hours_to_clear,
            scheme: NamingScheme::V1,
        }
    }

    pub fn unit(&self) -> EvictionUnit {
        match self.kind {
            CategoryKind::Logs => EvictionUnit::File,
            CategoryKind::Images => EvictionUnit::Directory,
        }
    }

    /// Timestamp key encoded in a unit's name.  Smaller is older.
    pub fn parse_key(&self, name: &str) -> Result<NaiveDateTime, NameError> {
        match self.kind {
            CategoryKind::Logs => self
                .scheme
                .parse_log_file_name(name)
                .map(|day| day.and_time(chrono::NaiveTime::MIN)),
            CategoryKind::Images => self.scheme.parse_capture_dir_name(name),
        }
    }
}
