//! Daily append-only reading log.
//!
//! One line per cycle that produced an aggregate:
//!
//! ```text
//! 2024-01-31-14:05:07, 80.5, 75.2, err, err, on, off
//! ```
//!
//! Columns: timestamp, then a humidity/°F pair per sensor in id order,
//! then fan and heat lamp status.  A sensor whose sample failed this cycle
//! is written as `err` in both of its columns.

use core::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use heapless::Vec;
use log::{debug, error};

use super::naming::NamingScheme;
use crate::control::hysteresis::ActuatorState;
use crate::error::{InitFault, StorageFault};
use crate::sensors::MAX_SENSORS;

/// Column value written for a failed sensor.
pub const FAULT_SENTINEL: &str = "err";

const SEPARATOR: &str = ", ";

/// One numeric column.  Whole values keep a trailing `.0` (`80.0`, not
/// `80`) so lines match the files already on the volume.
struct Number(f32);

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.1}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoggedSample {
    pub humidity: f32,
    pub temperature_f: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub timestamp: NaiveDateTime,
    /// `None` for a sensor that failed this cycle.
    pub sensors: Vec<Option<LoggedSample>, MAX_SENSORS>,
    pub fan: ActuatorState,
    pub heat_lamp: ActuatorState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogParseError {
    /// Column count is not `3 + 2 * sensors`.
    ColumnCount,
    Timestamp,
    Number,
    /// Only one column of a sensor pair is `err`.
    HalfSentinel,
    Status,
}

impl fmt::Display for LogParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColumnCount => write!(f, "wrong number of columns"),
            Self::Timestamp => write!(f, "bad timestamp"),
            Self::Number => write!(f, "bad number"),
            Self::HalfSentinel => write!(f, "sensor pair only half failed"),
            Self::Status => write!(f, "bad actuator status"),
        }
    }
}

impl std::error::Error for LogParseError {}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&NamingScheme::V1.log_timestamp(self.timestamp))?;
        for sample in &self.sensors {
            match sample {
                Some(s) => write!(
                    f,
                    "{SEPARATOR}{}{SEPARATOR}{}",
                    Number(s.humidity),
                    Number(s.temperature_f)
                )?,
                None => write!(f, "{SEPARATOR}{FAULT_SENTINEL}{SEPARATOR}{FAULT_SENTINEL}")?,
            }
        }
        write!(f, "{SEPARATOR}{}{SEPARATOR}{}", self.fan, self.heat_lamp)
    }
}

impl LogLine {
    /// Parses one line, with or without its trailing newline.
    pub fn parse(line: &str) -> Result<Self, LogParseError> {
        let columns: std::vec::Vec<&str> = line.trim_end_matches('\n').split(SEPARATOR).collect();
        if columns.len() < 3 || (columns.len() - 3) % 2 != 0 {
            return Err(LogParseError::ColumnCount);
        }
        let sensor_count = (columns.len() - 3) / 2;
        if sensor_count > MAX_SENSORS {
            return Err(LogParseError::ColumnCount);
        }

        let timestamp = NamingScheme::V1
            .parse_log_timestamp(columns[0])
            .map_err(|_| LogParseError::Timestamp)?;

        let mut sensors = Vec::new();
        for pair in columns[1..1 + sensor_count * 2].chunks_exact(2) {
            let sample = match (pair[0], pair[1]) {
                (FAULT_SENTINEL, FAULT_SENTINEL) => None,
                (FAULT_SENTINEL, _) | (_, FAULT_SENTINEL) => {
                    return Err(LogParseError::HalfSentinel);
                }
                (h, t) => Some(LoggedSample {
                    humidity: h.parse().map_err(|_| LogParseError::Number)?,
                    temperature_f: t.parse().map_err(|_| LogParseError::Number)?,
                }),
            };
            // Capacity checked above.
            let _ = sensors.push(sample);
        }

        let status = |s: &str| ActuatorState::parse(s).ok_or(LogParseError::Status);
        let fan = status(columns[columns.len() - 2])?;
        let heat_lamp = status(columns[columns.len() - 1])?;

        Ok(Self {
            timestamp,
            sensors,
            fan,
            heat_lamp,
        })
    }
}

/// Appending handle on one day's log file.
pub struct ReadingLog {
    path: PathBuf,
    day: NaiveDate,
    file: File,
}

impl ReadingLog {
    /// Opens (creating if needed) `<dir>/<day file>` for appending.
    pub fn open(dir: &Path, day: NaiveDate, scheme: NamingScheme) -> Result<Self, InitFault> {
        let path = dir.join(scheme.log_file_name(day));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                error!("opening {} failed: {}", path.display(), e);
                InitFault::OpenLogFailed
            })?;
        debug!("reading log at {}", path.display());
        Ok(Self { path, day, file })
    }

    pub fn append(&mut self, line: &LogLine) -> Result<(), StorageFault> {
        writeln!(self.file, "{line}").map_err(|e| {
            error!("writing to {} failed: {}", self.path.display(), e);
            StorageFault::WriteFailure
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }
}
